//! Flag rules.

use abnf_core::streaming::sp;
use imap_ast::flag::{Flag, FlagFetch, FlagNameAttribute, FlagPerm};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt, value},
    multi::separated_list1,
    sequence::{delimited, preceded},
};

use crate::{core::atom, decode::IMAPResult};

/// `flag = "\Answered" / "\Flagged" / "\Deleted" / "\Seen" / "\Draft" /
///         flag-keyword / flag-extension`
///
/// Does not include `\Recent`.
pub(crate) fn flag(input: &[u8]) -> IMAPResult<Flag> {
    alt((
        map(preceded(tag(b"\\"), atom), Flag::system),
        map(atom, Flag::Keyword),
    ))(input)
}

/// `flag-list = "(" [flag *(SP flag)] ")"`
pub(crate) fn flag_list(input: &[u8]) -> IMAPResult<Vec<Flag>> {
    map(
        delimited(tag(b"("), opt(separated_list1(sp, flag)), tag(b")")),
        Option::unwrap_or_default,
    )(input)
}

/// `flag-fetch = flag / "\Recent"`
pub(crate) fn flag_fetch(input: &[u8]) -> IMAPResult<FlagFetch> {
    alt((
        value(FlagFetch::Recent, tag_no_case(b"\\Recent")),
        map(flag, FlagFetch::Flag),
    ))(input)
}

/// `flag-perm = flag / "\*"`
pub(crate) fn flag_perm(input: &[u8]) -> IMAPResult<FlagPerm> {
    alt((
        value(FlagPerm::Asterisk, tag(b"\\*")),
        map(flag, FlagPerm::Flag),
    ))(input)
}

/// ```abnf
/// mbx-list-flags = *(mbx-list-oflag SP) mbx-list-sflag *(SP mbx-list-oflag) /
///                  mbx-list-oflag *(SP mbx-list-oflag)
/// ```
///
/// Simplified: all attributes are `\` + atom, classified afterwards.
pub(crate) fn mbx_list_flags(input: &[u8]) -> IMAPResult<Vec<FlagNameAttribute>> {
    separated_list1(
        sp,
        map(preceded(tag(b"\\"), atom), FlagNameAttribute::from_atom),
    )(input)
}

#[cfg(test)]
mod tests {
    use imap_ast::core::Atom;

    use super::*;

    #[test]
    fn test_flag() {
        let (rem, val) = flag(b"\\Seen ").unwrap();
        assert_eq!(rem, b" ");
        assert_eq!(val, Flag::Seen);

        let (_, val) = flag(b"\\sEEn ").unwrap();
        assert_eq!(val, Flag::Seen);

        let (_, val) = flag(b"$Forwarded ").unwrap();
        assert_eq!(val, Flag::Keyword(Atom::try_from("$Forwarded").unwrap()));

        let (_, val) = flag(b"\\Custom ").unwrap();
        assert_eq!(val, Flag::Extension(Atom::try_from("Custom").unwrap()));
    }

    #[test]
    fn test_flag_list() {
        let (rem, val) = flag_list(b"(\\Seen \\Draft) ").unwrap();
        assert_eq!(rem, b" ");
        assert_eq!(val, vec![Flag::Seen, Flag::Draft]);

        let (_, val) = flag_list(b"() ").unwrap();
        assert!(val.is_empty());
    }

    #[test]
    fn test_flag_fetch() {
        let (_, val) = flag_fetch(b"\\Recent ").unwrap();
        assert_eq!(val, FlagFetch::Recent);
    }

    #[test]
    fn test_flag_perm() {
        let (_, val) = flag_perm(b"\\*)").unwrap();
        assert_eq!(val, FlagPerm::Asterisk);

        let (_, val) = flag_perm(b"\\Seen)").unwrap();
        assert_eq!(val, FlagPerm::Flag(Flag::Seen));
    }

    #[test]
    fn test_mbx_list_flags() {
        let (rem, val) = mbx_list_flags(b"\\Noselect \\HasChildren)").unwrap();
        assert_eq!(rem, b")");
        assert_eq!(
            val,
            vec![
                FlagNameAttribute::Noselect,
                FlagNameAttribute::HasChildren
            ]
        );
    }
}
