//! ID rules (RFC 2971).

use abnf_core::streaming::sp;
use imap_ast::core::{IString, NString};
use nom::{
    branch::alt,
    bytes::streaming::tag,
    combinator::{map, opt, value},
    multi::separated_list1,
    sequence::{delimited, tuple},
};

use crate::{
    core::{nil, nstring, string},
    decode::IMAPResult,
};

/// The field/value list shared by the ID command and the ID response:
///
/// ```abnf
/// id-params-list = "(" [string SP nstring *(SP string SP nstring)] ")" / nil
/// ```
pub(crate) fn id_parameters(input: &[u8]) -> IMAPResult<Option<Vec<(IString, NString)>>> {
    alt((
        map(
            delimited(
                tag(b"("),
                opt(separated_list1(
                    sp,
                    map(tuple((string, sp, nstring)), |(key, _, value)| (key, value)),
                )),
                tag(b")"),
            ),
            |fields| Some(fields.unwrap_or_default()),
        ),
        value(None, nil),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_parameters() {
        let (_, val) = id_parameters(b"(\"name\" \"sodr\" \"version\" \"19.34\")\r\n").unwrap();
        let fields = val.unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].0.as_bytes(), b"name");

        let (_, val) = id_parameters(b"NIL\r\n").unwrap();
        assert_eq!(val, None);

        let (_, val) = id_parameters(b"()\r\n").unwrap();
        assert_eq!(val, Some(vec![]));

        let (_, val) = id_parameters(b"(\"os\" NIL)\r\n").unwrap();
        assert_eq!(val.unwrap()[0].1, NString(None));
    }
}
