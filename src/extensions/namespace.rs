//! NAMESPACE rules (RFC 2342).

use abnf_core::streaming::{dquote, sp};
use imap_ast::{
    core::Vec1,
    extensions::namespace::{NamespaceDescr, NamespaceResponse},
};
use nom::{
    branch::alt,
    bytes::streaming::tag,
    combinator::{map, value},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, preceded, tuple},
};

use crate::{
    core::{nil, quoted_char, string},
    decode::IMAPResult,
};

/// The payload of an untagged NAMESPACE response, after the keyword:
///
/// ```abnf
/// namespace-response = "NAMESPACE" SP namespace SP namespace SP namespace
/// namespace          = nil / "(" 1*namespace-descr ")"
/// ```
pub(crate) fn namespace_response_payload(input: &[u8]) -> IMAPResult<NamespaceResponse> {
    let mut parser = tuple((namespace, preceded(sp, namespace), preceded(sp, namespace)));

    let (remaining, (personal, other_users, shared)) = parser(input)?;

    Ok((
        remaining,
        NamespaceResponse {
            personal,
            other_users,
            shared,
        },
    ))
}

fn namespace(input: &[u8]) -> IMAPResult<Option<Vec1<NamespaceDescr>>> {
    alt((
        map(
            delimited(tag(b"("), many1(namespace_descr), tag(b")")),
            |descrs| Some(Vec1::unvalidated(descrs)),
        ),
        value(None, nil),
    ))(input)
}

/// ```abnf
/// namespace-descr = "(" string SP (DQUOTE QUOTED-CHAR DQUOTE / nil)
///                   *(namespace-response-extension) ")"
/// namespace-response-extension = SP string SP "(" string *(SP string) ")"
/// ```
fn namespace_descr(input: &[u8]) -> IMAPResult<NamespaceDescr> {
    let mut parser = delimited(
        tag(b"("),
        tuple((
            string,
            sp,
            alt((
                map(delimited(dquote, quoted_char, dquote), Some),
                value(None, nil),
            )),
            many0(preceded(
                sp,
                map(
                    tuple((
                        string,
                        sp,
                        delimited(
                            tag(b"("),
                            map(separated_list1(sp, string), Vec1::unvalidated),
                            tag(b")"),
                        ),
                    )),
                    |(name, _, values)| (name, values),
                ),
            )),
        )),
        tag(b")"),
    );

    let (remaining, (prefix, _, delimiter, extensions)) = parser(input)?;

    Ok((
        remaining,
        NamespaceDescr {
            prefix,
            delimiter,
            extensions,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_response() {
        let (_, val) =
            namespace_response_payload(b"((\"\" \"/\")) NIL NIL\r\n").unwrap();
        let personal = val.personal.unwrap();
        assert_eq!(personal.len(), 1);
        assert_eq!(personal.head().prefix.as_bytes(), b"");
        assert_eq!(personal.head().delimiter.map(|d| d.inner()), Some('/'));
        assert!(val.other_users.is_none());
        assert!(val.shared.is_none());
    }

    #[test]
    fn test_namespace_descr_with_extension() {
        let (_, val) =
            namespace_descr(b"(\"\" \"/\" \"X-PARAM\" (\"FLAG1\" \"FLAG2\"))x").unwrap();
        assert_eq!(val.extensions.len(), 1);
        assert_eq!(val.extensions[0].1.len(), 2);
    }
}
