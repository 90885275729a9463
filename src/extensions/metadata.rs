//! METADATA rules (RFC 5464).

use abnf_core::streaming::sp;
use imap_ast::{
    core::{AString, IString, NString, Vec1},
    extensions::metadata::{
        EntryValue, GetMetadataOption, MetadataCode, MetadataDepth, MetadataResponse,
    },
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::map,
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
};

use crate::{
    core::{astring, literal, number, nstring, unknown_keyword, uppercased_atom},
    decode::IMAPResult,
};

/// ```abnf
/// entry-values = "(" entry-value *(SP entry-value) ")"
/// entry-value  = entry SP value
/// entry        = astring
/// value        = nstring / literal8
/// ```
pub(crate) fn metadata_entry_values(input: &[u8]) -> IMAPResult<Vec1<EntryValue>> {
    map(
        delimited(
            tag(b"("),
            separated_list1(
                sp,
                map(tuple((astring, sp, metadata_value)), |(entry, _, value)| {
                    EntryValue { entry, value }
                }),
            ),
            tag(b")"),
        ),
        Vec1::unvalidated,
    )(input)
}

fn metadata_value(input: &[u8]) -> IMAPResult<NString> {
    alt((
        nstring,
        map(preceded(tag(b"~"), literal), |literal| {
            NString(Some(IString::Literal(literal)))
        }),
    ))(input)
}

/// `entry-list = entry *(SP entry)` or a parenthesized entry list (the
/// command side uses the parenthesized form, the unsolicited response the
/// bare one).
pub(crate) fn metadata_entries(input: &[u8]) -> IMAPResult<Vec1<AString>> {
    map(
        alt((
            delimited(tag(b"("), separated_list1(sp, astring), tag(b")")),
            separated_list1(sp, astring),
        )),
        Vec1::unvalidated,
    )(input)
}

/// ```abnf
/// getmetadata-options = "(" getmetadata-option *(SP getmetadata-option) ")"
/// getmetadata-option  = "MAXSIZE" SP number / "DEPTH" SP ("0" / "1" / "infinity")
/// ```
pub(crate) fn getmetadata_options(input: &[u8]) -> IMAPResult<Vec<GetMetadataOption>> {
    delimited(
        tag(b"("),
        separated_list1(sp, getmetadata_option),
        tag(b")"),
    )(input)
}

fn getmetadata_option(input: &[u8]) -> IMAPResult<GetMetadataOption> {
    let (remaining, keyword) = uppercased_atom(input)?;

    match keyword.as_str() {
        "MAXSIZE" => map(preceded(sp, number), GetMetadataOption::MaxSize)(remaining),
        "DEPTH" => map(preceded(sp, metadata_depth), GetMetadataOption::Depth)(remaining),
        _ => unknown_keyword(input),
    }
}

fn metadata_depth(input: &[u8]) -> IMAPResult<MetadataDepth> {
    alt((
        map(tag(b"0"), |_| MetadataDepth::Zero),
        map(tag(b"1"), |_| MetadataDepth::One),
        map(tag_no_case(b"infinity"), |_| MetadataDepth::Infinity),
    ))(input)
}

/// The payload of an untagged METADATA response, after the mailbox:
/// entry/value pairs for a GETMETADATA answer, a bare entry list for an
/// unsolicited change notification.
pub(crate) fn metadata_resp_payload(input: &[u8]) -> IMAPResult<MetadataResponse> {
    alt((
        map(metadata_entry_values, MetadataResponse::WithValues),
        map(
            map(separated_list1(sp, astring), Vec1::unvalidated),
            MetadataResponse::WithoutValues,
        ),
    ))(input)
}

/// The argument of a `METADATA` response code, after the keyword:
///
/// ```abnf
/// resp-text-code =/ "METADATA" SP ("LONGENTRIES" SP number /
///                                  "MAXSIZE" SP number /
///                                  "TOOMANY" / "NOPRIVATE")
/// ```
pub(crate) fn metadata_code(input: &[u8]) -> IMAPResult<MetadataCode> {
    let (remaining, keyword) = uppercased_atom(input)?;

    match keyword.as_str() {
        "LONGENTRIES" => map(preceded(sp, number), MetadataCode::LongEntries)(remaining),
        "MAXSIZE" => map(preceded(sp, number), MetadataCode::MaxSize)(remaining),
        "TOOMANY" => Ok((remaining, MetadataCode::TooMany)),
        "NOPRIVATE" => Ok((remaining, MetadataCode::NoPrivate)),
        _ => unknown_keyword(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_entry_values() {
        let (_, val) =
            metadata_entry_values(b"(/shared/comment \"My comment\")\r\n").unwrap();
        assert_eq!(val.len(), 1);
        assert_eq!(val.head().entry.as_bytes(), b"/shared/comment");
        assert_eq!(
            val.head().value.as_bytes(),
            Some(b"My comment".as_ref())
        );
    }

    #[test]
    fn test_metadata_entry_value_nil_and_literal() {
        let (_, val) = metadata_entry_values(b"(/shared/comment NIL)\r\n").unwrap();
        assert_eq!(val.head().value, NString(None));

        let (_, val) = metadata_entry_values(b"(/shared/comment {3}\r\nabc)\r\n").unwrap();
        assert_eq!(val.head().value.as_bytes(), Some(b"abc".as_ref()));
    }

    #[test]
    fn test_getmetadata_options() {
        let (_, val) = getmetadata_options(b"(MAXSIZE 1024)\r\n").unwrap();
        assert_eq!(val, vec![GetMetadataOption::MaxSize(1024)]);

        let (_, val) = getmetadata_options(b"(DEPTH 1)\r\n").unwrap();
        assert_eq!(val, vec![GetMetadataOption::Depth(MetadataDepth::One)]);
    }

    #[test]
    fn test_metadata_code() {
        let (_, val) = metadata_code(b"LONGENTRIES 2199]").unwrap();
        assert_eq!(val, MetadataCode::LongEntries(2199));

        let (_, val) = metadata_code(b"NOPRIVATE]").unwrap();
        assert_eq!(val, MetadataCode::NoPrivate);
    }
}
