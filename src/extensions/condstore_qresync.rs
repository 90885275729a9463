//! CONDSTORE/QRESYNC rules (RFC 7162).

use abnf_core::streaming::sp;
use imap_ast::{
    extensions::condstore_qresync::{AttributeFlag, EntryTypeReq, SearchModSeq, SelectParameter},
    identifier::{ModSeq, UidValidity},
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    character::streaming::char,
    combinator::{map, opt},
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
};

use crate::{
    core::{atom, number64, nz_number, unknown_keyword, uppercased_atom},
    decode::IMAPResult,
    sequence::uid_set,
};

/// The suffix of a `SEARCH MODSEQ` key, entered after the keyword:
///
/// ```abnf
/// search-modsequence = "MODSEQ" [search-modseq-ext] SP mod-sequence-valzer
/// search-modseq-ext  = SP entry-name SP entry-type-req
/// ```
pub(crate) fn search_modsequence(input: &[u8]) -> IMAPResult<SearchModSeq> {
    let mut parser = tuple((
        opt(preceded(
            sp,
            tuple((entry_flag_name, preceded(sp, entry_type_req))),
        )),
        preceded(sp, number64),
    ));

    let (remaining, (entry, value)) = parser(input)?;

    Ok((
        remaining,
        SearchModSeq {
            entry,
            value: ModSeq::new(value),
        },
    ))
}

/// Each flag `<flag>` is mapped to `"/flags/<flag>"`, following quoted
/// escaping; e.g., `\Seen` becomes `"/flags/\\seen"` on the wire.
///
/// ```abnf
/// entry-flag-name = DQUOTE "/flags/" attr-flag DQUOTE
/// ```
fn entry_flag_name(input: &[u8]) -> IMAPResult<AttributeFlag> {
    delimited(tag_no_case("\"/flags/"), attr_flag, char('"'))(input)
}

/// ```abnf
/// attr-flag = "\\Answered" / "\\Flagged" / "\\Deleted" / "\\Seen" /
///             "\\Draft" / attr-flag-keyword / attr-flag-extension
///             ;; Does not include "\\Recent".
/// ```
fn attr_flag(input: &[u8]) -> IMAPResult<AttributeFlag> {
    alt((
        map(preceded(tag("\\\\"), atom), AttributeFlag::System),
        map(atom, AttributeFlag::Keyword),
    ))(input)
}

/// ```abnf
/// entry-type-req  = entry-type-resp / "all"
/// entry-type-resp = "priv" / "shared"
/// ```
fn entry_type_req(input: &[u8]) -> IMAPResult<EntryTypeReq> {
    let (remaining, keyword) = uppercased_atom(input)?;

    match keyword.as_str() {
        "PRIV" => Ok((remaining, EntryTypeReq::Private)),
        "SHARED" => Ok((remaining, EntryTypeReq::Shared)),
        "ALL" => Ok((remaining, EntryTypeReq::All)),
        _ => unknown_keyword(input),
    }
}

/// `select-param *(SP select-param)` inside parentheses:
///
/// ```abnf
/// select-params    = "(" select-param *(SP select-param) ")"
/// select-param     = "CONDSTORE" /
///                    "QRESYNC" SP "(" uidvalidity SP mod-sequence-value
///                    [SP known-uids] ")"
/// ```
pub(crate) fn select_parameters(input: &[u8]) -> IMAPResult<Vec<SelectParameter>> {
    delimited(
        tag(b"("),
        separated_list1(sp, select_parameter),
        tag(b")"),
    )(input)
}

fn select_parameter(input: &[u8]) -> IMAPResult<SelectParameter> {
    let (remaining, keyword) = uppercased_atom(input)?;

    match keyword.as_str() {
        "CONDSTORE" => Ok((remaining, SelectParameter::CondStore)),
        "QRESYNC" => map(
            preceded(
                sp,
                delimited(
                    tag(b"("),
                    tuple((
                        nz_number,
                        preceded(sp, number64),
                        opt(preceded(sp, uid_set)),
                    )),
                    tag(b")"),
                ),
            ),
            |(uid_validity, mod_seq, known_uids)| SelectParameter::QResync {
                uid_validity: UidValidity::from(uid_validity),
                mod_seq: ModSeq::new(mod_seq),
                known_uids,
            },
        )(remaining),
        _ => unknown_keyword(input),
    }
}
