//! STATUS attribute rules.

use abnf_core::streaming::sp;
use imap_ast::{
    identifier::{ModSeq, Uid, UidValidity},
    status::{StatusAttribute, StatusAttributeValue},
};
use nom::{combinator::map, multi::separated_list1, sequence::preceded};

use crate::{
    core::{number, number64, nz_number, unknown_keyword, uppercased_atom},
    decode::IMAPResult,
    extensions::objectid::objectid_par,
};

/// ```abnf
/// status-att = "MESSAGES" / "RECENT" / "UIDNEXT" / "UIDVALIDITY" /
///              "UNSEEN" / "DELETED" / "SIZE" /         ; RFC 9051, RFC 8438
///              "HIGHESTMODSEQ" /                       ; RFC 7162
///              "MAILBOXID"                             ; RFC 8474
/// ```
pub(crate) fn status_att(input: &[u8]) -> IMAPResult<StatusAttribute> {
    let (remaining, keyword) = uppercased_atom(input)?;

    let att = match keyword.as_str() {
        "MESSAGES" => StatusAttribute::Messages,
        "RECENT" => StatusAttribute::Recent,
        "UIDNEXT" => StatusAttribute::UidNext,
        "UIDVALIDITY" => StatusAttribute::UidValidity,
        "UNSEEN" => StatusAttribute::Unseen,
        "DELETED" => StatusAttribute::Deleted,
        "SIZE" => StatusAttribute::Size,
        "HIGHESTMODSEQ" => StatusAttribute::HighestModSeq,
        "MAILBOXID" => StatusAttribute::MailboxId,
        _ => return unknown_keyword(input),
    };

    Ok((remaining, att))
}

/// `status-att-list = status-att-val *(SP status-att-val)`
pub(crate) fn status_att_list(input: &[u8]) -> IMAPResult<Vec<StatusAttributeValue>> {
    separated_list1(sp, status_att_val)(input)
}

/// ```abnf
/// status-att-val = ("MESSAGES" SP number) /
///                  ("RECENT" SP number) /
///                  ("UIDNEXT" SP nz-number) /
///                  ("UIDVALIDITY" SP nz-number) /
///                  ("UNSEEN" SP number) /
///                  ("DELETED" SP number) /
///                  ("SIZE" SP number64) /
///                  ("HIGHESTMODSEQ" SP mod-sequence-valzer) /
///                  ("MAILBOXID" SP "(" objectid ")")
/// ```
pub(crate) fn status_att_val(input: &[u8]) -> IMAPResult<StatusAttributeValue> {
    let (remaining, keyword) = uppercased_atom(input)?;

    match keyword.as_str() {
        "MESSAGES" => map(preceded(sp, number), StatusAttributeValue::Messages)(remaining),
        "RECENT" => map(preceded(sp, number), StatusAttributeValue::Recent)(remaining),
        "UIDNEXT" => map(preceded(sp, nz_number), |n| {
            StatusAttributeValue::UidNext(Uid::from(n))
        })(remaining),
        "UIDVALIDITY" => map(preceded(sp, nz_number), |n| {
            StatusAttributeValue::UidValidity(UidValidity::from(n))
        })(remaining),
        "UNSEEN" => map(preceded(sp, number), StatusAttributeValue::Unseen)(remaining),
        "DELETED" => map(preceded(sp, number), StatusAttributeValue::Deleted)(remaining),
        "SIZE" => map(preceded(sp, number64), StatusAttributeValue::Size)(remaining),
        "HIGHESTMODSEQ" => map(preceded(sp, number64), |n| {
            StatusAttributeValue::HighestModSeq(ModSeq::new(n))
        })(remaining),
        "MAILBOXID" => map(preceded(sp, objectid_par), StatusAttributeValue::MailboxId)(remaining),
        _ => unknown_keyword(input),
    }
}
