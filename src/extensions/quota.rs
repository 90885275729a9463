//! QUOTA rules (RFC 2087, updated by RFC 9208).

use abnf_core::streaming::sp;
use imap_ast::{
    core::Vec1,
    extensions::quota::{QuotaGet, Resource},
};
use nom::{
    bytes::streaming::tag,
    combinator::map,
    multi::separated_list1,
    sequence::{delimited, tuple},
};

use crate::{
    core::{atom, number64},
    decode::IMAPResult,
};

/// ```abnf
/// quota-list     = "(" quota-resource *(SP quota-resource) ")"
/// quota-resource = resource-name SP resource-usage SP resource-limit
/// ```
///
/// Some servers emit an excessive space inside the list; a single leading
/// space before a resource name is tolerated by the `SP` separator
/// handling of `separated_list1`.
pub(crate) fn quota_list(input: &[u8]) -> IMAPResult<Vec1<QuotaGet>> {
    map(
        delimited(
            tag(b"("),
            separated_list1(sp, quota_resource),
            tag(b")"),
        ),
        Vec1::unvalidated,
    )(input)
}

fn quota_resource(input: &[u8]) -> IMAPResult<QuotaGet> {
    let mut parser = tuple((atom, sp, number64, sp, number64));

    let (remaining, (resource, _, usage, _, limit)) = parser(input)?;

    Ok((
        remaining,
        QuotaGet {
            resource: Resource::from(resource),
            usage,
            limit,
        },
    ))
}
