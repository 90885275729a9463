//! Envelope and address rules.

use abnf_core::streaming::sp;
use imap_ast::envelope::{Address, AddressOrGroup, Envelope};
use nom::{
    branch::alt,
    bytes::streaming::tag,
    combinator::{map, value},
    multi::many1,
    sequence::{delimited, tuple},
};

use crate::{
    core::{nil, nstring},
    decode::IMAPResult,
};

/// ```abnf
/// envelope = "(" env-date SP env-subject SP env-from SP
///                env-sender SP env-reply-to SP env-to SP env-cc SP
///                env-bcc SP env-in-reply-to SP env-message-id ")"
/// ```
pub(crate) fn envelope(input: &[u8]) -> IMAPResult<Envelope> {
    let mut parser = delimited(
        tag(b"("),
        tuple((
            nstring, // env-date = nstring
            sp,
            nstring, // env-subject = nstring
            sp,
            env_address_list,
            sp,
            env_address_list,
            sp,
            env_address_list,
            sp,
            env_address_list,
            sp,
            env_address_list,
            sp,
            env_address_list,
            sp,
            nstring, // env-in-reply-to = nstring
            sp,
            nstring, // env-message-id = nstring
        )),
        tag(b")"),
    );

    let (
        remaining,
        (date, _, subject, _, from, _, sender, _, reply_to, _, to, _, cc, _, bcc, _, in_reply_to, _, message_id),
    ) = parser(input)?;

    Ok((
        remaining,
        Envelope {
            date,
            subject,
            from,
            sender,
            reply_to,
            to,
            cc,
            bcc,
            in_reply_to,
            message_id,
        },
    ))
}

/// `env-from =/ env-sender =/ ... = "(" 1*address ")" / nil`
///
/// The flat wire list is folded into a group tree right here; group
/// markers never escape the parser.
fn env_address_list(input: &[u8]) -> IMAPResult<Vec<AddressOrGroup>> {
    alt((
        map(
            delimited(tag(b"("), many1(address), tag(b")")),
            AddressOrGroup::walk,
        ),
        value(Vec::new(), nil),
    ))(input)
}

/// `address = "(" addr-name SP addr-adl SP addr-mailbox SP addr-host ")"`
pub(crate) fn address(input: &[u8]) -> IMAPResult<Address> {
    let mut parser = delimited(
        tag(b"("),
        tuple((nstring, sp, nstring, sp, nstring, sp, nstring)),
        tag(b")"),
    );

    let (remaining, (name, _, adl, _, mailbox, _, host)) = parser(input)?;

    Ok((
        remaining,
        Address {
            name,
            adl,
            mailbox,
            host,
        },
    ))
}
