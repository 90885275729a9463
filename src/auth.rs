//! AUTHENTICATE-related rules.

use abnf_core::streaming::crlf_relaxed as crlf;
use imap_ast::{
    auth::{AuthMechanism, AuthenticateData},
    core::Secret,
};
use nom::{
    branch::alt,
    bytes::streaming::tag,
    combinator::{map, value},
    sequence::terminated,
};

use crate::{
    core::{atom, base64},
    decode::IMAPResult,
};

/// `auth-type = atom`
pub(crate) fn auth_type(input: &[u8]) -> IMAPResult<AuthMechanism> {
    map(atom, AuthMechanism::from)(input)
}

/// A client line answering an AUTHENTICATE continuation request:
///
/// ```abnf
/// authenticate-data = base64 CRLF / "*" CRLF
/// ```
///
/// `*` cancels the exchange (RFC 3501, section 6.2.2).
pub(crate) fn authenticate_data(input: &[u8]) -> IMAPResult<AuthenticateData> {
    alt((
        value(AuthenticateData::Cancel, terminated(tag(b"*"), crlf)),
        map(terminated(base64, crlf), |data| {
            AuthenticateData::Continue(Secret::new(data))
        }),
    ))(input)
}
