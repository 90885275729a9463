//! URLAUTH rules (RFC 4467).

use abnf_core::streaming::sp;
use imap_ast::extensions::urlauth::{RumpUrl, UrlAuthMechanism, UrlFetchItem};
use nom::{
    combinator::map,
    multi::many0,
    sequence::{preceded, tuple},
};

use crate::{
    core::{astring, atom, nstring},
    decode::IMAPResult,
};

/// One `url-rump SP urlauth-mechanism` pair of a GENURLAUTH command.
pub(crate) fn rump_url(input: &[u8]) -> IMAPResult<RumpUrl> {
    map(
        tuple((astring, sp, map(atom, UrlAuthMechanism::from))),
        |(url, _, mechanism)| RumpUrl { url, mechanism },
    )(input)
}

/// The payload of an untagged URLFETCH response, after the keyword:
///
/// ```abnf
/// urlfetch-data = "URLFETCH" *(SP url SP nstring)
/// ```
pub(crate) fn urlfetch_items(input: &[u8]) -> IMAPResult<Vec<UrlFetchItem>> {
    many0(preceded(
        sp,
        map(tuple((astring, sp, nstring)), |(url, _, data)| {
            UrlFetchItem { url, data }
        }),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rump_url() {
        let (_, val) = rump_url(b"\"imap://example.org/INBOX/;uid=20\" INTERNAL\r\n").unwrap();
        assert_eq!(val.mechanism, UrlAuthMechanism::Internal);
    }

    #[test]
    fn test_urlfetch_items() {
        let (_, val) =
            urlfetch_items(b" \"imap://example.org/INBOX/;uid=20\" {3}\r\nabc\r\n").unwrap();
        assert_eq!(val.len(), 1);
        assert_eq!(val[0].data.as_bytes(), Some(b"abc".as_ref()));
    }
}
