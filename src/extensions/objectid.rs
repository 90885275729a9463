//! OBJECTID rules (RFC 8474).

use imap_ast::extensions::objectid::ObjectId;
use nom::{
    bytes::streaming::{tag, take_while1},
    combinator::map,
    sequence::delimited,
};

use crate::decode::IMAPResult;

/// `objectid = 1*255(ALPHA / DIGIT / "_" / "-")`
pub(crate) fn objectid(input: &[u8]) -> IMAPResult<ObjectId> {
    map(
        take_while1(|b: u8| b.is_ascii_alphanumeric() || b == b'_' || b == b'-'),
        |bytes: &[u8]| {
            // Safety: the predicate admits ASCII only.
            ObjectId::unvalidated(std::str::from_utf8(bytes).unwrap())
        },
    )(input)
}

/// A parenthesized objectid, as used by `MAILBOXID`, `EMAILID`, and
/// `THREADID` response payloads.
pub(crate) fn objectid_par(input: &[u8]) -> IMAPResult<ObjectId> {
    delimited(tag(b"("), objectid, tag(b")"))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objectid() {
        let (rem, val) = objectid(b"M6d99665000aabcd ").unwrap();
        assert_eq!(rem, b" ");
        assert_eq!(val.inner(), "M6d99665000aabcd");
    }

    #[test]
    fn test_objectid_par() {
        let (rem, val) = objectid_par(b"(T64b478a75b7ea9)x").unwrap();
        assert_eq!(rem, b"x");
        assert_eq!(val.inner(), "T64b478a75b7ea9");
    }
}
