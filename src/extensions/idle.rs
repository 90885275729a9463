//! IDLE rules (RFC 2177).

use abnf_core::streaming::crlf_relaxed as crlf;
use nom::{bytes::streaming::tag_no_case, combinator::value, sequence::terminated};

use crate::decode::IMAPResult;

/// The `DONE` line terminating an IDLE:
///
/// ```abnf
/// idle-done = "DONE" CRLF
/// ```
pub(crate) fn idle_done(input: &[u8]) -> IMAPResult<()> {
    value((), terminated(tag_no_case(b"DONE"), crlf))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_done() {
        assert!(idle_done(b"done\r\n").is_ok());
        assert!(idle_done(b"DONE\r\n").is_ok());
        assert!(matches!(idle_done(b"DONE"), Err(nom::Err::Incomplete(_))));
        assert!(idle_done(b"DONE \r\n").is_err());
    }
}
