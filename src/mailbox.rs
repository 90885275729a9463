//! Mailbox rules.

use std::str::from_utf8;

use imap_ast::{
    core::ListCharString,
    mailbox::{ListMailbox, Mailbox},
    utils::indicators::is_list_char,
};
use nom::{branch::alt, bytes::streaming::take_while1, combinator::map};

use crate::{
    core::{astring, string},
    decode::IMAPResult,
};

/// `list-mailbox = 1*list-char / string`
pub(crate) fn list_mailbox(input: &[u8]) -> IMAPResult<ListMailbox> {
    alt((
        map(take_while1(is_list_char), |bytes: &[u8]| {
            // Safety: `is_list_char` admits ASCII only.
            ListMailbox::Token(ListCharString::unvalidated(from_utf8(bytes).unwrap()))
        }),
        map(string, ListMailbox::String),
    ))(input)
}

/// `mailbox = "INBOX" / astring`
///
/// All case variants of INBOX (e.g., "iNbOx") denote INBOX; the
/// conversion into [`Mailbox`] handles that. Everything else is kept as
/// raw bytes — decoding modified UTF-7 is the caller's concern.
pub(crate) fn mailbox(input: &[u8]) -> IMAPResult<Mailbox> {
    map(astring, Mailbox::from)(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailbox() {
        let (_, val) = mailbox(b"\"iNbOx\" ").unwrap();
        assert_eq!(val, Mailbox::Inbox);

        assert!(mailbox(b"{3}\r\naaa ").is_ok());
        assert!(mailbox(b"inbox.sent ").is_ok());

        let (_, val) = mailbox(b"Archive ").unwrap();
        assert_eq!(val.as_bytes(), b"Archive");
    }

    #[test]
    fn test_list_mailbox() {
        let (rem, val) = list_mailbox(b"%/* ").unwrap();
        assert_eq!(rem, b" ");
        assert_eq!(val.as_bytes(), b"%/*");

        assert!(list_mailbox(b"\"folder name\" ").is_ok());
    }
}
