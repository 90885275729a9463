//! Mailbox-related types.

use crate::core::{AString, IString, ListCharString};

/// A mailbox name.
///
/// `INBOX` is special-cased: all case variants denote the same mailbox.
/// Every other name is kept as the raw bytes from the wire; decoding
/// modified UTF-7 is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mailbox {
    Inbox,
    Other(MailboxOther),
}

impl Mailbox {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Inbox => b"INBOX",
            Self::Other(other) => other.0.as_bytes(),
        }
    }
}

impl From<AString> for Mailbox {
    fn from(value: AString) -> Self {
        if value.as_bytes().eq_ignore_ascii_case(b"INBOX") {
            Self::Inbox
        } else {
            Self::Other(MailboxOther(value))
        }
    }
}

impl TryFrom<&str> for Mailbox {
    type Error = crate::error::ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(Self::from(AString::try_from(value)?))
    }
}

/// A mailbox name other than `INBOX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MailboxOther(AString);

impl MailboxOther {
    pub fn inner(&self) -> &AString {
        &self.0
    }
}

/// A mailbox pattern in LIST/LSUB, which may contain the `%` and `*`
/// wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListMailbox {
    Token(ListCharString),
    String(IString),
}

impl ListMailbox {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Token(token) => token.inner().as_bytes(),
            Self::String(string) => string.as_bytes(),
        }
    }
}

impl TryFrom<&str> for ListMailbox {
    type Error = crate::error::ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match ListCharString::try_from(value) {
            Ok(token) => Ok(Self::Token(token)),
            Err(_) => Ok(Self::String(IString::try_from(value)?)),
        }
    }
}

/// LIST selection options (RFC 5258 `list-select-opt`, RFC 6154).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListSelectOption {
    /// `SUBSCRIBED`
    Subscribed,
    /// `REMOTE`
    Remote,
    /// `RECURSIVEMATCH`
    RecursiveMatch,
    /// `SPECIAL-USE` (RFC 6154)
    SpecialUse,
}

/// LIST return options (RFC 5258 `return-option`, RFC 5819, RFC 6154).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListReturnOption {
    /// `SUBSCRIBED`
    Subscribed,
    /// `CHILDREN`
    Children,
    /// `SPECIAL-USE`
    SpecialUse,
    /// `STATUS (attrs)` (RFC 5819)
    Status(Vec<crate::status::StatusAttribute>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbox_is_case_insensitive() {
        for name in ["INBOX", "inbox", "iNbOx"] {
            assert_eq!(Mailbox::try_from(name).unwrap(), Mailbox::Inbox);
        }
    }

    #[test]
    fn test_other_mailbox_keeps_case() {
        let mailbox = Mailbox::try_from("Sent").unwrap();
        assert_eq!(mailbox.as_bytes(), b"Sent");
    }
}
