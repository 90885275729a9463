//! QUOTA types (RFC 2087, updated by RFC 9208).

use crate::core::Atom;

/// A quota resource name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    /// `STORAGE`: size of all messages, in units of 1024 octets.
    Storage,
    /// `MESSAGE`: number of messages.
    Message,
    /// `MAILBOX`: number of mailboxes.
    Mailbox,
    /// `ANNOTATION-STORAGE`: size of all annotations.
    AnnotationStorage,
    Other(Atom),
}

impl From<Atom> for Resource {
    fn from(atom: Atom) -> Self {
        match atom.inner().to_ascii_uppercase().as_str() {
            "STORAGE" => Self::Storage,
            "MESSAGE" => Self::Message,
            "MAILBOX" => Self::Mailbox,
            "ANNOTATION-STORAGE" => Self::AnnotationStorage,
            _ => Self::Other(atom),
        }
    }
}

/// A resource usage/limit pair in a QUOTA response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuotaGet {
    pub resource: Resource,
    pub usage: u64,
    pub limit: u64,
}

/// A resource limit in a SETQUOTA command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuotaSet {
    pub resource: Resource,
    pub limit: u64,
}
