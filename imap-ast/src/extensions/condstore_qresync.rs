//! CONDSTORE/QRESYNC types (RFC 7162).

use crate::{
    core::Atom,
    identifier::{ModSeq, SeqSet, UidValidity},
};

/// A parameter to SELECT/EXAMINE.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectParameter {
    /// `(CONDSTORE)`
    CondStore,
    /// `(QRESYNC (uidvalidity modseq [known-uids]))`
    QResync {
        uid_validity: UidValidity,
        mod_seq: ModSeq,
        known_uids: Option<crate::identifier::UidSet>,
    },
}

/// A flag inside a `search-modseq-ext` entry name, `"/flags/<flag>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeFlag {
    /// A system flag, e.g., `\\Seen`.
    System(Atom),
    /// A keyword, e.g., `$mdnsent`.
    Keyword(Atom),
}

/// Whether a MODSEQ search consults the private, the shared, or both
/// metadata items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryTypeReq {
    Private,
    Shared,
    All,
}

/// The argument of a `SEARCH MODSEQ` key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchModSeq {
    /// Optional entry name and type (`search-modseq-ext`).
    pub entry: Option<(AttributeFlag, EntryTypeReq)>,
    pub value: ModSeq,
}

/// The argument of a `MODIFIED` response code: the message set that
/// failed the conditional STORE.
pub type Modified = SeqSet;
