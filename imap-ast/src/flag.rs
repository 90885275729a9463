//! Flag-related types.

use std::fmt;

use crate::core::Atom;

/// A message flag as it appears in commands and in `FLAGS`/`PERMANENTFLAGS`
/// lists (excluding `\Recent` and `\*`, which have their own positions in
/// the grammar).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Flag {
    /// `\Answered`
    Answered,
    /// `\Deleted`
    Deleted,
    /// `\Draft`
    Draft,
    /// `\Flagged`
    Flagged,
    /// `\Seen`
    Seen,
    /// A keyword without backslash, e.g., `$Forwarded`.
    Keyword(Atom),
    /// `\` + atom, reserved for future standardization.
    Extension(Atom),
}

impl Flag {
    /// Map a system flag name (without the leading backslash) onto its
    /// variant; anything unknown becomes an extension flag.
    pub fn system(atom: Atom) -> Self {
        match atom.inner().to_ascii_lowercase().as_str() {
            "answered" => Self::Answered,
            "deleted" => Self::Deleted,
            "draft" => Self::Draft,
            "flagged" => Self::Flagged,
            "seen" => Self::Seen,
            _ => Self::Extension(atom),
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Answered => f.write_str("\\Answered"),
            Self::Deleted => f.write_str("\\Deleted"),
            Self::Draft => f.write_str("\\Draft"),
            Self::Flagged => f.write_str("\\Flagged"),
            Self::Seen => f.write_str("\\Seen"),
            Self::Keyword(atom) => write!(f, "{}", atom),
            Self::Extension(atom) => write!(f, "\\{}", atom),
        }
    }
}

/// A flag in a FETCH response, where `\Recent` may additionally occur.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlagFetch {
    Flag(Flag),
    Recent,
}

/// A flag in a `PERMANENTFLAGS` code, where `\*` may additionally occur.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlagPerm {
    Flag(Flag),
    Asterisk,
}

/// A mailbox name attribute in LIST/LSUB responses.
///
/// Covers RFC 3501, SPECIAL-USE (RFC 6154), and LIST-EXTENDED (RFC 5258).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlagNameAttribute {
    /// `\Noinferiors`
    Noinferiors,
    /// `\Noselect`
    Noselect,
    /// `\Marked`
    Marked,
    /// `\Unmarked`
    Unmarked,
    /// `\NonExistent`
    NonExistent,
    /// `\Subscribed`
    Subscribed,
    /// `\Remote`
    Remote,
    /// `\HasChildren`
    HasChildren,
    /// `\HasNoChildren`
    HasNoChildren,
    /// `\All`
    All,
    /// `\Archive`
    Archive,
    /// `\Drafts`
    Drafts,
    /// `\Flagged`
    Flagged,
    /// `\Junk`
    Junk,
    /// `\Sent`
    Sent,
    /// `\Trash`
    Trash,
    Extension(Atom),
}

impl FlagNameAttribute {
    pub fn from_atom(atom: Atom) -> Self {
        match atom.inner().to_ascii_lowercase().as_str() {
            "noinferiors" => Self::Noinferiors,
            "noselect" => Self::Noselect,
            "marked" => Self::Marked,
            "unmarked" => Self::Unmarked,
            "nonexistent" => Self::NonExistent,
            "subscribed" => Self::Subscribed,
            "remote" => Self::Remote,
            "haschildren" => Self::HasChildren,
            "hasnochildren" => Self::HasNoChildren,
            "all" => Self::All,
            "archive" => Self::Archive,
            "drafts" => Self::Drafts,
            "flagged" => Self::Flagged,
            "junk" => Self::Junk,
            "sent" => Self::Sent,
            "trash" => Self::Trash,
            _ => Self::Extension(atom),
        }
    }
}

/// Whether STORE replaces, adds, or removes flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreType {
    /// `FLAGS`
    Replace,
    /// `+FLAGS`
    Add,
    /// `-FLAGS`
    Remove,
}

/// Whether STORE suppresses the untagged FETCH answer (`.SILENT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreResponse {
    Answer,
    Silent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_flags_are_case_insensitive() {
        let atom = Atom::try_from("SeEn").unwrap();
        assert_eq!(Flag::system(atom), Flag::Seen);
    }

    #[test]
    fn test_unknown_system_flag_is_extension() {
        let atom = Atom::try_from("Unsent").unwrap();
        assert_eq!(Flag::system(atom.clone()), Flag::Extension(atom));
    }

    #[test]
    fn test_flag_name_attribute() {
        let atom = Atom::try_from("HasNoChildren").unwrap();
        assert_eq!(
            FlagNameAttribute::from_atom(atom),
            FlagNameAttribute::HasNoChildren
        );
    }
}
