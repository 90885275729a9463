//! METADATA types (RFC 5464).

use crate::core::{AString, NString, Vec1};

/// An option to GETMETADATA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GetMetadataOption {
    /// `MAXSIZE <n>`: don't return values longer than `n`.
    MaxSize(u32),
    /// `DEPTH <0|1|infinity>`
    Depth(MetadataDepth),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MetadataDepth {
    #[default]
    Zero,
    One,
    Infinity,
}

/// An entry/value pair in SETMETADATA and in METADATA responses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryValue {
    pub entry: AString,
    pub value: NString,
}

/// The payload of an untagged METADATA response: either entry/value pairs
/// (answer to GETMETADATA) or a bare entry list (unsolicited change
/// notification).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetadataResponse {
    WithValues(Vec1<EntryValue>),
    WithoutValues(Vec1<AString>),
}

/// The argument of a `METADATA` response code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetadataCode {
    /// `LONGENTRIES <n>`: entries were elided because they exceed MAXSIZE.
    LongEntries(u32),
    /// `MAXSIZE <n>`: the value is too large to store.
    MaxSize(u32),
    /// `TOOMANY`: too many annotations.
    TooMany,
    /// `NOPRIVATE`: the server only supports shared annotations.
    NoPrivate,
}
