//! SEARCH-related types.

use std::num::NonZeroU32;

use crate::{
    core::{AString, Atom, Tag, Vec1},
    datetime::Date,
    extensions::{condstore_qresync::SearchModSeq, objectid::ObjectId},
    identifier::{LastCommandSet, ModSeq, SeqSet, UidSet},
    mailbox::Mailbox,
};

/// A search criterion. Recursive through `Not`, `Or`, and `And` (a
/// parenthesized key list); the tree owns its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchKey {
    /// All messages in the mailbox.
    All,
    Answered,
    Bcc(AString),
    /// Internal date is earlier than the given date.
    Before(Date),
    Body(AString),
    Cc(AString),
    Deleted,
    Draft,
    Flagged,
    From(AString),
    Header(AString, AString),
    Keyword(Atom),
    Larger(u32),
    New,
    Not(Box<SearchKey>),
    Old,
    On(Date),
    Or(Box<SearchKey>, Box<SearchKey>),
    Recent,
    Seen,
    SentBefore(Date),
    SentOn(Date),
    SentSince(Date),
    Since(Date),
    Smaller(u32),
    Subject(AString),
    Text(AString),
    To(AString),
    Unanswered,
    Undeleted,
    Undraft,
    Unflagged,
    Unkeyword(Atom),
    Unseen,
    /// A parenthesized key list; all keys must match.
    And(Vec1<SearchKey>),
    /// A bare sequence set, or `$` (RFC 5182).
    SequenceSet(LastCommandSet<SeqSet>),
    /// `UID` + set, or `$`.
    Uid(LastCommandSet<UidSet>),
    /// `MODSEQ` (RFC 7162).
    ModSeq(SearchModSeq),
    /// `OLDER <seconds>` (RFC 5032).
    Older(u32),
    /// `YOUNGER <seconds>` (RFC 5032).
    Younger(u32),
    /// `FILTER <name>` (RFC 5466).
    Filter(Atom),
    /// `EMAILID <objectid>` (RFC 8474).
    EmailId(ObjectId),
    /// `THREADID <objectid>` (RFC 8474).
    ThreadId(ObjectId),
}

/// A `RETURN (...)` option (RFC 4731, RFC 5182, RFC 9394).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchReturnOption {
    Min,
    Max,
    All,
    Count,
    /// `SAVE` (RFC 5182): save the result for `$`.
    Save,
    /// `PARTIAL <range>` (RFC 9394).
    Partial(PartialRange),
}

/// A PARTIAL range: 1-based positions into the result, negative values
/// counting from the end. Both bounds are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartialRange {
    pub first: i64,
    pub last: i64,
}

/// The payload of an untagged ESEARCH response (RFC 4731).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EsearchResponse {
    /// `(TAG "...")` correlator.
    pub correlator: Option<Tag>,
    /// Whether the returned numbers are UIDs.
    pub uid: bool,
    pub returns: Vec<EsearchReturnData>,
}

/// One return-data item in an ESEARCH response. Number-valued items are
/// sequence numbers or UIDs depending on [`EsearchResponse::uid`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EsearchReturnData {
    Min(NonZeroU32),
    Max(NonZeroU32),
    All(SeqSet),
    Count(u32),
    /// `MODSEQ <n>` (RFC 7162).
    ModSeq(ModSeq),
    /// `PARTIAL (<range> <set|NIL>)` (RFC 9394).
    Partial {
        range: PartialRange,
        set: Option<SeqSet>,
    },
}

/// The source options of an ESEARCH command (`IN (...)`, RFC 7377).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchScope {
    Selected,
    Personal,
    Inboxes,
    Subscribed,
    Subtree(Vec1<Mailbox>),
    SubtreeOne(Vec1<Mailbox>),
    Mailboxes(Vec1<Mailbox>),
}
