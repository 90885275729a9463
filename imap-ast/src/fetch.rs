//! FETCH-related types: requested attributes, returned data items, and the
//! streaming event surface.

use std::num::NonZeroU32;

use crate::{
    body::BodyStructure,
    core::{AString, Atom, NString, Vec1},
    datetime::DateTime,
    envelope::Envelope,
    extensions::objectid::ObjectId,
    flag::FlagFetch,
    identifier::{ModSeq, SeqNum, Uid},
};

/// A FETCH macro, expanding to a fixed attribute list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Macro {
    /// `ALL` = `(FLAGS INTERNALDATE RFC822.SIZE ENVELOPE)`
    All,
    /// `FAST` = `(FLAGS INTERNALDATE RFC822.SIZE)`
    Fast,
    /// `FULL` = `(FLAGS INTERNALDATE RFC822.SIZE ENVELOPE BODY)`
    Full,
}

impl Macro {
    pub fn expand(&self) -> Vec<FetchAttribute> {
        use FetchAttribute::*;

        match self {
            Self::All => vec![Flags, InternalDate, Rfc822Size, Envelope],
            Self::Fast => vec![Flags, InternalDate, Rfc822Size],
            Self::Full => vec![Flags, InternalDate, Rfc822Size, Envelope, Body],
        }
    }
}

/// Either a macro or an explicit attribute list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MacroOrFetchAttributes {
    Macro(Macro),
    Attributes(Vec<FetchAttribute>),
}

/// An attribute requested by a FETCH command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchAttribute {
    /// `BODY` (the structure, without extension data)
    Body,
    /// `BODY[section]<partial>` / `BODY.PEEK[...]`
    BodyExt {
        section: Option<Section>,
        /// `<offset.count>`
        partial: Option<(u32, NonZeroU32)>,
        peek: bool,
    },
    /// `BODYSTRUCTURE` (with extension data)
    BodyStructure,
    Envelope,
    Flags,
    InternalDate,
    Rfc822,
    Rfc822Header,
    Rfc822Size,
    Rfc822Text,
    Uid,
    /// `MODSEQ` (RFC 7162)
    ModSeq,
    /// `BINARY[part]<partial>` / `BINARY.PEEK[...]` (RFC 3516)
    Binary {
        section: Vec<NonZeroU32>,
        partial: Option<(u32, NonZeroU32)>,
        peek: bool,
    },
    /// `BINARY.SIZE[part]` (RFC 3516)
    BinarySize { section: Vec<NonZeroU32> },
    /// `EMAILID` (RFC 8474)
    EmailId,
    /// `THREADID` (RFC 8474)
    ThreadId,
    /// `PREVIEW` / `PREVIEW (LAZY)` (RFC 8970)
    Preview { lazy: bool },
    /// `X-GM-MSGID` (Gmail)
    GmailMessageId,
    /// `X-GM-THRID` (Gmail)
    GmailThreadId,
    /// `X-GM-LABELS` (Gmail)
    GmailLabels,
}

/// A body section specifier: a part path plus an optional part specifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Section {
    Part(Part),
    /// `[part.]HEADER`
    Header(Option<Part>),
    /// `[part.]HEADER.FIELDS (names)`
    HeaderFields(Option<Part>, Vec1<AString>),
    /// `[part.]HEADER.FIELDS.NOT (names)`
    HeaderFieldsNot(Option<Part>, Vec1<AString>),
    /// `[part.]TEXT`
    Text(Option<Part>),
    /// `part.MIME`
    Mime(Part),
}

/// A dotted body-part path, e.g., `1.2.3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Part(pub Vec1<NonZeroU32>);

/// A data item in a FETCH response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageDataItem {
    /// `BODY (...)`: the structure without extension data.
    Body(BodyStructure),
    /// `BODY[section]<origin> data`
    BodyExt {
        section: Option<Section>,
        origin: Option<u32>,
        data: NString,
    },
    BodyStructure(BodyStructure),
    Envelope(Envelope),
    Flags(Vec<FlagFetch>),
    InternalDate(DateTime),
    Rfc822(NString),
    Rfc822Header(NString),
    Rfc822Size(u32),
    Rfc822Text(NString),
    Uid(Uid),
    /// `MODSEQ (<n>)` (RFC 7162)
    ModSeq(ModSeq),
    /// `BINARY[part]<origin> data` (RFC 3516)
    Binary {
        section: Vec<NonZeroU32>,
        origin: Option<u32>,
        data: NString,
    },
    /// `BINARY.SIZE[part] n` (RFC 3516)
    BinarySize {
        section: Vec<NonZeroU32>,
        size: u32,
    },
    /// `EMAILID (<objectid>)` (RFC 8474)
    EmailId(ObjectId),
    /// `THREADID (<objectid>)` / `THREADID NIL` (RFC 8474)
    ThreadId(Option<ObjectId>),
    /// `PREVIEW nstring` (RFC 8970)
    Preview(NString),
    /// `X-GM-MSGID n` (Gmail)
    GmailMessageId(u64),
    /// `X-GM-THRID n` (Gmail)
    GmailThreadId(u64),
    /// `X-GM-LABELS (...)` (Gmail). Labels are kept as raw text,
    /// including the `\` of system labels like `\Inbox`.
    GmailLabels(Vec<String>),
    /// A `NIL` payload for a body-valued attribute, reported by the
    /// streaming decoder in place of a stream-begin event.
    NilBody(StreamKind),
}

/// Which body-valued attribute a streamed payload belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Rfc822,
    Rfc822Header,
    Rfc822Text,
    Body {
        section: Option<Section>,
        origin: Option<u32>,
    },
    Binary {
        section: Vec<NonZeroU32>,
        origin: Option<u32>,
    },
}

/// One event of the streaming FETCH-response decoder.
///
/// A FETCH response can be arbitrarily large; the streaming decoder never
/// buffers payloads. On `LiteralBegin`/`QuotedBegin` the caller consumes
/// exactly `length` octets from the transport and then re-enters the
/// decoder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchEvent {
    /// `* <n> FETCH (`
    Start(SeqNum),
    /// `* <uid> UIDFETCH (` (RFC 9586)
    StartUid(Uid),
    /// A fixed-size attribute, parsed in full.
    Simple(MessageDataItem),
    /// A literal payload follows at the read position.
    LiteralBegin { kind: StreamKind, length: u32 },
    /// A quoted payload follows at the read position (its closing quote is
    /// consumed by the next decoder call).
    QuotedBegin { kind: StreamKind, length: u32 },
    /// `)` CRLF
    Finish,
}

/// A FETCH modifier (RFC 4466 `fetch-modifier`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FetchModifier {
    /// `CHANGEDSINCE <modseq>` (RFC 7162)
    ChangedSince(ModSeq),
    /// `VANISHED` (RFC 7162)
    Vanished,
    /// `PARTIAL <range>` (RFC 9394)
    Partial(crate::search::PartialRange),
    /// An unrecognized modifier, kept verbatim.
    Other(Atom, Option<AString>),
}
