//! APPEND-related types: the events emitted while decoding a (multi-)
//! append, including CATENATE (RFC 4469) assembly.
//!
//! Message octets never pass through these types. A `BeginMessage` or
//! `CatenateData` event carries the exact octet count; the caller drains
//! that many bytes from the transport and re-enters the decoder.

use crate::{
    auth::AuthenticateData,
    command::Command,
    core::{AString, Atom, LiteralMode, Tag},
    datetime::DateTime,
    flag::Flag,
    mailbox::Mailbox,
};

/// One discrete thing a client sends, as seen by the server-side
/// command-stream decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStreamPart {
    /// A complete tagged command (anything but APPEND).
    Command(Command),
    /// A step of an ongoing APPEND.
    Append(AppendEvent),
    /// The `DONE` line terminating IDLE (RFC 2177).
    IdleDone,
    /// A line answering an AUTHENTICATE continuation request.
    Continuation(AuthenticateData),
}

/// A step in decoding an APPEND command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendEvent {
    /// `<tag> APPEND <mailbox>` was read.
    Start { tag: Tag, mailbox: Mailbox },
    /// The options and the literal header of one message were read. The
    /// caller must now drain `data.byte_count` octets.
    BeginMessage {
        options: AppendOptions,
        data: AppendData,
    },
    /// The options of a CATENATE message were read; catenate parts follow.
    BeginCatenate { options: AppendOptions },
    /// `URL <url>` part.
    CatenateUrl(AString),
    /// `TEXT <literal header>` part. The caller must drain `byte_count`
    /// octets.
    CatenateData { data: AppendData },
    /// The closing `)` of a CATENATE part list.
    EndCatenate,
    /// The final CRLF: the APPEND is complete.
    Finish,
}

/// The per-message options of an APPEND.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppendOptions {
    pub flags: Vec<Flag>,
    pub internal_date: Option<DateTime>,
    /// RFC 4466 `append-ext` pairs, kept verbatim.
    pub extensions: Vec<(Atom, AString)>,
}

/// The framing of one chunk of message octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendData {
    pub byte_count: u32,
    /// Set for a `~{n}` LITERAL8 (RFC 3516): the octets carry binary
    /// content without a content-transfer-encoding.
    pub without_content_transfer_encoding: bool,
    /// Whether the sender waits for a continuation request.
    pub mode: LiteralMode,
}
