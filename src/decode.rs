//! # Decoding of messages.
//!
//! [`Decoder`]s parse one message from the head of a byte slice and return
//! the remainder. All decoders are incremental: when the input ends in the
//! middle of a message they report `Incomplete` and leave it to the caller
//! to buffer more bytes and retry — [`crate::buffer::ParseBuffer`] does
//! exactly that. A syntactically invalid input yields a failure with a
//! short human-readable hint; the input position is never advanced past a
//! failed message.

use std::num::{ParseIntError, TryFromIntError};

use imap_ast::{
    append::CommandStreamPart,
    command::Command,
    core::Tag,
    error::ValidationError,
    fetch::FetchEvent,
    response::Response,
};
use nom::error::{ErrorKind, FromExternalError, ParseError};
use thiserror::Error;

use crate::{
    append::{command_stream_part, CommandStreamState},
    command::command,
    response::response,
    stream::fetch_event,
};

/// An extended version of [`nom::IResult`].
pub(crate) type IMAPResult<'a, O> = Result<(&'a [u8], O), nom::Err<IMAPParseError<&'a [u8]>>>;

/// An extended version of [`nom::error::Error`].
#[derive(Debug)]
pub(crate) struct IMAPParseError<I> {
    #[allow(unused)]
    pub input: I,
    pub kind: IMAPErrorKind,
}

/// An extended version of [`nom::error::ErrorKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum IMAPErrorKind {
    BadNumber,
    BadBase64,
    BadDateTime,
    /// `a:b` with both endpoints concrete and `a > b`.
    BadRange {
        from: u32,
        to: u32,
    },
    /// A `{n}` announced more octets than the decoder accepts.
    LiteralTooLarge {
        length: u32,
        limit: u32,
    },
    LiteralContainsNull,
    /// A dispatch point read an atom it has no parser for.
    UnknownKeyword,
    /// `APPEND` reached the plain command decoder, which cannot stage
    /// message octets.
    AppendViaCommandStream,
    RecursionLimitExceeded,
    Invalid,
    Nom(ErrorKind),
}

impl IMAPErrorKind {
    pub(crate) fn hint(&self) -> String {
        match self {
            Self::BadNumber => "Invalid number".into(),
            Self::BadBase64 => "Invalid base64".into(),
            Self::BadDateTime => "Invalid date-time".into(),
            Self::BadRange { from, to } => format!("Invalid range {from}:{to}"),
            Self::LiteralTooLarge { length, limit } => {
                format!("Literal of {length} octets exceeds the limit of {limit}")
            }
            Self::LiteralContainsNull => "Literal contains NUL".into(),
            Self::UnknownKeyword => "Unknown keyword".into(),
            Self::AppendViaCommandStream => {
                "APPEND must be decoded through the command stream".into()
            }
            Self::RecursionLimitExceeded => "Recursion limit exceeded".into(),
            Self::Invalid | Self::Nom(_) => "Invalid syntax".into(),
        }
    }
}

impl<I> ParseError<I> for IMAPParseError<I> {
    fn from_error_kind(input: I, kind: ErrorKind) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::Nom(kind),
        }
    }

    fn append(input: I, kind: ErrorKind, _: Self) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::Nom(kind),
        }
    }
}

impl<I> FromExternalError<I, ParseIntError> for IMAPParseError<I> {
    fn from_external_error(input: I, _: ErrorKind, _: ParseIntError) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::BadNumber,
        }
    }
}

impl<I> FromExternalError<I, TryFromIntError> for IMAPParseError<I> {
    fn from_external_error(input: I, _: ErrorKind, _: TryFromIntError) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::BadNumber,
        }
    }
}

impl<I> FromExternalError<I, base64::DecodeError> for IMAPParseError<I> {
    fn from_external_error(input: I, _: ErrorKind, _: base64::DecodeError) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::BadBase64,
        }
    }
}

impl<I> FromExternalError<I, ValidationError> for IMAPParseError<I> {
    fn from_external_error(input: I, _: ErrorKind, _: ValidationError) -> Self {
        Self {
            input,
            kind: IMAPErrorKind::Invalid,
        }
    }
}

/// Decoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Upper bound for announced literal sizes on paths that would buffer
    /// the octets (response data, streamed payload begin events).
    pub max_literal_size: u32,
    /// Upper bound for recursive rules (SEARCH keys, body structures,
    /// nested mailbox parentheses).
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_literal_size: 64 * 1024 * 1024,
            max_depth: 100,
        }
    }
}

/// Decoder.
///
/// Implemented for types that know how to decode a specific IMAP message.
pub trait Decoder {
    type Message: Sized;
    type Error;

    fn decode<'a>(&self, input: &'a [u8]) -> Result<(&'a [u8], Self::Message), Self::Error>;

    /// Whether `error` asks the caller to feed more bytes and retry.
    fn is_incomplete(error: &Self::Error) -> bool;

    /// The error reported when the buffered input outgrew `limit` without
    /// completing a message.
    fn too_long(limit: usize) -> Self::Error;
}

/// Error during command decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandDecodeError {
    /// More data is needed.
    #[error("More data is needed")]
    Incomplete,

    /// Decoding failed before a tag was read.
    #[error("Decoding failed: {hint}")]
    Failed { hint: String },

    /// Decoding failed after a tag was read. The caller can answer
    /// `<tag> BAD <hint>` once it has resynchronized the stream.
    #[error("Bad command {tag}: {hint}")]
    Bad { tag: Tag, hint: String },
}

/// Error during response decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseDecodeError {
    /// More data is needed.
    #[error("More data is needed")]
    Incomplete,

    /// Decoding failed.
    #[error("Decoding failed: {hint}")]
    Failed { hint: String },
}

// -------------------------------------------------------------------------------------------------

/// Decoder for tagged commands (server side), `APPEND` excluded.
#[derive(Debug, Clone, Default)]
pub struct CommandCodec {
    pub(crate) options: ParserOptions,
}

impl CommandCodec {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }
}

impl Decoder for CommandCodec {
    type Message = Command;
    type Error = CommandDecodeError;

    fn decode<'a>(&self, input: &'a [u8]) -> Result<(&'a [u8], Self::Message), Self::Error> {
        match command(input, &self.options) {
            Ok((rem, cmd)) => Ok((rem, cmd)),
            Err(error) => Err(error),
        }
    }

    fn is_incomplete(error: &Self::Error) -> bool {
        matches!(error, CommandDecodeError::Incomplete)
    }

    fn too_long(limit: usize) -> Self::Error {
        CommandDecodeError::Failed {
            hint: format!("Message exceeds the limit of {limit} octets"),
        }
    }
}

/// Decoder for the full client-to-server stream (server side): commands,
/// APPEND steps, IDLE termination, and continuation data. The caller owns
/// the [`CommandStreamState`] and passes it to every call.
#[derive(Debug, Clone, Default)]
pub struct CommandStreamCodec {
    pub(crate) options: ParserOptions,
}

impl CommandStreamCodec {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn decode<'a>(
        &self,
        input: &'a [u8],
        state: &mut CommandStreamState,
    ) -> Result<(&'a [u8], CommandStreamPart), CommandDecodeError> {
        command_stream_part(input, state, &self.options)
    }
}

/// Decoder for server-to-client responses.
#[derive(Debug, Clone, Default)]
pub struct ResponseCodec {
    pub(crate) options: ParserOptions,
}

impl ResponseCodec {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }
}

impl Decoder for ResponseCodec {
    type Message = Response;
    type Error = ResponseDecodeError;

    fn decode<'a>(&self, input: &'a [u8]) -> Result<(&'a [u8], Self::Message), Self::Error> {
        match response(input, &self.options) {
            Ok((rem, rsp)) => Ok((rem, rsp)),
            Err(nom::Err::Incomplete(_)) => Err(ResponseDecodeError::Incomplete),
            Err(nom::Err::Error(error) | nom::Err::Failure(error)) => {
                Err(ResponseDecodeError::Failed {
                    hint: error.kind.hint(),
                })
            }
        }
    }

    fn is_incomplete(error: &Self::Error) -> bool {
        matches!(error, ResponseDecodeError::Incomplete)
    }

    fn too_long(limit: usize) -> Self::Error {
        ResponseDecodeError::Failed {
            hint: format!("Message exceeds the limit of {limit} octets"),
        }
    }
}

/// Decoder for FETCH responses in streaming mode: one event per call,
/// message payloads are never buffered.
#[derive(Debug, Clone, Default)]
pub struct FetchEventCodec {
    pub(crate) options: ParserOptions,
}

impl FetchEventCodec {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }
}

impl Decoder for FetchEventCodec {
    type Message = FetchEvent;
    type Error = ResponseDecodeError;

    fn decode<'a>(&self, input: &'a [u8]) -> Result<(&'a [u8], Self::Message), Self::Error> {
        match fetch_event(input, &self.options) {
            Ok((rem, event)) => Ok((rem, event)),
            Err(nom::Err::Incomplete(_)) => Err(ResponseDecodeError::Incomplete),
            Err(nom::Err::Error(error) | nom::Err::Failure(error)) => {
                Err(ResponseDecodeError::Failed {
                    hint: error.kind.hint(),
                })
            }
        }
    }

    fn is_incomplete(error: &Self::Error) -> bool {
        matches!(error, ResponseDecodeError::Incomplete)
    }

    fn too_long(limit: usize) -> Self::Error {
        ResponseDecodeError::Failed {
            hint: format!("Message exceeds the limit of {limit} octets"),
        }
    }
}
