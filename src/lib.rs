//! # imap-parser
//!
//! A streaming decoder for the IMAP4rev1 wire grammar ([RFC 3501]) and a
//! broad set of extensions (UIDPLUS, CONDSTORE/QRESYNC, ESEARCH,
//! CATENATE, METADATA, QUOTA, NAMESPACE, SEARCHRES, URLAUTH, COMPRESS,
//! ID, ENABLE, LIST-EXTENDED, OBJECTID, PREVIEW, and friends). Both
//! directions are covered: a server decodes commands, a client decodes
//! responses. The produced values live in [`imap_ast`].
//!
//! ## Incrementality
//!
//! All decoders work on whatever bytes have arrived so far. When the
//! input ends in the middle of a message, decoding reports `Incomplete`
//! and consumes nothing; feed more bytes and retry. [`ParseBuffer`]
//! packages that loop: it accumulates transport bytes, runs a codec over
//! the unconsumed window, and advances its cursor only on success.
//!
//! ```no_run
//! use imap_parser::{CommandCodec, ParseBuffer};
//!
//! let codec = CommandCodec::default();
//! let mut buffer = ParseBuffer::new();
//!
//! buffer.extend(b"A001 NOOP\r\n");
//! let command = buffer.decode(&codec).unwrap();
//! assert_eq!(command.name(), "NOOP");
//! ```
//!
//! ## Large payloads
//!
//! Message octets are never buffered by the decoder. APPEND decodes into
//! a sequence of events via [`CommandStreamCodec`]; FETCH responses can
//! be decoded event-by-event via [`FetchEventCodec`]. Both stop right
//! before payload octets and tell the caller exactly how many to drain.
//!
//! [RFC 3501]: https://datatracker.ietf.org/doc/html/rfc3501

#![deny(missing_debug_implementations)]
#![forbid(unsafe_code)]

mod append;
mod auth;
mod body;
mod buffer;
mod command;
mod core;
mod datetime;
mod envelope;
mod extensions;
mod fetch;
mod flag;
mod mailbox;
mod response;
mod search;
mod sequence;
mod status;
mod stream;

pub mod decode;

pub use imap_ast;

pub use crate::{
    append::{AppendStage, CommandStreamState},
    buffer::{Checkpoint, ParseBuffer},
    decode::{
        CommandCodec, CommandDecodeError, CommandStreamCodec, Decoder, FetchEventCodec,
        ParserOptions, ResponseCodec, ResponseDecodeError,
    },
};
