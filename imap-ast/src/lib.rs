//! # imap-ast
//!
//! Owned data structures for IMAP4rev1 ([RFC 3501]) and a set of widely
//! deployed extensions. This crate is the data model shared by the
//! command (server-side) and response (client-side) decoders of
//! `imap-parser`; it does no parsing itself.
//!
//! Values validate on construction: a [`core::Tag`] can't contain `+`, a
//! [`identifier::SeqNum`] can't be zero, an [`identifier::IdSet`] is
//! always sorted and coalesced.
//!
//! [RFC 3501]: https://datatracker.ietf.org/doc/html/rfc3501

#![deny(missing_debug_implementations)]
#![forbid(unsafe_code)]

pub mod append;
pub mod auth;
pub mod body;
pub mod command;
pub mod core;
pub mod datetime;
pub mod envelope;
pub mod error;
pub mod extensions;
pub mod fetch;
pub mod flag;
pub mod identifier;
pub mod mailbox;
pub mod response;
pub mod search;
pub mod status;
pub mod utils;
