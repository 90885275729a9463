//! Types for IMAP extensions, one module per RFC family.

pub mod compress;
pub mod condstore_qresync;
pub mod metadata;
pub mod namespace;
pub mod objectid;
pub mod quota;
pub mod urlauth;
