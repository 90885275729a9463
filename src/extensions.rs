//! Rules for IMAP extensions, one module per RFC family.

pub(crate) mod condstore_qresync;
pub(crate) mod id;
pub(crate) mod idle;
pub(crate) mod metadata;
pub(crate) mod namespace;
pub(crate) mod objectid;
pub(crate) mod quota;
pub(crate) mod urlauth;
