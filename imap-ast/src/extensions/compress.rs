//! COMPRESS types (RFC 4978).

use crate::core::Atom;

/// A compression algorithm name. `DEFLATE` is the only registered one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompressionAlgorithm {
    Deflate,
    Other(Atom),
}

impl From<Atom> for CompressionAlgorithm {
    fn from(atom: Atom) -> Self {
        if atom.inner().eq_ignore_ascii_case("DEFLATE") {
            Self::Deflate
        } else {
            Self::Other(atom)
        }
    }
}
