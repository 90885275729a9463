//! URLAUTH types (RFC 4467).

use crate::core::{AString, Atom, NString};

/// A URL authorization mechanism name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UrlAuthMechanism {
    /// `INTERNAL`
    Internal,
    Other(Atom),
}

impl From<Atom> for UrlAuthMechanism {
    fn from(atom: Atom) -> Self {
        if atom.inner().eq_ignore_ascii_case("INTERNAL") {
            Self::Internal
        } else {
            Self::Other(atom)
        }
    }
}

/// A rump URL plus the mechanism it should be authorized with, as passed
/// to GENURLAUTH.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RumpUrl {
    pub url: AString,
    pub mechanism: UrlAuthMechanism,
}

/// One URL/content pair in an URLFETCH response. `NIL` content means the
/// URL could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrlFetchItem {
    pub url: AString,
    pub data: NString,
}
