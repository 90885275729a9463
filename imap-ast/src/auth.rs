//! Authentication-related types.

use crate::core::{Atom, Secret};

/// A SASL mechanism name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuthMechanism {
    /// `PLAIN`
    Plain,
    /// `LOGIN` (non-standard but ubiquitous)
    Login,
    /// `OAUTHBEARER` (RFC 7628)
    OAuthBearer,
    /// `XOAUTH2`
    XOAuth2,
    /// `SCRAM-SHA-1`
    ScramSha1,
    /// `SCRAM-SHA-256`
    ScramSha256,
    Other(Atom),
}

impl From<Atom> for AuthMechanism {
    fn from(atom: Atom) -> Self {
        match atom.inner().to_ascii_uppercase().as_str() {
            "PLAIN" => Self::Plain,
            "LOGIN" => Self::Login,
            "OAUTHBEARER" => Self::OAuthBearer,
            "XOAUTH2" => Self::XOAuth2,
            "SCRAM-SHA-1" => Self::ScramSha1,
            "SCRAM-SHA-256" => Self::ScramSha256,
            _ => Self::Other(atom),
        }
    }
}

/// A client line sent in response to an AUTHENTICATE continuation
/// request: either a base64 blob or `*` to cancel the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticateData {
    Continue(Secret<Vec<u8>>),
    Cancel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mechanism_from_atom() {
        let atom = Atom::try_from("plain").unwrap();
        assert_eq!(AuthMechanism::from(atom), AuthMechanism::Plain);

        let atom = Atom::try_from("NTLM").unwrap();
        assert_eq!(AuthMechanism::from(atom.clone()), AuthMechanism::Other(atom));
    }
}
