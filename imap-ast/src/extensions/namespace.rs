//! NAMESPACE types (RFC 2342).

use crate::core::{IString, QuotedChar, Vec1};

/// The payload of an untagged NAMESPACE response: the personal, other
/// users', and shared namespace lists, each of which may be `NIL`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NamespaceResponse {
    pub personal: Option<Vec1<NamespaceDescr>>,
    pub other_users: Option<Vec1<NamespaceDescr>>,
    pub shared: Option<Vec1<NamespaceDescr>>,
}

/// One namespace: its prefix, hierarchy delimiter, and extension fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceDescr {
    pub prefix: IString,
    pub delimiter: Option<QuotedChar>,
    /// `namespace-response-extensions`, kept verbatim.
    pub extensions: Vec<(IString, Vec1<IString>)>,
}
