//! Core data types.
//!
//! The IMAP grammar knows a handful of "string" shapes that everything else
//! is built from:
//!
//! ```text
//!        ┌───────┐ ┌─────────────────┐
//!        │AString│ │     NString     │
//!        └──┬─┬──┘ │(Option<IString>)│
//!           │ │    └─────┬───────────┘
//!           │ └──────┐   │
//!           │        │   │
//! ┌────┐ ┌──▼────┐ ┌─▼───▼─┐
//! │Atom│ │AtomExt│ │IString│
//! └────┘ └───────┘ └┬─────┬┘
//!                   │     │
//!             ┌─────▼─┐ ┌─▼────┐
//!             │Literal│ │Quoted│
//!             └───────┘ └──────┘
//! ```
//!
//! All types own their data. Constructors validate; the parser uses the
//! `unvalidated` constructors after its own character-class checks.

use std::fmt::{self, Debug, Formatter};

use crate::{
    error::{ValidationError, ValidationErrorKind},
    utils::indicators::{
        is_astring_char, is_atom_char, is_char8, is_list_char, is_text_char,
    },
};

/// An atom.
///
/// "An atom consists of one or more non-special characters." ([RFC 3501](https://www.rfc-editor.org/rfc/rfc3501.html))
#[derive(Debug, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Atom(String);

impl Atom {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::Empty));
        }

        if let Some(at) = value.iter().position(|b| !is_atom_char(*b)) {
            return Err(ValidationError::new(ValidationErrorKind::InvalidByteAt {
                byte: value[at],
                at,
            }));
        }

        Ok(())
    }

    /// Construct without validation. The caller must have checked the
    /// atom character class already.
    pub fn unvalidated(inner: impl Into<String>) -> Self {
        Self(inner.into())
    }

    pub fn inner(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Atom {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for Atom {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::verify(&value)?;

        Ok(Self(value))
    }
}

impl AsRef<str> for Atom {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for Atom {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// An (extended) atom, i.e., an atom that may also contain `]`.
///
/// This is the unquoted shape of an `astring` and *not* a superset of
/// [`Atom`] in use: the two occur in disjoint grammar positions.
#[derive(Debug, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct AtomExt(String);

impl AtomExt {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::Empty));
        }

        if let Some(at) = value.iter().position(|b| !is_astring_char(*b)) {
            return Err(ValidationError::new(ValidationErrorKind::InvalidByteAt {
                byte: value[at],
                at,
            }));
        }

        Ok(())
    }

    pub fn unvalidated(inner: impl Into<String>) -> Self {
        Self(inner.into())
    }

    pub fn inner(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for AtomExt {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(value.to_owned()))
    }
}

impl From<Atom> for AtomExt {
    fn from(value: Atom) -> Self {
        Self(value.0)
    }
}

impl AsRef<str> for AtomExt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Literal or quoted string, the two transmissible string forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IString {
    Literal(Literal),
    Quoted(Quoted),
}

impl IString {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Literal(literal) => literal.data(),
            Self::Quoted(quoted) => quoted.inner().as_bytes(),
        }
    }
}

impl TryFrom<&str> for IString {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(Self::Quoted(Quoted::try_from(value)?))
    }
}

/// How a literal is framed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LiteralMode {
    /// A synchronizing literal (`{n}`): the sender waits for a
    /// continuation request before transmitting the octets.
    #[default]
    Sync,
    /// A non-synchronizing literal (`{n+}`, RFC 7888).
    NonSync,
}

/// A sequence of zero or more octets, size-prefixed on the wire.
///
/// Must not contain NUL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    data: Vec<u8>,
    mode: LiteralMode,
}

impl Literal {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if let Some(at) = value.iter().position(|b| !is_char8(*b)) {
            return Err(ValidationError::new(ValidationErrorKind::InvalidByteAt {
                byte: value[at],
                at,
            }));
        }

        Ok(())
    }

    pub fn unvalidated(data: Vec<u8>) -> Self {
        Self {
            data,
            mode: LiteralMode::Sync,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn mode(&self) -> LiteralMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LiteralMode) {
        self.mode = mode;
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl TryFrom<&[u8]> for Literal {
    type Error = ValidationError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self {
            data: value.to_vec(),
            mode: LiteralMode::Sync,
        })
    }
}

impl TryFrom<Vec<u8>> for Literal {
    type Error = ValidationError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::verify(&value)?;

        Ok(Self {
            data: value,
            mode: LiteralMode::Sync,
        })
    }
}

impl AsRef<[u8]> for Literal {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// A quoted string: text between double quotes, with `\"` and `\\`
/// escapes. Stored unescaped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quoted(String);

impl Quoted {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if let Some(at) = value.iter().position(|b| !is_text_char(*b)) {
            return Err(ValidationError::new(ValidationErrorKind::InvalidByteAt {
                byte: value[at],
                at,
            }));
        }

        Ok(())
    }

    pub fn unvalidated(inner: impl Into<String>) -> Self {
        Self(inner.into())
    }

    pub fn inner(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Quoted {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for Quoted {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Either `NIL` or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NString(pub Option<IString>);

impl NString {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.0.as_ref().map(IString::as_bytes)
    }
}

impl TryFrom<&str> for NString {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(Self(Some(IString::try_from(value)?)))
    }
}

/// Either an (extended) atom or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AString {
    Atom(AtomExt),
    String(IString),
}

impl AString {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Atom(atom) => atom.inner().as_bytes(),
            Self::String(string) => string.as_bytes(),
        }
    }
}

impl TryFrom<&str> for AString {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match AtomExt::try_from(value) {
            Ok(atom) => Ok(Self::Atom(atom)),
            Err(_) => Ok(Self::String(IString::try_from(value)?)),
        }
    }
}

impl From<Atom> for AString {
    fn from(value: Atom) -> Self {
        Self::Atom(AtomExt::from(value))
    }
}

/// A command correlation tag chosen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::Empty));
        }

        if let Some(at) = value
            .iter()
            .position(|b| !is_astring_char(*b) || *b == b'+')
        {
            return Err(ValidationError::new(ValidationErrorKind::InvalidByteAt {
                byte: value[at],
                at,
            }));
        }

        Ok(())
    }

    pub fn unvalidated(inner: impl Into<String>) -> Self {
        Self(inner.into())
    }

    pub fn inner(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Tag {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable text, `1*TEXT-CHAR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Text(String);

impl Text {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::Empty));
        }

        if let Some(at) = value.iter().position(|b| !is_text_char(*b)) {
            return Err(ValidationError::new(ValidationErrorKind::InvalidByteAt {
                byte: value[at],
                at,
            }));
        }

        Ok(())
    }

    pub fn unvalidated(inner: impl Into<String>) -> Self {
        Self(inner.into())
    }

    pub fn inner(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Text {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for Text {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single `QUOTED-CHAR`, e.g., a mailbox hierarchy delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuotedChar(char);

impl QuotedChar {
    pub fn verify(value: char) -> Result<(), ValidationError> {
        if value.is_ascii() && is_text_char(value as u8) {
            Ok(())
        } else {
            Err(ValidationError::new(ValidationErrorKind::Invalid))
        }
    }

    pub fn unvalidated(inner: char) -> Self {
        Self(inner)
    }

    pub fn inner(&self) -> char {
        self.0
    }
}

impl TryFrom<char> for QuotedChar {
    type Error = ValidationError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(value))
    }
}

/// A charset name, `atom / quoted` (errata id 261).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Charset {
    Atom(Atom),
    Quoted(Quoted),
}

impl Charset {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Atom(atom) => atom.inner(),
            Self::Quoted(quoted) => quoted.inner(),
        }
    }
}

impl TryFrom<&str> for Charset {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match Atom::try_from(value) {
            Ok(atom) => Ok(Self::Atom(atom)),
            Err(_) => Ok(Self::Quoted(Quoted::try_from(value)?)),
        }
    }
}

/// A `Vec` that is guaranteed to contain at least one element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vec1<T>(Vec<T>);

impl<T> Vec1<T> {
    /// Construct without the non-emptiness check. The caller must not
    /// pass an empty vector.
    pub fn unvalidated(inner: Vec<T>) -> Self {
        debug_assert!(!inner.is_empty());

        Self(inner)
    }

    pub fn as_ref(&self) -> &[T] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<T> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn head(&self) -> &T {
        // Non-emptiness is the type's invariant.
        &self.0[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }
}

impl<T> From<T> for Vec1<T> {
    fn from(value: T) -> Self {
        Self(vec![value])
    }
}

impl<T> TryFrom<Vec<T>> for Vec1<T> {
    type Error = ValidationError;

    fn try_from(inner: Vec<T>) -> Result<Self, Self::Error> {
        if inner.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::Empty));
        }

        Ok(Self(inner))
    }
}

impl<T> IntoIterator for Vec1<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Vec1<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A wrapper that keeps its contents out of `Debug` output.
///
/// Used for passwords and SASL exchanges.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Secret<T>(T);

impl<T> Secret<T> {
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    pub fn declassify(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Debug for Secret<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "/* REDACTED */")
    }
}

impl<T> From<T> for Secret<T> {
    fn from(inner: T) -> Self {
        Self(inner)
    }
}

/// A `list-mailbox` token, `1*list-char`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListCharString(String);

impl ListCharString {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if value.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::Empty));
        }

        if let Some(at) = value.iter().position(|b| !is_list_char(*b)) {
            return Err(ValidationError::new(ValidationErrorKind::InvalidByteAt {
                byte: value[at],
                at,
            }));
        }

        Ok(())
    }

    pub fn unvalidated(inner: impl Into<String>) -> Self {
        Self(inner.into())
    }

    pub fn inner(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ListCharString {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(value.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom() {
        assert!(Atom::try_from("").is_err());
        assert!(Atom::try_from("a b").is_err());
        assert!(Atom::try_from("a]").is_err());
        assert!(Atom::try_from("a*").is_err());

        let atom = Atom::try_from("READ-WRITE").unwrap();
        assert_eq!(atom.inner(), "READ-WRITE");
    }

    #[test]
    fn test_tag() {
        assert!(Tag::try_from("").is_err());
        assert!(Tag::try_from("A+1").is_err());
        assert!(Tag::try_from("A 1").is_err());
        assert!(Tag::try_from("A001").is_ok());
        // `]` is an ASTRING-CHAR and thus fine in a tag.
        assert!(Tag::try_from("A]").is_ok());
    }

    #[test]
    fn test_literal_rejects_nul() {
        assert!(Literal::try_from(b"ok".as_ref()).is_ok());
        assert!(Literal::try_from(b"a\x00b".as_ref()).is_err());
    }

    #[test]
    fn test_quoted() {
        assert!(Quoted::try_from("").is_ok());
        assert!(Quoted::try_from("hello").is_ok());
        assert!(Quoted::try_from("he\rllo").is_err());
    }

    #[test]
    fn test_vec1() {
        assert!(Vec1::<u32>::try_from(vec![]).is_err());

        let v = Vec1::try_from(vec![1, 2]).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(*v.head(), 1);
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = Secret::new("hunter2");
        assert_eq!(format!("{:?}", secret), "/* REDACTED */");
    }
}
