//! OBJECTID types (RFC 8474).

use std::fmt;

use crate::error::{ValidationError, ValidationErrorKind};

/// An object identifier: 1 to 255 characters out of `ALPHA / DIGIT / "_" /
/// "-"`. Used for `MAILBOXID`, `EMAILID`, and `THREADID`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    pub fn verify(value: impl AsRef<[u8]>) -> Result<(), ValidationError> {
        let value = value.as_ref();

        if value.is_empty() || value.len() > 255 {
            return Err(ValidationError::new(ValidationErrorKind::Invalid));
        }

        if let Some(at) = value
            .iter()
            .position(|b| !(b.is_ascii_alphanumeric() || *b == b'_' || *b == b'-'))
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

impl TryFrom<&str> for ObjectId {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::verify(value)?;

        Ok(Self(value.to_owned()))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id() {
        assert!(ObjectId::try_from("F664aeb1d-fa95").is_ok());
        assert!(ObjectId::try_from("").is_err());
        assert!(ObjectId::try_from("a b").is_err());
        assert!(ObjectId::try_from(&*"a".repeat(256)).is_err());
    }
}
