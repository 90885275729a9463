//! Message identifier algebra.
//!
//! A mailbox numbers its messages in two disjoint spaces: message sequence
//! numbers (shift on expunge) and UIDs (persistent). Both are non-zero
//! 32-bit integers, and both appear in the same range/set syntax
//! (`2,4:7,9,12:*`), so the range and set machinery is generic over a
//! zero-sized brand. A `*` endpoint is encoded as [`MessageIdentifier::MAX`]
//! and never produced for a bare number by the parser.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    num::NonZeroU32,
    str::FromStr,
};

use crate::error::{ValidationError, ValidationErrorKind};

/// Brand for message sequence numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeqKind {}

/// Brand for unique identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UidKind {}

/// A non-zero 32-bit message identifier, branded by numbering space.
///
/// The comparison and hashing impls are written out by hand: derived ones
/// would demand the same traits of the zero-sized brand.
pub struct MessageIdentifier<K> {
    value: NonZeroU32,
    _kind: PhantomData<K>,
}

impl<K> Clone for MessageIdentifier<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for MessageIdentifier<K> {}

impl<K> PartialEq for MessageIdentifier<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K> Eq for MessageIdentifier<K> {}

impl<K> PartialOrd for MessageIdentifier<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K> Ord for MessageIdentifier<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<K> Hash for MessageIdentifier<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

pub type SeqNum = MessageIdentifier<SeqKind>;
pub type Uid = MessageIdentifier<UidKind>;

impl<K> MessageIdentifier<K> {
    pub const MIN: Self = Self {
        value: NonZeroU32::MIN,
        _kind: PhantomData,
    };

    /// The largest identifier. Doubles as the encoding of `*` in range
    /// endpoints.
    pub const MAX: Self = Self {
        value: NonZeroU32::MAX,
        _kind: PhantomData,
    };

    pub fn new(value: u32) -> Result<Self, ValidationError> {
        match NonZeroU32::new(value) {
            Some(value) => Ok(Self {
                value,
                _kind: PhantomData,
            }),
            None => Err(ValidationError::new(ValidationErrorKind::Invalid)),
        }
    }

    pub fn get(&self) -> u32 {
        self.value.get()
    }
}

impl<K> From<NonZeroU32> for MessageIdentifier<K> {
    fn from(value: NonZeroU32) -> Self {
        Self {
            value,
            _kind: PhantomData,
        }
    }
}

impl<K> TryFrom<u32> for MessageIdentifier<K> {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<K> fmt::Debug for MessageIdentifier<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<K> fmt::Display for MessageIdentifier<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if *self == Self::MAX {
            f.write_str("*")
        } else {
            write!(f, "{}", self.value)
        }
    }
}

/// An inclusive identifier range with `lower <= upper`.
pub struct IdRange<K> {
    lower: MessageIdentifier<K>,
    upper: MessageIdentifier<K>,
}

impl<K> Clone for IdRange<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for IdRange<K> {}

impl<K> PartialEq for IdRange<K> {
    fn eq(&self, other: &Self) -> bool {
        self.lower == other.lower && self.upper == other.upper
    }
}

impl<K> Eq for IdRange<K> {}

impl<K> Hash for IdRange<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lower.hash(state);
        self.upper.hash(state);
    }
}

pub type SeqRange = IdRange<SeqKind>;
pub type UidRange = IdRange<UidKind>;

impl<K> IdRange<K> {
    pub fn new(
        lower: MessageIdentifier<K>,
        upper: MessageIdentifier<K>,
    ) -> Result<Self, ValidationError> {
        if lower > upper {
            return Err(ValidationError::new(ValidationErrorKind::RangeOutOfOrder {
                lower: lower.get(),
                upper: upper.get(),
            }));
        }

        Ok(Self { lower, upper })
    }

    pub fn single(id: MessageIdentifier<K>) -> Self {
        Self {
            lower: id,
            upper: id,
        }
    }

    pub fn lower(&self) -> MessageIdentifier<K> {
        self.lower
    }

    pub fn upper(&self) -> MessageIdentifier<K> {
        self.upper
    }

    pub fn contains(&self, id: MessageIdentifier<K>) -> bool {
        self.lower <= id && id <= self.upper
    }
}

impl<K> From<MessageIdentifier<K>> for IdRange<K> {
    fn from(id: MessageIdentifier<K>) -> Self {
        Self::single(id)
    }
}

impl<K> fmt::Debug for IdRange<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl<K> fmt::Display for IdRange<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.lower == self.upper {
            write!(f, "{}", self.lower)
        } else {
            write!(f, "{}:{}", self.lower, self.upper)
        }
    }
}

/// A non-empty, sorted, coalesced set of identifier ranges.
///
/// Invariant: ranges are in ascending order of lower bound and for any two
/// consecutive ranges `a`, `b`: `a.upper + 1 < b.lower` (no overlap, no
/// adjacency). Construction normalizes arbitrary input.
pub struct IdSet<K> {
    ranges: Vec<IdRange<K>>,
}

impl<K> Clone for IdSet<K> {
    fn clone(&self) -> Self {
        Self {
            ranges: self.ranges.clone(),
        }
    }
}

impl<K> PartialEq for IdSet<K> {
    fn eq(&self, other: &Self) -> bool {
        self.ranges == other.ranges
    }
}

impl<K> Eq for IdSet<K> {}

impl<K> Hash for IdSet<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ranges.hash(state);
    }
}

pub type SeqSet = IdSet<SeqKind>;
pub type UidSet = IdSet<UidKind>;

impl<K> IdSet<K> {
    pub fn from_ranges(ranges: Vec<IdRange<K>>) -> Result<Self, ValidationError> {
        if ranges.is_empty() {
            return Err(ValidationError::new(ValidationErrorKind::Empty));
        }

        Ok(Self {
            ranges: normalize(ranges),
        })
    }

    pub fn single(id: MessageIdentifier<K>) -> Self {
        Self {
            ranges: vec![IdRange::single(id)],
        }
    }

    pub fn ranges(&self) -> &[IdRange<K>] {
        &self.ranges
    }

    pub fn contains(&self, id: MessageIdentifier<K>) -> bool {
        self.ranges.iter().any(|range| range.contains(id))
    }

    /// Number of identifiers in the set.
    pub fn count(&self) -> u64 {
        self.ranges
            .iter()
            .map(|r| u64::from(r.upper.get() - r.lower.get()) + 1)
            .sum()
    }

    /// Iterate over the contained identifiers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = MessageIdentifier<K>> + '_ {
        self.ranges.iter().flat_map(|range| {
            (range.lower.get()..=range.upper.get())
                // Lower bound is non-zero, so every element is.
                .map(|n| MessageIdentifier::new(n).unwrap())
        })
    }
}

impl<K> From<MessageIdentifier<K>> for IdSet<K> {
    fn from(id: MessageIdentifier<K>) -> Self {
        Self::single(id)
    }
}

impl<K> TryFrom<&str> for IdSet<K> {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Parses the wire syntax, e.g., `1:5,8,10:*`. Useful in tests and for
/// callers assembling sets from configuration.
impl<K> FromStr for IdSet<K> {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        fn endpoint<K>(value: &str) -> Result<MessageIdentifier<K>, ValidationError> {
            if value == "*" {
                return Ok(MessageIdentifier::MAX);
            }

            // Leading zeroes are not part of the grammar.
            if value.starts_with('0') {
                return Err(ValidationError::new(ValidationErrorKind::Invalid));
            }

            let n = value
                .parse::<u32>()
                .map_err(|_| ValidationError::new(ValidationErrorKind::Invalid))?;

            MessageIdentifier::new(n)
        }

        let mut ranges = Vec::new();

        for part in value.split(',') {
            let range = match part.split_once(':') {
                None => IdRange::single(endpoint(part)?),
                Some((lower, upper)) => {
                    let (lower, upper) = (endpoint(lower)?, endpoint(upper)?);

                    // `*:n` denotes the same range as `n:*`.
                    if lower > upper && (lower == MessageIdentifier::MAX) {
                        IdRange::new(upper, lower)?
                    } else {
                        IdRange::new(lower, upper)?
                    }
                }
            };

            ranges.push(range);
        }

        Self::from_ranges(ranges)
    }
}

impl<K> fmt::Debug for IdSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl<K> fmt::Display for IdSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", range)?;
        }

        Ok(())
    }
}

/// Sort by lower bound and merge overlapping or adjacent ranges.
fn normalize<K>(mut ranges: Vec<IdRange<K>>) -> Vec<IdRange<K>> {
    ranges.sort_by_key(|r| (r.lower, r.upper));

    let mut merged: Vec<IdRange<K>> = Vec::with_capacity(ranges.len());

    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.lower.get() <= last.upper.get().saturating_add(1) => {
                if range.upper > last.upper {
                    last.upper = range.upper;
                }
            }
            _ => merged.push(range),
        }
    }

    merged
}

/// Either an explicit set or `$`, the saved result of the last SEARCH
/// (RFC 5182).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LastCommandSet<T> {
    Set(T),
    LastCommand,
}

impl<T> LastCommandSet<T> {
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(set) => Some(set),
            Self::LastCommand => None,
        }
    }
}

/// The `UIDVALIDITY` value of a mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UidValidity(NonZeroU32);

impl UidValidity {
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        match NonZeroU32::new(value) {
            Some(value) => Ok(Self(value)),
            None => Err(ValidationError::new(ValidationErrorKind::Invalid)),
        }
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl From<NonZeroU32> for UidValidity {
    fn from(value: NonZeroU32) -> Self {
        Self(value)
    }
}

impl fmt::Display for UidValidity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A per-message modification sequence value (RFC 7162).
///
/// Zero is permitted: `mod-sequence-valzer` uses it for mailboxes without
/// persistent mod-sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ModSeq(u64);

impl ModSeq {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ModSeq {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ModSeq {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(n: u32) -> SeqNum {
        SeqNum::new(n).unwrap()
    }

    #[test]
    fn test_identifier_rejects_zero() {
        assert!(SeqNum::new(0).is_err());
        assert!(SeqNum::new(1).is_ok());
        assert!(SeqNum::new(u32::MAX).is_ok());
    }

    #[test]
    fn test_range_order() {
        assert!(IdRange::new(seq(1), seq(5)).is_ok());
        assert!(IdRange::new(seq(5), seq(5)).is_ok());
        assert!(IdRange::new(seq(10), seq(5)).is_err());
    }

    #[test]
    fn test_set_normalization() {
        let set = SeqSet::try_from("9,1:3,4,2:6").unwrap();
        assert_eq!(
            set.ranges(),
            &[
                IdRange::new(seq(1), seq(6)).unwrap(),
                IdRange::single(seq(9)),
            ]
        );

        // Adjacent ranges coalesce.
        let set = SeqSet::try_from("1:3,4:6").unwrap();
        assert_eq!(set.ranges(), &[IdRange::new(seq(1), seq(6)).unwrap()]);

        // Value multiset is preserved.
        let set = SeqSet::try_from("5,3,1").unwrap();
        let values: Vec<u32> = set.iter().map(|id| id.get()).collect();
        assert_eq!(values, vec![1, 3, 5]);
    }

    #[test]
    fn test_set_from_str_negative() {
        for input in ["", " ", "0", "01", "1:2:3", "5:3", "a", "1,", ",1"] {
            assert!(SeqSet::try_from(input).is_err(), "{:?}", input);
        }
    }

    #[test]
    fn test_star_endpoint() {
        let set = UidSet::try_from("4:*").unwrap();
        assert_eq!(
            set.ranges(),
            &[IdRange::new(Uid::new(4).unwrap(), Uid::MAX).unwrap()]
        );

        // `*:4` denotes the same range.
        let set = UidSet::try_from("*:4").unwrap();
        assert_eq!(
            set.ranges(),
            &[IdRange::new(Uid::new(4).unwrap(), Uid::MAX).unwrap()]
        );

        assert_eq!(UidSet::try_from("*").unwrap().ranges().len(), 1);
    }

    #[test]
    fn test_set_count() {
        assert_eq!(SeqSet::try_from("1:10").unwrap().count(), 10);
        assert_eq!(SeqSet::try_from("1,3,5").unwrap().count(), 3);
    }

    #[test]
    fn test_display_roundtrip() {
        for input in ["1", "1:5", "1:5,9", "4:*", "*"] {
            let set = SeqSet::try_from(input).unwrap();
            assert_eq!(set.to_string(), input);
        }
    }
}
