//! Identifier set rules (`sequence-set` and friends).
//!
//! The same syntax denotes sets of sequence numbers and sets of UIDs, so
//! the rules are generic over the identifier brand; commands pick the
//! concrete alias. `$` (RFC 5182) is admitted by the `*_or_saved` entry
//! points only — it is a reference to a saved result, not a set.

use imap_ast::identifier::{
    IdRange, IdSet, LastCommandSet, MessageIdentifier, SeqSet, UidSet,
};
use nom::{
    branch::alt,
    bytes::streaming::tag,
    combinator::{map, map_res, opt, value},
    multi::separated_list1,
    sequence::preceded,
};

use crate::{
    core::nz_number,
    decode::{IMAPErrorKind, IMAPParseError, IMAPResult},
};

/// `seq-number = nz-number / "*"`
///
/// `*` stands for the largest identifier in use and is encoded as
/// [`MessageIdentifier::MAX`]. The flag records whether the token was a
/// literal `*`, which range validation needs.
fn id_endpoint<K>(input: &[u8]) -> IMAPResult<(MessageIdentifier<K>, bool)> {
    alt((
        map(nz_number, |n| (MessageIdentifier::from(n), false)),
        value((MessageIdentifier::MAX, true), tag(b"*")),
    ))(input)
}

/// `seq-range = seq-number ":" seq-number` or a single `seq-number`.
///
/// With both endpoints concrete, `a:b` requires `a <= b`; `10:5` is
/// refused. A `*` endpoint floats to the upper slot (`*:4` equals `4:*`).
fn id_range<K>(input: &[u8]) -> IMAPResult<IdRange<K>> {
    let (remaining, (first, first_star)) = id_endpoint(input)?;
    let (remaining, second) = opt(preceded(tag(b":"), id_endpoint))(remaining)?;

    let range = match second {
        None => IdRange::single(first),
        Some((second, second_star)) => {
            if first > second && !first_star && !second_star {
                return Err(nom::Err::Failure(IMAPParseError {
                    input,
                    kind: IMAPErrorKind::BadRange {
                        from: first.get(),
                        to: second.get(),
                    },
                }));
            }

            let (lower, upper) = if first <= second {
                (first, second)
            } else {
                (second, first)
            };

            // `lower <= upper` holds by construction.
            IdRange::new(lower, upper).unwrap()
        }
    };

    Ok((remaining, range))
}

/// `sequence-set = (seq-number / seq-range) *("," (seq-number / seq-range))`
///
/// The result is normalized: sorted, overlap-free, adjacency-free.
fn id_set<K>(input: &[u8]) -> IMAPResult<IdSet<K>> {
    map_res(separated_list1(tag(b","), id_range), IdSet::from_ranges)(input)
}

/// A sequence set of message sequence numbers.
pub(crate) fn seq_set(input: &[u8]) -> IMAPResult<SeqSet> {
    id_set(input)
}

/// A sequence set of UIDs.
pub(crate) fn uid_set(input: &[u8]) -> IMAPResult<UidSet> {
    id_set(input)
}

/// `sequence-set / "$"` over sequence numbers (RFC 5182).
pub(crate) fn seq_set_or_saved(input: &[u8]) -> IMAPResult<LastCommandSet<SeqSet>> {
    alt((
        value(LastCommandSet::LastCommand, tag(b"$")),
        map(seq_set, LastCommandSet::Set),
    ))(input)
}

/// `sequence-set / "$"` over UIDs (RFC 5182).
pub(crate) fn uid_set_or_saved(input: &[u8]) -> IMAPResult<LastCommandSet<UidSet>> {
    alt((
        value(LastCommandSet::LastCommand, tag(b"$")),
        map(uid_set, LastCommandSet::Set),
    ))(input)
}

#[cfg(test)]
mod tests {
    use imap_ast::identifier::{SeqNum, Uid};

    use super::*;

    #[test]
    fn test_seq_set() {
        let (rem, val) = seq_set(b"1:5,8 ").unwrap();
        assert_eq!(rem, b" ");
        assert_eq!(
            val.ranges(),
            &[
                IdRange::new(SeqNum::new(1).unwrap(), SeqNum::new(5).unwrap()).unwrap(),
                IdRange::single(SeqNum::new(8).unwrap()),
            ]
        );
    }

    #[test]
    fn test_seq_set_normalizes() {
        let (_, val) = seq_set(b"8,1:3,2:5 ").unwrap();
        assert_eq!(
            val.ranges(),
            &[
                IdRange::new(SeqNum::new(1).unwrap(), SeqNum::new(5).unwrap()).unwrap(),
                IdRange::single(SeqNum::new(8).unwrap()),
            ]
        );
    }

    #[test]
    fn test_star() {
        let (_, val) = uid_set(b"1:* ").unwrap();
        assert_eq!(
            val.ranges(),
            &[IdRange::new(Uid::new(1).unwrap(), Uid::MAX).unwrap()]
        );

        let (_, val) = uid_set(b"*:10 ").unwrap();
        assert_eq!(
            val.ranges(),
            &[IdRange::new(Uid::new(10).unwrap(), Uid::MAX).unwrap()]
        );

        let (_, val) = uid_set(b"* ").unwrap();
        assert_eq!(val.ranges(), &[IdRange::single(Uid::MAX)]);
    }

    #[test]
    fn test_reversed_range_is_refused() {
        assert!(matches!(
            seq_set(b"10:5 "),
            Err(nom::Err::Failure(IMAPParseError {
                kind: IMAPErrorKind::BadRange { from: 10, to: 5 },
                ..
            }))
        ));
    }

    #[test]
    fn test_zero_is_refused() {
        assert!(seq_set(b"0 ").is_err());
        assert!(seq_set(b"0:5 ").is_err());
    }

    #[test]
    fn test_saved_result() {
        let (_, val) = seq_set_or_saved(b"$ ").unwrap();
        assert_eq!(val, LastCommandSet::LastCommand);

        let (_, val) = uid_set_or_saved(b"7 ").unwrap();
        assert_eq!(val, LastCommandSet::Set(Uid::new(7).unwrap().into()));
    }
}
