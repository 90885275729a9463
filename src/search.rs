//! SEARCH rules: the recursive key grammar, `RETURN (...)` options
//! (RFC 4731/9394), the saved result `$` (RFC 5182), and the ESEARCH
//! command (RFC 7377) and response (RFC 4731).

use std::num::NonZeroU32;

use abnf_core::streaming::sp;
use imap_ast::{
    core::{Charset, Tag, Vec1},
    identifier::ModSeq,
    search::{
        EsearchResponse, EsearchReturnData, PartialRange, SearchKey, SearchReturnOption,
        SearchScope,
    },
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt, value},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded, terminated, tuple},
};

use crate::{
    core::{astring, atom, charset, nil, number, number64, nz_number, unknown_keyword, uppercased_atom},
    decode::{IMAPErrorKind, IMAPParseError, IMAPResult},
    extensions::{condstore_qresync::search_modsequence, objectid::objectid},
    fetch::header_fld_name,
    mailbox::mailbox,
    sequence::{seq_set, seq_set_or_saved, uid_set_or_saved},
};

/// The suffix of `SEARCH`, entered right after the verb:
///
/// ```abnf
/// search = "SEARCH" [search-return-opts]
///          SP ["CHARSET" SP charset SP] search-key *(SP search-key)
/// ```
///
/// Two or more top-level keys are folded into [`SearchKey::And`]; a single
/// key is returned as-is.
#[allow(clippy::type_complexity)]
pub(crate) fn search(
    input: &[u8],
    remaining_recursion: usize,
) -> IMAPResult<(Option<Vec<SearchReturnOption>>, Option<Charset>, SearchKey)> {
    let (remaining, returns) = opt(search_return_opts)(input)?;
    let (remaining, _) = sp(remaining)?;
    let (remaining, charset) =
        opt(terminated(preceded(tag_no_case(b"CHARSET "), charset), sp))(remaining)?;
    let (remaining, keys) =
        separated_list1(sp, search_key(remaining_recursion))(remaining)?;

    Ok((remaining, (returns, charset, fold_keys(keys))))
}

fn fold_keys(mut keys: Vec<SearchKey>) -> SearchKey {
    if keys.len() == 1 {
        keys.remove(0)
    } else {
        SearchKey::And(Vec1::unvalidated(keys))
    }
}

/// ```abnf
/// search-return-opts = SP "RETURN" SP "(" [search-return-opt
///                      *(SP search-return-opt)] ")"
/// ```
///
/// A present-but-empty list means `(ALL)` (RFC 4731, section 3.1); only an
/// absent RETURN clause yields `None` upstream.
fn search_return_opts(input: &[u8]) -> IMAPResult<Vec<SearchReturnOption>> {
    let mut parser = preceded(
        tuple((sp, tag_no_case(b"RETURN"), sp)),
        delimited(
            tag(b"("),
            opt(separated_list1(sp, search_return_opt)),
            tag(b")"),
        ),
    );

    let (remaining, options) = parser(input)?;

    Ok((
        remaining,
        options.unwrap_or_else(|| vec![SearchReturnOption::All]),
    ))
}

/// ```abnf
/// search-return-opt = "MIN" / "MAX" / "ALL" / "COUNT" /
///                     "SAVE" /                      ; RFC 5182
///                     "PARTIAL" SP partial-range    ; RFC 9394
/// ```
fn search_return_opt(input: &[u8]) -> IMAPResult<SearchReturnOption> {
    let (remaining, keyword) = uppercased_atom(input)?;

    match keyword.as_str() {
        "MIN" => Ok((remaining, SearchReturnOption::Min)),
        "MAX" => Ok((remaining, SearchReturnOption::Max)),
        "ALL" => Ok((remaining, SearchReturnOption::All)),
        "COUNT" => Ok((remaining, SearchReturnOption::Count)),
        "SAVE" => Ok((remaining, SearchReturnOption::Save)),
        "PARTIAL" => map(preceded(sp, partial_range), SearchReturnOption::Partial)(remaining),
        _ => unknown_keyword(input),
    }
}

/// ```abnf
/// partial-range = partial-range-first ":" partial-range-last
/// partial-range-first = ["-"] nz-number
/// ```
pub(crate) fn partial_range(input: &[u8]) -> IMAPResult<PartialRange> {
    fn bound(input: &[u8]) -> IMAPResult<i64> {
        map(
            tuple((opt(tag(b"-")), nz_number)),
            |(minus, n): (Option<&[u8]>, NonZeroU32)| {
                let n = i64::from(n.get());
                if minus.is_some() {
                    -n
                } else {
                    n
                }
            },
        )(input)
    }

    map(
        tuple((bound, tag(b":"), bound)),
        |(first, _, last)| PartialRange { first, last },
    )(input)
}

/// `search-key`, recursion-limited.
///
/// The grammar is deeply recursive through `NOT`, `OR`, and parenthesized
/// groups; adversarial nesting is refused once the budget runs out.
pub(crate) fn search_key(
    remaining_recursion: usize,
) -> impl Fn(&[u8]) -> IMAPResult<SearchKey> {
    move |input: &[u8]| search_key_limited(input, remaining_recursion)
}

fn search_key_limited(input: &[u8], remaining_recursion: usize) -> IMAPResult<SearchKey> {
    if remaining_recursion == 0 {
        return Err(nom::Err::Failure(IMAPParseError {
            input,
            kind: IMAPErrorKind::RecursionLimitExceeded,
        }));
    }

    let search_key =
        move |input| search_key_limited(input, remaining_recursion.saturating_sub(1));

    // A parenthesized group first: `(` is not an atom character.
    if input.first() == Some(&b'(') {
        return map(
            delimited(tag(b"("), separated_list1(sp, search_key), tag(b")")),
            |keys| SearchKey::And(Vec1::unvalidated(keys)),
        )(input);
    }

    let (remaining, keyword) = match uppercased_atom(input) {
        Ok(ok) => ok,
        // Not even an atom; leave it to the sequence-set fallback below.
        Err(nom::Err::Error(_)) => return sequence_set_key(input),
        Err(error) => return Err(error),
    };

    match keyword.as_str() {
        "ALL" => Ok((remaining, SearchKey::All)),
        "ANSWERED" => Ok((remaining, SearchKey::Answered)),
        "BCC" => map(preceded(sp, astring), SearchKey::Bcc)(remaining),
        "BEFORE" => map(preceded(sp, crate::datetime::date), SearchKey::Before)(remaining),
        "BODY" => map(preceded(sp, astring), SearchKey::Body)(remaining),
        "CC" => map(preceded(sp, astring), SearchKey::Cc)(remaining),
        "DELETED" => Ok((remaining, SearchKey::Deleted)),
        "DRAFT" => Ok((remaining, SearchKey::Draft)),
        "FLAGGED" => Ok((remaining, SearchKey::Flagged)),
        "FROM" => map(preceded(sp, astring), SearchKey::From)(remaining),
        "HEADER" => map(
            tuple((preceded(sp, header_fld_name), preceded(sp, astring))),
            |(key, value)| SearchKey::Header(key, value),
        )(remaining),
        // `flag-keyword` is an atom; `SearchKey::Keyword` carries it raw.
        "KEYWORD" => map(preceded(sp, atom), SearchKey::Keyword)(remaining),
        "LARGER" => map(preceded(sp, number), SearchKey::Larger)(remaining),
        "NEW" => Ok((remaining, SearchKey::New)),
        "NOT" => map(preceded(sp, search_key), |key| {
            SearchKey::Not(Box::new(key))
        })(remaining),
        "OLD" => Ok((remaining, SearchKey::Old)),
        "ON" => map(preceded(sp, crate::datetime::date), SearchKey::On)(remaining),
        "OR" => map(
            tuple((preceded(sp, search_key), preceded(sp, search_key))),
            |(left, right)| SearchKey::Or(Box::new(left), Box::new(right)),
        )(remaining),
        "RECENT" => Ok((remaining, SearchKey::Recent)),
        "SEEN" => Ok((remaining, SearchKey::Seen)),
        "SENTBEFORE" => map(preceded(sp, crate::datetime::date), SearchKey::SentBefore)(remaining),
        "SENTON" => map(preceded(sp, crate::datetime::date), SearchKey::SentOn)(remaining),
        "SENTSINCE" => map(preceded(sp, crate::datetime::date), SearchKey::SentSince)(remaining),
        "SINCE" => map(preceded(sp, crate::datetime::date), SearchKey::Since)(remaining),
        "SMALLER" => map(preceded(sp, number), SearchKey::Smaller)(remaining),
        "SUBJECT" => map(preceded(sp, astring), SearchKey::Subject)(remaining),
        "TEXT" => map(preceded(sp, astring), SearchKey::Text)(remaining),
        "TO" => map(preceded(sp, astring), SearchKey::To)(remaining),
        "UNANSWERED" => Ok((remaining, SearchKey::Unanswered)),
        "UNDELETED" => Ok((remaining, SearchKey::Undeleted)),
        "UNDRAFT" => Ok((remaining, SearchKey::Undraft)),
        "UNFLAGGED" => Ok((remaining, SearchKey::Unflagged)),
        "UNKEYWORD" => map(preceded(sp, atom), SearchKey::Unkeyword)(remaining),
        "UNSEEN" => Ok((remaining, SearchKey::Unseen)),
        "UID" => map(preceded(sp, uid_set_or_saved), SearchKey::Uid)(remaining),
        "MODSEQ" => map(|i| search_modsequence(i), SearchKey::ModSeq)(remaining),
        "OLDER" => map(preceded(sp, number), SearchKey::Older)(remaining),
        "YOUNGER" => map(preceded(sp, number), SearchKey::Younger)(remaining),
        "FILTER" => map(preceded(sp, atom), SearchKey::Filter)(remaining),
        "EMAILID" => map(preceded(sp, objectid), SearchKey::EmailId)(remaining),
        "THREADID" => map(preceded(sp, objectid), SearchKey::ThreadId)(remaining),
        // `1:5,8` and `$` read as atoms; re-parse them as a set.
        _ => sequence_set_key(input),
    }
}

fn sequence_set_key(input: &[u8]) -> IMAPResult<SearchKey> {
    map(seq_set_or_saved, SearchKey::SequenceSet)(input)
}

// ----- ESEARCH command (RFC 7377) -----

/// The suffix of `ESEARCH`:
///
/// ```abnf
/// esearch = "ESEARCH" [SP "IN" SP "(" scope-options ")"]
///           [search-return-opts] SP search-program
/// ```
#[allow(clippy::type_complexity)]
pub(crate) fn esearch(
    input: &[u8],
    remaining_recursion: usize,
) -> IMAPResult<(
    Option<Vec1<SearchScope>>,
    Option<Vec<SearchReturnOption>>,
    Option<Charset>,
    SearchKey,
)> {
    let (remaining, scope) = opt(preceded(
        tuple((sp, tag_no_case(b"IN"), sp)),
        delimited(
            tag(b"("),
            map(separated_list1(sp, scope_option), Vec1::unvalidated),
            tag(b")"),
        ),
    ))(input)?;

    let (remaining, (returns, charset, key)) = search(remaining, remaining_recursion)?;

    Ok((remaining, (scope, returns, charset, key)))
}

/// ```abnf
/// scope-option = "selected" / "personal" / "inboxes" / "subscribed" /
///                "subtree" SP one-or-more-mailbox /
///                "subtree-one" SP one-or-more-mailbox /
///                "mailboxes" SP one-or-more-mailbox
/// ```
fn scope_option(input: &[u8]) -> IMAPResult<SearchScope> {
    let (remaining, keyword) = uppercased_atom(input)?;

    match keyword.as_str() {
        "SELECTED" => Ok((remaining, SearchScope::Selected)),
        "PERSONAL" => Ok((remaining, SearchScope::Personal)),
        "INBOXES" => Ok((remaining, SearchScope::Inboxes)),
        "SUBSCRIBED" => Ok((remaining, SearchScope::Subscribed)),
        "SUBTREE" => map(preceded(sp, one_or_more_mailbox), SearchScope::Subtree)(remaining),
        "SUBTREE-ONE" => {
            map(preceded(sp, one_or_more_mailbox), SearchScope::SubtreeOne)(remaining)
        }
        "MAILBOXES" => map(preceded(sp, one_or_more_mailbox), SearchScope::Mailboxes)(remaining),
        _ => unknown_keyword(input),
    }
}

/// `one-or-more-mailbox = mailbox / "(" mailbox *(SP mailbox) ")"`
fn one_or_more_mailbox(input: &[u8]) -> IMAPResult<Vec1<imap_ast::mailbox::Mailbox>> {
    alt((
        map(mailbox, Vec1::from),
        map(
            delimited(tag(b"("), separated_list1(sp, mailbox), tag(b")")),
            Vec1::unvalidated,
        ),
    ))(input)
}

// ----- ESEARCH response (RFC 4731) -----

/// The suffix of an untagged `ESEARCH` response:
///
/// ```abnf
/// esearch-response = "ESEARCH" [search-correlator] [SP "UID"]
///                    *(SP search-return-data)
/// search-correlator = SP "(" "TAG" SP tag-string ")"
/// ```
pub(crate) fn esearch_response(input: &[u8]) -> IMAPResult<EsearchResponse> {
    let mut parser = tuple((
        opt(preceded(
            sp,
            delimited(
                tuple((tag(b"("), tag_no_case(b"TAG"), sp)),
                map(astring, |s| {
                    Tag::unvalidated(String::from_utf8_lossy(s.as_bytes()).into_owned())
                }),
                tag(b")"),
            ),
        )),
        map(opt(preceded(sp, tag_no_case(b"UID"))), |uid| uid.is_some()),
        many0(preceded(sp, search_return_data)),
    ));

    let (remaining, (correlator, uid, returns)) = parser(input)?;

    Ok((
        remaining,
        EsearchResponse {
            correlator,
            uid,
            returns,
        },
    ))
}

/// ```abnf
/// search-return-data = "MIN" SP nz-number /
///                      "MAX" SP nz-number /
///                      "ALL" SP sequence-set /
///                      "COUNT" SP number /
///                      "MODSEQ" SP mod-sequence-value /   ; RFC 7162
///                      "PARTIAL" SP "(" partial-range SP
///                                     (sequence-set / "NIL") ")" ; RFC 9394
/// ```
fn search_return_data(input: &[u8]) -> IMAPResult<EsearchReturnData> {
    let (remaining, keyword) = uppercased_atom(input)?;

    match keyword.as_str() {
        "MIN" => map(preceded(sp, nz_number), EsearchReturnData::Min)(remaining),
        "MAX" => map(preceded(sp, nz_number), EsearchReturnData::Max)(remaining),
        "ALL" => map(preceded(sp, seq_set), EsearchReturnData::All)(remaining),
        "COUNT" => map(preceded(sp, number), EsearchReturnData::Count)(remaining),
        "MODSEQ" => map(preceded(sp, number64), |n| {
            EsearchReturnData::ModSeq(ModSeq::new(n))
        })(remaining),
        "PARTIAL" => map(
            preceded(
                sp,
                delimited(
                    tag(b"("),
                    tuple((
                        partial_range,
                        preceded(sp, alt((map(seq_set, Some), value(None, nil)))),
                    )),
                    tag(b")"),
                ),
            ),
            |(range, set)| EsearchReturnData::Partial { range, set },
        )(remaining),
        _ => unknown_keyword(input),
    }
}

#[cfg(test)]
mod tests {
    use imap_ast::identifier::{LastCommandSet, SeqSet};

    use super::*;

    #[test]
    fn test_search_single_key() {
        let (_, (returns, charset, key)) = search(b" UNSEEN\r\n", 9).unwrap();
        assert_eq!(returns, None);
        assert_eq!(charset, None);
        assert_eq!(key, SearchKey::Unseen);
    }

    #[test]
    fn test_search_multiple_keys_fold_into_and() {
        let (_, (_, _, key)) = search(b" SEEN FLAGGED\r\n", 9).unwrap();
        assert_eq!(
            key,
            SearchKey::And(Vec1::unvalidated(vec![
                SearchKey::Seen,
                SearchKey::Flagged
            ]))
        );
    }

    #[test]
    fn test_search_return_empty_defaults_to_all() {
        let (_, (returns, _, _)) = search(b" RETURN () SEEN\r\n", 9).unwrap();
        assert_eq!(returns, Some(vec![SearchReturnOption::All]));

        let (_, (returns, _, _)) = search(b" RETURN (MIN MAX) SEEN\r\n", 9).unwrap();
        assert_eq!(
            returns,
            Some(vec![SearchReturnOption::Min, SearchReturnOption::Max])
        );
    }

    #[test]
    fn test_search_charset() {
        let (_, (_, charset, _)) = search(b" CHARSET UTF-8 TEXT foo\r\n", 9).unwrap();
        assert_eq!(charset, Some(Charset::try_from("UTF-8").unwrap()));
    }

    #[test]
    fn test_search_key_nesting() {
        let (_, key) = search_key(9)(b"OR SEEN (UNSEEN DRAFT)\r\n").unwrap();
        assert_eq!(
            key,
            SearchKey::Or(
                Box::new(SearchKey::Seen),
                Box::new(SearchKey::And(Vec1::unvalidated(vec![
                    SearchKey::Unseen,
                    SearchKey::Draft
                ])))
            )
        );
    }

    #[test]
    fn test_search_key_sequence_set_and_saved() {
        let (_, key) = search_key(9)(b"1:5,8 ").unwrap();
        assert_eq!(
            key,
            SearchKey::SequenceSet(LastCommandSet::Set(SeqSet::try_from("1:5,8").unwrap()))
        );

        let (_, key) = search_key(9)(b"$ ").unwrap();
        assert_eq!(key, SearchKey::SequenceSet(LastCommandSet::LastCommand));
    }

    #[test]
    fn test_search_key_recursion_limit() {
        assert!(search_key(2)(b"(1:5) ").is_ok());
        assert!(matches!(
            search_key(2)(b"((1:5)) "),
            Err(nom::Err::Failure(IMAPParseError {
                kind: IMAPErrorKind::RecursionLimitExceeded,
                ..
            }))
        ));
    }

    #[test]
    fn test_search_key_older_younger() {
        let (_, key) = search_key(9)(b"OLDER 86400 ").unwrap();
        assert_eq!(key, SearchKey::Older(86400));

        let (_, key) = search_key(9)(b"YOUNGER 60 ").unwrap();
        assert_eq!(key, SearchKey::Younger(60));
    }

    #[test]
    fn test_esearch_response() {
        let (_, val) = esearch_response(b" (TAG \"A285\") UID MIN 7 MAX 3800 COUNT 15\r\n").unwrap();
        assert_eq!(val.correlator, Some(Tag::unvalidated("A285")));
        assert!(val.uid);
        assert_eq!(
            val.returns,
            vec![
                EsearchReturnData::Min(7.try_into().unwrap()),
                EsearchReturnData::Max(3800.try_into().unwrap()),
                EsearchReturnData::Count(15),
            ]
        );
    }

    #[test]
    fn test_esearch_command_with_scope() {
        let (_, (scope, _, _, key)) =
            esearch(b" IN (PERSONAL) SEEN\r\n", 9).unwrap();
        assert_eq!(
            scope.as_ref().map(|s| s.as_ref().to_vec()),
            Some(vec![SearchScope::Personal])
        );
        assert_eq!(key, SearchKey::Seen);
    }
}
