//! Parser primitives: the lexical categories every grammar rule is built
//! from, plus the keyword-dispatch helper behind the verb, code, and
//! attribute tables.
//!
//! Everything here is a `nom` streaming parser over `&[u8]`. Running out
//! of input is `Incomplete`, never a syntax error, so a rule cut off at a
//! buffer boundary can be retried once more bytes arrive. Where the first
//! byte decides the alternative (`"` quoted, `{` literal, `~` LITERAL8),
//! the decision is made by looking at that byte instead of trying parsers
//! in sequence.

use std::str::from_utf8;

// A line terminator is CRLF, or a bare LF from servers that never learned
// better.
use abnf_core::streaming::crlf_relaxed as newline;
use abnf_core::streaming::dquote;
use base64::{engine::general_purpose::STANDARD as _base64, Engine};
use imap_ast::{
    core::{
        AString, Atom, AtomExt, Charset, IString, Literal, LiteralMode, NString, Quoted,
        QuotedChar, Tag, Text,
    },
    utils::{
        indicators::{is_astring_char, is_atom_char, is_quoted_specials, is_text_char},
        unescape_quoted,
    },
};
use nom::{
    bytes::streaming::{tag, tag_no_case, take, take_while, take_while1},
    character::streaming::digit1,
    combinator::{map, map_res, opt, value},
    Needed,
};

use crate::decode::{IMAPErrorKind, IMAPParseError, IMAPResult};

/// ```abnf
/// number64 = 1*DIGIT
/// ```
///
/// Folded digit by digit; a value past `u64::MAX` is a syntax error, not
/// a wraparound.
pub(crate) fn number64(input: &[u8]) -> IMAPResult<u64> {
    let (remaining, digits) = digit1(input)?;

    let mut value: u64 = 0;
    for digit in digits {
        value = value
            .checked_mul(10)
            .and_then(|value| value.checked_add(u64::from(digit - b'0')))
            .ok_or(nom::Err::Error(IMAPParseError {
                input,
                kind: IMAPErrorKind::BadNumber,
            }))?;
    }

    Ok((remaining, value))
}

/// `number = 1*DIGIT`
///
/// Unsigned 32-bit integer (0 <= n < 4,294,967,296)
pub(crate) fn number(input: &[u8]) -> IMAPResult<u32> {
    map_res(number64, u32::try_from)(input)
}

/// `nz-number = digit-nz *DIGIT`
///
/// Like [`number`], but zero is excluded.
pub(crate) fn nz_number(input: &[u8]) -> IMAPResult<std::num::NonZeroU32> {
    map_res(number, std::num::NonZeroU32::try_from)(input)
}

/// `atom = 1*ATOM-CHAR`
pub(crate) fn atom(input: &[u8]) -> IMAPResult<Atom> {
    map(take_while1(is_atom_char), |word: &[u8]| {
        // ATOM-CHARs are ASCII, so the bytes are valid UTF-8.
        Atom::unvalidated(from_utf8(word).unwrap())
    })(input)
}

/// The front half of every keyword table: read an atom and uppercase it
/// (IMAP keywords are case-insensitive). The caller matches the result
/// against its table and runs the winning suffix parser on the rest;
/// [`unknown_keyword`] is the table's fall-through.
pub(crate) fn uppercased_atom(input: &[u8]) -> IMAPResult<String> {
    map(atom, |word| word.inner().to_ascii_uppercase())(input)
}

/// The fall-through of a keyword table. Always fails, pointing at the
/// start of the unrecognized keyword.
pub(crate) fn unknown_keyword<O>(input: &[u8]) -> IMAPResult<O> {
    Err(nom::Err::Error(IMAPParseError {
        input,
        kind: IMAPErrorKind::UnknownKeyword,
    }))
}

/// `string = quoted / literal`
pub(crate) fn string(input: &[u8]) -> IMAPResult<IString> {
    match input.first() {
        Some(b'"') => map(quoted, IString::Quoted)(input),
        Some(b'{') => map(literal, IString::Literal)(input),
        Some(_) => Err(nom::Err::Error(IMAPParseError {
            input,
            kind: IMAPErrorKind::Invalid,
        })),
        None => Err(nom::Err::Incomplete(Needed::new(1))),
    }
}

/// `astring = 1*ASTRING-CHAR / string`
pub(crate) fn astring(input: &[u8]) -> IMAPResult<AString> {
    if matches!(input.first(), Some(b'"' | b'{')) {
        return map(string, AString::String)(input);
    }

    let (remaining, word) = take_while1(is_astring_char)(input)?;

    // ASTRING-CHARs are ASCII, so the bytes are valid UTF-8.
    Ok((
        remaining,
        AString::Atom(AtomExt::unvalidated(from_utf8(word).unwrap())),
    ))
}

/// `nstring = string / nil`
pub(crate) fn nstring(input: &[u8]) -> IMAPResult<NString> {
    match input.first() {
        Some(b'"' | b'{') => map(string, |string| NString(Some(string)))(input),
        _ => value(NString(None), nil)(input),
    }
}

#[inline]
/// `nil = "NIL"`
pub(crate) fn nil(input: &[u8]) -> IMAPResult<&[u8]> {
    tag_no_case(b"NIL")(input)
}

/// `quoted = DQUOTE *QUOTED-CHAR DQUOTE`
///
/// The content is scanned by hand up to the closing quote, validating
/// every byte and every `\"`/`\\` escape on the way. Unescaping only
/// allocates when an escape was actually present.
pub(crate) fn quoted(input: &[u8]) -> IMAPResult<Quoted> {
    let (content, _) = dquote(input)?;

    let mut at = 0;
    let end = loop {
        match content.get(at) {
            None => return Err(nom::Err::Incomplete(Needed::new(1))),
            Some(b'"') => break at,
            Some(b'\\') => match content.get(at + 1) {
                None => return Err(nom::Err::Incomplete(Needed::new(1))),
                Some(next) if is_quoted_specials(*next) => at += 2,
                Some(_) => {
                    return Err(nom::Err::Error(IMAPParseError {
                        input,
                        kind: IMAPErrorKind::Invalid,
                    }))
                }
            },
            Some(byte) if is_text_char(*byte) => at += 1,
            Some(_) => {
                return Err(nom::Err::Error(IMAPParseError {
                    input,
                    kind: IMAPErrorKind::Invalid,
                }))
            }
        }
    };

    // QUOTED-CHARs are ASCII, so the bytes are valid UTF-8.
    let escaped = from_utf8(&content[..end]).unwrap();

    Ok((
        &content[end + 1..],
        Quoted::unvalidated(unescape_quoted(escaped)),
    ))
}

/// `QUOTED-CHAR = <any TEXT-CHAR except quoted-specials> / "\" quoted-specials`
///
/// A single such character, e.g. a mailbox hierarchy delimiter.
pub(crate) fn quoted_char(input: &[u8]) -> IMAPResult<QuotedChar> {
    match input {
        [] | [b'\\'] => Err(nom::Err::Incomplete(Needed::new(1))),
        [b'\\', escaped, remaining @ ..] if is_quoted_specials(*escaped) => {
            Ok((remaining, QuotedChar::unvalidated(*escaped as char)))
        }
        [byte, remaining @ ..] if is_text_char(*byte) && !is_quoted_specials(*byte) => {
            Ok((remaining, QuotedChar::unvalidated(*byte as char)))
        }
        _ => Err(nom::Err::Error(IMAPParseError {
            input,
            kind: IMAPErrorKind::Invalid,
        })),
    }
}

/// The `"{" number ["+"] "}" CRLF` framing of a literal, without its
/// octets.
///
/// `+` marks a non-synchronizing literal (RFC 7888): the sender transmits
/// the octets without waiting for a continuation request. The mode is
/// only recorded; acting on it is the caller's business.
pub(crate) fn literal_header(input: &[u8]) -> IMAPResult<(u32, LiteralMode)> {
    let (remaining, _) = tag(b"{")(input)?;
    let (remaining, length) = number(remaining)?;
    let (remaining, plus) = opt(tag(b"+"))(remaining)?;
    let (remaining, _) = tag(b"}")(remaining)?;
    let (remaining, _) = newline(remaining)?;

    let mode = match plus {
        Some(_) => LiteralMode::NonSync,
        None => LiteralMode::Sync,
    };

    Ok((remaining, (length, mode)))
}

/// A literal header whose announced size must not exceed `max`.
///
/// Used wherever the announced octets would be buffered or handed to the
/// caller as a stream, so an adversarial `{4294967295}` is refused before
/// any memory is committed.
pub(crate) fn literal_header_capped(
    max: u32,
) -> impl Fn(&[u8]) -> IMAPResult<(u32, LiteralMode)> {
    move |input: &[u8]| {
        let (remaining, (length, mode)) = literal_header(input)?;

        if length > max {
            return Err(nom::Err::Failure(IMAPParseError {
                input,
                kind: IMAPErrorKind::LiteralTooLarge { length, limit: max },
            }));
        }

        Ok((remaining, (length, mode)))
    }
}

/// `literal8 = "~{" number ["+"] "}" CRLF *OCTET` (RFC 4466), header only.
///
/// Only APPEND data and BINARY values admit the `~` form; every other
/// literal position rejects it.
pub(crate) fn literal8_header(input: &[u8]) -> IMAPResult<(u32, LiteralMode)> {
    let (remaining, _) = tag(b"~")(input)?;

    literal_header(remaining)
}

/// `literal = "{" number ["+"] "}" CRLF *CHAR8`
///
/// Header plus octets, consumed inline. When the octets are not fully
/// buffered yet this reports `Incomplete`; whether to answer the header
/// with a continuation request in the meantime is the caller's call.
pub(crate) fn literal(input: &[u8]) -> IMAPResult<Literal> {
    let (remaining, (length, mode)) = literal_header(input)?;
    let (remaining, octets) = take(length)(remaining)?;

    // CHAR8 excludes NUL.
    let mut literal = Literal::try_from(octets).map_err(|_| {
        nom::Err::Failure(IMAPParseError {
            input,
            kind: IMAPErrorKind::LiteralContainsNull,
        })
    })?;
    literal.set_mode(mode);

    Ok((remaining, literal))
}

/// `text = 1*TEXT-CHAR`
pub(crate) fn text(input: &[u8]) -> IMAPResult<Text> {
    let (remaining, content) = take_while1(is_text_char)(input)?;

    // TEXT-CHARs are ASCII, so the bytes are valid UTF-8.
    Ok((remaining, Text::unvalidated(from_utf8(content).unwrap())))
}

/// `charset = atom / quoted`
///
/// Note: see errata id: 261
pub(crate) fn charset(input: &[u8]) -> IMAPResult<Charset> {
    if input.first() == Some(&b'"') {
        map(quoted, Charset::Quoted)(input)
    } else {
        map(atom, Charset::Atom)(input)
    }
}

/// `tag = 1*<any ASTRING-CHAR except "+">`
pub(crate) fn tag_imap(input: &[u8]) -> IMAPResult<Tag> {
    map(take_while1(is_tag_char), |word: &[u8]| {
        // Tag characters are ASCII, so the bytes are valid UTF-8.
        Tag::unvalidated(from_utf8(word).unwrap())
    })(input)
}

/// `+` terminates a tag: it is reserved for continuation requests.
fn is_tag_char(byte: u8) -> bool {
    byte != b'+' && is_astring_char(byte)
}

/// `base64 = *(4base64-char) [base64-terminal]`
///
/// The alphabet span and its `=` padding are located first, then decoded
/// in one go; the engine rejects bad lengths and bad padding.
pub(crate) fn base64(input: &[u8]) -> IMAPResult<Vec<u8>> {
    let (remaining, alphabet) = take_while(is_base64_char)(input)?;
    let (remaining, padding) = take_while(|byte| byte == b'=')(remaining)?;

    let span = &input[..alphabet.len() + padding.len()];

    match _base64.decode(span) {
        Ok(data) => Ok((remaining, data)),
        Err(_) => Err(nom::Err::Error(IMAPParseError {
            input,
            kind: IMAPErrorKind::BadBase64,
        })),
    }
}

/// `base64-char = ALPHA / DIGIT / "+" / "/" ; Case-sensitive`
fn is_base64_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'+' || byte == b'/'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_folds_and_bounds() {
        assert_eq!(number(b"0 ").unwrap().1, 0);
        assert_eq!(number(b"007 ").unwrap().1, 7);
        assert_eq!(number(b"4294967295 ").unwrap().1, u32::MAX);

        // One past u32::MAX.
        assert!(number(b"4294967296 ").is_err());

        assert_eq!(number64(b"20050715194045000 ").unwrap().1, 20050715194045000);
        assert!(number64(b"99999999999999999999 ").is_err());

        // All digits so far; more could follow.
        assert!(matches!(number(b"42"), Err(nom::Err::Incomplete(_))));
        assert!(number(b"x").is_err());
    }

    #[test]
    fn test_nz_number_rejects_zero() {
        assert!(nz_number(b"0 ").is_err());
        assert_eq!(nz_number(b"12 ").unwrap().1.get(), 12);
    }

    #[test]
    fn test_atom_stops_at_specials() {
        let (rem, word) = atom(b"Sent)").unwrap();
        assert_eq!(word, "Sent");
        assert_eq!(rem, b")");

        let (rem, word) = atom(b"v4.2 ok").unwrap();
        assert_eq!(word, "v4.2");
        assert_eq!(rem, b" ok");

        assert!(atom(b"(x").is_err());
        assert!(matches!(atom(b"abc"), Err(nom::Err::Incomplete(_))));
    }

    #[test]
    fn test_uppercased_atom_folds_case() {
        let (rem, word) = uppercased_atom(b"gEtQuOtA root").unwrap();
        assert_eq!(word, "GETQUOTA");
        assert_eq!(rem, b" root");
    }

    #[test]
    fn test_unknown_keyword_fails_without_consuming() {
        let err = unknown_keyword::<()>(b"XWHATEVER rest").unwrap_err();
        assert!(matches!(
            err,
            nom::Err::Error(IMAPParseError {
                input: b"XWHATEVER rest",
                kind: IMAPErrorKind::UnknownKeyword,
            })
        ));
    }

    #[test]
    fn test_string_dispatches_on_first_byte() {
        let (_, val) = string(b"\"ok\" ").unwrap();
        assert_eq!(val.as_bytes(), b"ok");

        let (_, val) = string(b"{2}\r\nok ").unwrap();
        assert_eq!(val.as_bytes(), b"ok");

        assert!(string(b"bare ").is_err());
        assert!(matches!(string(b""), Err(nom::Err::Incomplete(_))));
    }

    #[test]
    fn test_astring_forms() {
        // `]` is allowed in the unquoted form.
        let (rem, val) = astring(b"body[1] ").unwrap();
        assert_eq!(val.as_bytes(), b"body[1]");
        assert_eq!(rem, b" ");

        let (_, val) = astring(b"\"two words\" ").unwrap();
        assert_eq!(val.as_bytes(), b"two words");

        let (_, val) = astring(b"{3}\r\na b ").unwrap();
        assert_eq!(val.as_bytes(), b"a b");
    }

    #[test]
    fn test_nstring_nil_is_case_insensitive() {
        assert_eq!(nstring(b"nIl ").unwrap().1, NString(None));
        assert!(nstring(b"\"NIL\" ").unwrap().1.as_bytes() == Some(b"NIL".as_ref()));
    }

    #[test]
    fn test_quoted_unescapes() {
        let (rem, val) = quoted(b"\"plain\" tail").unwrap();
        assert_eq!(val, Quoted::unvalidated("plain"));
        assert_eq!(rem, b" tail");

        let (_, val) = quoted(br#""a \"b\" \\ c" "#).unwrap();
        assert_eq!(val, Quoted::unvalidated(r#"a "b" \ c"#));

        let (_, val) = quoted(b"\"\" ").unwrap();
        assert_eq!(val, Quoted::unvalidated(""));
    }

    #[test]
    fn test_quoted_rejects_bad_content() {
        // Only DQUOTE and backslash may be escaped.
        assert!(quoted(br#""a \n b" "#).is_err());
        // No raw CR or LF inside.
        assert!(quoted(b"\"a\rb\" ").is_err());
    }

    #[test]
    fn test_quoted_incomplete_variants() {
        for input in [b"\"".as_ref(), b"\"abc", b"\"abc\\"] {
            assert!(
                matches!(quoted(input), Err(nom::Err::Incomplete(_))),
                "{:?}",
                String::from_utf8_lossy(input)
            );
        }
    }

    #[test]
    fn test_quoted_char_forms() {
        let (rem, val) = quoted_char(b"/x").unwrap();
        assert_eq!(val.inner(), '/');
        assert_eq!(rem, b"x");

        let (_, val) = quoted_char(b"\\\\x").unwrap();
        assert_eq!(val.inner(), '\\');

        assert!(quoted_char(b"\\nx").is_err());
        assert!(matches!(quoted_char(b"\\"), Err(nom::Err::Incomplete(_))));
    }

    #[test]
    fn test_literal_header_modes() {
        let (rem, (length, mode)) = literal_header(b"{310}\r\n...").unwrap();
        assert_eq!((length, mode), (310, LiteralMode::Sync));
        assert_eq!(rem, b"...");

        let (_, (length, mode)) = literal_header(b"{11+}\r\n").unwrap();
        assert_eq!((length, mode), (11, LiteralMode::NonSync));

        // Bare LF accepted.
        assert!(literal_header(b"{0}\n").is_ok());
        assert!(literal_header(b"{x}\r\n").is_err());
    }

    #[test]
    fn test_literal_consumes_octets_inline() {
        let (rem, val) = literal(b"{4}\r\nabcd tail").unwrap();
        assert_eq!(val.data(), b"abcd");
        assert_eq!(rem, b" tail");

        // Octets not buffered yet.
        assert!(matches!(literal(b"{4}\r\nab"), Err(nom::Err::Incomplete(_))));

        // CHAR8 excludes NUL.
        assert!(matches!(
            literal(b"{2}\r\na\x00"),
            Err(nom::Err::Failure(IMAPParseError {
                kind: IMAPErrorKind::LiteralContainsNull,
                ..
            }))
        ));
    }

    #[test]
    fn test_literal_header_capped_refuses_oversize() {
        assert!(literal_header_capped(4096)(b"{4096}\r\n").is_ok());
        assert!(matches!(
            literal_header_capped(4096)(b"{4097}\r\n"),
            Err(nom::Err::Failure(IMAPParseError {
                kind: IMAPErrorKind::LiteralTooLarge {
                    length: 4097,
                    limit: 4096,
                },
                ..
            }))
        ));
    }

    #[test]
    fn test_literal8_header_requires_tilde() {
        let (rem, (length, _)) = literal8_header(b"~{21+}\r\n!").unwrap();
        assert_eq!(length, 21);
        assert_eq!(rem, b"!");

        assert!(literal8_header(b"{21}\r\n").is_err());
    }

    #[test]
    fn test_text_stops_at_line_end() {
        let (rem, val) = text(b"LOGIN failed.\r\n").unwrap();
        assert_eq!(val.inner(), "LOGIN failed.");
        assert_eq!(rem, b"\r\n");

        assert!(text(b"\r\n").is_err());
    }

    #[test]
    fn test_charset_forms() {
        let (_, val) = charset(b"UTF-8 ").unwrap();
        assert_eq!(val.as_str(), "UTF-8");

        let (_, val) = charset(b"\"ISO 8859-1\" ").unwrap();
        assert_eq!(val.as_str(), "ISO 8859-1");
    }

    #[test]
    fn test_tag_stops_at_plus() {
        let (rem, val) = tag_imap(b"A042 NOOP").unwrap();
        assert_eq!(val.inner(), "A042");
        assert_eq!(rem, b" NOOP");

        // A continuation request is not a tag.
        let (rem, val) = tag_imap(b"A+").unwrap();
        assert_eq!(val.inner(), "A");
        assert_eq!(rem, b"+");
    }

    #[test]
    fn test_base64_decodes_whole_span() {
        let (rem, val) = base64(b"aGVsbG8=\r\n").unwrap();
        assert_eq!(val, b"hello");
        assert_eq!(rem, b"\r\n");

        let (rem, val) = base64(b"\r\n").unwrap();
        assert_eq!(val, b"");
        assert_eq!(rem, b"\r\n");

        // Truncated groups don't decode.
        assert!(base64(b"aGV \r\n").is_err());

        // More alphabet could follow.
        assert!(matches!(base64(b"aGVsbG8"), Err(nom::Err::Incomplete(_))));
    }
}
