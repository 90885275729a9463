//! Streaming decode of FETCH responses.
//!
//! A FETCH response can carry message payloads of arbitrary size. The
//! event decoder therefore never materializes them: body-valued
//! attributes turn into begin events carrying the exact octet count, the
//! caller drains that many bytes from its buffer (e.g. into a file), and
//! re-enters the decoder for the next event. There is no decoder-held
//! state between events — the read position is the only state.
//!
//! Quoted payloads are announced with the raw span between the quotes
//! (escape sequences included); the closing quote is consumed by the next
//! decoder call.

use abnf_core::streaming::crlf_relaxed as crlf;
use abnf_core::streaming::sp;
use imap_ast::{
    fetch::{FetchEvent, MessageDataItem, StreamKind},
    identifier::{SeqNum, Uid},
};
use nom::{
    bytes::streaming::tag,
    combinator::{map, opt},
    sequence::{delimited, terminated, tuple},
};

use crate::{
    core::{literal_header_capped, literal8_header, nil, nz_number, uppercased_atom},
    decode::{IMAPResult, ParserOptions},
    fetch::{msg_att_item, section, section_binary},
};

/// Decode the next event of a FETCH response.
pub(crate) fn fetch_event<'a>(
    input: &'a [u8],
    options: &ParserOptions,
) -> IMAPResult<'a, FetchEvent> {
    // `* <n> FETCH (` / `* <uid> UIDFETCH (`
    if input.first() == Some(&b'*') {
        let (remaining, _) = tag(b"* ")(input)?;
        let (remaining, number) = terminated(nz_number, sp)(remaining)?;
        let (remaining, keyword) = uppercased_atom(remaining)?;
        let (remaining, _) = sp(remaining)?;
        let (remaining, _) = tag(b"(")(remaining)?;

        return match keyword.as_str() {
            "FETCH" => Ok((remaining, FetchEvent::Start(SeqNum::from(number)))),
            "UIDFETCH" => Ok((remaining, FetchEvent::StartUid(Uid::from(number)))),
            _ => crate::core::unknown_keyword(input),
        };
    }

    // The closing quote of a quoted payload the caller just drained.
    let (input, _) = opt(tag(b"\""))(input)?;

    // `)` CRLF finishes the response.
    if let (remaining, Some(_)) = opt(terminated(tag(b")"), crlf))(input)? {
        return Ok((remaining, FetchEvent::Finish));
    }

    let (input, _) = opt(sp)(input)?;

    attribute_event(input, options)
}

/// One attribute: a stream-begin for the body-valued kinds, a
/// [`FetchEvent::Simple`] for everything else.
fn attribute_event<'a>(input: &'a [u8], options: &ParserOptions) -> IMAPResult<'a, FetchEvent> {
    let (remaining, keyword) = uppercased_atom(input)?;

    let (remaining, kind) = match keyword.as_str() {
        "RFC822" => {
            let (remaining, _) = sp(remaining)?;
            (remaining, StreamKind::Rfc822)
        }
        "RFC822.HEADER" => {
            let (remaining, _) = sp(remaining)?;
            (remaining, StreamKind::Rfc822Header)
        }
        "RFC822.TEXT" => {
            let (remaining, _) = sp(remaining)?;
            (remaining, StreamKind::Rfc822Text)
        }
        "BODY" if remaining.first() == Some(&b'[') => {
            let (remaining, (section, origin)) = terminated(
                tuple((
                    section,
                    opt(delimited(tag(b"<"), crate::core::number, tag(b">"))),
                )),
                sp,
            )(remaining)?;

            (remaining, StreamKind::Body { section, origin })
        }
        "BINARY" if remaining.first() == Some(&b'[') => {
            let (remaining, (section, origin)) = terminated(
                tuple((
                    section_binary,
                    opt(delimited(tag(b"<"), crate::core::number, tag(b">"))),
                )),
                sp,
            )(remaining)?;

            (remaining, StreamKind::Binary { section, origin })
        }
        // Fixed-size attribute: hand the whole item to the regular parser.
        _ => {
            return map(
                |i| msg_att_item(i, options.max_depth),
                FetchEvent::Simple,
            )(input);
        }
    };

    payload_begin(remaining, kind, options)
}

/// The payload of a streamed attribute: a literal header, an opening
/// quote, or NIL.
fn payload_begin<'a>(
    input: &'a [u8],
    kind: StreamKind,
    options: &ParserOptions,
) -> IMAPResult<'a, FetchEvent> {
    // NIL payloads don't stream.
    if let (remaining, Some(_)) = opt(nil)(input)? {
        return Ok((remaining, FetchEvent::Simple(MessageDataItem::NilBody(kind))));
    }

    // `~{n}` is only admissible for BINARY (RFC 3516).
    if matches!(kind, StreamKind::Binary { .. }) {
        if let (remaining, Some((length, _))) = opt(literal8_header)(input)? {
            return Ok((remaining, FetchEvent::LiteralBegin { kind, length }));
        }
    }

    if input.first() == Some(&b'"') {
        let length = quoted_span(&input[1..])?;

        // Consume the opening quote only; the content stays for the
        // caller, the closing quote for the next decoder call.
        return Ok((&input[1..], FetchEvent::QuotedBegin { kind, length }));
    }

    let (remaining, (length, _)) = literal_header_capped(options.max_literal_size)(input)?;

    Ok((remaining, FetchEvent::LiteralBegin { kind, length }))
}

/// Length of the raw span up to (excluding) the closing unescaped quote.
fn quoted_span(input: &[u8]) -> Result<u32, nom::Err<crate::decode::IMAPParseError<&[u8]>>> {
    let mut i = 0;

    while i < input.len() {
        match input[i] {
            b'\\' => i += 2,
            b'"' => return Ok(i as u32),
            _ => i += 1,
        }
    }

    Err(nom::Err::Incomplete(nom::Needed::Unknown))
}

#[cfg(test)]
mod tests {
    use imap_ast::fetch::Section;

    use super::*;

    fn options() -> ParserOptions {
        ParserOptions::default()
    }

    #[test]
    fn test_fetch_event_sequence() {
        let options = options();

        let (rem, event) = fetch_event(b"* 7 FETCH (UID 42 BODY[TEXT] {1024}\r\n", &options).unwrap();
        assert_eq!(event, FetchEvent::Start(SeqNum::new(7).unwrap()));

        let (rem, event) = fetch_event(rem, &options).unwrap();
        assert_eq!(
            event,
            FetchEvent::Simple(MessageDataItem::Uid(Uid::new(42).unwrap()))
        );

        let (rem, event) = fetch_event(rem, &options).unwrap();
        assert_eq!(
            event,
            FetchEvent::LiteralBegin {
                kind: StreamKind::Body {
                    section: Some(Section::Text(None)),
                    origin: None,
                },
                length: 1024,
            }
        );
        // The decoder stopped right at the payload.
        assert_eq!(rem, b"");

        // ... the caller drains 1024 octets, then re-enters:
        let (rem, event) = fetch_event(b")\r\nrest", &options).unwrap();
        assert_eq!(event, FetchEvent::Finish);
        assert_eq!(rem, b"rest");
    }

    #[test]
    fn test_fetch_event_quoted_payload() {
        let options = options();

        let (rem, event) = fetch_event(b"BODY[] \"hello\")\r\n", &options).unwrap();
        assert_eq!(
            event,
            FetchEvent::QuotedBegin {
                kind: StreamKind::Body {
                    section: None,
                    origin: None,
                },
                length: 5,
            }
        );
        assert_eq!(rem, b"hello\")\r\n");

        // Caller drained 5 octets; the next call eats the closing quote.
        let (rem, event) = fetch_event(b"\")\r\n", &options).unwrap();
        assert_eq!(event, FetchEvent::Finish);
        assert_eq!(rem, b"");
    }

    #[test]
    fn test_fetch_event_nil_body() {
        let options = options();

        let (_, event) = fetch_event(b"RFC822.TEXT NIL)\r\n", &options).unwrap();
        assert_eq!(
            event,
            FetchEvent::Simple(MessageDataItem::NilBody(StreamKind::Rfc822Text))
        );
    }

    #[test]
    fn test_fetch_event_uidfetch_start() {
        let options = options();

        let (_, event) = fetch_event(b"* 42 UIDFETCH (FLAGS ())\r\n", &options).unwrap();
        assert_eq!(event, FetchEvent::StartUid(Uid::new(42).unwrap()));
    }

    #[test]
    fn test_fetch_event_literal_cap() {
        let options = ParserOptions {
            max_literal_size: 512,
            ..ParserOptions::default()
        };

        assert!(fetch_event(b"BODY[] {4096}\r\n", &options).is_err());
    }

    #[test]
    fn test_fetch_event_simple_attribute_between_streams() {
        let options = options();

        let (_, event) = fetch_event(b" RFC822.SIZE 44827)\r\n", &options).unwrap();
        assert_eq!(event, FetchEvent::Simple(MessageDataItem::Rfc822Size(44827)));
    }
}
