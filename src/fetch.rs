//! FETCH rules: requested attributes (command side) and returned data
//! items (response side). The streaming response surface lives in
//! [`crate::stream`].

use std::num::NonZeroU32;

use abnf_core::streaming::sp;
use imap_ast::{
    core::{AString, IString, NString, Vec1},
    fetch::{FetchAttribute, FetchModifier, MessageDataItem, Part, Section},
    identifier::{ModSeq, Uid},
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt, peek, value},
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
};

use crate::{
    body::body,
    core::{astring, atom, literal, nstring, number, number64, nz_number, unknown_keyword, uppercased_atom},
    datetime::date_time,
    decode::IMAPResult,
    envelope::envelope,
    extensions::objectid::objectid_par,
    flag::flag_fetch,
};

/// ```abnf
/// fetch-att = "ENVELOPE" / "FLAGS" / "INTERNALDATE" /
///             "RFC822" [".HEADER" / ".SIZE" / ".TEXT"] /
///             "BODY" ["STRUCTURE"] / "UID" /
///             "BODY"      section ["<" number "." nz-number ">"] /
///             "BODY.PEEK" section ["<" number "." nz-number ">"] /
///             "BINARY"      section-binary [partial] /  ; RFC 3516
///             "BINARY.PEEK" section-binary [partial] /  ; RFC 3516
///             "BINARY.SIZE" section-binary /            ; RFC 3516
///             "MODSEQ" /                                ; RFC 7162
///             "EMAILID" / "THREADID" /                  ; RFC 8474
///             "PREVIEW" [SP "(" "LAZY" ")"] /           ; RFC 8970
///             "X-GM-MSGID" / "X-GM-THRID" / "X-GM-LABELS"
/// ```
pub(crate) fn fetch_att(input: &[u8]) -> IMAPResult<FetchAttribute> {
    let (remaining, keyword) = uppercased_atom(input)?;

    match keyword.as_str() {
        "ENVELOPE" => Ok((remaining, FetchAttribute::Envelope)),
        "FLAGS" => Ok((remaining, FetchAttribute::Flags)),
        "INTERNALDATE" => Ok((remaining, FetchAttribute::InternalDate)),
        "RFC822" => Ok((remaining, FetchAttribute::Rfc822)),
        "RFC822.HEADER" => Ok((remaining, FetchAttribute::Rfc822Header)),
        "RFC822.SIZE" => Ok((remaining, FetchAttribute::Rfc822Size)),
        "RFC822.TEXT" => Ok((remaining, FetchAttribute::Rfc822Text)),
        "BODYSTRUCTURE" => Ok((remaining, FetchAttribute::BodyStructure)),
        "UID" => Ok((remaining, FetchAttribute::Uid)),
        "MODSEQ" => Ok((remaining, FetchAttribute::ModSeq)),
        "EMAILID" => Ok((remaining, FetchAttribute::EmailId)),
        "THREADID" => Ok((remaining, FetchAttribute::ThreadId)),
        "PREVIEW" => map(
            opt(preceded(sp, tag_no_case(b"(LAZY)"))),
            |lazy| FetchAttribute::Preview {
                lazy: lazy.is_some(),
            },
        )(remaining),
        "X-GM-MSGID" => Ok((remaining, FetchAttribute::GmailMessageId)),
        "X-GM-THRID" => Ok((remaining, FetchAttribute::GmailThreadId)),
        "X-GM-LABELS" => Ok((remaining, FetchAttribute::GmailLabels)),
        "BODY" => match opt(peek(tag(b"[")))(remaining)? {
            (remaining, Some(_)) => map(
                tuple((section, opt(partial))),
                |(section, partial)| FetchAttribute::BodyExt {
                    section,
                    partial,
                    peek: false,
                },
            )(remaining),
            (remaining, None) => Ok((remaining, FetchAttribute::Body)),
        },
        "BODY.PEEK" => map(
            tuple((section, opt(partial))),
            |(section, partial)| FetchAttribute::BodyExt {
                section,
                partial,
                peek: true,
            },
        )(remaining),
        "BINARY" => map(
            tuple((section_binary, opt(partial))),
            |(section, partial)| FetchAttribute::Binary {
                section,
                partial,
                peek: false,
            },
        )(remaining),
        "BINARY.PEEK" => map(
            tuple((section_binary, opt(partial))),
            |(section, partial)| FetchAttribute::Binary {
                section,
                partial,
                peek: true,
            },
        )(remaining),
        "BINARY.SIZE" => map(section_binary, |section| FetchAttribute::BinarySize {
            section,
        })(remaining),
        _ => unknown_keyword(input),
    }
}

/// `partial = "<" number "." nz-number ">"`
fn partial(input: &[u8]) -> IMAPResult<(u32, NonZeroU32)> {
    delimited(
        tag(b"<"),
        map(
            tuple((number, tag(b"."), nz_number)),
            |(offset, _, count)| (offset, count),
        ),
        tag(b">"),
    )(input)
}

/// `section = "[" [section-spec] "]"`
pub(crate) fn section(input: &[u8]) -> IMAPResult<Option<Section>> {
    delimited(tag(b"["), opt(section_spec), tag(b"]"))(input)
}

/// `section-binary = "[" [section-part] "]"` (RFC 3516)
pub(crate) fn section_binary(input: &[u8]) -> IMAPResult<Vec<NonZeroU32>> {
    delimited(
        tag(b"["),
        map(opt(separated_list1(tag(b"."), nz_number)), Option::unwrap_or_default),
        tag(b"]"),
    )(input)
}

/// `section-spec = section-msgtext / (section-part ["." section-text])`
fn section_spec(input: &[u8]) -> IMAPResult<Section> {
    alt((
        |input| section_msgtext(input, None),
        |input| {
            let (remaining, part) = section_part(input)?;
            let part = Part(Vec1::unvalidated(part));

            match opt(preceded(tag(b"."), peek_section_text))(remaining)? {
                (remaining, Some(())) => {
                    preceded(tag(b"."), move |i| section_text(i, Some(part.clone())))(remaining)
                }
                (remaining, None) => Ok((remaining, Section::Part(part))),
            }
        },
    ))(input)
}

/// Look ahead for `section-text` without consuming it, so a bare part
/// path (`1.2.3`) isn't torn apart.
fn peek_section_text(input: &[u8]) -> IMAPResult<()> {
    value(
        (),
        peek(alt((
            tag_no_case(b"HEADER"),
            tag_no_case(b"TEXT"),
            tag_no_case(b"MIME"),
        ))),
    )(input)
}

/// `section-msgtext = "HEADER" /
///                    "HEADER.FIELDS" [".NOT"] SP header-list /
///                    "TEXT"`
fn section_msgtext(input: &[u8], part: Option<Part>) -> IMAPResult<Section> {
    alt((
        map(
            preceded(tag_no_case(b"HEADER.FIELDS.NOT "), header_list),
            {
                let part = part.clone();
                move |fields| Section::HeaderFieldsNot(part.clone(), fields)
            },
        ),
        map(preceded(tag_no_case(b"HEADER.FIELDS "), header_list), {
            let part = part.clone();
            move |fields| Section::HeaderFields(part.clone(), fields)
        }),
        map(tag_no_case(b"HEADER"), {
            let part = part.clone();
            move |_| Section::Header(part.clone())
        }),
        map(tag_no_case(b"TEXT"), move |_| Section::Text(part.clone())),
    ))(input)
}

/// `section-text = section-msgtext / "MIME"`
fn section_text(input: &[u8], part: Option<Part>) -> IMAPResult<Section> {
    if let (remaining, Some(_)) = opt(tag_no_case(b"MIME"))(input)? {
        // Safety: `section-text` only follows a part path.
        return Ok((remaining, Section::Mime(part.unwrap())));
    }

    section_msgtext(input, part)
}

/// `section-part = nz-number *("." nz-number)`
///
/// Stops before a trailing `.HEADER`/`.TEXT`/`.MIME`.
fn section_part(input: &[u8]) -> IMAPResult<Vec<NonZeroU32>> {
    separated_list1(tag(b"."), nz_number)(input)
}

/// `header-list = "(" header-fld-name *(SP header-fld-name) ")"`
fn header_list(input: &[u8]) -> IMAPResult<Vec1<AString>> {
    map(
        delimited(tag(b"("), separated_list1(sp, header_fld_name), tag(b")")),
        Vec1::unvalidated,
    )(input)
}

#[inline]
/// `header-fld-name = astring`
pub(crate) fn header_fld_name(input: &[u8]) -> IMAPResult<AString> {
    astring(input)
}

/// `fetch-modifiers = SP "(" fetch-modifier *(SP fetch-modifier) ")"`
/// (RFC 4466)
pub(crate) fn fetch_modifiers(input: &[u8]) -> IMAPResult<Vec<FetchModifier>> {
    preceded(
        sp,
        delimited(tag(b"("), separated_list1(sp, fetch_modifier), tag(b")")),
    )(input)
}

/// ```abnf
/// fetch-modifier = "CHANGEDSINCE" SP mod-sequence-value /  ; RFC 7162
///                  "VANISHED" /                            ; RFC 7162
///                  "PARTIAL" SP partial-range /            ; RFC 9394
///                  fetch-modifier-name [SP fetch-modif-params]
/// ```
fn fetch_modifier(input: &[u8]) -> IMAPResult<FetchModifier> {
    let (remaining, keyword) = uppercased_atom(input)?;

    match keyword.as_str() {
        "CHANGEDSINCE" => map(preceded(sp, number64), |n| {
            FetchModifier::ChangedSince(ModSeq::new(n))
        })(remaining),
        "VANISHED" => Ok((remaining, FetchModifier::Vanished)),
        "PARTIAL" => map(
            preceded(sp, crate::search::partial_range),
            FetchModifier::Partial,
        )(remaining),
        _ => {
            let (remaining_inner, params) = opt(preceded(sp, astring))(remaining)?;
            let (_, name) = atom(input)?;

            Ok((remaining_inner, FetchModifier::Other(name, params)))
        }
    }
}

// ----- message data items (response side) -----

/// `msg-att = "(" (msg-att-dynamic / msg-att-static)
///            *(SP (msg-att-dynamic / msg-att-static)) ")"`
pub(crate) fn msg_att(
    remaining_recursion: usize,
) -> impl Fn(&[u8]) -> IMAPResult<Vec1<MessageDataItem>> {
    move |input: &[u8]| {
        delimited(
            tag(b"("),
            map(
                separated_list1(sp, |i| msg_att_item(i, remaining_recursion)),
                Vec1::unvalidated,
            ),
            tag(b")"),
        )(input)
    }
}

/// One `msg-att-dynamic / msg-att-static` item, keyword-dispatched.
pub(crate) fn msg_att_item(
    input: &[u8],
    remaining_recursion: usize,
) -> IMAPResult<MessageDataItem> {
    let (remaining, keyword) = uppercased_atom(input)?;

    match keyword.as_str() {
        "FLAGS" => map(
            preceded(
                sp,
                delimited(
                    tag(b"("),
                    opt(separated_list1(sp, flag_fetch)),
                    tag(b")"),
                ),
            ),
            |flags| MessageDataItem::Flags(flags.unwrap_or_default()),
        )(remaining),
        "ENVELOPE" => map(preceded(sp, envelope), MessageDataItem::Envelope)(remaining),
        "INTERNALDATE" => map(preceded(sp, date_time), MessageDataItem::InternalDate)(remaining),
        "RFC822" => map(preceded(sp, nstring), MessageDataItem::Rfc822)(remaining),
        "RFC822.HEADER" => map(preceded(sp, nstring), MessageDataItem::Rfc822Header)(remaining),
        "RFC822.TEXT" => map(preceded(sp, nstring), MessageDataItem::Rfc822Text)(remaining),
        "RFC822.SIZE" => map(preceded(sp, number), MessageDataItem::Rfc822Size)(remaining),
        "BODYSTRUCTURE" => map(
            preceded(sp, body(remaining_recursion)),
            MessageDataItem::BodyStructure,
        )(remaining),
        "BODY" => match opt(peek(tag(b"[")))(remaining)? {
            (remaining, Some(_)) => map(
                tuple((
                    section,
                    opt(delimited(tag(b"<"), number, tag(b">"))),
                    sp,
                    nstring,
                )),
                |(section, origin, _, data)| MessageDataItem::BodyExt {
                    section,
                    origin,
                    data,
                },
            )(remaining),
            (remaining, None) => map(
                preceded(sp, body(remaining_recursion)),
                MessageDataItem::Body,
            )(remaining),
        },
        "UID" => map(preceded(sp, nz_number), |n| {
            MessageDataItem::Uid(Uid::from(n))
        })(remaining),
        "MODSEQ" => map(
            preceded(sp, delimited(tag(b"("), number64, tag(b")"))),
            |n| MessageDataItem::ModSeq(ModSeq::new(n)),
        )(remaining),
        "BINARY" => map(
            tuple((
                section_binary,
                opt(delimited(tag(b"<"), number, tag(b">"))),
                sp,
                alt((
                    nstring,
                    map(preceded(tag(b"~"), literal), |literal| {
                        NString(Some(IString::Literal(literal)))
                    }),
                )),
            )),
            |(section, origin, _, data)| MessageDataItem::Binary {
                section,
                origin,
                data,
            },
        )(remaining),
        "BINARY.SIZE" => map(
            tuple((section_binary, sp, number)),
            |(section, _, size)| MessageDataItem::BinarySize { section, size },
        )(remaining),
        "EMAILID" => map(preceded(sp, objectid_par), MessageDataItem::EmailId)(remaining),
        "THREADID" => map(
            preceded(
                sp,
                alt((
                    map(objectid_par, Some),
                    value(None, crate::core::nil),
                )),
            ),
            MessageDataItem::ThreadId,
        )(remaining),
        "PREVIEW" => map(preceded(sp, nstring), MessageDataItem::Preview)(remaining),
        "X-GM-MSGID" => map(preceded(sp, number64), MessageDataItem::GmailMessageId)(remaining),
        "X-GM-THRID" => map(preceded(sp, number64), MessageDataItem::GmailThreadId)(remaining),
        "X-GM-LABELS" => map(preceded(sp, gmail_labels), MessageDataItem::GmailLabels)(remaining),
        _ => unknown_keyword(input),
    }
}

/// `x-gm-labels = "(" [gm-label *(SP gm-label)] ")"` where a label is a
/// backslash-prefixed atom (`\Inbox`) or an astring.
fn gmail_labels(input: &[u8]) -> IMAPResult<Vec<String>> {
    delimited(
        tag(b"("),
        map(
            opt(separated_list1(
                sp,
                alt((
                    map(preceded(tag(b"\\"), atom), |label| {
                        format!("\\{}", label.inner())
                    }),
                    map(astring, |label| {
                        String::from_utf8_lossy(label.as_bytes()).into_owned()
                    }),
                )),
            )),
            Option::unwrap_or_default,
        ),
        tag(b")"),
    )(input)
}

#[cfg(test)]
mod tests {
    use imap_ast::core::AtomExt;

    use super::*;

    #[test]
    fn test_fetch_att_simple() {
        let tests: &[(&[u8], FetchAttribute)] = &[
            (b"ENVELOPE?", FetchAttribute::Envelope),
            (b"FLAGS?", FetchAttribute::Flags),
            (b"INTERNALDATE?", FetchAttribute::InternalDate),
            (b"RFC822?", FetchAttribute::Rfc822),
            (b"RFC822.HEADER?", FetchAttribute::Rfc822Header),
            (b"RFC822.SIZE?", FetchAttribute::Rfc822Size),
            (b"RFC822.TEXT?", FetchAttribute::Rfc822Text),
            (b"BODY?", FetchAttribute::Body),
            (b"BODYSTRUCTURE?", FetchAttribute::BodyStructure),
            (b"UID?", FetchAttribute::Uid),
            (b"MODSEQ?", FetchAttribute::ModSeq),
            (b"X-GM-MSGID?", FetchAttribute::GmailMessageId),
        ];

        for (input, expected) in tests {
            let (rem, got) = fetch_att(input).unwrap();
            assert_eq!(&got, expected);
            assert_eq!(rem, b"?");
        }
    }

    #[test]
    fn test_fetch_att_body_sections() {
        let (rem, got) = fetch_att(b"BODY[]?").unwrap();
        assert_eq!(rem, b"?");
        assert_eq!(
            got,
            FetchAttribute::BodyExt {
                section: None,
                partial: None,
                peek: false,
            }
        );

        let (_, got) = fetch_att(b"BODY.PEEK[TEXT]<42.1337>?").unwrap();
        assert_eq!(
            got,
            FetchAttribute::BodyExt {
                section: Some(Section::Text(None)),
                partial: Some((42, 1337.try_into().unwrap())),
                peek: true,
            }
        );

        let (_, got) = fetch_att(b"BODY[1.2.3.HEADER]?").unwrap();
        assert_eq!(
            got,
            FetchAttribute::BodyExt {
                section: Some(Section::Header(Some(Part(Vec1::unvalidated(vec![
                    1.try_into().unwrap(),
                    2.try_into().unwrap(),
                    3.try_into().unwrap(),
                ]))))),
                partial: None,
                peek: false,
            }
        );

        let (_, got) = fetch_att(b"BODY[HEADER.FIELDS (SUBJECT FROM)]?").unwrap();
        assert_eq!(
            got,
            FetchAttribute::BodyExt {
                section: Some(Section::HeaderFields(
                    None,
                    Vec1::unvalidated(vec![
                        AString::Atom(AtomExt::try_from("SUBJECT").unwrap()),
                        AString::Atom(AtomExt::try_from("FROM").unwrap()),
                    ])
                )),
                partial: None,
                peek: false,
            }
        );
    }

    #[test]
    fn test_fetch_att_binary() {
        let (_, got) = fetch_att(b"BINARY.PEEK[1.2]<0.1024>?").unwrap();
        assert_eq!(
            got,
            FetchAttribute::Binary {
                section: vec![1.try_into().unwrap(), 2.try_into().unwrap()],
                partial: Some((0, 1024.try_into().unwrap())),
                peek: true,
            }
        );

        let (_, got) = fetch_att(b"BINARY.SIZE[1]?").unwrap();
        assert_eq!(
            got,
            FetchAttribute::BinarySize {
                section: vec![1.try_into().unwrap()],
            }
        );
    }

    #[test]
    fn test_fetch_att_preview() {
        let (_, got) = fetch_att(b"PREVIEW?").unwrap();
        assert_eq!(got, FetchAttribute::Preview { lazy: false });

        let (_, got) = fetch_att(b"PREVIEW (LAZY)?").unwrap();
        assert_eq!(got, FetchAttribute::Preview { lazy: true });
    }

    #[test]
    fn test_section_part_plain() {
        let (rem, got) = section(b"[1.2]?").unwrap();
        assert_eq!(rem, b"?");
        assert_eq!(
            got,
            Some(Section::Part(Part(Vec1::unvalidated(vec![
                1.try_into().unwrap(),
                2.try_into().unwrap(),
            ]))))
        );
    }

    #[test]
    fn test_msg_att() {
        let (rem, items) =
            msg_att(8)(b"(UID 42 FLAGS (\\Seen) RFC822.SIZE 3456)\r\n").unwrap();
        assert_eq!(rem, b"\r\n");
        assert_eq!(items.len(), 3);
        assert_eq!(items.as_ref()[0], MessageDataItem::Uid(Uid::new(42).unwrap()));
        assert_eq!(items.as_ref()[2], MessageDataItem::Rfc822Size(3456));
    }

    #[test]
    fn test_msg_att_modseq() {
        let (_, items) = msg_att(8)(b"(MODSEQ (624140003))\r\n").unwrap();
        assert_eq!(
            items.as_ref()[0],
            MessageDataItem::ModSeq(ModSeq::new(624140003))
        );
    }

    #[test]
    fn test_msg_att_gmail_labels() {
        let (_, items) = msg_att(8)(b"(X-GM-LABELS (\\Inbox \"custom\"))\r\n").unwrap();
        assert_eq!(
            items.as_ref()[0],
            MessageDataItem::GmailLabels(vec!["\\Inbox".into(), "custom".into()])
        );
    }

    #[test]
    fn test_msg_att_body_ext_nil() {
        let (_, items) = msg_att(8)(b"(BODY[TEXT] NIL)\r\n").unwrap();
        assert_eq!(
            items.as_ref()[0],
            MessageDataItem::BodyExt {
                section: Some(Section::Text(None)),
                origin: None,
                data: NString(None),
            }
        );
    }
}
