//! BODY/BODYSTRUCTURE rules.
//!
//! Body structures nest through `MESSAGE/RFC822` parts and multiparts, so
//! the entry point carries a remaining-recursion budget.

use abnf_core::streaming::sp;
use imap_ast::{
    body::{
        BasicFields, Body, BodyExtension, BodyStructure, Disposition, Language, Location,
        MultiPartExtensionData, SinglePartExtensionData, SpecificFields,
    },
    core::{IString, NString, Quoted, Vec1},
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt, value},
    multi::{many1, separated_list1},
    sequence::{delimited, preceded, tuple},
};

use crate::{
    core::{nil, nstring, number, string},
    decode::{IMAPErrorKind, IMAPParseError, IMAPResult},
    envelope::envelope,
};

/// `body = "(" (body-type-1part / body-type-mpart) ")"`
pub(crate) fn body(remaining_recursion: usize) -> impl Fn(&[u8]) -> IMAPResult<BodyStructure> {
    move |input: &[u8]| body_limited(input, remaining_recursion)
}

fn body_limited(input: &[u8], remaining_recursion: usize) -> IMAPResult<BodyStructure> {
    if remaining_recursion == 0 {
        return Err(nom::Err::Failure(IMAPParseError {
            input,
            kind: IMAPErrorKind::RecursionLimitExceeded,
        }));
    }

    let body_type_1part =
        move |input| body_type_1part_limited(input, remaining_recursion.saturating_sub(1));
    let body_type_mpart =
        move |input| body_type_mpart_limited(input, remaining_recursion.saturating_sub(1));

    delimited(
        tag(b"("),
        alt((body_type_1part, body_type_mpart)),
        tag(b")"),
    )(input)
}

/// `body-type-1part = (body-type-msg / body-type-text / body-type-basic)
///                    [SP body-ext-1part]`
fn body_type_1part_limited(input: &[u8], remaining_recursion: usize) -> IMAPResult<BodyStructure> {
    let body_type_msg =
        move |input| body_type_msg_limited(input, remaining_recursion.saturating_sub(1));

    let mut parser = tuple((
        alt((body_type_msg, body_type_text, body_type_basic)),
        opt(preceded(sp, body_ext_1part)),
    ));

    let (remaining, (body, extension_data)) = parser(input)?;

    Ok((
        remaining,
        BodyStructure::Single {
            body,
            extension_data,
        },
    ))
}

/// `body-type-msg = media-message SP body-fields SP envelope SP body SP
///                  body-fld-lines`
fn body_type_msg_limited(input: &[u8], remaining_recursion: usize) -> IMAPResult<Body> {
    let body = move |input| body_limited(input, remaining_recursion);

    let mut parser = tuple((
        tag_no_case(b"\"MESSAGE\" \"RFC822\""),
        sp,
        body_fields,
        sp,
        envelope,
        sp,
        body,
        sp,
        number,
    ));

    let (remaining, (_, _, basic, _, envelope, _, body_structure, _, number_of_lines)) =
        parser(input)?;

    Ok((
        remaining,
        Body {
            basic,
            specific: SpecificFields::Message {
                envelope: Box::new(envelope),
                body_structure: Box::new(body_structure),
                number_of_lines,
            },
        },
    ))
}

/// `body-type-text = media-text SP body-fields SP body-fld-lines`
fn body_type_text(input: &[u8]) -> IMAPResult<Body> {
    let mut parser = tuple((
        tag_no_case(b"\"TEXT\""),
        sp,
        string,
        sp,
        body_fields,
        sp,
        number,
    ));

    let (remaining, (_, _, subtype, _, basic, _, number_of_lines)) = parser(input)?;

    Ok((
        remaining,
        Body {
            basic,
            specific: SpecificFields::Text {
                subtype,
                number_of_lines,
            },
        },
    ))
}

/// `body-type-basic = media-basic SP body-fields`
fn body_type_basic(input: &[u8]) -> IMAPResult<Body> {
    let mut parser = tuple((string, sp, string, sp, body_fields));

    let (remaining, (r#type, _, subtype, _, basic)) = parser(input)?;

    Ok((
        remaining,
        Body {
            basic,
            specific: SpecificFields::Basic { r#type, subtype },
        },
    ))
}

/// `body-type-mpart = 1*body SP media-subtype [SP body-ext-mpart]`
fn body_type_mpart_limited(input: &[u8], remaining_recursion: usize) -> IMAPResult<BodyStructure> {
    let body = move |input| body_limited(input, remaining_recursion);

    let mut parser = tuple((
        many1(body),
        sp,
        string,
        opt(preceded(sp, body_ext_mpart)),
    ));

    let (remaining, (bodies, _, subtype, extension_data)) = parser(input)?;

    Ok((
        remaining,
        BodyStructure::Multi {
            bodies: Vec1::unvalidated(bodies),
            subtype,
            extension_data,
        },
    ))
}

/// `body-fields = body-fld-param SP body-fld-id SP body-fld-desc SP
///                body-fld-enc SP body-fld-octets`
fn body_fields(input: &[u8]) -> IMAPResult<BasicFields> {
    let mut parser = tuple((
        body_fld_param,
        sp,
        nstring,
        sp,
        nstring,
        sp,
        nstring,
        sp,
        number,
    ));

    let (remaining, (parameter_list, _, id, _, description, _, enc, _, size)) = parser(input)?;

    // `body-fld-enc` is `string` per the grammar, but NIL has been seen
    // in the wild (Tika, some Exchange builds).
    let content_transfer_encoding = match enc.0 {
        Some(enc) => enc,
        None => {
            log::warn!("Rectified NIL content-transfer-encoding to \"\"");

            IString::Quoted(Quoted::unvalidated(""))
        }
    };

    Ok((
        remaining,
        BasicFields {
            parameter_list,
            id,
            description,
            content_transfer_encoding,
            size,
        },
    ))
}

/// `body-fld-param = "(" string SP string *(SP string SP string) ")" / nil`
///
/// The value side admits NIL (Mail.ru sends `("boundary" NIL)`).
fn body_fld_param(input: &[u8]) -> IMAPResult<Vec<(IString, NString)>> {
    alt((
        delimited(
            tag(b"("),
            separated_list1(
                sp,
                map(tuple((string, sp, nstring)), |(key, _, value)| (key, value)),
            ),
            tag(b")"),
        ),
        value(Vec::new(), nil),
    ))(input)
}

/// `body-ext-1part = body-fld-md5
///                   [SP body-fld-dsp [SP body-fld-lang [SP body-fld-loc
///                   *(SP body-extension)]]]`
fn body_ext_1part(input: &[u8]) -> IMAPResult<SinglePartExtensionData> {
    let mut parser = tuple((nstring, opt(preceded(sp, body_fld_dsp))));

    let (remaining, (md5, tail)) = parser(input)?;

    Ok((remaining, SinglePartExtensionData { md5, tail }))
}

/// `body-ext-mpart = body-fld-param
///                   [SP body-fld-dsp [SP body-fld-lang [SP body-fld-loc
///                   *(SP body-extension)]]]`
fn body_ext_mpart(input: &[u8]) -> IMAPResult<MultiPartExtensionData> {
    let mut parser = tuple((body_fld_param, opt(preceded(sp, body_fld_dsp))));

    let (remaining, (parameter_list, tail)) = parser(input)?;

    Ok((
        remaining,
        MultiPartExtensionData {
            parameter_list,
            tail,
        },
    ))
}

/// `body-fld-dsp = "(" string SP body-fld-param ")" / nil`, followed by
/// the optional language tail.
fn body_fld_dsp(input: &[u8]) -> IMAPResult<Disposition> {
    let mut parser = tuple((
        alt((
            map(
                delimited(
                    tag(b"("),
                    tuple((string, sp, body_fld_param)),
                    tag(b")"),
                ),
                |(disposition, _, parameters)| Some((disposition, parameters)),
            ),
            value(None, nil),
        )),
        opt(preceded(sp, body_fld_lang)),
    ));

    let (remaining, (disposition, tail)) = parser(input)?;

    Ok((remaining, Disposition { disposition, tail }))
}

/// `body-fld-lang = nstring / "(" string *(SP string) ")"`, followed by
/// the optional location tail.
fn body_fld_lang(input: &[u8]) -> IMAPResult<Language> {
    let mut parser = tuple((
        alt((
            delimited(tag(b"("), separated_list1(sp, string), tag(b")")),
            map(nstring, |lang| match lang.0 {
                Some(lang) => vec![lang],
                None => vec![],
            }),
        )),
        opt(preceded(sp, body_fld_loc)),
    ));

    let (remaining, (language, tail)) = parser(input)?;

    Ok((remaining, Language { language, tail }))
}

/// `body-fld-loc = nstring`, followed by `*(SP body-extension)`.
fn body_fld_loc(input: &[u8]) -> IMAPResult<Location> {
    let mut parser = tuple((
        nstring,
        nom::multi::many0(preceded(sp, body_extension(8))),
    ));

    let (remaining, (location, extensions)) = parser(input)?;

    Ok((remaining, Location {
        location,
        extensions,
    }))
}

/// `body-extension = nstring / number /
///                   "(" body-extension *(SP body-extension) ")"`
fn body_extension(remaining_recursion: usize) -> impl Fn(&[u8]) -> IMAPResult<BodyExtension> {
    move |input: &[u8]| body_extension_limited(input, remaining_recursion)
}

fn body_extension_limited(input: &[u8], remaining_recursion: usize) -> IMAPResult<BodyExtension> {
    if remaining_recursion == 0 {
        return Err(nom::Err::Failure(IMAPParseError {
            input,
            kind: IMAPErrorKind::RecursionLimitExceeded,
        }));
    }

    let body_extension =
        move |input| body_extension_limited(input, remaining_recursion.saturating_sub(1));

    alt((
        map(number, BodyExtension::Number),
        map(nstring, BodyExtension::NString),
        map(
            delimited(tag(b"("), separated_list1(sp, body_extension), tag(b")")),
            |extensions| BodyExtension::List(Vec1::unvalidated(extensions)),
        ),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_type_text() {
        let input = b"(\"TEXT\" \"plain\" NIL NIL NIL \"7bit\" 2279 48)x";
        let (rem, val) = body(8)(input).unwrap();
        assert_eq!(rem, b"x");

        let BodyStructure::Single { body, extension_data } = val else {
            panic!("expected single part");
        };
        assert!(extension_data.is_none());
        assert_eq!(body.basic.size, 2279);
        assert!(matches!(
            body.specific,
            SpecificFields::Text { number_of_lines: 48, .. }
        ));
    }

    #[test]
    fn test_body_type_basic_with_extensions() {
        let input =
            b"(\"application\" \"pdf\" (\"name\" \"a.pdf\") NIL NIL \"base64\" 4096 \"md5\" NIL NIL NIL)x";
        let (rem, val) = body(8)(input).unwrap();
        assert_eq!(rem, b"x");

        let BodyStructure::Single { body, extension_data } = val else {
            panic!("expected single part");
        };
        assert_eq!(body.basic.parameter_list.len(), 1);
        assert!(extension_data.is_some());
    }

    #[test]
    fn test_body_type_mpart() {
        let input = b"((\"TEXT\" \"plain\" NIL NIL NIL \"7bit\" 4 1)(\"TEXT\" \"html\" NIL NIL NIL \"7bit\" 8 1) \"mixed\")x";
        let (rem, val) = body(8)(input).unwrap();
        assert_eq!(rem, b"x");

        let BodyStructure::Multi { bodies, subtype, .. } = val else {
            panic!("expected multipart");
        };
        assert_eq!(bodies.len(), 2);
        assert_eq!(subtype.as_bytes(), b"mixed");
    }

    #[test]
    fn test_body_recursion_limit() {
        // A multipart that nests past the budget.
        let mut input = Vec::new();
        for _ in 0..20 {
            input.extend_from_slice(b"(");
        }

        assert!(matches!(
            body(8)(&input),
            Err(nom::Err::Failure(IMAPParseError {
                kind: IMAPErrorKind::RecursionLimitExceeded,
                ..
            }))
        ));
    }

    #[test]
    fn test_nil_content_transfer_encoding_is_rectified() {
        let input = b"(\"TEXT\" \"plain\" NIL NIL NIL NIL 5 1)x";
        let (_, val) = body(8)(input).unwrap();

        let BodyStructure::Single { body, .. } = val else {
            panic!("expected single part");
        };
        assert_eq!(body.basic.content_transfer_encoding.as_bytes(), b"");
    }
}
