//! Response rules.
//!
//! Everything a server sends: continuation requests, untagged data and
//! conditional states (the greeting included), and tagged completions.
//! Response-text codes are dispatched through a keyword table; unknown or
//! malformed codes degrade to [`Code::Other`] instead of failing the
//! whole response.

use abnf_core::streaming::crlf_relaxed as crlf;
use abnf_core::streaming::sp;
use imap_ast::response::{
    Capability, Code, CodeOther, ContinuationRequest, Data, Response, ResponseText, StatusKind,
    TaggedResponse, UntaggedStatus,
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case, take_while1},
    combinator::{map, opt, peek, value},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, preceded, terminated, tuple},
};

use crate::{
    core::{
        astring, atom, base64, charset, nil, number, number64, nz_number, quoted_char, tag_imap,
        text, unknown_keyword, uppercased_atom,
    },
    decode::{IMAPResult, ParserOptions},
    extensions::{
        id::id_parameters,
        metadata::{metadata_code, metadata_resp_payload},
        namespace::namespace_response_payload,
        objectid::objectid_par,
        quota::quota_list,
        urlauth::urlfetch_items,
    },
    fetch::msg_att,
    flag::{flag_list, flag_perm, mbx_list_flags},
    mailbox::mailbox,
    search::esearch_response,
    sequence::{seq_set, uid_set},
    status::status_att_list,
};

/// Any server-to-client message.
pub(crate) fn response<'a>(input: &'a [u8], options: &ParserOptions) -> IMAPResult<'a, Response> {
    alt((
        map(continue_req, Response::ContinuationRequest),
        |i| response_data(i, options),
        response_tagged,
    ))(input)
}

/// `continue-req = "+" SP (resp-text / base64) CRLF`
///
/// A bare `+` CRLF (no space, no text) is tolerated; some servers send it
/// when they have nothing to say.
fn continue_req(input: &[u8]) -> IMAPResult<ContinuationRequest> {
    let (remaining, _) = tag(b"+")(input)?;

    if let (remaining, Some(_)) = opt(crlf)(remaining)? {
        log::warn!("Tolerated empty continuation request");

        return Ok((
            remaining,
            ContinuationRequest::Basic(ResponseText {
                code: None,
                text: String::new(),
            }),
        ));
    }

    delimited(
        sp,
        alt((
            // A line that decodes as base64 in its entirety is a server
            // challenge; everything else is human-readable text.
            map(terminated(base64, peek(crlf)), ContinuationRequest::Base64),
            map(resp_text, ContinuationRequest::Basic),
        )),
        crlf,
    )(remaining)
}

/// `resp-text = ["[" resp-text-code "]" SP] text`
///
/// Two deviations, both widespread on real servers (iCloud, Oracle):
/// the space after `]` may be missing, and the text itself may be
/// missing entirely.
pub(crate) fn resp_text(input: &[u8]) -> IMAPResult<ResponseText> {
    // When the text starts with "[", we insist on parsing a code.
    // Otherwise, a broken code could be interpreted as text.
    let (_, start) = opt(tag(b"["))(input)?;

    if start.is_some() {
        let (remaining, code) = preceded(
            tag(b"["),
            alt((
                terminated(resp_text_code, tag(b"]")),
                terminated(other_code, tag(b"]")),
            )),
        )(input)?;

        let (remaining, _) = opt(sp)(remaining)?;
        let (remaining, trailing) = opt(text)(remaining)?;

        let text = match trailing {
            Some(text) => text.inner().to_owned(),
            None => {
                log::debug!("Tolerated missing text after response code");

                String::new()
            }
        };

        Ok((
            remaining,
            ResponseText {
                code: Some(code),
                text,
            },
        ))
    } else {
        map(text, |text| ResponseText {
            code: None,
            text: text.inner().to_owned(),
        })(input)
    }
}

/// ```abnf
/// resp-text-code = "ALERT" / "BADCHARSET" [SP "(" charset *(SP charset) ")"] /
///                  capability-data / "PARSE" /
///                  "PERMANENTFLAGS" SP "(" [flag-perm *(SP flag-perm)] ")" /
///                  "READ-ONLY" / "READ-WRITE" / "TRYCREATE" /
///                  "UIDNEXT" SP nz-number / "UIDVALIDITY" SP nz-number /
///                  "UNSEEN" SP nz-number /
///                  "REFERRAL" SP url /               ; RFC 2221
///                  "COMPRESSIONACTIVE" /             ; RFC 4978
///                  "OVERQUOTA" /                     ; RFC 9208
///                  "TOOBIG" /                        ; RFC 4469
///                  "METADATA" SP ... /               ; RFC 5464
///                  "UNKNOWN-CTE" /                   ; RFC 3516
///                  "APPENDUID" SP nz-number SP append-uid / ; RFC 4315
///                  "COPYUID" SP nz-number SP uid-set SP uid-set /
///                  "UIDNOTSTICKY" /
///                  "NOMODSEQ" / "HIGHESTMODSEQ" SP mod-sequence-value /
///                  "MODIFIED" SP sequence-set / "CLOSED" /   ; RFC 7162
///                  "NOTSAVED" /                      ; RFC 5182
///                  "URLMECH" SP mechanisms /         ; RFC 4467
///                  "MAILBOXID" SP "(" objectid ")" / ; RFC 8474
///                  response codes of RFC 5530 /
///                  atom [SP 1*<any TEXT-CHAR except "]">]
/// ```
fn resp_text_code(input: &[u8]) -> IMAPResult<Code> {
    let (remaining, keyword) = uppercased_atom(input)?;

    match keyword.as_str() {
        "ALERT" => Ok((remaining, Code::Alert)),
        "BADCHARSET" => map(
            opt(preceded(
                sp,
                delimited(tag(b"("), separated_list1(sp, charset), tag(b")")),
            )),
            |allowed| Code::BadCharset {
                allowed: allowed.unwrap_or_default(),
            },
        )(remaining),
        "CAPABILITY" => map(many1(preceded(sp, capability)), |capabilities| {
            Code::Capability(imap_ast::core::Vec1::unvalidated(capabilities))
        })(remaining),
        "PARSE" => Ok((remaining, Code::Parse)),
        "PERMANENTFLAGS" => map(
            preceded(
                sp,
                delimited(
                    tag(b"("),
                    opt(separated_list1(sp, flag_perm)),
                    tag(b")"),
                ),
            ),
            |flags| Code::PermanentFlags(flags.unwrap_or_default()),
        )(remaining),
        "READ-ONLY" => Ok((remaining, Code::ReadOnly)),
        "READ-WRITE" => Ok((remaining, Code::ReadWrite)),
        "TRYCREATE" => Ok((remaining, Code::TryCreate)),
        "UIDNEXT" => map(preceded(sp, nz_number), |n| Code::UidNext(n.into()))(remaining),
        "UIDVALIDITY" => {
            map(preceded(sp, nz_number), |n| Code::UidValidity(n.into()))(remaining)
        }
        "UNSEEN" => map(preceded(sp, nz_number), |n| Code::Unseen(n.into()))(remaining),
        "REFERRAL" => map(preceded(sp, code_argument_text), Code::Referral)(remaining),
        "COMPRESSIONACTIVE" => Ok((remaining, Code::CompressionActive)),
        "OVERQUOTA" => Ok((remaining, Code::OverQuota)),
        "TOOBIG" => Ok((remaining, Code::TooBig)),
        "METADATA" => map(preceded(sp, metadata_code), Code::Metadata)(remaining),
        "UNKNOWN-CTE" => Ok((remaining, Code::UnknownCte)),
        "APPENDUID" => map(
            tuple((preceded(sp, nz_number), preceded(sp, uid_set))),
            |(uid_validity, uids)| Code::AppendUid {
                uid_validity: uid_validity.into(),
                uids,
            },
        )(remaining),
        "COPYUID" => map(
            tuple((
                preceded(sp, nz_number),
                preceded(sp, uid_set),
                preceded(sp, uid_set),
            )),
            |(uid_validity, source, destination)| Code::CopyUid {
                uid_validity: uid_validity.into(),
                source,
                destination,
            },
        )(remaining),
        "UIDNOTSTICKY" => Ok((remaining, Code::UidNotSticky)),
        "NOMODSEQ" => Ok((remaining, Code::NoModSeq)),
        "HIGHESTMODSEQ" => map(preceded(sp, number64), |n| {
            Code::HighestModSeq(imap_ast::identifier::ModSeq::new(n))
        })(remaining),
        "MODIFIED" => map(preceded(sp, seq_set), Code::Modified)(remaining),
        "CLOSED" => Ok((remaining, Code::Closed)),
        "NOTSAVED" => Ok((remaining, Code::NotSaved)),
        "URLMECH" => map(preceded(sp, code_argument_text), Code::UrlMech)(remaining),
        "MAILBOXID" => map(preceded(sp, objectid_par), Code::MailboxId)(remaining),
        "ALREADYEXISTS" => Ok((remaining, Code::AlreadyExists)),
        "AUTHENTICATIONFAILED" => Ok((remaining, Code::AuthenticationFailed)),
        "AUTHORIZATIONFAILED" => Ok((remaining, Code::AuthorizationFailed)),
        "CANNOT" => Ok((remaining, Code::Cannot)),
        "CLIENTBUG" => Ok((remaining, Code::ClientBug)),
        "CONTACTADMIN" => Ok((remaining, Code::ContactAdmin)),
        "CORRUPTION" => Ok((remaining, Code::Corruption)),
        "EXPIRED" => Ok((remaining, Code::Expired)),
        "EXPUNGEISSUED" => Ok((remaining, Code::ExpungeIssued)),
        "INUSE" => Ok((remaining, Code::InUse)),
        "LIMIT" => Ok((remaining, Code::Limit)),
        "NONEXISTENT" => Ok((remaining, Code::NonExistent)),
        "NOPERM" => Ok((remaining, Code::NoPerm)),
        "PRIVACYREQUIRED" => Ok((remaining, Code::PrivacyRequired)),
        "SERVERBUG" => Ok((remaining, Code::ServerBug)),
        "UNAVAILABLE" => Ok((remaining, Code::Unavailable)),
        "USEATTR" => Ok((remaining, Code::UseAttr)),
        _ => unknown_keyword(input),
    }
}

/// Everything up to the closing `]`, for codes whose argument is free
/// text (REFERRAL URLs, URLMECH mechanism lists).
fn code_argument_text(input: &[u8]) -> IMAPResult<String> {
    map(
        take_while1(|b: u8| b != b']' && b != b'\r' && b != b'\n'),
        |bytes: &[u8]| {
            // Safety: the predicate admits no control bytes we can't
            // losslessly keep; anything non-UTF-8 is replaced.
            String::from_utf8_lossy(bytes).into_owned()
        },
    )(input)
}

/// The degradation path: an unrecognized (or malformed) code is kept as
/// its atom plus raw arguments.
fn other_code(input: &[u8]) -> IMAPResult<Code> {
    map(
        tuple((atom, opt(preceded(sp, code_argument_text)))),
        |(atom, arguments)| Code::Other(CodeOther { atom, arguments }),
    )(input)
}

/// `capability = ("AUTH=" auth-type) / atom`
fn capability(input: &[u8]) -> IMAPResult<Capability> {
    map(atom, Capability::from)(input)
}

/// `response-data = "*" SP (resp-cond-state / resp-cond-bye /
///                  mailbox-data / message-data / capability-data / ...)
///                  CRLF`
fn response_data<'a>(input: &'a [u8], options: &ParserOptions) -> IMAPResult<'a, Response> {
    delimited(tag(b"* "), |i| response_payload(i, options), crlf)(input)
}

fn response_payload<'a>(input: &'a [u8], options: &ParserOptions) -> IMAPResult<'a, Response> {
    // `nz-number SP (EXPUNGE / EXISTS / RECENT / FETCH ...)` first: a
    // number is an atom lexically and would confuse the keyword table.
    if input.first().is_some_and(u8::is_ascii_digit) {
        return numbered_payload(input, options);
    }

    let (remaining, keyword) = uppercased_atom(input)?;

    match keyword.as_str() {
        "OK" => map(preceded(sp, resp_text), |text| {
            Response::Status(UntaggedStatus::Ok(text))
        })(remaining),
        "NO" => map(preceded(sp, resp_text), |text| {
            Response::Status(UntaggedStatus::No(text))
        })(remaining),
        "BAD" => map(preceded(sp, resp_text), |text| {
            Response::Status(UntaggedStatus::Bad(text))
        })(remaining),
        "PREAUTH" => map(preceded(sp, resp_text), |text| {
            Response::Status(UntaggedStatus::PreAuth(text))
        })(remaining),
        "BYE" => map(preceded(sp, resp_text), |text| {
            Response::Status(UntaggedStatus::Bye(text))
        })(remaining),
        "CAPABILITY" => map(many1(preceded(sp, capability)), |capabilities| {
            Response::Data(Data::Capability(imap_ast::core::Vec1::unvalidated(
                capabilities,
            )))
        })(remaining),
        "FLAGS" => map(preceded(sp, flag_list), |flags| {
            Response::Data(Data::Flags(flags))
        })(remaining),
        "LIST" => map(preceded(sp, mailbox_list), |(items, delimiter, mailbox)| {
            Response::Data(Data::List {
                items,
                delimiter,
                mailbox,
            })
        })(remaining),
        "LSUB" => map(preceded(sp, mailbox_list), |(items, delimiter, mailbox)| {
            Response::Data(Data::Lsub {
                items,
                delimiter,
                mailbox,
            })
        })(remaining),
        "SEARCH" => search_data(remaining),
        "ESEARCH" => map(esearch_response, |esearch| {
            Response::Data(Data::Esearch(esearch))
        })(remaining),
        "STATUS" => map(
            tuple((
                preceded(sp, mailbox),
                preceded(
                    sp,
                    delimited(tag(b"("), opt(status_att_list), tag(b")")),
                ),
            )),
            |(mailbox, items)| {
                Response::Data(Data::Status {
                    mailbox,
                    items: items.unwrap_or_default(),
                })
            },
        )(remaining),
        "VANISHED" => map(
            tuple((
                map(opt(preceded(sp, tag_no_case(b"(EARLIER)"))), |e| {
                    e.is_some()
                }),
                preceded(sp, uid_set),
            )),
            |(earlier, uids)| Response::Data(Data::Vanished { earlier, uids }),
        )(remaining),
        "ENABLED" => map(many0(preceded(sp, capability)), |capabilities| {
            Response::Data(Data::Enabled { capabilities })
        })(remaining),
        "ID" => map(preceded(sp, id_parameters), |parameters| {
            Response::Data(Data::Id { parameters })
        })(remaining),
        "NAMESPACE" => map(preceded(sp, namespace_response_payload), |namespace| {
            Response::Data(Data::Namespace(namespace))
        })(remaining),
        "QUOTA" => map(
            tuple((preceded(sp, astring), preceded(sp, quota_list))),
            |(root, quotas)| Response::Data(Data::Quota { root, quotas }),
        )(remaining),
        "QUOTAROOT" => map(
            tuple((preceded(sp, mailbox), many0(preceded(sp, astring)))),
            |(mailbox, roots)| Response::Data(Data::QuotaRoot { mailbox, roots }),
        )(remaining),
        "METADATA" => map(
            tuple((preceded(sp, mailbox), preceded(sp, metadata_resp_payload))),
            |(mailbox, value)| Response::Data(Data::Metadata { mailbox, value }),
        )(remaining),
        "GENURLAUTH" => map(many1(preceded(sp, astring)), |urls| {
            Response::Data(Data::GenUrlAuth(imap_ast::core::Vec1::unvalidated(urls)))
        })(remaining),
        "URLFETCH" => map(urlfetch_items, |items| {
            Response::Data(Data::UrlFetch(items))
        })(remaining),
        _ => unknown_keyword(input),
    }
}

/// `message-data = nz-number SP ("EXPUNGE" / ("FETCH" SP msg-att)) /
///  mailbox-data =/ number SP ("EXISTS" / "RECENT")`
fn numbered_payload<'a>(input: &'a [u8], options: &ParserOptions) -> IMAPResult<'a, Response> {
    let (remaining, n) = terminated(number, sp)(input)?;
    let (remaining, keyword) = uppercased_atom(remaining)?;

    match keyword.as_str() {
        "EXISTS" => Ok((remaining, Response::Data(Data::Exists(n)))),
        "RECENT" => Ok((remaining, Response::Data(Data::Recent(n)))),
        "EXPUNGE" => {
            let seq = nonzero(input, n)?;

            Ok((remaining, Response::Data(Data::Expunge(seq.into()))))
        }
        "FETCH" => {
            let seq = nonzero(input, n)?;

            map(preceded(sp, msg_att(options.max_depth)), move |items| {
                Response::Data(Data::Fetch {
                    seq: seq.into(),
                    items,
                })
            })(remaining)
        }
        _ => unknown_keyword(input),
    }
}

fn nonzero(
    input: &[u8],
    n: u32,
) -> Result<std::num::NonZeroU32, nom::Err<crate::decode::IMAPParseError<&[u8]>>> {
    std::num::NonZeroU32::new(n).ok_or(nom::Err::Error(crate::decode::IMAPParseError {
        input,
        kind: crate::decode::IMAPErrorKind::BadNumber,
    }))
}

/// `mailbox-data =/ "SEARCH" *(SP nz-number) [SP "(" "MODSEQ" SP
/// mod-sequence-value ")"]` (RFC 7162 extends the RFC 3501 form)
fn search_data(input: &[u8]) -> IMAPResult<Response> {
    let mut parser = tuple((
        many0(preceded(sp, map(nz_number, Into::into))),
        opt(preceded(
            sp,
            delimited(
                tag(b"("),
                preceded(tag_no_case(b"MODSEQ "), number64),
                tag(b")"),
            ),
        )),
    ));

    let (remaining, (ids, highest_mod_seq)) = parser(input)?;

    Ok((
        remaining,
        Response::Data(Data::Search {
            ids,
            highest_mod_seq: highest_mod_seq.map(imap_ast::identifier::ModSeq::new),
        }),
    ))
}

/// `mailbox-list = "(" [mbx-list-flags] ")" SP
///                 (DQUOTE QUOTED-CHAR DQUOTE / nil) SP mailbox`
#[allow(clippy::type_complexity)]
fn mailbox_list(
    input: &[u8],
) -> IMAPResult<(
    Vec<imap_ast::flag::FlagNameAttribute>,
    Option<imap_ast::core::QuotedChar>,
    imap_ast::mailbox::Mailbox,
)> {
    let mut parser = tuple((
        delimited(tag(b"("), opt(mbx_list_flags), tag(b")")),
        sp,
        alt((
            map(
                delimited(abnf_core::streaming::dquote, quoted_char, abnf_core::streaming::dquote),
                Some,
            ),
            value(None, nil),
        )),
        sp,
        mailbox,
    ));

    let (remaining, (items, _, delimiter, _, mailbox)) = parser(input)?;

    Ok((remaining, (items.unwrap_or_default(), delimiter, mailbox)))
}

/// `response-tagged = tag SP resp-cond-state CRLF`
fn response_tagged(input: &[u8]) -> IMAPResult<Response> {
    let (remaining, obtained_tag) = terminated(tag_imap, sp)(input)?;
    let (remaining, kind) = status_kind(remaining)?;
    let (remaining, text) = terminated(preceded(sp, resp_text), crlf)(remaining)?;

    Ok((
        remaining,
        Response::Tagged(TaggedResponse {
            tag: obtained_tag,
            kind,
            text,
        }),
    ))
}

fn status_kind(input: &[u8]) -> IMAPResult<StatusKind> {
    let (remaining, keyword) = uppercased_atom(input)?;

    match keyword.as_str() {
        "OK" => Ok((remaining, StatusKind::Ok)),
        "NO" => Ok((remaining, StatusKind::No)),
        "BAD" => Ok((remaining, StatusKind::Bad)),
        _ => unknown_keyword(input),
    }
}

#[cfg(test)]
mod tests {
    use imap_ast::{
        core::Tag,
        flag::{Flag, FlagNameAttribute},
        identifier::{ModSeq, SeqNum, UidSet, UidValidity},
        response::Data,
    };

    use super::*;

    fn parse(input: &[u8]) -> Response {
        let (rem, rsp) = response(input, &ParserOptions::default()).unwrap();
        assert!(rem.is_empty(), "{:?}", String::from_utf8_lossy(rem));
        rsp
    }

    #[test]
    fn test_greeting_forms() {
        assert!(matches!(
            parse(b"* OK IMAP4rev1 Service Ready\r\n"),
            Response::Status(UntaggedStatus::Ok(_))
        ));
        assert!(matches!(
            parse(b"* PREAUTH [ALERT] hello\r\n"),
            Response::Status(UntaggedStatus::PreAuth(_))
        ));
        assert!(matches!(
            parse(b"* BYE so long\r\n"),
            Response::Status(UntaggedStatus::Bye(_))
        ));
    }

    #[test]
    fn test_missing_space_after_code() {
        let Response::Status(UntaggedStatus::Ok(text)) = parse(b"* OK [READ-WRITE]\r\n") else {
            panic!("expected untagged OK");
        };
        assert_eq!(text.code, Some(Code::ReadWrite));
        assert_eq!(text.text, "");
    }

    #[test]
    fn test_unknown_code_degrades() {
        let Response::Status(UntaggedStatus::Ok(text)) =
            parse(b"* OK [XWAFFLES 7 pancakes] done\r\n")
        else {
            panic!("expected untagged OK");
        };
        assert_eq!(
            text.code,
            Some(Code::Other(CodeOther {
                atom: imap_ast::core::Atom::try_from("XWAFFLES").unwrap(),
                arguments: Some("7 pancakes".into()),
            }))
        );
        assert_eq!(text.text, "done");
    }

    #[test]
    fn test_capability_data() {
        let Response::Data(Data::Capability(caps)) =
            parse(b"* CAPABILITY IMAP4rev1 IDLE AUTH=PLAIN LITERAL+\r\n")
        else {
            panic!("expected capability data");
        };
        assert_eq!(caps.len(), 4);
        assert_eq!(caps.as_ref()[0], Capability::Imap4Rev1);
        assert_eq!(caps.as_ref()[3], Capability::LiteralPlus);
    }

    #[test]
    fn test_exists_recent_expunge() {
        assert_eq!(parse(b"* 23 EXISTS\r\n"), Response::Data(Data::Exists(23)));
        assert_eq!(parse(b"* 5 RECENT\r\n"), Response::Data(Data::Recent(5)));
        assert_eq!(
            parse(b"* 44 EXPUNGE\r\n"),
            Response::Data(Data::Expunge(SeqNum::new(44).unwrap()))
        );
    }

    #[test]
    fn test_list() {
        let Response::Data(Data::List {
            items,
            delimiter,
            mailbox,
        }) = parse(b"* LIST (\\Noselect) \"/\" foo\r\n")
        else {
            panic!("expected LIST");
        };
        assert_eq!(items, vec![FlagNameAttribute::Noselect]);
        assert_eq!(delimiter.map(|d| d.inner()), Some('/'));
        assert_eq!(mailbox.as_bytes(), b"foo");
    }

    #[test]
    fn test_flags() {
        assert_eq!(
            parse(b"* FLAGS (\\Answered \\Seen)\r\n"),
            Response::Data(Data::Flags(vec![Flag::Answered, Flag::Seen]))
        );
    }

    #[test]
    fn test_search_with_modseq() {
        let Response::Data(Data::Search {
            ids,
            highest_mod_seq,
        }) = parse(b"* SEARCH 2 5 12 (MODSEQ 917162500)\r\n")
        else {
            panic!("expected SEARCH");
        };
        assert_eq!(ids.len(), 3);
        assert_eq!(highest_mod_seq, Some(ModSeq::new(917162500)));
    }

    #[test]
    fn test_vanished() {
        assert_eq!(
            parse(b"* VANISHED (EARLIER) 41,43:116\r\n"),
            Response::Data(Data::Vanished {
                earlier: true,
                uids: UidSet::try_from("41,43:116").unwrap(),
            })
        );
    }

    #[test]
    fn test_fetch_data() {
        let Response::Data(Data::Fetch { seq, items }) =
            parse(b"* 12 FETCH (FLAGS (\\Seen) RFC822.SIZE 44827)\r\n")
        else {
            panic!("expected FETCH");
        };
        assert_eq!(seq, SeqNum::new(12).unwrap());
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_fetch_data_with_literal() {
        let Response::Data(Data::Fetch { items, .. }) =
            parse(b"* 1 FETCH (RFC822 {5}\r\nhello)\r\n")
        else {
            panic!("expected FETCH");
        };
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_tagged_responses() {
        let Response::Tagged(tagged) = parse(b"A154 OK [READ-WRITE] SELECT completed\r\n") else {
            panic!("expected tagged response");
        };
        assert_eq!(tagged.tag, Tag::unvalidated("A154"));
        assert_eq!(tagged.kind, StatusKind::Ok);
        assert_eq!(tagged.text.code, Some(Code::ReadWrite));
        assert_eq!(tagged.text.text, "SELECT completed");

        assert!(matches!(
            parse(b"a BAD invalid command\r\n"),
            Response::Tagged(TaggedResponse {
                kind: StatusKind::Bad,
                ..
            })
        ));
    }

    #[test]
    fn test_appenduid_copyuid() {
        let Response::Tagged(tagged) =
            parse(b"A003 OK [APPENDUID 38505 3955] APPEND completed\r\n")
        else {
            panic!("expected tagged response");
        };
        assert_eq!(
            tagged.text.code,
            Some(Code::AppendUid {
                uid_validity: UidValidity::new(38505).unwrap(),
                uids: UidSet::try_from("3955").unwrap(),
            })
        );

        let Response::Tagged(tagged) =
            parse(b"A004 OK [COPYUID 38505 304,319:320 3956:3958] Done\r\n")
        else {
            panic!("expected tagged response");
        };
        assert_eq!(
            tagged.text.code,
            Some(Code::CopyUid {
                uid_validity: UidValidity::new(38505).unwrap(),
                source: UidSet::try_from("304,319:320").unwrap(),
                destination: UidSet::try_from("3956:3958").unwrap(),
            })
        );
    }

    #[test]
    fn test_esearch_data() {
        let Response::Data(Data::Esearch(esearch)) =
            parse(b"* ESEARCH (TAG \"A282\") MIN 2 COUNT 3\r\n")
        else {
            panic!("expected ESEARCH");
        };
        assert_eq!(esearch.correlator, Some(Tag::unvalidated("A282")));
        assert!(!esearch.uid);
        assert_eq!(esearch.returns.len(), 2);
    }

    #[test]
    fn test_continue_req() {
        assert!(matches!(
            parse(b"+ idling\r\n"),
            Response::ContinuationRequest(ContinuationRequest::Basic(_))
        ));

        let Response::ContinuationRequest(ContinuationRequest::Base64(data)) =
            parse(b"+ VGVzdA==\r\n")
        else {
            panic!("expected base64 continuation");
        };
        assert_eq!(data, b"Test");
    }

    #[test]
    fn test_status_data() {
        let Response::Data(Data::Status { items, .. }) =
            parse(b"* STATUS blurdybloop (MESSAGES 231 UIDNEXT 44292)\r\n")
        else {
            panic!("expected STATUS");
        };
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_quota_data() {
        let Response::Data(Data::Quota { quotas, .. }) =
            parse(b"* QUOTA \"\" (STORAGE 10 512)\r\n")
        else {
            panic!("expected QUOTA");
        };
        assert_eq!(quotas.len(), 1);

        let Response::Data(Data::QuotaRoot { roots, .. }) =
            parse(b"* QUOTAROOT comp.mail.mime \"\"\r\n")
        else {
            panic!("expected QUOTAROOT");
        };
        assert_eq!(roots.len(), 1);
    }

    #[test]
    fn test_incomplete() {
        for input in [
            b"".as_ref(),
            b"*",
            b"* ",
            b"* SEARCH",
            b"* SEARCH 1",
            b"* SEARCH 1\r",
            b"* 1 FETCH (RFC822 {5}\r\nhel",
        ] {
            assert!(
                matches!(
                    response(input, &ParserOptions::default()),
                    Err(nom::Err::Incomplete(_))
                ),
                "{:?}",
                String::from_utf8_lossy(input)
            );
        }
    }

    #[test]
    fn test_failures() {
        assert!(response(b"*  SEARCH 1\r\n", &ParserOptions::default()).is_err());
        assert!(response(b"A001\r\n", &ParserOptions::default()).is_err());
    }
}
