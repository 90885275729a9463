//! Command rules.
//!
//! A command is `tag SP verb ...args CRLF`. The verb is dispatched through
//! a keyword table (an uppercased-atom match); every suffix parser owns
//! its arguments including the separating spaces. `APPEND` is absent
//! here on purpose: its unbounded message data is handled by the
//! command-stream machinery in [`crate::append`].

use abnf_core::streaming::crlf_relaxed as crlf;
use abnf_core::streaming::sp;
use imap_ast::{
    command::{Command, CommandBody},
    core::{Secret, Vec1},
    extensions::{
        compress::CompressionAlgorithm,
        quota::{QuotaSet, Resource},
        urlauth::UrlAuthMechanism,
    },
    fetch::{Macro, MacroOrFetchAttributes},
    flag::{Flag, StoreResponse, StoreType},
    identifier::ModSeq,
    mailbox::{ListMailbox, ListReturnOption, ListSelectOption},
    response::Capability,
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt, value},
    multi::{many0, many1, separated_list0, separated_list1},
    sequence::{delimited, preceded, terminated, tuple},
};

use crate::{
    auth::auth_type,
    core::{
        astring, atom, base64, number64, nz_number, tag_imap, unknown_keyword, uppercased_atom,
    },
    decode::{
        CommandDecodeError, IMAPErrorKind, IMAPParseError, IMAPResult, ParserOptions,
    },
    extensions::{
        condstore_qresync::select_parameters,
        id::id_parameters,
        metadata::{getmetadata_options, metadata_entries, metadata_entry_values},
        urlauth::rump_url,
    },
    fetch::{fetch_att, fetch_modifiers},
    flag::{flag, flag_list},
    mailbox::{list_mailbox, mailbox},
    search::{esearch, search},
    sequence::{seq_set_or_saved, uid_set, uid_set_or_saved},
    status::status_att,
};

/// `command = tag SP command-body CRLF`
///
/// Once the tag has been read, every failure is reported as
/// [`CommandDecodeError::Bad`] carrying that tag, so the server can
/// answer `<tag> BAD ...` after resynchronizing.
pub(crate) fn command<'a>(
    input: &'a [u8],
    options: &ParserOptions,
) -> Result<(&'a [u8], Command), CommandDecodeError> {
    let (remaining, obtained_tag) = match terminated(tag_imap, sp)(input) {
        Ok(ok) => ok,
        Err(nom::Err::Incomplete(_)) => return Err(CommandDecodeError::Incomplete),
        Err(nom::Err::Error(error) | nom::Err::Failure(error)) => {
            return Err(CommandDecodeError::Failed {
                hint: error.kind.hint(),
            })
        }
    };

    match terminated(|i| command_body(i, options), crlf)(remaining) {
        Ok((remaining, body)) => Ok((remaining, Command::new(obtained_tag, body))),
        Err(nom::Err::Incomplete(_)) => Err(CommandDecodeError::Incomplete),
        Err(nom::Err::Error(error) | nom::Err::Failure(error)) => Err(CommandDecodeError::Bad {
            tag: obtained_tag,
            hint: error.kind.hint(),
        }),
    }
}

/// The verb dispatch table.
pub(crate) fn command_body<'a>(
    input: &'a [u8],
    options: &ParserOptions,
) -> IMAPResult<'a, CommandBody> {
    let (remaining, verb) = uppercased_atom(input)?;

    match verb.as_str() {
        // Any state.
        "CAPABILITY" => Ok((remaining, CommandBody::Capability)),
        "LOGOUT" => Ok((remaining, CommandBody::Logout)),
        "NOOP" => Ok((remaining, CommandBody::Noop)),
        "ID" => map(preceded(sp, id_parameters), |parameters| {
            CommandBody::Id { parameters }
        })(remaining),
        "COMPRESS" => map(preceded(sp, atom), |algorithm| CommandBody::Compress {
            algorithm: CompressionAlgorithm::from(algorithm),
        })(remaining),

        // Not authenticated.
        "STARTTLS" => Ok((remaining, CommandBody::StartTls)),
        "AUTHENTICATE" => authenticate(remaining),
        "LOGIN" => map(
            tuple((preceded(sp, astring), preceded(sp, astring))),
            |(username, password)| CommandBody::Login {
                username,
                password: Secret::new(password),
            },
        )(remaining),

        // Authenticated.
        "CREATE" => map(preceded(sp, mailbox), |mailbox| CommandBody::Create {
            mailbox,
        })(remaining),
        "DELETE" => map(preceded(sp, mailbox), |mailbox| CommandBody::Delete {
            mailbox,
        })(remaining),
        "RENAME" => map(
            tuple((preceded(sp, mailbox), preceded(sp, mailbox))),
            |(from, to)| CommandBody::Rename { from, to },
        )(remaining),
        "SELECT" => map(
            tuple((preceded(sp, mailbox), opt(preceded(sp, select_parameters)))),
            |(mailbox, parameters)| CommandBody::Select {
                mailbox,
                parameters: parameters.unwrap_or_default(),
            },
        )(remaining),
        "EXAMINE" => map(
            tuple((preceded(sp, mailbox), opt(preceded(sp, select_parameters)))),
            |(mailbox, parameters)| CommandBody::Examine {
                mailbox,
                parameters: parameters.unwrap_or_default(),
            },
        )(remaining),
        "SUBSCRIBE" => map(preceded(sp, mailbox), |mailbox| CommandBody::Subscribe {
            mailbox,
        })(remaining),
        "UNSUBSCRIBE" => map(preceded(sp, mailbox), |mailbox| {
            CommandBody::Unsubscribe { mailbox }
        })(remaining),
        "STATUS" => map(
            tuple((
                preceded(sp, mailbox),
                preceded(
                    sp,
                    delimited(tag(b"("), separated_list1(sp, status_att), tag(b")")),
                ),
            )),
            |(mailbox, items)| CommandBody::Status {
                mailbox,
                items: Vec1::unvalidated(items),
            },
        )(remaining),
        "LIST" => list(remaining),
        "LSUB" => map(
            tuple((preceded(sp, mailbox), preceded(sp, list_mailbox))),
            |(reference, pattern)| CommandBody::Lsub { reference, pattern },
        )(remaining),
        "ENABLE" => map(
            preceded(sp, separated_list1(sp, map(atom, Capability::from))),
            |capabilities| CommandBody::Enable {
                capabilities: Vec1::unvalidated(capabilities),
            },
        )(remaining),
        "IDLE" => Ok((remaining, CommandBody::Idle)),
        "NAMESPACE" => Ok((remaining, CommandBody::Namespace)),
        "GETQUOTA" => map(preceded(sp, astring), |root| CommandBody::GetQuota {
            root,
        })(remaining),
        "GETQUOTAROOT" => map(preceded(sp, mailbox), |mailbox| {
            CommandBody::GetQuotaRoot { mailbox }
        })(remaining),
        "SETQUOTA" => map(
            tuple((preceded(sp, astring), preceded(sp, setquota_list))),
            |(root, quotas)| CommandBody::SetQuota { root, quotas },
        )(remaining),
        "SETMETADATA" => map(
            tuple((preceded(sp, mailbox), preceded(sp, metadata_entry_values))),
            |(mailbox, entries)| CommandBody::SetMetadata { mailbox, entries },
        )(remaining),
        "GETMETADATA" => map(
            tuple((
                opt(preceded(sp, getmetadata_options)),
                preceded(sp, mailbox),
                preceded(sp, metadata_entries),
            )),
            |(options, mailbox, entries)| CommandBody::GetMetadata {
                options: options.unwrap_or_default(),
                mailbox,
                entries,
            },
        )(remaining),
        "RESETKEY" => map(
            opt(tuple((
                preceded(sp, mailbox),
                many0(preceded(sp, map(atom, UrlAuthMechanism::from))),
            ))),
            |mailbox| CommandBody::ResetKey { mailbox },
        )(remaining),
        "GENURLAUTH" => map(many1(preceded(sp, rump_url)), |urls| {
            CommandBody::GenUrlAuth {
                urls: Vec1::unvalidated(urls),
            }
        })(remaining),
        "URLFETCH" => map(many1(preceded(sp, astring)), |urls| {
            CommandBody::UrlFetch {
                urls: Vec1::unvalidated(urls),
            }
        })(remaining),
        "GETJMAPACCESS" => Ok((remaining, CommandBody::GetJmapAccess)),

        // Selected.
        "CHECK" => Ok((remaining, CommandBody::Check)),
        "CLOSE" => Ok((remaining, CommandBody::Close)),
        "UNSELECT" => Ok((remaining, CommandBody::Unselect)),
        "EXPUNGE" => Ok((remaining, CommandBody::Expunge)),
        "SEARCH" => map(
            |i| search(i, options.max_depth),
            |(returns, charset, key)| CommandBody::Search {
                returns,
                charset,
                key,
            },
        )(remaining),
        "ESEARCH" => map(
            |i| esearch(i, options.max_depth),
            |(scope, returns, charset, key)| CommandBody::Esearch {
                scope,
                returns,
                charset,
                key,
            },
        )(remaining),
        "FETCH" => map(
            tuple((
                preceded(sp, seq_set_or_saved),
                preceded(sp, fetch_items),
                opt(fetch_modifiers),
            )),
            |(set, items, modifiers)| CommandBody::Fetch {
                set,
                items,
                modifiers: modifiers.unwrap_or_default(),
            },
        )(remaining),
        "STORE" => map(
            tuple((
                preceded(sp, seq_set_or_saved),
                opt(preceded(sp, store_modifier)),
                preceded(sp, store_att_flags),
            )),
            |(set, unchanged_since, (kind, response, flags))| CommandBody::Store {
                set,
                kind,
                response,
                flags,
                unchanged_since,
            },
        )(remaining),
        "COPY" => map(
            tuple((preceded(sp, seq_set_or_saved), preceded(sp, mailbox))),
            |(set, mailbox)| CommandBody::Copy { set, mailbox },
        )(remaining),
        "MOVE" => map(
            tuple((preceded(sp, seq_set_or_saved), preceded(sp, mailbox))),
            |(set, mailbox)| CommandBody::Move { set, mailbox },
        )(remaining),
        "UID" => preceded(sp, |i| uid_sub_command(i, options))(remaining),
        "UIDBATCHES" => map(preceded(sp, nz_number), |batch_size| {
            CommandBody::UidBatches { batch_size }
        })(remaining),

        "APPEND" => Err(nom::Err::Failure(IMAPParseError {
            input,
            kind: IMAPErrorKind::AppendViaCommandStream,
        })),

        _ => unknown_keyword(input),
    }
}

/// `uid = "UID" SP (copy / move / fetch / search / store / expunge)`
///
/// The sub-verbs take UID sets; `UID SEARCH` shares the SEARCH suffix and
/// only retags the result.
fn uid_sub_command<'a>(input: &'a [u8], options: &ParserOptions) -> IMAPResult<'a, CommandBody> {
    let (remaining, verb) = uppercased_atom(input)?;

    match verb.as_str() {
        "COPY" => map(
            tuple((preceded(sp, uid_set_or_saved), preceded(sp, mailbox))),
            |(set, mailbox)| CommandBody::UidCopy { set, mailbox },
        )(remaining),
        "MOVE" => map(
            tuple((preceded(sp, uid_set_or_saved), preceded(sp, mailbox))),
            |(set, mailbox)| CommandBody::UidMove { set, mailbox },
        )(remaining),
        "FETCH" => map(
            tuple((
                preceded(sp, uid_set_or_saved),
                preceded(sp, fetch_items),
                opt(fetch_modifiers),
            )),
            |(set, items, modifiers)| CommandBody::UidFetch {
                set,
                items,
                modifiers: modifiers.unwrap_or_default(),
            },
        )(remaining),
        "STORE" => map(
            tuple((
                preceded(sp, uid_set_or_saved),
                opt(preceded(sp, store_modifier)),
                preceded(sp, store_att_flags),
            )),
            |(set, unchanged_since, (kind, response, flags))| CommandBody::UidStore {
                set,
                kind,
                response,
                flags,
                unchanged_since,
            },
        )(remaining),
        "SEARCH" => map(
            |i| search(i, options.max_depth),
            |(returns, charset, key)| CommandBody::UidSearch {
                returns,
                charset,
                key,
            },
        )(remaining),
        "EXPUNGE" => map(preceded(sp, uid_set), |uids| CommandBody::UidExpunge {
            uids,
        })(remaining),
        _ => unknown_keyword(input),
    }
}

/// ```text
///                                            Added by SASL-IR
///                                            |
///                                            vvvvvvvvvvvvvvvvvvv
/// authenticate = "AUTHENTICATE" SP auth-type [SP (base64 / "=")] *(CRLF base64)
///                ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^
///                |
///                This is parsed here; the continuation lines are
///                separate command-stream parts.
/// ```
fn authenticate(input: &[u8]) -> IMAPResult<CommandBody> {
    let mut parser = tuple((
        preceded(sp, auth_type),
        opt(preceded(
            sp,
            alt((
                map(base64, Some),
                value(Some(Vec::new()), tag(b"=")),
            )),
        )),
    ));

    let (remaining, (mechanism, initial_response)) = parser(input)?;

    Ok((
        remaining,
        CommandBody::Authenticate {
            mechanism,
            initial_response: initial_response.flatten().map(Secret::new),
        },
    ))
}

/// `list = "LIST" [SP list-select-opts] SP mailbox SP mbox-or-pat
///         [SP "RETURN" SP "(" [return-opts] ")"]` (RFC 5258)
fn list(input: &[u8]) -> IMAPResult<CommandBody> {
    let (remaining, _) = sp(input)?;
    let (remaining, selection) = opt(terminated(list_select_opts, sp))(remaining)?;
    let (remaining, reference) = mailbox(remaining)?;
    let (remaining, patterns) = preceded(sp, mbox_or_pat)(remaining)?;
    let (remaining, returns) = opt(preceded(
        tuple((sp, tag_no_case(b"RETURN"), sp)),
        delimited(
            tag(b"("),
            opt(separated_list1(sp, list_return_opt)),
            tag(b")"),
        ),
    ))(remaining)?;

    Ok((
        remaining,
        CommandBody::List {
            selection: selection.unwrap_or_default(),
            reference,
            patterns,
            returns: returns.flatten().unwrap_or_default(),
        },
    ))
}

/// `list-select-opts = "(" [list-select-option *(SP list-select-option)] ")"`
fn list_select_opts(input: &[u8]) -> IMAPResult<Vec<ListSelectOption>> {
    map(
        delimited(
            tag(b"("),
            opt(separated_list1(sp, list_select_option)),
            tag(b")"),
        ),
        Option::unwrap_or_default,
    )(input)
}

fn list_select_option(input: &[u8]) -> IMAPResult<ListSelectOption> {
    let (remaining, keyword) = uppercased_atom(input)?;

    let option = match keyword.as_str() {
        "SUBSCRIBED" => ListSelectOption::Subscribed,
        "REMOTE" => ListSelectOption::Remote,
        "RECURSIVEMATCH" => ListSelectOption::RecursiveMatch,
        "SPECIAL-USE" => ListSelectOption::SpecialUse,
        _ => return unknown_keyword(input),
    };

    Ok((remaining, option))
}

fn list_return_opt(input: &[u8]) -> IMAPResult<ListReturnOption> {
    let (remaining, keyword) = uppercased_atom(input)?;

    match keyword.as_str() {
        "SUBSCRIBED" => Ok((remaining, ListReturnOption::Subscribed)),
        "CHILDREN" => Ok((remaining, ListReturnOption::Children)),
        "SPECIAL-USE" => Ok((remaining, ListReturnOption::SpecialUse)),
        "STATUS" => map(
            preceded(
                sp,
                delimited(tag(b"("), separated_list1(sp, status_att), tag(b")")),
            ),
            ListReturnOption::Status,
        )(remaining),
        _ => unknown_keyword(input),
    }
}

/// `mbox-or-pat = list-mailbox / "(" list-mailbox *(SP list-mailbox) ")"`
fn mbox_or_pat(input: &[u8]) -> IMAPResult<Vec1<ListMailbox>> {
    alt((
        map(list_mailbox, Vec1::from),
        map(
            delimited(tag(b"("), separated_list1(sp, list_mailbox), tag(b")")),
            Vec1::unvalidated,
        ),
    ))(input)
}

/// `"ALL" / "FULL" / "FAST" / fetch-att / "(" fetch-att *(SP fetch-att) ")"`
fn fetch_items(input: &[u8]) -> IMAPResult<MacroOrFetchAttributes> {
    alt((
        value(
            MacroOrFetchAttributes::Macro(Macro::All),
            tag_no_case(b"ALL"),
        ),
        value(
            MacroOrFetchAttributes::Macro(Macro::Fast),
            tag_no_case(b"FAST"),
        ),
        value(
            MacroOrFetchAttributes::Macro(Macro::Full),
            tag_no_case(b"FULL"),
        ),
        map(fetch_att, |attribute| {
            MacroOrFetchAttributes::Attributes(vec![attribute])
        }),
        map(
            delimited(tag(b"("), separated_list0(sp, fetch_att), tag(b")")),
            MacroOrFetchAttributes::Attributes,
        ),
    ))(input)
}

/// `"(" "UNCHANGEDSINCE" SP mod-sequence-value ")"` (RFC 7162)
fn store_modifier(input: &[u8]) -> IMAPResult<ModSeq> {
    delimited(
        tag(b"("),
        preceded(tag_no_case(b"UNCHANGEDSINCE "), map(number64, ModSeq::new)),
        tag(b")"),
    )(input)
}

/// `store-att-flags = (["+" / "-"] "FLAGS" [".SILENT"])
///                    SP (flag-list / (flag *(SP flag)))`
fn store_att_flags(input: &[u8]) -> IMAPResult<(StoreType, StoreResponse, Vec<Flag>)> {
    let mut parser = tuple((
        tuple((
            map(
                opt(alt((
                    value(StoreType::Add, tag(b"+")),
                    value(StoreType::Remove, tag(b"-")),
                ))),
                |kind| kind.unwrap_or(StoreType::Replace),
            ),
            tag_no_case(b"FLAGS"),
            map(opt(tag_no_case(b".SILENT")), |silent| match silent {
                Some(_) => StoreResponse::Silent,
                None => StoreResponse::Answer,
            }),
        )),
        sp,
        alt((flag_list, separated_list1(sp, flag))),
    ));

    let (remaining, ((store_type, _, store_response), _, flags)) = parser(input)?;

    Ok((remaining, (store_type, store_response, flags)))
}

/// `setquota-list = "(" [setquota-resource *(SP setquota-resource)] ")"`
fn setquota_list(input: &[u8]) -> IMAPResult<Vec<QuotaSet>> {
    map(
        delimited(
            tag(b"("),
            opt(separated_list1(
                sp,
                map(
                    tuple((atom, sp, number64)),
                    |(resource, _, limit)| QuotaSet {
                        resource: Resource::from(resource),
                        limit,
                    },
                ),
            )),
            tag(b")"),
        ),
        Option::unwrap_or_default,
    )(input)
}

#[cfg(test)]
mod tests {
    use imap_ast::{
        core::{AString, Tag},
        extensions::metadata::MetadataDepth,
        fetch::FetchAttribute,
        identifier::{LastCommandSet, SeqSet, UidSet},
        mailbox::Mailbox,
        search::{SearchKey, SearchReturnOption},
    };

    use super::*;

    fn parse(input: &[u8]) -> Command {
        let (rem, cmd) = command(input, &ParserOptions::default()).unwrap();
        assert!(rem.is_empty());
        cmd
    }

    #[test]
    fn test_simple_commands() {
        for (input, name) in [
            (b"a CAPABILITY\r\n".as_ref(), "CAPABILITY"),
            (b"a NOOP\r\n", "NOOP"),
            (b"a LOGOUT\r\n", "LOGOUT"),
            (b"a CHECK\r\n", "CHECK"),
            (b"a CLOSE\r\n", "CLOSE"),
            (b"a UNSELECT\r\n", "UNSELECT"),
            (b"a EXPUNGE\r\n", "EXPUNGE"),
            (b"a IDLE\r\n", "IDLE"),
            (b"a NAMESPACE\r\n", "NAMESPACE"),
            (b"a GETJMAPACCESS\r\n", "GETJMAPACCESS"),
        ] {
            assert_eq!(parse(input).name(), name);
        }
    }

    #[test]
    fn test_verbs_are_case_insensitive() {
        assert_eq!(parse(b"a nOoP\r\n").body, CommandBody::Noop);
        assert_eq!(
            parse(b"a sElEcT INBOX\r\n").body,
            CommandBody::Select {
                mailbox: Mailbox::Inbox,
                parameters: vec![],
            }
        );
    }

    #[test]
    fn test_login() {
        let cmd = parse(b"a1 LOGIN alice hunter2\r\n");
        let CommandBody::Login { username, .. } = cmd.body else {
            panic!("expected LOGIN");
        };
        assert_eq!(username, AString::try_from("alice").unwrap());
    }

    #[test]
    fn test_login_with_literal_password() {
        let cmd = parse(b"a1 LOGIN alice {7}\r\nhunter2\r\n");
        assert_eq!(cmd.name(), "LOGIN");
    }

    #[test]
    fn test_authenticate() {
        let cmd = parse(b"a AUTHENTICATE PLAIN\r\n");
        let CommandBody::Authenticate {
            initial_response, ..
        } = cmd.body
        else {
            panic!("expected AUTHENTICATE");
        };
        assert!(initial_response.is_none());

        let cmd = parse(b"a AUTHENTICATE PLAIN =\r\n");
        let CommandBody::Authenticate {
            initial_response, ..
        } = cmd.body
        else {
            panic!("expected AUTHENTICATE");
        };
        assert_eq!(initial_response.unwrap().declassify(), &Vec::<u8>::new());
    }

    #[test]
    fn test_select_with_qresync() {
        let cmd = parse(b"a SELECT INBOX (QRESYNC (67890007 20050715194045000 41:211,214:541))\r\n");
        let CommandBody::Select { parameters, .. } = cmd.body else {
            panic!("expected SELECT");
        };
        assert_eq!(parameters.len(), 1);
    }

    #[test]
    fn test_status() {
        let cmd = parse(b"a STATUS blurdybloop (UIDNEXT MESSAGES)\r\n");
        assert_eq!(cmd.name(), "STATUS");
    }

    #[test]
    fn test_list_extended() {
        let cmd = parse(b"a LIST (SUBSCRIBED) \"\" \"*\" RETURN (CHILDREN)\r\n");
        let CommandBody::List {
            selection, returns, ..
        } = cmd.body
        else {
            panic!("expected LIST");
        };
        assert_eq!(selection, vec![ListSelectOption::Subscribed]);
        assert_eq!(returns, vec![ListReturnOption::Children]);
    }

    #[test]
    fn test_list_plain() {
        let cmd = parse(b"a LIST \"\" %\r\n");
        let CommandBody::List {
            selection,
            patterns,
            returns,
            ..
        } = cmd.body
        else {
            panic!("expected LIST");
        };
        assert!(selection.is_empty());
        assert!(returns.is_empty());
        assert_eq!(patterns.len(), 1);
    }

    #[test]
    fn test_uid_fetch() {
        let cmd = parse(b"A001 UID FETCH 1:* (UID FLAGS)\r\n");
        let CommandBody::UidFetch { set, items, .. } = cmd.body else {
            panic!("expected UID FETCH");
        };
        assert_eq!(set, LastCommandSet::Set(UidSet::try_from("1:*").unwrap()));
        assert_eq!(
            items,
            MacroOrFetchAttributes::Attributes(vec![
                FetchAttribute::Uid,
                FetchAttribute::Flags
            ])
        );
    }

    #[test]
    fn test_fetch_macro_and_modifier() {
        let cmd = parse(b"a FETCH 1:100 FULL (CHANGEDSINCE 12345)\r\n");
        let CommandBody::Fetch {
            items, modifiers, ..
        } = cmd.body
        else {
            panic!("expected FETCH");
        };
        assert_eq!(items, MacroOrFetchAttributes::Macro(Macro::Full));
        assert_eq!(
            modifiers,
            vec![imap_ast::fetch::FetchModifier::ChangedSince(ModSeq::new(
                12345
            ))]
        );
    }

    #[test]
    fn test_store() {
        let cmd = parse(b"a STORE 2:4 +FLAGS.SILENT (\\Deleted)\r\n");
        let CommandBody::Store {
            kind,
            response,
            flags,
            ..
        } = cmd.body
        else {
            panic!("expected STORE");
        };
        assert_eq!(kind, StoreType::Add);
        assert_eq!(response, StoreResponse::Silent);
        assert_eq!(flags, vec![Flag::Deleted]);
    }

    #[test]
    fn test_store_unchangedsince() {
        let cmd = parse(b"a STORE 1 (UNCHANGEDSINCE 320162338) +FLAGS (\\Seen)\r\n");
        let CommandBody::Store {
            unchanged_since, ..
        } = cmd.body
        else {
            panic!("expected STORE");
        };
        assert_eq!(unchanged_since, Some(ModSeq::new(320162338)));
    }

    #[test]
    fn test_store_with_saved_result() {
        let cmd = parse(b"a STORE $ +FLAGS (\\Flagged)\r\n");
        let CommandBody::Store { set, .. } = cmd.body else {
            panic!("expected STORE");
        };
        assert_eq!(set, LastCommandSet::LastCommand);
    }

    #[test]
    fn test_uid_search_with_return_and_modseq() {
        let cmd = parse(b"t2 UID SEARCH RETURN (ALL) MODSEQ 12345\r\n");
        let CommandBody::UidSearch {
            returns,
            charset,
            key,
        } = cmd.body
        else {
            panic!("expected UID SEARCH");
        };
        assert_eq!(returns, Some(vec![SearchReturnOption::All]));
        assert_eq!(charset, None);
        assert_eq!(
            key,
            SearchKey::ModSeq(imap_ast::extensions::condstore_qresync::SearchModSeq {
                entry: None,
                value: ModSeq::new(12345),
            })
        );
    }

    #[test]
    fn test_uid_expunge() {
        let cmd = parse(b"a UID EXPUNGE 3:5\r\n");
        assert_eq!(
            cmd.body,
            CommandBody::UidExpunge {
                uids: UidSet::try_from("3:5").unwrap(),
            }
        );
    }

    #[test]
    fn test_copy_move() {
        let cmd = parse(b"a COPY 2:4 Trash\r\n");
        let CommandBody::Copy { set, .. } = cmd.body else {
            panic!("expected COPY");
        };
        assert_eq!(set, LastCommandSet::Set(SeqSet::try_from("2:4").unwrap()));

        assert_eq!(parse(b"a MOVE 1 Archive\r\n").name(), "MOVE");
        assert_eq!(parse(b"a UID MOVE 1 Archive\r\n").name(), "UID MOVE");
    }

    #[test]
    fn test_getmetadata() {
        let cmd = parse(b"a GETMETADATA (MAXSIZE 1024 DEPTH infinity) INBOX /shared/comment\r\n");
        let CommandBody::GetMetadata { options, .. } = cmd.body else {
            panic!("expected GETMETADATA");
        };
        assert_eq!(
            options,
            vec![
                imap_ast::extensions::metadata::GetMetadataOption::MaxSize(1024),
                imap_ast::extensions::metadata::GetMetadataOption::Depth(MetadataDepth::Infinity),
            ]
        );
    }

    #[test]
    fn test_setquota() {
        let cmd = parse(b"a SETQUOTA \"\" (STORAGE 512)\r\n");
        let CommandBody::SetQuota { quotas, .. } = cmd.body else {
            panic!("expected SETQUOTA");
        };
        assert_eq!(quotas.len(), 1);
        assert_eq!(quotas[0].limit, 512);
    }

    #[test]
    fn test_uidbatches() {
        let cmd = parse(b"a UIDBATCHES 500\r\n");
        assert_eq!(
            cmd.body,
            CommandBody::UidBatches {
                batch_size: 500.try_into().unwrap(),
            }
        );
    }

    #[test]
    fn test_bad_command_carries_tag() {
        let error = command(b"t6 UID FETCH 10:5 (UID)\r\n", &ParserOptions::default())
            .unwrap_err();

        assert_eq!(
            error,
            CommandDecodeError::Bad {
                tag: Tag::unvalidated("t6"),
                hint: "Invalid range 10:5".into(),
            }
        );
    }

    #[test]
    fn test_append_is_refused_here() {
        let error =
            command(b"t3 APPEND INBOX {3}\r\n", &ParserOptions::default()).unwrap_err();

        assert!(matches!(error, CommandDecodeError::Bad { .. }));
    }

    #[test]
    fn test_incomplete() {
        for input in [
            b"a".as_ref(),
            b"a ",
            b"a NOOP",
            b"a NOOP\r",
            b"a LOGIN alice ",
            b"a LOGIN alice {7}\r\nhun",
        ] {
            assert_eq!(
                command(input, &ParserOptions::default()).unwrap_err(),
                CommandDecodeError::Incomplete,
                "{:?}",
                String::from_utf8_lossy(input)
            );
        }
    }

    #[test]
    fn test_failed_before_tag() {
        assert!(matches!(
            command(b"* NOOP\r\n", &ParserOptions::default()).unwrap_err(),
            CommandDecodeError::Failed { .. }
        ));
    }
}
