//! The client-to-server command stream, including the APPEND upload
//! machine (RFC 3502 MULTIAPPEND, RFC 4469 CATENATE).
//!
//! APPEND interleaves grammar with unbounded message octets, so it cannot
//! be decoded as one value. The decoder instead emits one
//! [`AppendEvent`] per call and stops right before any payload octets;
//! the caller drains exactly the announced count from its buffer and
//! re-enters the decoder. The caller owns the [`CommandStreamState`] and
//! passes it to every call; it is only advanced when a part was decoded
//! successfully.

use abnf_core::streaming::crlf_relaxed as crlf;
use abnf_core::streaming::sp;
use imap_ast::{
    append::{AppendData, AppendEvent, AppendOptions, CommandStreamPart},
    command::CommandBody,
    core::{LiteralMode, Tag},
    mailbox::Mailbox,
};
use nom::{
    branch::alt,
    bytes::streaming::{tag, tag_no_case},
    combinator::{map, opt},
    multi::many0,
    sequence::{preceded, terminated, tuple},
};

use crate::{
    auth::authenticate_data,
    command::command,
    core::{astring, atom, literal_header, literal8_header, tag_imap, uppercased_atom},
    datetime::date_time,
    decode::{CommandDecodeError, IMAPResult, ParserOptions},
    extensions::idle::idle_done,
    flag::flag_list,
    mailbox::mailbox,
};

/// Where the command stream currently is.
///
/// The decoder moves `Command -> Append -> Command` and
/// `Idle -> Command` on its own. The `Authenticate` state is entered by
/// the caller when it has sent a continuation request and expects a
/// client data line; the decoder cannot know how many SASL round trips
/// the exchange takes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CommandStreamState {
    /// At a command boundary.
    #[default]
    Command,
    /// Inside an APPEND.
    Append { tag: Tag, stage: AppendStage },
    /// Inside IDLE, waiting for `DONE`.
    Idle { tag: Tag },
    /// Waiting for an AUTHENTICATE continuation line.
    Authenticate { tag: Tag },
}

/// The APPEND sub-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendStage {
    /// Expecting the next message (or the terminating CRLF).
    Message,
    /// Inside a `CATENATE (...)` part list.
    Catenate,
}

/// Decode the next discrete part of the command stream.
pub(crate) fn command_stream_part<'a>(
    input: &'a [u8],
    state: &mut CommandStreamState,
    options: &ParserOptions,
) -> Result<(&'a [u8], CommandStreamPart), CommandDecodeError> {
    match state.clone() {
        CommandStreamState::Command => {
            // APPEND first: it is the one verb the plain command parser
            // refuses. An incomplete APPEND prefix stays incomplete.
            match append_start(input) {
                Ok((remaining, (append_tag, mailbox))) => {
                    *state = CommandStreamState::Append {
                        tag: append_tag.clone(),
                        stage: AppendStage::Message,
                    };

                    return Ok((
                        remaining,
                        CommandStreamPart::Append(AppendEvent::Start {
                            tag: append_tag,
                            mailbox,
                        }),
                    ));
                }
                Err(nom::Err::Incomplete(_)) => return Err(CommandDecodeError::Incomplete),
                Err(_) => {}
            }

            let (remaining, parsed) = command(input, options)?;

            if matches!(parsed.body, CommandBody::Idle) {
                *state = CommandStreamState::Idle {
                    tag: parsed.tag.clone(),
                };
            }

            Ok((remaining, CommandStreamPart::Command(parsed)))
        }
        CommandStreamState::Append { tag, stage } => {
            let result = match stage {
                AppendStage::Message => append_message(input),
                AppendStage::Catenate => catenate_part(input),
            };

            match result {
                Ok((remaining, event)) => {
                    *state = match event {
                        AppendEvent::Finish => CommandStreamState::Command,
                        AppendEvent::BeginCatenate { .. } => CommandStreamState::Append {
                            tag,
                            stage: AppendStage::Catenate,
                        },
                        AppendEvent::EndCatenate => CommandStreamState::Append {
                            tag,
                            stage: AppendStage::Message,
                        },
                        _ => CommandStreamState::Append { tag, stage },
                    };

                    Ok((remaining, CommandStreamPart::Append(event)))
                }
                Err(nom::Err::Incomplete(_)) => Err(CommandDecodeError::Incomplete),
                Err(nom::Err::Error(error) | nom::Err::Failure(error)) => {
                    Err(CommandDecodeError::Bad {
                        tag,
                        hint: error.kind.hint(),
                    })
                }
            }
        }
        CommandStreamState::Idle { tag } => match idle_done(input) {
            Ok((remaining, ())) => {
                *state = CommandStreamState::Command;

                Ok((remaining, CommandStreamPart::IdleDone))
            }
            Err(nom::Err::Incomplete(_)) => Err(CommandDecodeError::Incomplete),
            Err(nom::Err::Error(error) | nom::Err::Failure(error)) => {
                Err(CommandDecodeError::Bad {
                    tag,
                    hint: error.kind.hint(),
                })
            }
        },
        CommandStreamState::Authenticate { tag } => match authenticate_data(input) {
            Ok((remaining, data)) => {
                *state = CommandStreamState::Command;

                Ok((remaining, CommandStreamPart::Continuation(data)))
            }
            Err(nom::Err::Incomplete(_)) => Err(CommandDecodeError::Incomplete),
            Err(nom::Err::Error(error) | nom::Err::Failure(error)) => {
                Err(CommandDecodeError::Bad {
                    tag,
                    hint: error.kind.hint(),
                })
            }
        },
    }
}

/// `tag SP "APPEND" SP mailbox`
fn append_start(input: &[u8]) -> IMAPResult<(Tag, Mailbox)> {
    let (remaining, obtained_tag) = terminated(tag_imap, sp)(input)?;
    let (remaining, verb) = uppercased_atom(remaining)?;

    if verb != "APPEND" {
        return crate::core::unknown_keyword(input);
    }

    let (remaining, mailbox) = preceded(sp, mailbox)(remaining)?;

    Ok((remaining, (obtained_tag, mailbox)))
}

/// One step at a message boundary:
///
/// ```abnf
/// append-message = append-opts SP append-data
/// append-opts    = [SP flag-list] [SP date-time] *(SP append-ext)
/// append-data    = literal / literal8 / "CATENATE" SP "(" ...
/// ```
///
/// ... or the CRLF that completes the APPEND.
pub(crate) fn append_message(input: &[u8]) -> IMAPResult<AppendEvent> {
    if let (remaining, Some(_)) = opt(crlf)(input)? {
        return Ok((remaining, AppendEvent::Finish));
    }

    let (remaining, options) = append_opts(input)?;
    let (remaining, _) = sp(remaining)?;

    if let (remaining, Some(_)) =
        opt(tuple((tag_no_case(b"CATENATE"), sp, tag(b"("))))(remaining)?
    {
        return Ok((remaining, AppendEvent::BeginCatenate { options }));
    }

    let (remaining, data) = append_data_header(remaining)?;

    Ok((remaining, AppendEvent::BeginMessage { options, data }))
}

fn append_opts(input: &[u8]) -> IMAPResult<AppendOptions> {
    let mut parser = tuple((
        opt(preceded(sp, flag_list)),
        opt(preceded(sp, date_time)),
        many0(preceded(
            sp,
            map(tuple((atom, sp, astring)), |(name, _, value)| (name, value)),
        )),
    ));

    let (remaining, (flags, internal_date, extensions)) = parser(input)?;

    Ok((
        remaining,
        AppendOptions {
            flags: flags.unwrap_or_default(),
            internal_date,
            extensions,
        },
    ))
}

/// The literal header of message octets, `{n[+]}` or `~{n[+]}`
/// (RFC 3516 LITERAL8 carries binary content).
fn append_data_header(input: &[u8]) -> IMAPResult<AppendData> {
    alt((
        map(literal8_header, |(byte_count, mode)| AppendData {
            byte_count,
            without_content_transfer_encoding: true,
            mode,
        }),
        map(literal_header, |(byte_count, mode)| AppendData {
            byte_count,
            without_content_transfer_encoding: false,
            mode,
        }),
    ))(input)
}

/// One step inside `CATENATE (...)`:
///
/// ```abnf
/// cat-part = "URL" SP url / "TEXT" SP literal
/// ```
///
/// ... or the closing `)`.
pub(crate) fn catenate_part(input: &[u8]) -> IMAPResult<AppendEvent> {
    let (remaining, _) = opt(sp)(input)?;

    if let (remaining, Some(_)) = opt(tag(b")"))(remaining)? {
        return Ok((remaining, AppendEvent::EndCatenate));
    }

    let (remaining, keyword) = uppercased_atom(remaining)?;

    match keyword.as_str() {
        "URL" => map(preceded(sp, astring), AppendEvent::CatenateUrl)(remaining),
        "TEXT" => map(preceded(sp, append_data_header), |data| {
            AppendEvent::CatenateData { data }
        })(remaining),
        _ => crate::core::unknown_keyword(input),
    }
}
