//! Response-related types.

use crate::{
    auth::AuthMechanism,
    core::{AString, Atom, Charset, IString, NString, QuotedChar, Tag, Vec1},
    extensions::{
        compress::CompressionAlgorithm,
        metadata::{MetadataCode, MetadataResponse},
        namespace::NamespaceResponse,
        objectid::ObjectId,
        quota::QuotaGet,
        urlauth::UrlFetchItem,
    },
    fetch::MessageDataItem,
    flag::{Flag, FlagNameAttribute, FlagPerm},
    identifier::{ModSeq, SeqNum, SeqSet, Uid, UidSet, UidValidity},
    mailbox::Mailbox,
    search::EsearchResponse,
    status::StatusAttributeValue,
};

/// Any server-to-client message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// An untagged conditional state, including the greeting forms
    /// (`* OK/NO/BAD/PREAUTH/BYE ...`).
    Status(UntaggedStatus),
    /// Untagged data (`* ...`).
    Data(Data),
    /// A tagged command completion.
    Tagged(TaggedResponse),
    /// A command continuation request (`+ ...`).
    ContinuationRequest(ContinuationRequest),
}

/// The `[code] text` payload of a status response.
///
/// `text` may be empty: several servers omit it (and the space before it)
/// after a bracketed code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseText {
    pub code: Option<Code>,
    pub text: String,
}

/// An untagged conditional state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UntaggedStatus {
    Ok(ResponseText),
    No(ResponseText),
    Bad(ResponseText),
    PreAuth(ResponseText),
    Bye(ResponseText),
}

/// Completion result of a tagged command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Ok,
    No,
    Bad,
}

/// A tagged command completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedResponse {
    pub tag: Tag,
    pub kind: StatusKind,
    pub text: ResponseText,
}

/// A command continuation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContinuationRequest {
    Basic(ResponseText),
    /// A server challenge in an AUTHENTICATE exchange.
    Base64(Vec<u8>),
}

/// A capability name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    Imap4Rev1,
    Auth(AuthMechanism),
    Compress { algorithm: CompressionAlgorithm },
    Condstore,
    Enable,
    Esearch,
    Idle,
    LiteralPlus,
    LiteralMinus,
    LoginDisabled,
    Metadata,
    MetadataServer,
    Move,
    Namespace,
    ObjectId,
    Preview,
    Qresync,
    Quota,
    SaslIr,
    SearchRes,
    StartTls,
    UidPlus,
    Unselect,
    Other(Atom),
}

impl From<Atom> for Capability {
    fn from(atom: Atom) -> Self {
        if let Some((left, right)) = atom.inner().split_once('=') {
            match left.to_ascii_uppercase().as_str() {
                "AUTH" => {
                    if let Ok(mechanism) = Atom::try_from(right) {
                        return Self::Auth(AuthMechanism::from(mechanism));
                    }
                }
                "COMPRESS" => {
                    if let Ok(algorithm) = Atom::try_from(right) {
                        return Self::Compress {
                            algorithm: CompressionAlgorithm::from(algorithm),
                        };
                    }
                }
                _ => {}
            }

            return Self::Other(atom);
        }

        match atom.inner().to_ascii_uppercase().as_str() {
            "IMAP4REV1" => Self::Imap4Rev1,
            "CONDSTORE" => Self::Condstore,
            "ENABLE" => Self::Enable,
            "ESEARCH" => Self::Esearch,
            "IDLE" => Self::Idle,
            "LITERAL+" => Self::LiteralPlus,
            "LITERAL-" => Self::LiteralMinus,
            "LOGINDISABLED" => Self::LoginDisabled,
            "METADATA" => Self::Metadata,
            "METADATA-SERVER" => Self::MetadataServer,
            "MOVE" => Self::Move,
            "NAMESPACE" => Self::Namespace,
            "OBJECTID" => Self::ObjectId,
            "PREVIEW" => Self::Preview,
            "QRESYNC" => Self::Qresync,
            "QUOTA" => Self::Quota,
            "SASL-IR" => Self::SaslIr,
            "SEARCHRES" => Self::SearchRes,
            "STARTTLS" => Self::StartTls,
            "UIDPLUS" => Self::UidPlus,
            "UNSELECT" => Self::Unselect,
            _ => Self::Other(atom),
        }
    }
}

/// A response text code, the `[...]` annotation of a status response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Code {
    Alert,
    /// `BADCHARSET` with the charsets the server does support.
    BadCharset { allowed: Vec<Charset> },
    Capability(Vec1<Capability>),
    Parse,
    PermanentFlags(Vec<FlagPerm>),
    ReadOnly,
    ReadWrite,
    TryCreate,
    UidNext(Uid),
    UidValidity(UidValidity),
    Unseen(SeqNum),
    /// `REFERRAL <url>` (RFC 2221)
    Referral(String),
    /// `COMPRESSIONACTIVE` (RFC 4978)
    CompressionActive,
    /// `OVERQUOTA` (RFC 9208)
    OverQuota,
    /// `TOOBIG` (RFC 4469)
    TooBig,
    /// `METADATA ...` (RFC 5464)
    Metadata(MetadataCode),
    /// `UNKNOWN-CTE` (RFC 3516)
    UnknownCte,
    /// `APPENDUID` (RFC 4315)
    AppendUid {
        uid_validity: UidValidity,
        uids: UidSet,
    },
    /// `COPYUID` (RFC 4315)
    CopyUid {
        uid_validity: UidValidity,
        source: UidSet,
        destination: UidSet,
    },
    /// `UIDNOTSTICKY` (RFC 4315)
    UidNotSticky,
    /// `NOMODSEQ` (RFC 7162)
    NoModSeq,
    /// `HIGHESTMODSEQ <n>` (RFC 7162)
    HighestModSeq(ModSeq),
    /// `MODIFIED <set>` (RFC 7162)
    Modified(SeqSet),
    /// `CLOSED` (RFC 7162)
    Closed,
    /// `NOTSAVED` (RFC 5182)
    NotSaved,
    /// `URLMECH INTERNAL[=access]` (RFC 4467), mechanisms kept verbatim.
    UrlMech(String),
    /// `MAILBOXID (<objectid>)` (RFC 8474)
    MailboxId(ObjectId),
    // RFC 5530 codes.
    AlreadyExists,
    AuthenticationFailed,
    AuthorizationFailed,
    Cannot,
    ClientBug,
    ContactAdmin,
    Corruption,
    Expired,
    ExpungeIssued,
    InUse,
    Limit,
    NonExistent,
    NoPerm,
    PrivacyRequired,
    ServerBug,
    Unavailable,
    UseAttr,
    /// An unrecognized code: the atom and everything up to `]`.
    Other(CodeOther),
}

/// An unrecognized response text code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeOther {
    pub atom: Atom,
    pub arguments: Option<String>,
}

/// Untagged data (`* ...`): mailbox data, message data, and the
/// extension payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Data {
    Capability(Vec1<Capability>),
    /// `* FLAGS (...)`
    Flags(Vec<Flag>),
    /// `* LIST (...) "/" name`
    List {
        items: Vec<FlagNameAttribute>,
        delimiter: Option<QuotedChar>,
        mailbox: Mailbox,
    },
    /// `* LSUB (...) "/" name`
    Lsub {
        items: Vec<FlagNameAttribute>,
        delimiter: Option<QuotedChar>,
        mailbox: Mailbox,
    },
    /// `* SEARCH 2 3 5 [(MODSEQ <n>)]`
    Search {
        ids: Vec<SeqNum>,
        /// RFC 7162 trailer; present when the SEARCH used MODSEQ.
        highest_mod_seq: Option<ModSeq>,
    },
    /// `* ESEARCH ...` (RFC 4731)
    Esearch(EsearchResponse),
    /// `* STATUS name (...)`
    Status {
        mailbox: Mailbox,
        items: Vec<StatusAttributeValue>,
    },
    /// `* <n> EXISTS`
    Exists(u32),
    /// `* <n> RECENT`
    Recent(u32),
    /// `* <n> EXPUNGE`
    Expunge(SeqNum),
    /// `* VANISHED [(EARLIER)] <uids>` (RFC 7162)
    Vanished { earlier: bool, uids: UidSet },
    /// `* <n> FETCH (...)`
    Fetch {
        seq: SeqNum,
        items: Vec1<MessageDataItem>,
    },
    /// `* ENABLED ...` (RFC 5161)
    Enabled { capabilities: Vec<Capability> },
    /// `* ID ...` (RFC 2971)
    Id {
        parameters: Option<Vec<(IString, NString)>>,
    },
    /// `* NAMESPACE ...` (RFC 2342)
    Namespace(NamespaceResponse),
    /// `* QUOTA root (...)` (RFC 2087/9208)
    Quota {
        root: AString,
        quotas: Vec1<QuotaGet>,
    },
    /// `* QUOTAROOT mailbox roots...` (RFC 2087/9208)
    QuotaRoot {
        mailbox: Mailbox,
        roots: Vec<AString>,
    },
    /// `* METADATA mailbox ...` (RFC 5464)
    Metadata {
        mailbox: Mailbox,
        value: MetadataResponse,
    },
    /// `* GENURLAUTH url...` (RFC 4467)
    GenUrlAuth(Vec1<AString>),
    /// `* URLFETCH (url data)...` (RFC 4467)
    UrlFetch(Vec<UrlFetchItem>),
}
