//! Command-related types.

use std::num::NonZeroU32;

use crate::{
    auth::AuthMechanism,
    core::{AString, Charset, IString, NString, Secret, Tag, Vec1},
    extensions::{
        compress::CompressionAlgorithm,
        condstore_qresync::SelectParameter,
        metadata::{EntryValue, GetMetadataOption},
        quota::QuotaSet,
        urlauth::{RumpUrl, UrlAuthMechanism},
    },
    fetch::{FetchModifier, MacroOrFetchAttributes},
    flag::{Flag, StoreResponse, StoreType},
    identifier::{LastCommandSet, ModSeq, SeqSet, UidSet},
    mailbox::{ListMailbox, ListReturnOption, ListSelectOption, Mailbox},
    response::Capability,
    search::{SearchKey, SearchReturnOption, SearchScope},
    status::StatusAttribute,
};

/// A tagged command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub tag: Tag,
    pub body: CommandBody,
}

impl Command {
    pub fn new(tag: Tag, body: CommandBody) -> Self {
        Self { tag, body }
    }

    /// The keyword the command body dispatches on, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.body.name()
    }
}

/// The body of a command: the verb and its arguments.
///
/// `APPEND` has no variant here. Its message data is unbounded and is
/// therefore decoded through the command-stream entry point, which hands
/// payload octets back to the caller instead of buffering them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandBody {
    // Any state.
    Capability,
    Logout,
    Noop,
    /// `ID` (RFC 2971)
    Id {
        parameters: Option<Vec<(IString, NString)>>,
    },
    /// `COMPRESS` (RFC 4978)
    Compress { algorithm: CompressionAlgorithm },

    // Not authenticated.
    StartTls,
    Authenticate {
        mechanism: AuthMechanism,
        /// A SASL initial response (RFC 4959); `=` on the wire encodes an
        /// empty one.
        initial_response: Option<Secret<Vec<u8>>>,
    },
    Login {
        username: AString,
        password: Secret<AString>,
    },

    // Authenticated.
    Create { mailbox: Mailbox },
    Delete { mailbox: Mailbox },
    Rename { from: Mailbox, to: Mailbox },
    Select {
        mailbox: Mailbox,
        parameters: Vec<SelectParameter>,
    },
    Examine {
        mailbox: Mailbox,
        parameters: Vec<SelectParameter>,
    },
    Subscribe { mailbox: Mailbox },
    Unsubscribe { mailbox: Mailbox },
    Status {
        mailbox: Mailbox,
        items: Vec1<StatusAttribute>,
    },
    /// LIST, including the RFC 5258 extended form.
    List {
        selection: Vec<ListSelectOption>,
        reference: Mailbox,
        patterns: Vec1<ListMailbox>,
        returns: Vec<ListReturnOption>,
    },
    Lsub {
        reference: Mailbox,
        pattern: ListMailbox,
    },
    /// `ENABLE` (RFC 5161)
    Enable { capabilities: Vec1<Capability> },
    /// `IDLE` (RFC 2177). The terminating `DONE` line is a separate
    /// command-stream part.
    Idle,
    Namespace,
    /// `GETQUOTA` (RFC 2087/9208)
    GetQuota { root: AString },
    /// `GETQUOTAROOT` (RFC 2087/9208)
    GetQuotaRoot { mailbox: Mailbox },
    /// `SETQUOTA` (RFC 2087/9208)
    SetQuota {
        root: AString,
        quotas: Vec<QuotaSet>,
    },
    /// `SETMETADATA` (RFC 5464)
    SetMetadata {
        mailbox: Mailbox,
        entries: Vec1<EntryValue>,
    },
    /// `GETMETADATA` (RFC 5464)
    GetMetadata {
        options: Vec<GetMetadataOption>,
        mailbox: Mailbox,
        entries: Vec1<AString>,
    },
    /// `RESETKEY` (RFC 4467)
    ResetKey {
        mailbox: Option<(Mailbox, Vec<UrlAuthMechanism>)>,
    },
    /// `GENURLAUTH` (RFC 4467)
    GenUrlAuth { urls: Vec1<RumpUrl> },
    /// `URLFETCH` (RFC 4467)
    UrlFetch { urls: Vec1<AString> },
    /// `GETJMAPACCESS` (vendor)
    GetJmapAccess,

    // Selected.
    Check,
    Close,
    Unselect,
    Expunge,
    /// `UID EXPUNGE` (RFC 4315)
    UidExpunge { uids: UidSet },
    Search {
        returns: Option<Vec<SearchReturnOption>>,
        charset: Option<Charset>,
        key: SearchKey,
    },
    UidSearch {
        returns: Option<Vec<SearchReturnOption>>,
        charset: Option<Charset>,
        key: SearchKey,
    },
    /// `ESEARCH` (RFC 7377)
    Esearch {
        scope: Option<Vec1<SearchScope>>,
        returns: Option<Vec<SearchReturnOption>>,
        charset: Option<Charset>,
        key: SearchKey,
    },
    Fetch {
        set: LastCommandSet<SeqSet>,
        items: MacroOrFetchAttributes,
        modifiers: Vec<FetchModifier>,
    },
    UidFetch {
        set: LastCommandSet<UidSet>,
        items: MacroOrFetchAttributes,
        modifiers: Vec<FetchModifier>,
    },
    Store {
        set: LastCommandSet<SeqSet>,
        kind: StoreType,
        response: StoreResponse,
        flags: Vec<Flag>,
        unchanged_since: Option<ModSeq>,
    },
    UidStore {
        set: LastCommandSet<UidSet>,
        kind: StoreType,
        response: StoreResponse,
        flags: Vec<Flag>,
        unchanged_since: Option<ModSeq>,
    },
    Copy {
        set: LastCommandSet<SeqSet>,
        mailbox: Mailbox,
    },
    UidCopy {
        set: LastCommandSet<UidSet>,
        mailbox: Mailbox,
    },
    Move {
        set: LastCommandSet<SeqSet>,
        mailbox: Mailbox,
    },
    UidMove {
        set: LastCommandSet<UidSet>,
        mailbox: Mailbox,
    },
    /// `UIDBATCHES` (vendor)
    UidBatches { batch_size: NonZeroU32 },
}

impl CommandBody {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Capability => "CAPABILITY",
            Self::Logout => "LOGOUT",
            Self::Noop => "NOOP",
            Self::Id { .. } => "ID",
            Self::Compress { .. } => "COMPRESS",
            Self::StartTls => "STARTTLS",
            Self::Authenticate { .. } => "AUTHENTICATE",
            Self::Login { .. } => "LOGIN",
            Self::Create { .. } => "CREATE",
            Self::Delete { .. } => "DELETE",
            Self::Rename { .. } => "RENAME",
            Self::Select { .. } => "SELECT",
            Self::Examine { .. } => "EXAMINE",
            Self::Subscribe { .. } => "SUBSCRIBE",
            Self::Unsubscribe { .. } => "UNSUBSCRIBE",
            Self::Status { .. } => "STATUS",
            Self::List { .. } => "LIST",
            Self::Lsub { .. } => "LSUB",
            Self::Enable { .. } => "ENABLE",
            Self::Idle => "IDLE",
            Self::Namespace => "NAMESPACE",
            Self::GetQuota { .. } => "GETQUOTA",
            Self::GetQuotaRoot { .. } => "GETQUOTAROOT",
            Self::SetQuota { .. } => "SETQUOTA",
            Self::SetMetadata { .. } => "SETMETADATA",
            Self::GetMetadata { .. } => "GETMETADATA",
            Self::ResetKey { .. } => "RESETKEY",
            Self::GenUrlAuth { .. } => "GENURLAUTH",
            Self::UrlFetch { .. } => "URLFETCH",
            Self::GetJmapAccess => "GETJMAPACCESS",
            Self::Check => "CHECK",
            Self::Close => "CLOSE",
            Self::Unselect => "UNSELECT",
            Self::Expunge => "EXPUNGE",
            Self::UidExpunge { .. } => "UID EXPUNGE",
            Self::Search { .. } => "SEARCH",
            Self::UidSearch { .. } => "UID SEARCH",
            Self::Esearch { .. } => "ESEARCH",
            Self::Fetch { .. } => "FETCH",
            Self::UidFetch { .. } => "UID FETCH",
            Self::Store { .. } => "STORE",
            Self::UidStore { .. } => "UID STORE",
            Self::Copy { .. } => "COPY",
            Self::UidCopy { .. } => "UID COPY",
            Self::Move { .. } => "MOVE",
            Self::UidMove { .. } => "UID MOVE",
            Self::UidBatches { .. } => "UIDBATCHES",
        }
    }
}
