//! NNTP error types

use thiserror::Error;

/// NNTP protocol and connection errors
#[derive(Error, Debug)]
pub enum NntpError {
    /// IO error during network operations
    ///
    /// A connection that closes in the middle of a dot-terminated block
    /// surfaces here with [`std::io::ErrorKind::UnexpectedEof`].
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS error during secure connection
    #[error("TLS error: {0}")]
    Tls(String),

    /// Connection or read timeout
    #[error("Connection timeout")]
    Timeout,

    /// Status line that is not `NNN text`
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Status message or body line that does not match the command's grammar
    #[error("Cannot parse {context}: {text:?}")]
    Parse {
        /// What was being parsed (e.g. "GROUP response", "overview bytes field")
        context: String,
        /// Offending raw text
        text: String,
    },

    /// Server answered with a code the command does not accept
    #[error("{command}: unexpected response {code}: {message}")]
    Protocol {
        /// Command keyword that was sent
        command: &'static str,
        /// NNTP response code
        code: u16,
        /// Message text from the server
        message: String,
    },

    /// Caller supplied arguments rejected before any I/O
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Message-id rejected by RFC 3977 §3.6 validation
    #[error("Invalid message-id: {0}")]
    InvalidMessageId(String),

    /// Authentication rejected (481, 482 or 502)
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Server still asked for more credentials after AUTHINFO PASS
    #[error("Authentication incomplete: {0}")]
    AuthIncomplete(String),

    /// No such newsgroup
    #[error("No such newsgroup: {0}")]
    NoSuchGroup(String),

    /// No such article
    #[error("No such article: {0}")]
    NoSuchArticle(String),

    /// No newsgroup selected
    #[error("No newsgroup selected")]
    NoGroupSelected,

    /// Current article number is invalid
    #[error("No current article selected")]
    NoCurrentArticle,

    /// Posting not permitted
    #[error("Posting not permitted")]
    PostingNotPermitted,

    /// Posting failed
    #[error("Posting failed: {0}")]
    PostingFailed(String),

    /// Article not wanted (IHAVE rejected)
    #[error("Article not wanted")]
    ArticleNotWanted,

    /// Transfer not possible; try again later
    #[error("Transfer not possible: {0}")]
    TransferNotPossible(String),

    /// Transfer rejected; do not retry
    #[error("Transfer rejected: {0}")]
    TransferRejected(String),

    /// Connection closed unexpectedly
    #[error("Connection closed")]
    ConnectionClosed,

    /// Connection is unusable after a framing error or an aborted transfer
    #[error("Connection is broken and must be re-established")]
    Broken,
}

impl NntpError {
    /// Build a parse error for `context` carrying the offending text
    pub(crate) fn parse(context: impl Into<String>, text: impl Into<String>) -> Self {
        NntpError::Parse {
            context: context.into(),
            text: text.into(),
        }
    }

    /// Response code carried by protocol-level errors, if any
    pub fn code(&self) -> Option<u16> {
        match self {
            NntpError::Protocol { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result type alias using NntpError
pub type Result<T> = std::result::Result<T, NntpError>;
