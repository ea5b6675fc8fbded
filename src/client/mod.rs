//! NNTP client: one connection, one command at a time

mod articles;
mod auth;
mod connection;
mod group_ops;
mod io;
mod listing;
mod metadata;
mod posting;
mod server;
mod state;

pub use articles::ArticleBody;
pub use state::ConnectionState;

use crate::codec::DotDecoder;
use crate::config::ServerConfig;
use std::fmt;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tracing::debug;

/// Duplex byte stream the client runs on (TCP, TLS, or an in-memory pipe)
trait NntpIo: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> NntpIo for T {}

/// Buffered connection shared by the reader and writer side
type Stream = BufReader<Box<dyn NntpIo>>;

/// Async NNTP client
///
/// Every command takes `&mut self`, so commands on one client never
/// overlap. Article bodies are streamed: the [`ArticleBody`] returned by
/// [`article`](Self::article) and [`body`](Self::body) borrows the client
/// until dropped, and whatever the caller leaves unread is drained before
/// the next command goes out.
///
/// # Example
///
/// ```no_run
/// use nntp_engine::{NntpClient, Range, OverSelector, ServerConfig};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ServerConfig::tls("news.example.com", "user", "pass");
/// let mut client = NntpClient::connect(Arc::new(config)).await?;
/// client.authenticate().await?;
///
/// let group = client.group("alt.test").await?;
/// println!("Group has {} articles", group.count);
///
/// let range = Range::new(group.last.saturating_sub(10), group.last);
/// for entry in client.xover(&OverSelector::range(range)).await? {
///     println!("{} {}", entry.article_number, entry.subject);
/// }
/// # Ok(())
/// # }
/// ```
#[must_use]
pub struct NntpClient {
    /// Connection (both reader and writer)
    stream: Stream,
    /// Decoder of a body handed to the caller and possibly not fully read
    pending_body: Option<DotDecoder>,
    /// Request/response state
    state: ConnectionState,
    /// Server configuration
    config: Arc<ServerConfig>,
    /// Currently selected newsgroup
    current_group: Option<String>,
    /// Posting permission from the greeting or MODE READER
    posting_allowed: bool,
    /// AUTHINFO completed successfully
    authenticated: bool,
    /// Whether this connection is broken (framing lost, aborted transfer)
    is_broken: bool,
}

impl fmt::Debug for NntpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NntpClient")
            .field("state", &self.state)
            .field("current_group", &self.current_group)
            .field("posting_allowed", &self.posting_allowed)
            .field("authenticated", &self.authenticated)
            .field("is_broken", &self.is_broken)
            .finish_non_exhaustive()
    }
}

impl NntpClient {
    /// Check if this connection is broken and should be discarded
    pub fn is_broken(&self) -> bool {
        self.is_broken
    }

    /// Mark this connection as broken
    fn mark_broken(&mut self) {
        self.is_broken = true;
    }

    /// Current request/response state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Get the currently selected newsgroup, if any
    pub fn current_group(&self) -> Option<&str> {
        self.current_group.as_deref()
    }

    /// True if the server allows posting on this connection
    pub fn posting_allowed(&self) -> bool {
        self.posting_allowed
    }

    /// Check if the client is currently authenticated
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Configuration this client was created with
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

impl Drop for NntpClient {
    fn drop(&mut self) {
        debug!("NntpClient dropped");
    }
}
