//! Connection state for the NNTP client

/// Where the client is in the request/response cycle
///
/// `Idle → AwaitingStatus → Idle` for single-line and fully collected
/// replies; `AwaitingStatus → BodyPending` when a body is handed to the
/// caller, back to `Idle` once the next command has drained it. `Closed`
/// follows QUIT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Ready for the next command
    Idle,
    /// Request written, status line not yet read
    AwaitingStatus,
    /// A dot-terminated body is still (partly) unread on the connection
    BodyPending,
    /// QUIT was acknowledged or the server closed the connection
    Closed,
}
