//! NNTP command builders and response parsers
//!
//! Builders return the complete request line, CRLF included. Parsers take the
//! status message or one body line and return typed values; they never touch
//! the connection.

pub mod article;
pub mod group;
pub mod list;
pub mod over;
pub mod response;

pub use article::*;
pub use group::*;
pub use list::*;
pub use over::*;
pub use response::*;

use std::fmt;

/// Inclusive article number range
///
/// `last == 0` means open-ended and renders as `first-`. A `first` of 0 is
/// not a valid article number and renders as 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    /// First article number
    pub first: u64,
    /// Last article number, 0 for no upper bound
    pub last: u64,
}

impl Range {
    /// Range from `first` to `last` inclusive
    pub fn new(first: u64, last: u64) -> Self {
        Self { first, last }
    }

    /// Every article from `first` onwards
    pub fn starting_at(first: u64) -> Self {
        Self { first, last: 0 }
    }

    /// True if the range has no upper bound
    pub fn is_open(&self) -> bool {
        self.last == 0
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.first.max(1);
        if self.last == 0 {
            write!(f, "{first}-")
        } else {
            write!(f, "{first}-{}", self.last)
        }
    }
}

/// Build AUTHINFO USER command (RFC 4643 §2.3)
pub fn authinfo_user(username: &str) -> String {
    format!("AUTHINFO USER {}\r\n", username)
}

/// Build AUTHINFO PASS command (RFC 4643 §2.3)
pub fn authinfo_pass(password: &str) -> String {
    format!("AUTHINFO PASS {}\r\n", password)
}

/// Build QUIT command
pub fn quit() -> &'static str {
    "QUIT\r\n"
}

/// Build CAPABILITIES command (RFC 3977 §5.2)
///
/// Response is multi-line, starting with 101.
pub fn capabilities() -> &'static str {
    "CAPABILITIES\r\n"
}

/// Build HELP command (RFC 3977 §7.2)
///
/// Response is multi-line, starting with 100.
pub fn help() -> &'static str {
    "HELP\r\n"
}

/// Build DATE command (RFC 3977 §7.1)
///
/// Response: 111 yyyymmddhhmmss
pub fn date() -> &'static str {
    "DATE\r\n"
}

/// Build MODE READER command (RFC 3977 §5.3)
pub fn mode_reader() -> &'static str {
    "MODE READER\r\n"
}

/// Build POST command (RFC 3977 §6.3.1)
///
/// The server answers 340 if it will accept an article.
pub fn post() -> &'static str {
    "POST\r\n"
}

/// Build IHAVE command (RFC 3977 §6.3.2)
///
/// Offers an article by message-id; 335 asks for it, 435/436 decline.
pub fn ihave(message_id: &str) -> String {
    format!("IHAVE {}\r\n", message_id)
}
