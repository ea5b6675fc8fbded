//! Article retrieval and navigation commands

use crate::error::{NntpError, Result};
use crate::message_id::MessageId;

/// Which article ARTICLE, HEAD, BODY and STAT refer to
///
/// When both are set the message-id wins over the article number; with
/// neither the command applies to the current article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleSelector {
    /// Select by message-id (sent in full form)
    pub message_id: Option<MessageId>,
    /// Select by article number in the current group; 0 means unset
    pub number: u64,
}

impl ArticleSelector {
    /// The current article of the selected group
    pub fn current() -> Self {
        Self::default()
    }

    /// Select by article number
    pub fn number(number: u64) -> Self {
        Self {
            message_id: None,
            number,
        }
    }

    /// Select by message-id
    pub fn message_id(id: impl Into<MessageId>) -> Self {
        Self {
            message_id: Some(id.into()),
            number: 0,
        }
    }

    /// Argument for the request line, `None` for the current article
    pub fn resolve(&self) -> Option<String> {
        if let Some(id) = self.message_id.as_ref().filter(|id| !id.is_empty()) {
            return Some(id.full());
        }
        if self.number != 0 {
            return Some(self.number.to_string());
        }
        None
    }
}

impl From<u64> for ArticleSelector {
    fn from(number: u64) -> Self {
        Self::number(number)
    }
}

impl From<MessageId> for ArticleSelector {
    fn from(id: MessageId) -> Self {
        Self::message_id(id)
    }
}

fn with_selector(command: &str, selector: &ArticleSelector) -> String {
    match selector.resolve() {
        Some(argument) => format!("{} {}\r\n", command, argument),
        None => format!("{}\r\n", command),
    }
}

/// Build ARTICLE command
pub fn article(selector: &ArticleSelector) -> String {
    with_selector("ARTICLE", selector)
}

/// Build HEAD command
pub fn head(selector: &ArticleSelector) -> String {
    with_selector("HEAD", selector)
}

/// Build BODY command
pub fn body(selector: &ArticleSelector) -> String {
    with_selector("BODY", selector)
}

/// Build STAT command (RFC 3977 §6.2.4)
pub fn stat(selector: &ArticleSelector) -> String {
    with_selector("STAT", selector)
}

/// Build NEXT command (RFC 3977 §6.1.4)
pub fn next() -> &'static str {
    "NEXT\r\n"
}

/// Build LAST command (RFC 3977 §6.1.3)
pub fn last() -> &'static str {
    "LAST\r\n"
}

/// Article number and message-id from a 220-223 status line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArticleInfo {
    /// Article number (0 when the article was requested by message-id)
    pub number: u64,
    /// Message-id as sent by the server
    pub message_id: MessageId,
}

/// Parse the `n message-id` status message of ARTICLE, HEAD, BODY, STAT,
/// NEXT and LAST
///
/// Trailing text after the message-id is ignored.
pub fn parse_article_info(command: &str, message: &str) -> Result<ArticleInfo> {
    let invalid = || NntpError::parse(format!("{} response", command), message);

    let mut parts = message.split_whitespace();
    let number = parts
        .next()
        .and_then(|n| n.parse().ok())
        .ok_or_else(invalid)?;
    let message_id = parts.next().ok_or_else(invalid)?;

    Ok(ArticleInfo {
        number,
        message_id: MessageId::new(message_id),
    })
}
