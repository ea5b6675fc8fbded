//! Group selection and newsgroup-related commands

use crate::commands::Range;
use crate::date::NewsDate;
use crate::error::{NntpError, Result};

/// Build GROUP command
pub fn group(newsgroup: &str) -> String {
    format!("GROUP {}\r\n", newsgroup)
}

/// Build LISTGROUP command (RFC 3977 §6.1.2)
pub fn listgroup(args: &ListGroupArgs) -> String {
    match args.resolve() {
        Some(arguments) => format!("LISTGROUP {}\r\n", arguments),
        None => "LISTGROUP\r\n".to_string(),
    }
}

/// Build NEWGROUPS command (RFC 3977 §7.3)
///
/// Format: `NEWGROUPS yyyymmdd hhmmss [GMT]`
pub fn newgroups(since: &NewsDate) -> String {
    format!("NEWGROUPS {}\r\n", since)
}

/// Group summary from a 211 reply: `count first last group`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupStat {
    /// Estimated number of articles in the group
    pub count: u64,
    /// Number of the first article
    pub first: u64,
    /// Number of the last article
    pub last: u64,
    /// Newsgroup name as echoed by the server
    pub group: String,
}

/// Parse the status message of a 211 reply
///
/// Extra trailing tokens are ignored; fewer than four, or numbers that are
/// not base-10 `u64`, are a parse error.
pub fn parse_group_stat(message: &str) -> Result<GroupStat> {
    let invalid = || NntpError::parse("GROUP response", message);

    let mut parts = message.split_whitespace();
    let mut number = || -> Result<u64> {
        parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)
    };
    let count = number()?;
    let first = number()?;
    let last = number()?;
    let group = parts.next().ok_or_else(invalid)?.to_string();

    Ok(GroupStat {
        count,
        first,
        last,
        group,
    })
}

/// Arguments of LISTGROUP
///
/// Both parts are optional. A range is only sent together with a group
/// name; without a name the command applies to the selected group and the
/// range is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListGroupArgs {
    /// Group to select and list; `None` lists the currently selected group
    pub group: Option<String>,
    /// Restrict the listing to these article numbers
    pub range: Option<Range>,
}

impl ListGroupArgs {
    /// List the currently selected group
    pub fn current() -> Self {
        Self::default()
    }

    /// List every article of `group`
    pub fn group(group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            range: None,
        }
    }

    /// Restrict the listing to `range`
    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    /// Argument text for the request line, `None` for a bare LISTGROUP
    pub fn resolve(&self) -> Option<String> {
        let group = self.group.as_deref().filter(|g| !g.is_empty())?;
        Some(match self.range {
            Some(range) => format!("{} {}", group, range),
            None => group.to_string(),
        })
    }
}

/// Parse one LISTGROUP body line
///
/// Lines must be plain decimal article numbers; anything else, including
/// range-compressed server extensions, is a parse error naming the line.
pub fn parse_article_number(line: &str) -> Result<u64> {
    let trimmed = line.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NntpError::parse("LISTGROUP line", line));
    }
    trimmed
        .parse()
        .map_err(|_| NntpError::parse("LISTGROUP line", line))
}
