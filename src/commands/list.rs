//! LIST command variants, NEWNEWS, and group list parsing

use std::fmt;

use crate::date::NewsDate;
use crate::error::{NntpError, Result};

/// Build LIST command (RFC 3977 §7.6.1)
///
/// Without a keyword the server answers as for LIST ACTIVE.
pub fn list() -> &'static str {
    "LIST\r\n"
}

fn with_wildmat(command: &str, wildmat: Option<&str>) -> String {
    match wildmat.filter(|w| !w.is_empty()) {
        Some(wildmat) => format!("{} {}\r\n", command, wildmat),
        None => format!("{}\r\n", command),
    }
}

/// Build LIST ACTIVE command (RFC 3977 §7.6.3)
pub fn list_active(wildmat: Option<&str>) -> String {
    with_wildmat("LIST ACTIVE", wildmat)
}

/// Build LIST NEWSGROUPS command (RFC 3977 §7.6.6)
pub fn list_newsgroups(wildmat: Option<&str>) -> String {
    with_wildmat("LIST NEWSGROUPS", wildmat)
}

/// Build LIST HEADERS command (RFC 3977 §8.6)
pub fn list_headers() -> &'static str {
    "LIST HEADERS\r\n"
}

/// Build NEWNEWS command (RFC 3977 §7.4)
///
/// Format: `NEWNEWS wildmat yyyymmdd hhmmss [GMT]`
pub fn newnews(wildmat: &str, since: &NewsDate) -> String {
    format!("NEWNEWS {} {}\r\n", wildmat, since)
}

/// Posting status of a group in LIST ACTIVE and NEWGROUPS output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupPermission {
    /// `y`: posting permitted
    PostingPermitted,
    /// `n`: posting not permitted
    PostingForbidden,
    /// `m`: postings are forwarded to a moderator
    PostingModerated,
}

impl GroupPermission {
    /// Map the status character; `None` for anything but `y`, `n` or `m`
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'y' => Some(Self::PostingPermitted),
            'n' => Some(Self::PostingForbidden),
            'm' => Some(Self::PostingModerated),
            _ => None,
        }
    }

    /// Status character as sent on the wire
    pub fn as_char(self) -> char {
        match self {
            Self::PostingPermitted => 'y',
            Self::PostingForbidden => 'n',
            Self::PostingModerated => 'm',
        }
    }
}

impl fmt::Display for GroupPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Newsgroup entry from LIST ACTIVE or NEWGROUPS: `group last first status`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupListItem {
    /// Newsgroup name
    pub group: String,
    /// Highest article number
    pub last: u64,
    /// Lowest article number
    pub first: u64,
    /// Posting status
    pub permission: GroupPermission,
}

/// Parse one LIST ACTIVE / NEWGROUPS line
///
/// Requires four whitespace-separated fields; extra fields are ignored. The
/// status must be exactly one of `y`, `n`, `m`.
pub fn parse_group_list_item(line: &str) -> Result<GroupListItem> {
    let invalid = || NntpError::parse("group list line", line);

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(invalid());
    }

    let last = parts[1].parse().map_err(|_| invalid())?;
    let first = parts[2].parse().map_err(|_| invalid())?;

    let mut status = parts[3].chars();
    let permission = match (status.next(), status.next()) {
        (Some(c), None) => GroupPermission::from_char(c),
        _ => None,
    }
    .ok_or_else(invalid)?;

    Ok(GroupListItem {
        group: parts[0].to_string(),
        last,
        first,
        permission,
    })
}

/// Newsgroup entry from LIST NEWSGROUPS: `group description`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupDescriptionListItem {
    /// Newsgroup name
    pub group: String,
    /// Free-text description, runs of whitespace collapsed to single spaces
    pub description: String,
}

/// Parse one LIST NEWSGROUPS line
///
/// At least a name and one description word are required.
pub fn parse_group_description(line: &str) -> Result<GroupDescriptionListItem> {
    let mut parts = line.split_whitespace();
    let (Some(group), Some(first_word)) = (parts.next(), parts.next()) else {
        return Err(NntpError::parse("group description line", line));
    };

    let description = std::iter::once(first_word)
        .chain(parts)
        .collect::<Vec<_>>()
        .join(" ");

    Ok(GroupDescriptionListItem {
        group: group.to_string(),
        description,
    })
}

/// Header fields usable with HDR, from LIST HEADERS
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderList {
    /// True if the server accepts any header name (`:` line)
    pub any_field: bool,
    /// Named headers and `:metadata` items, in server order
    pub fields: Vec<String>,
}

/// Parse the body of a LIST HEADERS reply
///
/// A first line consisting of a lone `:` means any header may be requested;
/// it is not included in `fields`.
pub fn parse_header_list(lines: &[String]) -> HeaderList {
    let mut fields = lines.iter().map(|l| l.trim()).peekable();
    let mut list = HeaderList::default();

    if fields.peek() == Some(&":") {
        list.any_field = true;
        fields.next();
    }
    list.fields = fields
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    list
}
