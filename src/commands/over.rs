//! OVER/XOVER commands and overview data parsing

use crate::commands::Range;
use crate::date::Timestamp;
use crate::error::{NntpError, Result};
use crate::message_id::MessageId;

/// Which articles OVER and XOVER describe
///
/// A message-id wins over a range; with neither the current article is
/// described.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverSelector {
    /// Describe the article with this message-id (sent in full form)
    pub message_id: Option<MessageId>,
    /// Describe the articles in this range of the selected group
    pub range: Option<Range>,
}

impl OverSelector {
    /// The current article
    pub fn current() -> Self {
        Self::default()
    }

    /// A range of articles in the selected group
    pub fn range(range: Range) -> Self {
        Self {
            message_id: None,
            range: Some(range),
        }
    }

    /// One article by message-id
    pub fn message_id(id: impl Into<MessageId>) -> Self {
        Self {
            message_id: Some(id.into()),
            range: None,
        }
    }

    /// Argument for the request line, `None` for the current article
    pub fn resolve(&self) -> Option<String> {
        if let Some(id) = self.message_id.as_ref().filter(|id| !id.is_empty()) {
            return Some(id.full());
        }
        self.range.map(|range| range.to_string())
    }
}

impl From<Range> for OverSelector {
    fn from(range: Range) -> Self {
        Self::range(range)
    }
}

fn with_selector(command: &str, selector: &OverSelector) -> String {
    match selector.resolve() {
        Some(argument) => format!("{} {}\r\n", command, argument),
        None => format!("{}\r\n", command),
    }
}

/// Build OVER command (RFC 3977 §8.3)
pub fn over(selector: &OverSelector) -> String {
    with_selector("OVER", selector)
}

/// Build XOVER command (RFC 2980 §2.8), the pre-standard spelling of OVER
pub fn xover(selector: &OverSelector) -> String {
    with_selector("XOVER", selector)
}

/// Build LIST OVERVIEW.FMT command (RFC 3977 §8.4)
pub fn list_overview_fmt() -> &'static str {
    "LIST OVERVIEW.FMT\r\n"
}

/// One line of overview data
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArticleOverview {
    /// Article number within the newsgroup
    pub article_number: u64,
    /// Subject header
    pub subject: String,
    /// From header
    pub from: String,
    /// Date header, parsed on demand
    pub date: Timestamp,
    /// Message-ID header
    pub message_id: MessageId,
    /// References header (parent message-ids, for threading)
    pub references: String,
    /// Article size in octets; 0 if the server left the field empty
    pub bytes: u64,
    /// Body line count; 0 if the server left the field empty
    pub lines: u64,
    /// Fields after the eighth, verbatim and in order (usually `Xref: ...`)
    pub extra_fields: Vec<String>,
}

fn parse_count(field: &'static str, text: &str) -> Result<u64> {
    if text.is_empty() {
        return Ok(0);
    }
    parse_number(field, text)
}

fn parse_number(field: &'static str, text: &str) -> Result<u64> {
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NntpError::parse(field, text));
    }
    text.parse().map_err(|_| NntpError::parse(field, text))
}

/// Parse one OVER/XOVER line
///
/// Format: `number TAB subject TAB from TAB date TAB message-id TAB references
/// TAB bytes TAB lines [TAB extra ...]`
pub fn parse_overview_line(line: &str) -> Result<ArticleOverview> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 8 {
        return Err(NntpError::parse("overview line", line));
    }

    Ok(ArticleOverview {
        article_number: parse_number("overview article number", fields[0])?,
        subject: fields[1].to_string(),
        from: fields[2].to_string(),
        date: Timestamp::new(fields[3]),
        message_id: MessageId::new(fields[4]),
        references: fields[5].to_string(),
        bytes: parse_count("overview bytes field", fields[6])?,
        lines: parse_count("overview lines field", fields[7])?,
        extra_fields: fields[8..].iter().map(|f| f.to_string()).collect(),
    })
}

/// How a field in the overview format is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverviewFieldType {
    /// Header value only (`Subject:`)
    ShortHeader,
    /// Header name and value (`Xref:full`)
    FullHeader,
    /// Server metadata, not a header (`:bytes`)
    Metadata,
}

/// One entry of LIST OVERVIEW.FMT
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverviewFieldFormat {
    /// Header or metadata name without colons
    pub name: String,
    /// Presentation of the field
    pub field_type: OverviewFieldType,
}

use OverviewFieldType::{Metadata, ShortHeader};

/// The seven fields every overview starts with; each slot lists the
/// spellings servers use for it and what each spelling means
const FIXED_FIELDS: [&[(&str, &str, OverviewFieldType)]; 7] = [
    &[("Subject:", "Subject", ShortHeader)],
    &[("From:", "From", ShortHeader)],
    &[("Date:", "Date", ShortHeader)],
    &[("Message-ID:", "Message-ID", ShortHeader)],
    &[("References:", "References", ShortHeader)],
    &[("Bytes:", "Bytes", ShortHeader), (":bytes", "bytes", Metadata)],
    &[("Lines:", "Lines", ShortHeader), (":lines", "lines", Metadata)],
];

/// Parse the body of a LIST OVERVIEW.FMT reply
///
/// The first seven lines must name the fixed fields, matched
/// case-insensitively; later lines are `name:` (short header), `name:full`
/// (full header) or `:name` (metadata).
pub fn parse_overview_format(lines: &[String]) -> Result<Vec<OverviewFieldFormat>> {
    if lines.len() < FIXED_FIELDS.len() {
        return Err(NntpError::parse(
            "overview format",
            format!("{} lines, expected at least 7", lines.len()),
        ));
    }

    let mut formats = Vec::with_capacity(lines.len());
    for (spellings, line) in FIXED_FIELDS.iter().zip(lines) {
        let line = line.trim();
        let Some((_, name, field_type)) = spellings
            .iter()
            .find(|(spelling, _, _)| spelling.eq_ignore_ascii_case(line))
        else {
            return Err(NntpError::parse(
                format!("overview format (expected {})", spellings[0].0),
                line,
            ));
        };
        formats.push(OverviewFieldFormat {
            name: name.to_string(),
            field_type: *field_type,
        });
    }

    for line in &lines[FIXED_FIELDS.len()..] {
        formats.push(parse_extra_field(line.trim())?);
    }

    Ok(formats)
}

fn parse_extra_field(line: &str) -> Result<OverviewFieldFormat> {
    let invalid = || NntpError::parse("overview format field", line);

    let (name, rest) = line.split_once(':').ok_or_else(invalid)?;
    let (name, field_type) = if name.is_empty() {
        if rest.is_empty() {
            return Err(invalid());
        }
        (rest, OverviewFieldType::Metadata)
    } else if rest.eq_ignore_ascii_case("full") {
        (name, OverviewFieldType::FullHeader)
    } else {
        (name, OverviewFieldType::ShortHeader)
    };

    Ok(OverviewFieldFormat {
        name: name.to_string(),
        field_type,
    })
}
