//! Date handling: overview timestamps, NEWGROUPS/NEWNEWS arguments, DATE replies
//!
//! Three distinct formats meet here:
//!
//! - article `Date:` values as they appear in overview data
//!   (`Sun, 25 Sep 2022 03:03:36 GMT`, `25 Sep 22 03:03:37 +0000`), kept raw in
//!   [`Timestamp`] and parsed on demand;
//! - the `YYYYMMDD HHMMSS [GMT]` argument pair of NEWGROUPS and NEWNEWS
//!   ([`NewsDate`]);
//! - the `YYYYMMDDhhmmss` reply to DATE ([`parse_server_date`]).

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

use crate::{NntpError, Result};

/// Date string as sent by the server, parsed lazily
///
/// Overview data carries dates in whatever shape the posting agent produced,
/// so the raw text is always kept and [`to_datetime`](Self::to_datetime)
/// may fail on dates nothing could make sense of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Timestamp(String);

impl Timestamp {
    /// Wrap a raw date string
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The date exactly as sent
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the date
    ///
    /// Two layouts are tried in order, both with an optional leading
    /// `Day,` and an optional trailing `(comment)`:
    ///
    /// 1. `DD Mon YYYY HH:MM:SS +hhmm` (numeric offset)
    /// 2. `DD Mon YYYY HH:MM:SS ZONE` with `GMT`, `UT`, `UTC`, `Z` or one of
    ///    the North American zone names
    ///
    /// Two-digit years are read as 19xx/20xx the usual way (`22` → 2022).
    ///
    /// # Errors
    ///
    /// Returns `NntpError::Parse` if neither layout matches.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::Datelike;
    /// use nntp_engine::Timestamp;
    ///
    /// let ts = Timestamp::new("Sun, 25 Sep 22 03:03:37 UTC");
    /// assert_eq!(ts.to_datetime().unwrap().year(), 2022);
    /// ```
    pub fn to_datetime(&self) -> Result<DateTime<Utc>> {
        parse_article_date(&self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Timestamp {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for Timestamp {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// Offset in hours east of UTC for the zone names RFC 5322 still permits
fn named_zone_offset(zone: &str) -> Option<i32> {
    let hours = match zone.to_ascii_uppercase().as_str() {
        "GMT" | "UT" | "UTC" | "Z" => 0,
        "EST" => -5,
        "EDT" => -4,
        "CST" => -6,
        "CDT" => -5,
        "MST" => -7,
        "MDT" => -6,
        "PST" => -8,
        "PDT" => -7,
        _ => return None,
    };
    Some(hours)
}

fn parse_article_date(raw: &str) -> Result<DateTime<Utc>> {
    let invalid = || NntpError::parse("article date", raw);

    let without_comment = match raw.find('(') {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    let mut tokens: Vec<&str> = without_comment.split_whitespace().collect();
    if tokens.first().is_some_and(|t| t.ends_with(',')) {
        tokens.remove(0);
    }
    let [day, month, year, time, zone] = tokens[..] else {
        return Err(invalid());
    };

    let year_format = if year.len() == 2 { "%y" } else { "%Y" };
    let time_format = if time.matches(':').count() == 1 {
        "%H:%M"
    } else {
        "%H:%M:%S"
    };
    let layout = format!("%d %b {year_format} {time_format}");
    let stamp = format!("{day} {month} {year} {time}");

    // Numeric offset first, then a named zone.
    if let Ok(dt) = DateTime::parse_from_str(&format!("{stamp} {zone}"), &format!("{layout} %z")) {
        return Ok(dt.with_timezone(&Utc));
    }

    let hours = named_zone_offset(zone).ok_or_else(invalid)?;
    let offset = FixedOffset::east_opt(hours * 3600).ok_or_else(invalid)?;
    let naive = NaiveDateTime::parse_from_str(&stamp, &layout).map_err(|_| invalid())?;
    let local = offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(invalid)?;
    Ok(local.with_timezone(&Utc))
}

/// Date argument of NEWGROUPS and NEWNEWS
///
/// Rendered as `YYYYMMDD HHMMSS`, followed by `GMT` when the time is in UTC.
/// Without the suffix the server interprets the time in its own local zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsDate {
    datetime: NaiveDateTime,
    gmt: bool,
}

impl NewsDate {
    /// A UTC time, sent with the `GMT` suffix
    pub fn utc(datetime: DateTime<Utc>) -> Self {
        Self {
            datetime: datetime.naive_utc(),
            gmt: true,
        }
    }

    /// A time in the server's local zone, sent without suffix
    pub fn server_local(datetime: NaiveDateTime) -> Self {
        Self {
            datetime,
            gmt: false,
        }
    }

    /// True if the `GMT` suffix is sent
    pub fn is_gmt(&self) -> bool {
        self.gmt
    }
}

impl From<DateTime<Utc>> for NewsDate {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::utc(datetime)
    }
}

impl fmt::Display for NewsDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.datetime.format("%Y%m%d %H%M%S"))?;
        if self.gmt {
            f.write_str(" GMT")?;
        }
        Ok(())
    }
}

/// Parse the `YYYYMMDDhhmmss` payload of a 111 reply (always UTC)
pub fn parse_server_date(text: &str) -> Result<DateTime<Utc>> {
    let digits = text.split_whitespace().next().unwrap_or_default();
    if digits.len() != 14 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NntpError::parse("DATE response", text));
    }
    NaiveDateTime::parse_from_str(digits, "%Y%m%d%H%M%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| NntpError::parse("DATE response", text))
}
