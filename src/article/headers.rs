//! MIME-style header block (RFC 5322 §2.2, RFC 5536 §3)
//!
//! Field names are canonicalised the way MIME readers do it: the first
//! letter and every letter after a hyphen upper case, the rest lower case
//! (`message-id` → `Message-Id`). A field may repeat; all values are kept,
//! and fields serialise in the order they were first inserted.

use crate::error::{NntpError, Result};

/// True for the octets allowed in a header field name
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_graphic() && b != b':'
}

/// Canonical spelling of a header field name
///
/// Names containing anything other than printable ASCII (or a colon) are
/// returned unchanged.
///
/// ```
/// use nntp_engine::article::canonical_key;
///
/// assert_eq!(canonical_key("message-id"), "Message-Id");
/// assert_eq!(canonical_key("X-NO-ARCHIVE"), "X-No-Archive");
/// ```
pub fn canonical_key(name: &str) -> String {
    if name.is_empty() || !name.bytes().all(is_token_byte) {
        return name.to_string();
    }

    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

/// Ordered multimap of header fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Headers {
    fields: Vec<(String, Vec<String>)>,
}

impl Headers {
    /// Empty header block
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|(name, _)| name == key)
    }

    /// Append a value, keeping any existing values of the field
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let key = canonical_key(name);
        match self.position(&key) {
            Some(i) => self.fields[i].1.push(value.into()),
            None => self.fields.push((key, vec![value.into()])),
        }
    }

    /// Replace every value of the field with `value`
    ///
    /// An existing field keeps its position.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let key = canonical_key(name);
        match self.position(&key) {
            Some(i) => self.fields[i].1 = vec![value.into()],
            None => self.fields.push((key, vec![value.into()])),
        }
    }

    /// First value of a field (name matched case-insensitively)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// All values of a field, in the order received
    pub fn get_all(&self, name: &str) -> &[String] {
        self.position(&canonical_key(name))
            .map(|i| self.fields[i].1.as_slice())
            .unwrap_or_default()
    }

    /// True if the field is present
    pub fn contains(&self, name: &str) -> bool {
        self.position(&canonical_key(name)).is_some()
    }

    /// Remove a field and return its values
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let i = self.position(&canonical_key(name))?;
        Some(self.fields.remove(i).1)
    }

    /// Number of distinct fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if there are no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `(name, value)` pairs in serialisation order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name.as_str(), v.as_str())))
    }

    /// Serialise as `Name: value` CRLF lines (no terminating blank line)
    pub fn to_wire(&self) -> String {
        let mut out = String::new();
        for (name, value) in self.iter() {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push_str("\r\n");
        }
        out
    }

    /// Parse header lines (line terminators already stripped)
    ///
    /// Parsing stops at the first empty line. Lines starting with a space or
    /// tab continue the previous field; the fold is replaced by one space.
    ///
    /// # Errors
    ///
    /// Returns `NntpError::Parse` for a line without a colon, an empty field
    /// name, or a continuation line with no field to continue.
    pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let mut headers = Headers::new();
        let mut current: Option<(String, String)> = None;

        for line in lines {
            let line = line.as_ref();
            if line.is_empty() {
                break;
            }

            if line.starts_with(' ') || line.starts_with('\t') {
                let Some((_, value)) = current.as_mut() else {
                    return Err(NntpError::parse("header continuation line", line));
                };
                let continuation = line.trim();
                if !continuation.is_empty() {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(continuation);
                }
                continue;
            }

            if let Some((name, value)) = current.take() {
                headers.insert(&name, value);
            }

            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| NntpError::parse("header line", line))?;
            let name = name.trim_end();
            if name.is_empty() {
                return Err(NntpError::parse("header line", line));
            }
            current = Some((name.to_string(), value.trim().to_string()));
        }

        if let Some((name, value)) = current {
            headers.insert(&name, value);
        }

        Ok(headers)
    }
}
