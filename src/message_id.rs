//! Message-ID value type (RFC 3977 Section 3.6)
//!
//! A message-id travels in two spellings: the full form `<local@domain>` used
//! on the wire, and the short form without the angle brackets that callers
//! often store. [`MessageId`] keeps whatever it was given and converts on
//! demand.

use std::fmt;

use crate::{NntpError, Result};

/// Longest message-id RFC 3977 allows, brackets included
pub const MAX_MESSAGE_ID_LEN: usize = 250;

/// Shortest full message-id: `<` one octet `>`
pub const MIN_MESSAGE_ID_LEN: usize = 3;

/// Article message-id in full (`<...>`) or short form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MessageId(String);

impl MessageId {
    /// Wrap a message-id in either form without validating it
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id exactly as given
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for an empty id (no message-id set)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if the id is enclosed in angle brackets
    pub fn is_full(&self) -> bool {
        self.0.len() >= 2 && self.0.starts_with('<') && self.0.ends_with('>')
    }

    /// Full form, adding the brackets if they are missing
    ///
    /// ```
    /// use nntp_engine::MessageId;
    ///
    /// assert_eq!(MessageId::new("abc@example.com").full(), "<abc@example.com>");
    /// assert_eq!(MessageId::new("<abc@example.com>").full(), "<abc@example.com>");
    /// ```
    pub fn full(&self) -> String {
        if self.is_full() {
            self.0.clone()
        } else {
            format!("<{}>", self.0)
        }
    }

    /// Short form, stripping the brackets if present
    pub fn short(&self) -> &str {
        if self.is_full() {
            &self.0[1..self.0.len() - 1]
        } else {
            &self.0
        }
    }

    /// Validate the id as a full-form message-id
    ///
    /// # Errors
    ///
    /// Returns `NntpError::InvalidMessageId` if the id is shorter than 3 or
    /// longer than 250 octets, is not enclosed in `<` `>`, contains a `>`
    /// before the final octet, or contains anything outside printable
    /// US-ASCII (0x21-0x7E plus space).
    pub fn validate_full(&self) -> Result<()> {
        validate_full_str(&self.0)
    }

    /// Validate the id in whichever form it is held
    ///
    /// A short-form id is checked as if it had been wrapped in brackets.
    pub fn validate(&self) -> Result<()> {
        if self.is_full() {
            validate_full_str(&self.0)
        } else {
            validate_full_str(&self.full())
        }
    }
}

fn validate_full_str(id: &str) -> Result<()> {
    let invalid = |reason: &str| NntpError::InvalidMessageId(format!("{id:?}: {reason}"));

    if id.len() < MIN_MESSAGE_ID_LEN {
        return Err(invalid("too short"));
    }
    if id.len() > MAX_MESSAGE_ID_LEN {
        return Err(invalid("longer than 250 octets"));
    }
    if !id.starts_with('<') || !id.ends_with('>') {
        return Err(invalid("must be enclosed in angle brackets"));
    }
    if id[..id.len() - 1].contains('>') {
        return Err(invalid("contains '>' before the end"));
    }
    if !id.bytes().all(|b| (0x20..=0x7e).contains(&b)) {
        return Err(invalid("contains non-printable or non-ASCII octets"));
    }
    Ok(())
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for MessageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
