//! Server capability list (RFC 3977 Section 5.2)
//!
//! The CAPABILITIES command answers 101 followed by one capability per line,
//! each an uppercase label with optional space-separated arguments.

use std::collections::HashMap;

/// Capabilities advertised by an NNTP server
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Capability label (uppercased) to its arguments, e.g. "LIST" -> ["ACTIVE", "NEWSGROUPS"]
    entries: HashMap<String, Vec<String>>,
    /// Labels in the order the server sent them
    order: Vec<String>,
}

impl Capabilities {
    /// Create an empty capability list
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the lines of a 101 block
    ///
    /// Blank lines are skipped. A label listed twice keeps the arguments of
    /// its last occurrence.
    ///
    /// ```text
    /// VERSION 2
    /// READER
    /// POST
    /// LIST ACTIVE NEWSGROUPS OVERVIEW.FMT HEADERS
    /// ```
    pub fn parse(lines: &[String]) -> Self {
        let mut caps = Self::new();

        for line in lines {
            let mut parts = line.split_whitespace();
            let Some(label) = parts.next() else {
                continue;
            };

            let label = label.to_ascii_uppercase();
            let args: Vec<String> = parts.map(str::to_string).collect();
            if caps.entries.insert(label.clone(), args).is_none() {
                caps.order.push(label);
            }
        }

        caps
    }

    /// Check if a capability is advertised (case-insensitive)
    #[must_use]
    pub fn has(&self, capability: &str) -> bool {
        self.entries.contains_key(&capability.to_ascii_uppercase())
    }

    /// Arguments of a capability, or `None` if it is not advertised
    #[must_use]
    pub fn get_args(&self, capability: &str) -> Option<&[String]> {
        self.entries
            .get(&capability.to_ascii_uppercase())
            .map(Vec::as_slice)
    }

    /// Capability labels in server order
    pub fn list(&self) -> &[String] {
        &self.order
    }

    /// Check if a capability is advertised with a specific argument
    ///
    /// ```
    /// # use nntp_engine::Capabilities;
    /// let caps = Capabilities::parse(&["LIST ACTIVE OVERVIEW.FMT".to_string()]);
    /// assert!(caps.has_arg("LIST", "overview.fmt"));
    /// ```
    pub fn has_arg(&self, capability: &str, arg: &str) -> bool {
        self.get_args(capability)
            .is_some_and(|args| args.iter().any(|a| a.eq_ignore_ascii_case(arg)))
    }

    /// Protocol versions from the VERSION capability
    pub fn versions(&self) -> Vec<u32> {
        self.get_args("VERSION")
            .unwrap_or_default()
            .iter()
            .filter_map(|v| v.parse().ok())
            .collect()
    }

    /// True if the server advertises the OVER command
    pub fn supports_over(&self) -> bool {
        self.has("OVER")
    }
}
