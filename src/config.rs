//! NNTP server configuration

use std::time::Duration;

/// Default TCP connect (and TLS handshake) timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default timeout for reading a single-line response
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Default timeout for each read while receiving a multi-line block
pub const DEFAULT_MULTILINE_TIMEOUT: Duration = Duration::from_secs(180);

/// NNTP server configuration
///
/// Contains all the information needed to connect to an NNTP server.
///
/// # Example
///
/// ```
/// use nntp_engine::ServerConfig;
/// use std::time::Duration;
///
/// // Recommended: use the constructor methods
/// let config = ServerConfig::tls("news.example.com", "user", "pass");
///
/// // Tighter timeouts for a local server
/// let config = ServerConfig::plain("localhost", "", "")
///     .with_timeouts(Duration::from_secs(5), Duration::from_secs(10), Duration::from_secs(30));
/// assert_eq!(config.port, 119);
/// ```
#[must_use]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServerConfig {
    /// Server hostname (e.g., "news.example.com")
    pub host: String,

    /// Server port (typically 119 for plain, 563 for TLS)
    pub port: u16,

    /// Wrap the TCP connection in TLS
    #[cfg_attr(feature = "serde", serde(default = "default_tls"))]
    pub tls: bool,

    /// Allow insecure TLS connections (self-signed certificates, expired certificates)
    ///
    /// **Security Warning:** Setting this to `true` disables certificate validation,
    /// making your connection vulnerable to man-in-the-middle attacks. Only use this
    /// for testing or with servers you trust on a secure network.
    ///
    /// Default: `false` (secure certificate validation enabled)
    #[cfg_attr(feature = "serde", serde(default))]
    pub allow_insecure_tls: bool,

    /// Username for AUTHINFO USER
    pub username: String,

    /// Password for AUTHINFO PASS
    pub password: String,

    /// Limit on TCP connect and, separately, on the TLS handshake
    #[cfg_attr(
        feature = "serde",
        serde(default = "default_connect_timeout", with = "duration_secs")
    )]
    pub connect_timeout: Duration,

    /// Limit on reading one status line
    #[cfg_attr(
        feature = "serde",
        serde(default = "default_read_timeout", with = "duration_secs")
    )]
    pub read_timeout: Duration,

    /// Limit on reading a whole multi-line block, or on draining an unread
    /// body before the next command
    ///
    /// Streamed article bodies and POST/IHAVE uploads are not timed.
    #[cfg_attr(
        feature = "serde",
        serde(default = "default_multiline_timeout", with = "duration_secs")
    )]
    pub multiline_timeout: Duration,
}

#[cfg(feature = "serde")]
fn default_tls() -> bool {
    true
}

#[cfg(feature = "serde")]
fn default_connect_timeout() -> Duration {
    DEFAULT_CONNECT_TIMEOUT
}

#[cfg(feature = "serde")]
fn default_read_timeout() -> Duration {
    DEFAULT_READ_TIMEOUT
}

#[cfg(feature = "serde")]
fn default_multiline_timeout() -> Duration {
    DEFAULT_MULTILINE_TIMEOUT
}

/// Durations are written as whole seconds
#[cfg(feature = "serde")]
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

impl ServerConfig {
    /// Create a new server configuration with default timeouts
    ///
    /// # Arguments
    ///
    /// * `host` - Server hostname
    /// * `port` - Server port
    /// * `tls` - Whether to use TLS/SSL
    /// * `username` - Authentication username
    /// * `password` - Authentication password
    pub fn new(
        host: impl Into<String>,
        port: u16,
        tls: bool,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            tls,
            allow_insecure_tls: false,
            username: username.into(),
            password: password.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            multiline_timeout: DEFAULT_MULTILINE_TIMEOUT,
        }
    }

    /// Create a configuration for a TLS connection on the standard secure port (563)
    pub fn tls(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(host, 563, true, username, password)
    }

    /// Create a configuration for a plain connection on the standard port (119)
    ///
    /// **Warning:** Plain connections transmit credentials in clear text.
    /// Use TLS connections whenever possible.
    pub fn plain(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(host, 119, false, username, password)
    }

    /// Create a TLS configuration that accepts self-signed certificates
    ///
    /// **Security Warning:** This configuration disables certificate validation,
    /// making your connection vulnerable to man-in-the-middle attacks. Only use
    /// this for testing or with servers you trust on a secure network.
    pub fn tls_insecure(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let mut config = Self::tls(host, username, password);
        config.allow_insecure_tls = true;
        config
    }

    /// Replace the connect, single-line read and multi-line read timeouts
    pub fn with_timeouts(
        mut self,
        connect_timeout: Duration,
        read_timeout: Duration,
        multiline_timeout: Duration,
    ) -> Self {
        self.connect_timeout = connect_timeout;
        self.read_timeout = read_timeout;
        self.multiline_timeout = multiline_timeout;
        self
    }

    /// True if credentials are configured
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }
}
