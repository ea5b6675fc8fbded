//! Server management and query commands
//!
//! This module implements server-level NNTP commands defined in
//! RFC 3977 §5.2 (CAPABILITIES), §5.3 (MODE READER), §5.4 (QUIT),
//! §7.1 (DATE) and §7.2 (HELP).

use chrono::{DateTime, Utc};
use tracing::debug;

use super::NntpClient;
use super::io::unexpected;
use super::state::ConnectionState;
use crate::capabilities::Capabilities;
use crate::commands;
use crate::date;
use crate::error::Result;
use crate::response::ResponseCode;

impl NntpClient {
    /// Request server capabilities (RFC 3977 §5.2)
    ///
    /// Use this to detect which commands and extensions the server supports
    /// before attempting to use them.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use nntp_engine::{NntpClient, ServerConfig};
    /// # use std::sync::Arc;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = ServerConfig::tls("news.example.com", "user", "pass");
    /// # let mut client = NntpClient::connect(Arc::new(config)).await?;
    /// let caps = client.capabilities().await?;
    /// if caps.supports_over() {
    ///     println!("Server supports OVER");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`NntpError::Protocol`](crate::NntpError::Protocol) for any
    /// code other than 101.
    pub async fn capabilities(&mut self) -> Result<Capabilities> {
        debug!("Requesting server capabilities");

        let lines = self
            .block_command(
                "CAPABILITIES",
                commands::capabilities(),
                ResponseCode::CapabilitiesFollow,
            )
            .await?;
        Ok(Capabilities::parse(&lines))
    }

    /// Switch to reader mode (RFC 3977 §5.3)
    ///
    /// Returns `true` if posting is allowed (code 200), `false` if posting is
    /// not permitted (code 201). The client's
    /// [`posting_allowed`](Self::posting_allowed) flag is updated to match.
    ///
    /// # Errors
    ///
    /// Returns [`NntpError::Protocol`](crate::NntpError::Protocol) for any
    /// other code (e.g. 502).
    pub async fn mode_reader(&mut self) -> Result<bool> {
        debug!("Switching to reader mode");

        self.send_command(commands::mode_reader()).await?;
        let response = self.read_response().await?;

        self.posting_allowed = match response.code {
            ResponseCode::ReadyPostingAllowed => true,
            ResponseCode::ReadyPostingProhibited => false,
            _ => return Err(unexpected("MODE READER", response)),
        };
        Ok(self.posting_allowed)
    }

    /// Get the server's current time (RFC 3977 §7.1)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::Parse`](crate::NntpError::Parse) - The reply is not `111 YYYYMMDDhhmmss`
    /// - [`NntpError::Protocol`](crate::NntpError::Protocol) - Server returned an unexpected code
    pub async fn date(&mut self) -> Result<DateTime<Utc>> {
        self.send_command(commands::date()).await?;
        let response = self.read_response().await?;

        match response.code {
            ResponseCode::ServerDate => date::parse_server_date(&response.message),
            _ => Err(unexpected("DATE", response)),
        }
    }

    /// Get the server's help text (RFC 3977 §7.2)
    ///
    /// # Errors
    ///
    /// Returns [`NntpError::Protocol`](crate::NntpError::Protocol) for any
    /// code other than 100.
    pub async fn help(&mut self) -> Result<Vec<String>> {
        self.block_command("HELP", commands::help(), ResponseCode::HelpFollows)
            .await
    }

    /// Close the connection gracefully (RFC 3977 §5.4)
    ///
    /// After a 205 reply every further command fails with
    /// [`NntpError::ConnectionClosed`](crate::NntpError::ConnectionClosed).
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use nntp_engine::{NntpClient, ServerConfig};
    /// # use std::sync::Arc;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = ServerConfig::tls("news.example.com", "user", "pass");
    /// # let mut client = NntpClient::connect(Arc::new(config)).await?;
    /// // ... use the client ...
    /// client.quit().await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`NntpError::Protocol`](crate::NntpError::Protocol) for any
    /// code other than 205.
    pub async fn quit(&mut self) -> Result<()> {
        debug!("Closing NNTP connection");

        self.send_command(commands::quit()).await?;
        let response = self.read_response().await?;

        match response.code {
            ResponseCode::ClosingConnection => {
                self.state = ConnectionState::Closed;
                Ok(())
            }
            _ => Err(unexpected("QUIT", response)),
        }
    }
}
