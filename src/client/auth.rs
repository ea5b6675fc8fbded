//! NNTP authentication support (AUTHINFO USER/PASS, RFC 4643 §2.3)

use std::sync::Arc;

use tracing::debug;

use super::NntpClient;
use super::io::unexpected;
use crate::commands;
use crate::error::{NntpError, Result};
use crate::response::{NntpResponse, ResponseCode};

/// True for the codes that reject the credentials outright
fn is_rejection(code: ResponseCode) -> bool {
    matches!(
        code,
        ResponseCode::AuthenticationFailed
            | ResponseCode::AuthenticationRejected
            | ResponseCode::NotPermitted
    )
}

/// Map a failed AUTHINFO USER status to an error
fn auth_error(response: NntpResponse) -> NntpError {
    if is_rejection(response.code) {
        NntpError::AuthFailed(response.message)
    } else {
        unexpected("AUTHINFO", response)
    }
}

/// Map a non-281 status after AUTHINFO PASS to an error
///
/// Anything that is not a rejection leaves the exchange unfinished.
fn pass_error(response: NntpResponse) -> NntpError {
    if is_rejection(response.code) {
        NntpError::AuthFailed(response.message)
    } else {
        NntpError::AuthIncomplete(response.message)
    }
}

impl NntpClient {
    /// Authenticate with the username and password from the configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use nntp_engine::{NntpClient, ServerConfig};
    /// # use std::sync::Arc;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ServerConfig::tls("news.example.com", "user", "pass");
    /// let mut client = NntpClient::connect(Arc::new(config)).await?;
    /// client.authenticate().await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// See [`authenticate_with`](Self::authenticate_with).
    pub async fn authenticate(&mut self) -> Result<()> {
        let config = Arc::clone(&self.config);
        self.authenticate_with(&config.username, &config.password)
            .await
    }

    /// Authenticate with AUTHINFO USER, then AUTHINFO PASS if the server asks
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::InvalidParams`] - Empty username (nothing sent), or the
    ///   server asked for a password and `password` is empty (PASS not sent)
    /// - [`NntpError::AuthFailed`] - 481, 482 or 502
    /// - [`NntpError::AuthIncomplete`] - Any other code after AUTHINFO PASS,
    ///   381 included
    /// - [`NntpError::Protocol`] - Unexpected code after AUTHINFO USER
    pub async fn authenticate_with(&mut self, username: &str, password: &str) -> Result<()> {
        if username.is_empty() {
            return Err(NntpError::InvalidParams(
                "AUTHINFO requires a username".to_string(),
            ));
        }
        debug!("Authenticating as {}", username);

        self.send_command(&commands::authinfo_user(username)).await?;
        let response = self.read_response().await?;

        match response.code {
            ResponseCode::AuthenticationAccepted => {
                self.authenticated = true;
                debug!("Authentication successful (no password required)");
                return Ok(());
            }
            ResponseCode::AuthenticationContinue => {}
            _ => return Err(auth_error(response)),
        }

        if password.is_empty() {
            return Err(NntpError::InvalidParams(
                "server requires a password for AUTHINFO".to_string(),
            ));
        }

        self.send_command(&commands::authinfo_pass(password)).await?;
        let response = self.read_response().await?;

        match response.code {
            ResponseCode::AuthenticationAccepted => {
                self.authenticated = true;
                debug!("Authentication successful");
                Ok(())
            }
            _ => Err(pass_error(response)),
        }
    }
}
