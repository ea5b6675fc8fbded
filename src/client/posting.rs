//! Article posting and transfer (RFC 3977 §6.3)
//!
//! POST and IHAVE share the second phase: the header block, a blank line and
//! the body go out through the dot encoder, then the server's final status is
//! read.

use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::debug;

use super::NntpClient;
use super::io::unexpected;
use super::state::ConnectionState;
use crate::article::Article;
use crate::commands;
use crate::error::{NntpError, Result};
use crate::message_id::MessageId;
use crate::response::ResponseCode;

impl NntpClient {
    /// Post an article (RFC 3977 §6.3.1)
    ///
    /// A non-empty `article.message_id` replaces any `Message-Id` header.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use nntp_engine::{NntpClient, Article, Headers};
    /// # async fn example(client: &mut NntpClient) -> nntp_engine::Result<()> {
    /// let mut headers = Headers::new();
    /// headers.insert("From", "poster@example.com");
    /// headers.insert("Newsgroups", "misc.test");
    /// headers.insert("Subject", "test");
    ///
    /// let body: &[u8] = b"Hello.\r\n.dots are stuffed\r\n";
    /// client.post(Article::new(headers, body)).await?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::PostingNotPermitted`] - 440
    /// - [`NntpError::PostingFailed`] - 441 after the article was sent
    /// - [`NntpError::Io`] - Sending the article failed; the client is then broken
    /// - [`NntpError::Protocol`] - Server returned an unexpected code
    pub async fn post<R>(&mut self, article: Article<R>) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        self.send_command(commands::post()).await?;
        let response = self.read_response().await?;

        match response.code {
            ResponseCode::PostingSend => {}
            ResponseCode::PostingProhibited => return Err(NntpError::PostingNotPermitted),
            _ => return Err(unexpected("POST", response)),
        }

        self.send_article(article).await?;
        let response = self.read_response().await?;

        match response.code {
            ResponseCode::PostingSuccess => {
                debug!("Article posted");
                Ok(())
            }
            ResponseCode::PostingFailure => Err(NntpError::PostingFailed(response.message)),
            _ => Err(unexpected("POST", response)),
        }
    }

    /// Offer an article for transfer (RFC 3977 §6.3.2)
    ///
    /// The message-id comes from `article.message_id`, or from the
    /// `Message-Id` header when that is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::InvalidParams`] - The article has no message-id (nothing is sent)
    /// - [`NntpError::InvalidMessageId`] - The message-id is malformed (nothing is sent)
    /// - [`NntpError::ArticleNotWanted`] - 435
    /// - [`NntpError::TransferNotPossible`] - 436, before or after the article was sent
    /// - [`NntpError::TransferRejected`] - 437
    ///
    /// Both 235 and 240 are accepted as success after the article is sent.
    /// - [`NntpError::Io`] - Sending the article failed; the client is then broken
    pub async fn ihave<R>(&mut self, article: Article<R>) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let message_id = if article.message_id.is_empty() {
            article
                .headers
                .as_ref()
                .and_then(|headers| headers.get("Message-Id"))
                .map(MessageId::new)
                .ok_or_else(|| {
                    NntpError::InvalidParams("IHAVE requires a message-id".to_string())
                })?
        } else {
            article.message_id.clone()
        };
        message_id.validate()?;

        self.send_command(&commands::ihave(&message_id.full()))
            .await?;
        let response = self.read_response().await?;

        match response.code {
            ResponseCode::TransferSend => {}
            ResponseCode::TransferUnwanted => return Err(NntpError::ArticleNotWanted),
            ResponseCode::TransferFailure => {
                return Err(NntpError::TransferNotPossible(response.message));
            }
            _ => return Err(unexpected("IHAVE", response)),
        }

        self.send_article(article).await?;
        let response = self.read_response().await?;

        match response.code {
            // Some servers answer a transfer with the posting code.
            ResponseCode::TransferSuccess | ResponseCode::PostingSuccess => {
                debug!("Article {} transferred", message_id);
                Ok(())
            }
            ResponseCode::TransferFailure => Err(NntpError::TransferNotPossible(response.message)),
            ResponseCode::TransferRejected => Err(NntpError::TransferRejected(response.message)),
            _ => Err(unexpected("IHAVE", response)),
        }
    }

    /// Write headers, blank line and dot-encoded body, then the terminator
    ///
    /// A failure part-way leaves an unterminated block on the wire, so the
    /// client is marked broken.
    async fn send_article<R>(&mut self, article: Article<R>) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let headers = article.headers_for_transfer();
        let body = article.body;

        let mut writer = self.dot_writer();
        let result = async {
            writer.write_all(headers.to_wire().as_bytes()).await?;
            writer.write_all(b"\r\n").await?;
            if let Some(mut body) = body {
                tokio::io::copy(&mut body, &mut writer).await?;
            }
            writer.shutdown().await?;
            Ok::<_, NntpError>(())
        }
        .await;

        if let Err(e) = result {
            self.mark_broken();
            return Err(e);
        }
        self.state = ConnectionState::AwaitingStatus;
        Ok(())
    }
}
