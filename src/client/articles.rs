//! Article retrieval and navigation commands (RFC 3977 §6.1.3, §6.1.4, §6.2)
//!
//! This module implements NNTP commands for fetching articles and navigating
//! within a newsgroup:
//! - ARTICLE - Fetch full article (headers + streamed body)
//! - HEAD - Fetch headers only
//! - BODY - Fetch streamed body only
//! - STAT - Check article status without retrieving content
//! - NEXT - Navigate to next article
//! - LAST - Navigate to previous article

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};
use tracing::{debug, trace};

use super::io::unexpected;
use super::state::ConnectionState;
use super::{NntpClient, Stream};
use crate::article::Article;
use crate::codec::{DotDecoder, DotReader};
use crate::commands::{self, ArticleInfo, ArticleSelector};
use crate::error::{NntpError, Result};
use crate::response::{NntpResponse, ResponseCode};

/// Article body streamed off the connection
///
/// Reads yield the dot-decoded body and end at the terminator line. The body
/// borrows the client, so no other command can be issued while it is alive;
/// whatever is left unread when it is dropped is drained before the next
/// command.
pub struct ArticleBody<'a> {
    reader: DotReader<&'a mut Stream, &'a mut DotDecoder>,
}

impl<'a> ArticleBody<'a> {
    fn new(stream: &'a mut Stream, decoder: &'a mut DotDecoder) -> Self {
        Self {
            reader: DotReader::with_decoder(stream, decoder),
        }
    }

    /// True once the whole body (terminator included) has been read
    pub fn is_finished(&self) -> bool {
        self.reader.is_finished()
    }

    /// Read the rest of the body into memory
    ///
    /// # Errors
    ///
    /// [`NntpError::Io`] if the connection fails or closes before the
    /// terminator.
    pub async fn read_all(mut self) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        self.read_to_end(&mut body).await?;
        Ok(body)
    }

    /// Skip the rest of the body, returning how many decoded bytes were skipped
    pub async fn discard(mut self) -> Result<u64> {
        Ok(tokio::io::copy(&mut self, &mut tokio::io::sink()).await?)
    }
}

impl AsyncRead for ArticleBody<'_> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.get_mut().reader).poll_read(cx, buf)
    }
}

impl fmt::Debug for ArticleBody<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArticleBody")
            .field("finished", &self.is_finished())
            .finish_non_exhaustive()
    }
}

/// Map a failed ARTICLE/HEAD/BODY/STAT status to an error
fn retrieval_error(
    command: &'static str,
    selector: &ArticleSelector,
    response: NntpResponse,
) -> NntpError {
    match response.code {
        ResponseCode::NoGroupSelected => NntpError::NoGroupSelected,
        ResponseCode::NoArticleSelected => NntpError::NoCurrentArticle,
        ResponseCode::NoSuchArticleNumber | ResponseCode::NoSuchArticleId => {
            NntpError::NoSuchArticle(selector.resolve().unwrap_or(response.message))
        }
        _ => unexpected(command, response),
    }
}

/// Map a failed NEXT/LAST status to an error
fn navigation_error(command: &'static str, response: NntpResponse) -> NntpError {
    match response.code {
        ResponseCode::NoGroupSelected => NntpError::NoGroupSelected,
        ResponseCode::NoArticleSelected => NntpError::NoCurrentArticle,
        ResponseCode::NoNextArticle | ResponseCode::NoPreviousArticle => {
            NntpError::NoSuchArticle(response.message)
        }
        _ => unexpected(command, response),
    }
}

impl NntpClient {
    /// Send an article command and read its status line
    ///
    /// When the accepted code announces a block, the block is marked pending
    /// before the status message is parsed, so a malformed status still
    /// leaves the connection in step.
    async fn article_status(
        &mut self,
        command: &'static str,
        request: &str,
        accepted: ResponseCode,
        selector: &ArticleSelector,
    ) -> Result<ArticleInfo> {
        self.send_command(request).await?;
        let response = self.read_response().await?;

        if response.code != accepted {
            return Err(retrieval_error(command, selector, response));
        }
        if accepted != ResponseCode::ArticleSelected {
            self.pending_body = Some(DotDecoder::new());
            self.state = ConnectionState::BodyPending;
        }

        let info = commands::parse_article_info(command, &response.message)?;
        debug!("{}: article {} {}", command, info.number, info.message_id);
        Ok(info)
    }

    /// Fetch an article: headers are read, the body is handed out as a stream
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use nntp_engine::{NntpClient, ArticleSelector};
    /// # async fn example(client: &mut NntpClient) -> nntp_engine::Result<()> {
    /// let article = client.article(&ArticleSelector::message_id("abc@example.com")).await?;
    /// if let Some(subject) = article.headers.as_ref().and_then(|h| h.get("Subject")) {
    ///     println!("Subject: {}", subject);
    /// }
    /// if let Some(body) = article.body {
    ///     let text = body.read_all().await?;
    ///     println!("{} body bytes", text.len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::NoSuchArticle`] - 423 or 430
    /// - [`NntpError::NoGroupSelected`] / [`NntpError::NoCurrentArticle`] - 412 / 420
    /// - [`NntpError::Parse`] - Malformed status message or header block
    /// - [`NntpError::Protocol`] - Server returned an unexpected code
    pub async fn article(
        &mut self,
        selector: &ArticleSelector,
    ) -> Result<Article<ArticleBody<'_>>> {
        let info = self
            .article_status(
                "ARTICLE",
                &commands::article(selector),
                ResponseCode::ArticleFollows,
                selector,
            )
            .await?;

        let mut decoder = self.pending_body.take().unwrap_or_default();
        let headers = self.read_headers(&mut decoder).await;
        let decoder = self.pending_body.insert(decoder);
        let headers = headers?;

        Ok(Article {
            number: info.number,
            message_id: info.message_id,
            headers: Some(headers),
            body: Some(ArticleBody::new(&mut self.stream, decoder)),
        })
    }

    /// Fetch article headers only
    ///
    /// The whole block is consumed before returning.
    ///
    /// # Errors
    ///
    /// Same as [`article`](Self::article).
    pub async fn head(&mut self, selector: &ArticleSelector) -> Result<Article<()>> {
        let info = self
            .article_status(
                "HEAD",
                &commands::head(selector),
                ResponseCode::HeadFollows,
                selector,
            )
            .await?;

        let mut decoder = self.pending_body.take().unwrap_or_default();
        let headers = match self.read_headers(&mut decoder).await {
            Ok(headers) => headers,
            Err(e) => {
                self.pending_body = Some(decoder);
                return Err(e);
            }
        };

        let skipped = self.skip_block(&mut decoder).await?;
        if skipped > 0 {
            trace!("HEAD: skipped {} bytes after header block", skipped);
        }
        self.state = ConnectionState::Idle;

        Ok(Article {
            number: info.number,
            message_id: info.message_id,
            headers: Some(headers),
            body: None,
        })
    }

    /// Fetch an article body as a stream
    ///
    /// # Errors
    ///
    /// Same as [`article`](Self::article), minus header parsing.
    pub async fn body(&mut self, selector: &ArticleSelector) -> Result<Article<ArticleBody<'_>>> {
        let info = self
            .article_status(
                "BODY",
                &commands::body(selector),
                ResponseCode::BodyFollows,
                selector,
            )
            .await?;

        let decoder = self.pending_body.get_or_insert_with(DotDecoder::new);
        Ok(Article {
            number: info.number,
            message_id: info.message_id,
            headers: None,
            body: Some(ArticleBody::new(&mut self.stream, decoder)),
        })
    }

    /// Check that an article exists and select it, without transferring it
    ///
    /// # Errors
    ///
    /// Same as [`article`](Self::article).
    pub async fn stat(&mut self, selector: &ArticleSelector) -> Result<ArticleInfo> {
        self.article_status(
            "STAT",
            &commands::stat(selector),
            ResponseCode::ArticleSelected,
            selector,
        )
        .await
    }

    /// Move the current article pointer to the next article in the group
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::NoSuchArticle`] - 421, already at the last article
    /// - [`NntpError::NoGroupSelected`] / [`NntpError::NoCurrentArticle`] - 412 / 420
    pub async fn next(&mut self) -> Result<ArticleInfo> {
        self.navigate("NEXT", commands::next()).await
    }

    /// Move the current article pointer to the previous article in the group
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::NoSuchArticle`] - 422, already at the first article
    /// - [`NntpError::NoGroupSelected`] / [`NntpError::NoCurrentArticle`] - 412 / 420
    pub async fn last(&mut self) -> Result<ArticleInfo> {
        self.navigate("LAST", commands::last()).await
    }

    async fn navigate(&mut self, command: &'static str, request: &str) -> Result<ArticleInfo> {
        self.send_command(request).await?;
        let response = self.read_response().await?;

        match response.code {
            ResponseCode::ArticleSelected => {
                let info = commands::parse_article_info(command, &response.message)?;
                debug!("{}: now at article {}", command, info.number);
                Ok(info)
            }
            _ => Err(navigation_error(command, response)),
        }
    }
}
