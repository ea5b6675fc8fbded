//! Overview retrieval (RFC 3977 §8.3, RFC 2980 §2.8)

use tracing::debug;

use super::NntpClient;
use super::io::unexpected;
use crate::commands::{self, ArticleOverview, OverSelector};
use crate::error::{NntpError, Result};
use crate::response::ResponseCode;

impl NntpClient {
    /// Fetch overview data with OVER (RFC 3977 §8.3)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::NoGroupSelected`] - 412, a range was given with no group selected
    /// - [`NntpError::NoCurrentArticle`] - 420
    /// - [`NntpError::NoSuchArticle`] - 423 (empty range) or 430 (unknown message-id)
    /// - [`NntpError::Parse`] - A line has fewer than 8 fields or a bad number
    pub async fn over(&mut self, selector: &OverSelector) -> Result<Vec<ArticleOverview>> {
        self.overview("OVER", &commands::over(selector), selector)
            .await
    }

    /// Fetch overview data with XOVER (RFC 2980 §2.8)
    ///
    /// Same reply format as [`over`](Self::over); for servers that predate
    /// RFC 3977.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use nntp_engine::{NntpClient, OverSelector, Range};
    /// # async fn example(client: &mut NntpClient) -> nntp_engine::Result<()> {
    /// let entries = client.xover(&OverSelector::range(Range::new(1000, 1100))).await?;
    /// for entry in entries {
    ///     println!("{}: {} ({} bytes)", entry.article_number, entry.subject, entry.bytes);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Same as [`over`](Self::over).
    pub async fn xover(&mut self, selector: &OverSelector) -> Result<Vec<ArticleOverview>> {
        self.overview("XOVER", &commands::xover(selector), selector)
            .await
    }

    async fn overview(
        &mut self,
        command: &'static str,
        request: &str,
        selector: &OverSelector,
    ) -> Result<Vec<ArticleOverview>> {
        self.send_command(request).await?;
        let response = self.read_response().await?;

        match response.code {
            ResponseCode::OverviewFollows => {}
            ResponseCode::NoGroupSelected => return Err(NntpError::NoGroupSelected),
            ResponseCode::NoArticleSelected => return Err(NntpError::NoCurrentArticle),
            ResponseCode::NoSuchArticleNumber | ResponseCode::NoSuchArticleId => {
                return Err(NntpError::NoSuchArticle(
                    selector.resolve().unwrap_or(response.message),
                ));
            }
            _ => return Err(unexpected(command, response)),
        }

        let lines = self.read_dot_lines().await?;
        let entries = lines
            .iter()
            .map(|line| commands::parse_overview_line(line))
            .collect::<Result<Vec<_>>>()?;

        debug!("{}: {} overview entries", command, entries.len());
        Ok(entries)
    }
}
