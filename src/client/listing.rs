//! Newsgroup listing and information commands (RFC 3977 §7.3, §7.4, §7.6, §8.4, §8.6)
//!
//! This module contains the LIST variants, NEWGROUPS, and NEWNEWS.

use tracing::debug;

use super::NntpClient;
use crate::commands::{
    self, GroupDescriptionListItem, GroupListItem, HeaderList, OverviewFieldFormat,
};
use crate::date::NewsDate;
use crate::error::{NntpError, Result};
use crate::message_id::MessageId;
use crate::response::ResponseCode;

/// Parse every line of a block with `parse`, failing on the first bad line
fn parse_all<T>(lines: &[String], parse: fn(&str) -> Result<T>) -> Result<Vec<T>> {
    lines.iter().map(|line| parse(line)).collect()
}

impl NntpClient {
    /// List all active newsgroups (RFC 3977 §7.6.1)
    ///
    /// Plain `LIST`, answered like LIST ACTIVE without a wildmat.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::Parse`] - A line is not `group last first status`
    /// - [`NntpError::Protocol`] - Server returned an unexpected code
    pub async fn list(&mut self) -> Result<Vec<GroupListItem>> {
        let lines = self
            .block_command("LIST", commands::list(), ResponseCode::InformationFollows)
            .await?;
        parse_all(&lines, commands::parse_group_list_item)
    }

    /// List active newsgroups (RFC 3977 §7.6.3)
    ///
    /// Each entry carries the group's high and low water marks and its
    /// posting status.
    ///
    /// # Arguments
    ///
    /// * `wildmat` - Optional pattern (e.g. `"comp.*"`); `None` or empty lists every group
    ///
    /// # Errors
    ///
    /// Same as [`list`](Self::list).
    pub async fn list_active(&mut self, wildmat: Option<&str>) -> Result<Vec<GroupListItem>> {
        debug!("Listing active groups matching: {:?}", wildmat);
        let lines = self
            .block_command(
                "LIST ACTIVE",
                &commands::list_active(wildmat),
                ResponseCode::InformationFollows,
            )
            .await?;
        parse_all(&lines, commands::parse_group_list_item)
    }

    /// List newsgroups with descriptions (RFC 3977 §7.6.6)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::Parse`] - A line has no description
    /// - [`NntpError::Protocol`] - Server returned an unexpected code
    pub async fn list_newsgroups(
        &mut self,
        wildmat: Option<&str>,
    ) -> Result<Vec<GroupDescriptionListItem>> {
        let lines = self
            .block_command(
                "LIST NEWSGROUPS",
                &commands::list_newsgroups(wildmat),
                ResponseCode::InformationFollows,
            )
            .await?;
        parse_all(&lines, commands::parse_group_description)
    }

    /// Get the layout of OVER/XOVER lines (RFC 3977 §8.4)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::Parse`] - The seven fixed fields are missing or out of order
    /// - [`NntpError::Protocol`] - Server returned an unexpected code
    pub async fn list_overview_fmt(&mut self) -> Result<Vec<OverviewFieldFormat>> {
        let lines = self
            .block_command(
                "LIST OVERVIEW.FMT",
                commands::list_overview_fmt(),
                ResponseCode::InformationFollows,
            )
            .await?;
        commands::parse_overview_format(&lines)
    }

    /// List the header fields the server can return via HDR (RFC 3977 §8.6)
    ///
    /// # Errors
    ///
    /// Returns [`NntpError::Protocol`] if the server returns an unexpected code.
    pub async fn list_headers(&mut self) -> Result<HeaderList> {
        let lines = self
            .block_command(
                "LIST HEADERS",
                commands::list_headers(),
                ResponseCode::InformationFollows,
            )
            .await?;
        Ok(commands::parse_header_list(&lines))
    }

    /// List newsgroups created since `since` (RFC 3977 §7.3)
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use nntp_engine::{NntpClient, NewsDate};
    /// # async fn example(client: &mut NntpClient) -> nntp_engine::Result<()> {
    /// let since = NewsDate::from(chrono::Utc::now() - chrono::Duration::days(7));
    /// for group in client.newgroups(&since).await? {
    ///     println!("new group: {}", group.group);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Same as [`list`](Self::list).
    pub async fn newgroups(&mut self, since: &NewsDate) -> Result<Vec<GroupListItem>> {
        let lines = self
            .block_command(
                "NEWGROUPS",
                &commands::newgroups(since),
                ResponseCode::NewGroupsFollow,
            )
            .await?;
        parse_all(&lines, commands::parse_group_list_item)
    }

    /// List message-ids of articles posted to groups matching `wildmat`
    /// since `since` (RFC 3977 §7.4)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::InvalidParams`] - `wildmat` is empty (nothing is sent)
    /// - [`NntpError::Protocol`] - Server returned an unexpected code
    pub async fn newnews(&mut self, wildmat: &str, since: &NewsDate) -> Result<Vec<MessageId>> {
        if wildmat.is_empty() {
            return Err(NntpError::InvalidParams(
                "NEWNEWS requires a wildmat".to_string(),
            ));
        }

        let lines = self
            .block_command(
                "NEWNEWS",
                &commands::newnews(wildmat, since),
                ResponseCode::NewArticlesFollow,
            )
            .await?;
        Ok(lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(MessageId::new)
            .collect())
    }
}
