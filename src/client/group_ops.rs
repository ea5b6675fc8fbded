//! Group selection commands (RFC 3977 §6.1.1, §6.1.2)

use tracing::debug;

use super::NntpClient;
use super::io::unexpected;
use crate::commands::{self, GroupStat, ListGroupArgs};
use crate::error::{NntpError, Result};
use crate::response::ResponseCode;

impl NntpClient {
    /// Select a newsgroup
    ///
    /// Returns the [`GroupStat`] with article count and range.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::NoSuchGroup`] - The newsgroup does not exist
    /// - [`NntpError::Parse`] - The 211 status message is malformed
    /// - [`NntpError::Protocol`] - Server returned an unexpected code
    pub async fn group(&mut self, newsgroup: &str) -> Result<GroupStat> {
        debug!("Selecting newsgroup: {}", newsgroup);

        self.send_command(&commands::group(newsgroup)).await?;
        let response = self.read_response().await?;

        match response.code {
            ResponseCode::GroupSelected => {
                let stat = commands::parse_group_stat(&response.message)?;
                self.current_group = Some(stat.group.clone());
                debug!(
                    "Group {} selected: {} articles ({}-{})",
                    stat.group, stat.count, stat.first, stat.last
                );
                Ok(stat)
            }
            ResponseCode::NoSuchGroup => Err(NntpError::NoSuchGroup(newsgroup.to_string())),
            _ => Err(unexpected("GROUP", response)),
        }
    }

    /// List article numbers in a newsgroup (RFC 3977 §6.1.2)
    ///
    /// Selects the group like GROUP does. Without a group in `args` the
    /// currently selected group is listed and any range is ignored.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use nntp_engine::{NntpClient, ListGroupArgs, Range};
    /// # async fn example(client: &mut NntpClient) -> nntp_engine::Result<()> {
    /// let args = ListGroupArgs::group("misc.test").with_range(Range::starting_at(3000));
    /// let (stat, numbers) = client.listgroup(&args).await?;
    /// println!("{}: {} of {} articles", stat.group, numbers.len(), stat.count);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::NoSuchGroup`] - 411
    /// - [`NntpError::NoGroupSelected`] - 412, no group given and none selected
    /// - [`NntpError::Parse`] - Malformed status message or a non-numeric line
    pub async fn listgroup(&mut self, args: &ListGroupArgs) -> Result<(GroupStat, Vec<u64>)> {
        self.send_command(&commands::listgroup(args)).await?;
        let response = self.read_response().await?;

        match response.code {
            ResponseCode::GroupSelected => {
                // Read the block before parsing so the connection stays in step.
                let lines = self.read_dot_lines().await?;
                let stat = commands::parse_group_stat(&response.message)?;
                let numbers = lines
                    .iter()
                    .map(|line| commands::parse_article_number(line))
                    .collect::<Result<Vec<_>>>()?;

                self.current_group = Some(stat.group.clone());
                debug!("LISTGROUP {}: {} article numbers", stat.group, numbers.len());
                Ok((stat, numbers))
            }
            ResponseCode::NoSuchGroup => Err(NntpError::NoSuchGroup(
                args.group.clone().unwrap_or_default(),
            )),
            ResponseCode::NoGroupSelected => Err(NntpError::NoGroupSelected),
            _ => Err(unexpected("LISTGROUP", response)),
        }
    }
}
