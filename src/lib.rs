#![doc = include_str!("../README.md")]

/// Articles, header blocks and field-name canonicalisation
pub mod article;
mod capabilities;
mod client;
/// Dot-stuffing codec for multi-line blocks (RFC 3977 §3.1.1)
pub mod codec;
/// NNTP command builders and response parsers
pub mod commands;
mod config;
mod date;
mod error;
mod message_id;
mod response;

pub use article::{Article, Headers};
pub use capabilities::Capabilities;
pub use client::{ArticleBody, ConnectionState, NntpClient};
pub use codec::{DotDecoder, DotReader, DotState, DotWriter};
pub use commands::{
    ArticleInfo, ArticleOverview, ArticleSelector, GroupDescriptionListItem, GroupListItem,
    GroupPermission, GroupStat, HeaderList, ListGroupArgs, OverSelector, OverviewFieldFormat,
    OverviewFieldType, Range,
};
pub use config::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_MULTILINE_TIMEOUT, DEFAULT_READ_TIMEOUT, ServerConfig,
};
pub use date::{NewsDate, Timestamp, parse_server_date};
pub use error::{NntpError, Result};
pub use message_id::{MAX_MESSAGE_ID_LEN, MIN_MESSAGE_ID_LEN, MessageId};
pub use response::{Family, NntpResponse, ResponseCode};
