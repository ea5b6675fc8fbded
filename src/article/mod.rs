//! Articles as they travel over NNTP
//!
//! An [`Article`] pairs the number and message-id from a status line with an
//! optional header block and an optional body. Retrieval hands out bodies
//! that stream straight off the connection; posting accepts any async
//! reader as the body.

mod headers;

pub use self::headers::{Headers, canonical_key};

use crate::message_id::MessageId;

/// Article number, message-id, headers and body
///
/// Which parts are present depends on the command: ARTICLE fills both
/// `headers` and `body`, HEAD only `headers`, BODY only `body`. For posting,
/// a non-empty `message_id` overrides any `Message-Id` header.
#[derive(Debug, Default)]
pub struct Article<B> {
    /// Article number in the selected group (0 if unknown)
    pub number: u64,
    /// Message-id (may be empty)
    pub message_id: MessageId,
    /// Header block, if transferred
    pub headers: Option<Headers>,
    /// Body, if transferred
    pub body: Option<B>,
}

impl<B> Article<B> {
    /// Article to post: headers plus a body reader
    pub fn new(headers: Headers, body: B) -> Self {
        Self {
            number: 0,
            message_id: MessageId::default(),
            headers: Some(headers),
            body: Some(body),
        }
    }

    /// Set the message-id (overrides the `Message-Id` header when posting)
    pub fn with_message_id(mut self, message_id: impl Into<MessageId>) -> Self {
        self.message_id = message_id.into();
        self
    }

    /// Header block to send: the article's headers with the message-id applied
    pub fn headers_for_transfer(&self) -> Headers {
        let mut headers = self.headers.clone().unwrap_or_default();
        if !self.message_id.is_empty() {
            headers.set("Message-Id", self.message_id.full());
        }
        headers
    }

    /// Replace the body, keeping everything else
    pub fn map_body<C>(self, f: impl FnOnce(B) -> C) -> Article<C> {
        Article {
            number: self.number,
            message_id: self.message_id,
            headers: self.headers,
            body: self.body.map(f),
        }
    }
}
