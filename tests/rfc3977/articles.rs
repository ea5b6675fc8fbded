//! RFC 3977 §6.1.3-6.2.4 - Article retrieval and navigation
//!
//! ARTICLE/BODY hand out streamed bodies; these tests check dot-unstuffing,
//! draining of bodies the caller did not read, HEAD consuming its block,
//! and the error codes of each command.

use super::mock::{self, Script};
use nntp_engine::{ArticleSelector, ConnectionState, MessageId, NntpError};
use tokio::io::AsyncReadExt;

const ARTICLE_REPLY: &str = "220 3000234 <45223423@example.com>\r\n\
Path: pathost!demo!whitehouse!not-for-mail\r\n\
From: \"Demo User\" <nobody@example.net>\r\n\
Newsgroups: misc.test\r\n\
Subject: I am just a test article\r\n\
\tthat folds\r\n\
Message-ID: <45223423@example.com>\r\n\
\r\n\
This is just a test article.\r\n\
..A line that starts with a dot.\r\n\
.\r\n";

#[tokio::test]
async fn test_article_headers_and_streamed_body() {
    let script = Script::new()
        .expect("ARTICLE <45223423@example.com>")
        .reply(ARTICLE_REPLY);
    let (mut client, server) = mock::connect(script).await;

    let article = client
        .article(&ArticleSelector::message_id("45223423@example.com"))
        .await
        .unwrap();
    assert_eq!(article.number, 3000234);
    assert_eq!(article.message_id, MessageId::new("<45223423@example.com>"));

    let headers = article.headers.as_ref().unwrap();
    assert_eq!(headers.get("subject"), Some("I am just a test article that folds"));
    assert_eq!(headers.get("Message-Id"), Some("<45223423@example.com>"));
    assert_eq!(headers.get("From"), Some("\"Demo User\" <nobody@example.net>"));

    let body = article.body.unwrap().read_all().await.unwrap();
    assert_eq!(
        body,
        b"This is just a test article.\r\n.A line that starts with a dot.\r\n"
    );

    assert!(server.finish(client).await.is_empty());
}

#[tokio::test]
async fn test_unread_body_is_drained_before_next_command() {
    let script = Script::new()
        .expect("BODY 3000234")
        .reply("222 3000234 <45223423@example.com>\r\nline one\r\n\r\nline three\r\n.\r\n")
        .expect("STAT 3000235")
        .reply("223 3000235 <next@example.com>\r\n");
    let (mut client, server) = mock::connect(script).await;

    {
        let article = client.body(&ArticleSelector::number(3000234)).await.unwrap();
        assert!(article.headers.is_none());
        let mut body = article.body.unwrap();
        let mut first = [0u8; 4];
        body.read_exact(&mut first).await.unwrap();
        assert_eq!(&first, b"line");
        assert!(!body.is_finished());
    }
    assert_eq!(client.state(), ConnectionState::BodyPending);

    let info = client.stat(&ArticleSelector::number(3000235)).await.unwrap();
    assert_eq!(info.number, 3000235);
    assert_eq!(info.message_id.as_str(), "<next@example.com>");
    assert_eq!(client.state(), ConnectionState::Idle);

    assert!(server.finish(client).await.is_empty());
}

#[tokio::test]
async fn test_body_dropped_without_reading() {
    let script = Script::new()
        .expect("ARTICLE")
        .reply(ARTICLE_REPLY)
        .expect("NEXT")
        .reply("223 3000235 <45223424@example.com> retrieved\r\n");
    let (mut client, server) = mock::connect(script).await;

    let article = client.article(&ArticleSelector::current()).await.unwrap();
    drop(article);

    let info = client.next().await.unwrap();
    assert_eq!(info.number, 3000235);
    assert_eq!(info.message_id.short(), "45223424@example.com");
    assert!(server.finish(client).await.is_empty());
}

#[tokio::test]
async fn test_head_consumes_block() {
    let script = Script::new()
        .expect("HEAD 3000234")
        .reply(
            "221 3000234 <45223423@example.com>\r\n\
             Path: pathost!demo!whitehouse!not-for-mail\r\n\
             Subject: I am just a test article\r\n\
             .\r\n",
        )
        .expect("LAST")
        .reply("223 3000233 <prev@example.com>\r\n");
    let (mut client, server) = mock::connect(script).await;

    let article = client.head(&ArticleSelector::number(3000234)).await.unwrap();
    let headers = article.headers.unwrap();
    assert_eq!(headers.len(), 2);
    assert_eq!(headers.get("path"), Some("pathost!demo!whitehouse!not-for-mail"));
    assert!(article.body.is_none());
    assert_eq!(client.state(), ConnectionState::Idle);

    let info = client.last().await.unwrap();
    assert_eq!(info.number, 3000233);
    assert!(server.finish(client).await.is_empty());
}

#[tokio::test]
async fn test_message_id_wins_over_number() {
    let script = Script::new()
        .expect("STAT <both@example.com>")
        .reply("223 0 <both@example.com>\r\n");
    let (mut client, server) = mock::connect(script).await;

    let selector = ArticleSelector {
        message_id: Some(MessageId::new("both@example.com")),
        number: 17,
    };
    let info = client.stat(&selector).await.unwrap();
    assert_eq!(info.number, 0);
    server.finish(client).await;
}

#[tokio::test]
async fn test_retrieval_error_codes() {
    let script = Script::new()
        .expect("ARTICLE <missing@example.com>")
        .reply("430 No article with that message-id\r\n")
        .expect("BODY 99")
        .reply("423 No article with that number\r\n")
        .expect("HEAD")
        .reply("420 Current article number is invalid\r\n")
        .expect("STAT 1")
        .reply("412 No newsgroup selected\r\n")
        .expect("NEXT")
        .reply("421 No next article in this group\r\n")
        .expect("LAST")
        .reply("422 No previous article in this group\r\n")
        .expect("ARTICLE 5")
        .reply("503 program fault\r\n");
    let (mut client, server) = mock::connect(script).await;

    let err = client
        .article(&ArticleSelector::message_id("missing@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, NntpError::NoSuchArticle(ref id) if id == "<missing@example.com>"));

    let err = client.body(&ArticleSelector::number(99)).await.unwrap_err();
    assert!(matches!(err, NntpError::NoSuchArticle(ref id) if id == "99"));

    let err = client.head(&ArticleSelector::current()).await.unwrap_err();
    assert!(matches!(err, NntpError::NoCurrentArticle));

    let err = client.stat(&ArticleSelector::number(1)).await.unwrap_err();
    assert!(matches!(err, NntpError::NoGroupSelected));

    assert!(matches!(client.next().await.unwrap_err(), NntpError::NoSuchArticle(_)));
    assert!(matches!(client.last().await.unwrap_err(), NntpError::NoSuchArticle(_)));

    let err = client.article(&ArticleSelector::number(5)).await.unwrap_err();
    assert!(matches!(
        err,
        NntpError::Protocol { command: "ARTICLE", code: 503, ref message } if message == "program fault"
    ));

    assert!(!client.is_broken());
    assert!(server.finish(client).await.is_empty());
}

#[tokio::test]
async fn test_malformed_article_status_keeps_connection_in_step() {
    let script = Script::new()
        .expect("BODY")
        .reply("222 not-a-number <x@example.com>\r\nbody\r\n.\r\n")
        .expect("DATE")
        .reply("111 20240101120000\r\n");
    let (mut client, server) = mock::connect(script).await;

    let err = client.body(&ArticleSelector::current()).await.unwrap_err();
    assert!(matches!(err, NntpError::Parse { .. }));

    // The unread block is drained, so DATE reads its own reply.
    let date = client.date().await.unwrap();
    assert_eq!(date.to_rfc3339(), "2024-01-01T12:00:00+00:00");
    server.finish(client).await;
}

#[tokio::test]
async fn test_connection_closed_inside_header_block() {
    let script = Script::new()
        .expect("ARTICLE 1")
        .reply("220 1 <cut@example.com>\r\nFrom: a@example.com\r\nSubj")
        .close();
    let (mut client, server) = mock::connect(script).await;

    let err = client.article(&ArticleSelector::number(1)).await.unwrap_err();
    match err {
        NntpError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("expected unexpected EOF, got {:?}", other),
    }
    assert!(client.is_broken());
    server.finish(client).await;
}

#[tokio::test]
async fn test_connection_closed_inside_body() {
    let script = Script::new()
        .expect("BODY 1")
        .reply("222 1 <cut@example.com>\r\npartial body\r\nand mo")
        .close();
    let (mut client, server) = mock::connect(script).await;

    let article = client.body(&ArticleSelector::number(1)).await.unwrap();
    let err = article.body.unwrap().read_all().await.unwrap_err();
    match err {
        NntpError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("expected unexpected EOF, got {:?}", other),
    }

    // Draining the rest fails the same way and marks the client broken.
    assert!(client.date().await.is_err());
    assert!(client.is_broken());
    server.finish(client).await;
}
