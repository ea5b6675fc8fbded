//! RFC 3977 §5.2, §5.3, §7.1, §7.2 - CAPABILITIES, MODE READER, DATE, HELP

use super::mock::{self, Script};
use chrono::{TimeZone, Utc};
use nntp_engine::NntpError;

#[tokio::test]
async fn test_capabilities() {
    let script = Script::new()
        .expect("CAPABILITIES")
        .reply(
            "101 Capability list:\r\n\
             VERSION 2\r\n\
             READER\r\n\
             IHAVE\r\n\
             POST\r\n\
             LIST ACTIVE NEWSGROUPS OVERVIEW.FMT HEADERS\r\n\
             OVER MSGID\r\n\
             .\r\n",
        );
    let (mut client, server) = mock::connect(script).await;

    let caps = client.capabilities().await.unwrap();
    assert!(caps.has("reader"));
    assert_eq!(caps.versions(), vec![2]);
    assert!(caps.has_arg("LIST", "overview.fmt"));
    assert!(caps.supports_over());
    assert_eq!(caps.get_args("OVER").unwrap(), &["MSGID".to_string()]);
    assert_eq!(caps.list().len(), 6);
    assert!(!caps.has("STREAMING"));
    server.finish(client).await;
}

#[tokio::test]
async fn test_mode_reader() {
    let script = Script::new()
        .expect("MODE READER")
        .reply("201 Reader mode, posting prohibited\r\n")
        .expect("MODE READER")
        .reply("200 Reader mode, posting permitted\r\n")
        .expect("MODE READER")
        .reply("502 Transit service only\r\n");
    let (mut client, server) = mock::connect(script).await;

    assert!(!client.mode_reader().await.unwrap());
    assert!(!client.posting_allowed());
    assert!(client.mode_reader().await.unwrap());
    assert!(client.posting_allowed());

    let err = client.mode_reader().await.unwrap_err();
    assert!(matches!(
        err,
        NntpError::Protocol { command: "MODE READER", code: 502, .. }
    ));
    server.finish(client).await;
}

#[tokio::test]
async fn test_date() {
    let script = Script::new()
        .expect("DATE")
        .reply("111 19990623135624\r\n")
        .expect("DATE")
        .reply("111 1999-06-23\r\n");
    let (mut client, server) = mock::connect(script).await;

    assert_eq!(
        client.date().await.unwrap(),
        Utc.with_ymd_and_hms(1999, 6, 23, 13, 56, 24).unwrap()
    );
    assert!(matches!(
        client.date().await.unwrap_err(),
        NntpError::Parse { .. }
    ));
    server.finish(client).await;
}

#[tokio::test]
async fn test_help() {
    let script = Script::new()
        .expect("HELP")
        .reply(
            "100 Help text follows\r\n\
             This is some help text.  There is no specific\r\n\
             formatting requirement for this test.\r\n\
             .\r\n",
        );
    let (mut client, server) = mock::connect(script).await;

    let text = client.help().await.unwrap();
    assert_eq!(
        text,
        vec![
            "This is some help text.  There is no specific",
            "formatting requirement for this test.",
        ]
    );
    server.finish(client).await;
}

#[tokio::test]
async fn test_capabilities_unexpected_code() {
    let script = Script::new()
        .expect("CAPABILITIES")
        .reply("500 What?\r\n");
    let (mut client, server) = mock::connect(script).await;

    let err = client.capabilities().await.unwrap_err();
    assert_eq!(err.code(), Some(500));
    assert!(err.to_string().contains("What?"));
    server.finish(client).await;
}
