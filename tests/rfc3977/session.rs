//! RFC 3977 §5 - Session lifecycle over a scripted connection
//!
//! Greeting handling, a full reader session (AUTHINFO, GROUP, XOVER),
//! QUIT, timeouts and framing errors.

use super::mock::{self, Script};
use chrono::{TimeZone, Utc};
use nntp_engine::{
    ConnectionState, NntpClient, NntpError, OverSelector, Range, ServerConfig,
};
use std::sync::Arc;
use std::time::Duration;

const USER: &str = "testuser";
const PASS: &str = "abcd1234!@#";

/// Overview lines of the session fixture, exactly as the server sends them
const XOVER_LINES: [&str; 11] = [
    "6084661434\t[081/112] \"BFMlDDFLa1SxxromF4cORw.part080.rar\" (2001/2947)\tKKsT8FSZc6uWH@ngPost.com\tSun, 25 Sep 2022 03:03:36 GMT\t<90094f167d034fc994736d02757f7d7b@ngPost>\t\t740105\t5691\tXref: e alt.binaries.test:6084661434",
    "6084661435\t[06/18] - \"0Vcc4lHHfyTlD03O0UyX3X.part05.rar\" yEnc (634/732) 524288000\t8oS8FBXSln <8oS8FBXSln@6Y7EjqT.5U>\tSun, 25 Sep 22 03:03:37 UTC\t<AgIxVaMfQgIxAhWcPlBwZvOp-1664075015428@nyuu>\t\t740336\t\tXref: e alt.binaries.test:6084661435",
    "6084661436\t[06/18] - \"0Vcc4lHHfyTlD03O0UyX3X.part05.rar\" yEnc (635/732) 524288000\t8oS8FBXSln <8oS8FBXSln@6Y7EjqT.5U>\tSun, 25 Sep 22 03:03:37 UTC\t<FjUqAeQlGkBgBpEaWaKxGrTo-1664075015663@nyuu>\t\t740436\t\tXref: e alt.binaries.test:6084661436",
    "6084661437\t[06/18] - \"0Vcc4lHHfyTlD03O0UyX3X.part05.rar\" yEnc (636/732) 524288000\t8oS8FBXSln <8oS8FBXSln@6Y7EjqT.5U>\tSun, 25 Sep 22 03:03:37 UTC\t<AqNgDhSmSuDkVzCkAbRzFgLi-1664075015866@nyuu>\t\t740423\t\tXref: e alt.binaries.test:6084661437",
    "6084661438\t[06/18] - \"0Vcc4lHHfyTlD03O0UyX3X.part05.rar\" yEnc (637/732) 524288000\t8oS8FBXSln <8oS8FBXSln@6Y7EjqT.5U>\tSun, 25 Sep 22 03:03:37 UTC\t<DdQmIoTzVkApQhGoNhIrUnUc-1664075015897@nyuu>\t\t740491\t\tXref: e alt.binaries.test:6084661438",
    "6084661439\t91f7599197524ead8e8172ce5ab9d2fa\tp1GculobIZUZv@ngPost.com\tSun, 25 Sep 2022 03:03:37 GMT\t<91f7599197524ead8e8172ce5ab9d2fa@ngPost>\t\t739952\t5690\tXref: e alt.binaries.test:6084661439 alt.binaries.misc:18216642898 a.b.boneless:192526866",
    "6084661440\t[06/18] - \"0Vcc4lHHfyTlD03O0UyX3X.part05.rar\" yEnc (638/732) 524288000\t8oS8FBXSln <8oS8FBXSln@6Y7EjqT.5U>\tSun, 25 Sep 22 03:03:38 UTC\t<XlHsSjSfRvVfBoTjToJuKwSf-1664075016038@nyuu>\t\t740497\t\tXref: e alt.binaries.test:6084661440",
    "6084661441\t[06/18] - \"0Vcc4lHHfyTlD03O0UyX3X.part05.rar\" yEnc (639/732) 524288000\t8oS8FBXSln <8oS8FBXSln@6Y7EjqT.5U>\tSun, 25 Sep 22 03:03:38 UTC\t<XpDnZfOcOoFpXiVrQfVjRpAr-1664075016335@nyuu>\t\t740326\t\tXref: e alt.binaries.test:6084661441",
    "6084661442\t[06/18] - \"0Vcc4lHHfyTlD03O0UyX3X.part05.rar\" yEnc (640/732) 524288000\t8oS8FBXSln <8oS8FBXSln@6Y7EjqT.5U>\tSun, 25 Sep 22 03:03:38 UTC\t<UkSwHrXmBvZdRcWuQwOaCvRl-1664075016553@nyuu>\t\t740473\t\tXref: e alt.binaries.test:6084661442",
    "6084661443\t[06/18] - \"0Vcc4lHHfyTlD03O0UyX3X.part05.rar\" yEnc (642/732) 524288000\t8oS8FBXSln <8oS8FBXSln@6Y7EjqT.5U>\tSun, 25 Sep 22 03:03:38 UTC\t<McTcBwYrEbMtObVrUfYqBfRz-1664075016757@nyuu>\t\t740426\t\tXref: e alt.binaries.test:6084661443",
    "6084661444\t[06/18] - \"0Vcc4lHHfyTlD03O0UyX3X.part05.rar\" yEnc (641/732) 524288000\t8oS8FBXSln <8oS8FBXSln@6Y7EjqT.5U>\tSun, 25 Sep 22 03:03:38 UTC\t<JlCkQlSoDmLfUgJmAzQcHoOw-1664075016616@nyuu>\t\t740316\t\tXref: e alt.binaries.test:6084661444",
];

/// Expected (bytes, lines) per fixture entry
const XOVER_SIZES: [(u64, u64); 11] = [
    (740105, 5691),
    (740336, 0),
    (740436, 0),
    (740423, 0),
    (740491, 0),
    (739952, 5690),
    (740497, 0),
    (740326, 0),
    (740473, 0),
    (740426, 0),
    (740316, 0),
];

#[tokio::test]
async fn test_reader_session_authinfo_group_xover() {
    let mut block = String::from("224 Overview Information Follows\r\n");
    for line in XOVER_LINES {
        block.push_str(line);
        block.push_str("\r\n");
    }
    block.push_str(".\r\n");

    let script = Script::bare()
        .reply("200 Welcome to Usenet\r\n")
        .expect(&format!("AUTHINFO USER {}", USER))
        .reply("381 PASS required\r\n")
        .expect(&format!("AUTHINFO PASS {}", PASS))
        .reply("281 Welcome to Usenet\r\n")
        .expect("GROUP alt.binaries.test")
        .reply("211 4582130111 1502531334 6084661444 alt.binaries.test\r\n")
        .expect("XOVER 6084661434-6084661444")
        .reply(&block);
    let (mut client, server) = mock::connect(script).await;

    assert!(client.posting_allowed());
    client.authenticate().await.unwrap();
    assert!(client.is_authenticated());

    let group = client.group("alt.binaries.test").await.unwrap();
    assert_eq!(group.count, 4582130111);
    assert_eq!(group.first, 1502531334);
    assert_eq!(group.last, 6084661444);
    assert_eq!(group.group, "alt.binaries.test");
    assert_eq!(client.current_group(), Some("alt.binaries.test"));

    let range = Range::new(group.last - 10, group.last);
    let entries = client.xover(&OverSelector::range(range)).await.unwrap();
    assert_eq!(entries.len(), 11);

    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.article_number, 6084661434 + i as u64);
        assert_eq!(entry.references, "");
        assert_eq!((entry.bytes, entry.lines), XOVER_SIZES[i]);
        assert_eq!(entry.extra_fields.len(), 1);
        assert!(entry.extra_fields[0].starts_with("Xref: e alt.binaries.test:"));
        assert!(entry.message_id.is_full());
        assert!(entry.date.to_datetime().is_ok());
    }

    let first = &entries[0];
    assert_eq!(
        first.subject,
        "[081/112] \"BFMlDDFLa1SxxromF4cORw.part080.rar\" (2001/2947)"
    );
    assert_eq!(first.from, "KKsT8FSZc6uWH@ngPost.com");
    assert_eq!(first.date.as_str(), "Sun, 25 Sep 2022 03:03:36 GMT");
    assert_eq!(
        first.message_id.as_str(),
        "<90094f167d034fc994736d02757f7d7b@ngPost>"
    );

    assert_eq!(entries[1].from, "8oS8FBXSln <8oS8FBXSln@6Y7EjqT.5U>");
    assert_eq!(
        entries[1].date.to_datetime().unwrap(),
        Utc.with_ymd_and_hms(2022, 9, 25, 3, 3, 37).unwrap()
    );
    assert_eq!(
        entries[5].extra_fields[0],
        "Xref: e alt.binaries.test:6084661439 alt.binaries.misc:18216642898 a.b.boneless:192526866"
    );
    assert_eq!(client.state(), ConnectionState::Idle);

    assert!(server.finish(client).await.is_empty());
}

#[tokio::test]
async fn test_greeting_posting_prohibited() {
    let script = Script::bare().reply("201 read only\r\n");
    let (client, server) = mock::connect(script).await;

    assert!(!client.posting_allowed());
    assert!(!client.is_authenticated());
    assert_eq!(client.state(), ConnectionState::Idle);
    server.finish(client).await;
}

#[tokio::test]
async fn test_greeting_rejected() {
    let script = Script::bare().reply("502 service permanently unavailable\r\n");
    let (io, _server) = mock::spawn(script);

    let err = NntpClient::from_stream(io, mock::config()).await.unwrap_err();
    assert!(matches!(
        err,
        NntpError::Protocol { command: "greeting", code: 502, .. }
    ));
}

#[tokio::test]
async fn test_greeting_connection_closed() {
    let script = Script::bare().close();
    let (io, _server) = mock::spawn(script);

    let err = NntpClient::from_stream(io, mock::config()).await.unwrap_err();
    assert!(matches!(err, NntpError::ConnectionClosed));
}

#[tokio::test]
async fn test_quit_closes_client() {
    let script = Script::new()
        .expect("QUIT")
        .reply("205 bye\r\n");
    let (mut client, server) = mock::connect(script).await;

    client.quit().await.unwrap();
    assert_eq!(client.state(), ConnectionState::Closed);

    let err = client.group("misc.test").await.unwrap_err();
    assert!(matches!(err, NntpError::ConnectionClosed));
    assert!(server.finish(client).await.is_empty());
}

#[tokio::test]
async fn test_malformed_status_line_breaks_connection() {
    let script = Script::new()
        .expect("DATE")
        .reply("2OO not a code\r\n");
    let (mut client, server) = mock::connect(script).await;

    let err = client.date().await.unwrap_err();
    assert!(matches!(err, NntpError::InvalidResponse(_)));
    assert!(client.is_broken());

    // Nothing more goes out on a broken connection.
    let err = client.date().await.unwrap_err();
    assert!(matches!(err, NntpError::Broken));
    assert!(server.finish(client).await.is_empty());
}

#[tokio::test]
async fn test_status_line_continuation_form_accepted() {
    let script = Script::new()
        .expect("MODE READER")
        .reply("201-posting not allowed\r\n");
    let (mut client, server) = mock::connect(script).await;

    assert!(!client.mode_reader().await.unwrap());
    server.finish(client).await;
}

#[tokio::test(start_paused = true)]
async fn test_read_timeout_breaks_connection() {
    let config = ServerConfig::plain("mock.example", "", "").with_timeouts(
        Duration::from_secs(5),
        Duration::from_secs(5),
        Duration::from_secs(10),
    );
    // The server answers the greeting, reads GROUP and never replies.
    let script = Script::new().expect("GROUP misc.test");
    let (io, server) = mock::spawn(script);
    let mut client = NntpClient::from_stream(io, Arc::new(config)).await.unwrap();

    let err = client.group("misc.test").await.unwrap_err();
    assert!(matches!(err, NntpError::Timeout));
    assert!(client.is_broken());
    server.finish(client).await;
}

#[tokio::test(start_paused = true)]
async fn test_multiline_timeout_covers_whole_block() {
    let config = ServerConfig::plain("mock.example", "", "").with_timeouts(
        Duration::from_secs(5),
        Duration::from_secs(5),
        Duration::from_secs(5),
    );
    // Every gap is shorter than the limit, the block as a whole is not.
    let script = Script::new()
        .expect("CAPABILITIES")
        .reply("101 Capability list:\r\nVERSION 2\r\n")
        .pause(Duration::from_secs(3))
        .reply("READER\r\n")
        .pause(Duration::from_secs(3));
    let (io, server) = mock::spawn(script);
    let mut client = NntpClient::from_stream(io, Arc::new(config)).await.unwrap();

    let start = tokio::time::Instant::now();
    let err = client.capabilities().await.unwrap_err();
    assert!(matches!(err, NntpError::Timeout));
    assert!(start.elapsed() < Duration::from_secs(6));
    assert!(client.is_broken());
    server.finish(client).await;
}
