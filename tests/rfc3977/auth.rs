//! RFC 4643 §2.3 - AUTHINFO USER/PASS as used by RFC 3977 readers

use super::mock::{self, Script};
use nntp_engine::NntpError;

#[tokio::test]
async fn test_authinfo_user_pass() {
    let script = Script::new()
        .expect("AUTHINFO USER wilma")
        .reply("381 Password required\r\n")
        .expect("AUTHINFO PASS flintstone")
        .reply("281 Authentication accepted\r\n");
    let (mut client, server) = mock::connect(script).await;

    client.authenticate_with("wilma", "flintstone").await.unwrap();
    assert!(client.is_authenticated());
    assert!(server.finish(client).await.is_empty());
}

#[tokio::test]
async fn test_authinfo_user_only() {
    let script = Script::new()
        .expect("AUTHINFO USER fred")
        .reply("281 Authentication accepted\r\n");
    let (mut client, server) = mock::connect(script).await;

    client.authenticate_with("fred", "").await.unwrap();
    assert!(client.is_authenticated());
    assert!(server.finish(client).await.is_empty());
}

#[tokio::test]
async fn test_authinfo_rejected() {
    let script = Script::new()
        .expect("AUTHINFO USER testuser")
        .reply("381 Password required\r\n")
        .expect("AUTHINFO PASS abcd1234!@#")
        .reply("481 Authentication failed\r\n")
        .expect("AUTHINFO USER testuser")
        .reply("482 Authentication commands issued out of sequence\r\n")
        .expect("AUTHINFO USER testuser")
        .reply("502 Command unavailable\r\n");
    let (mut client, server) = mock::connect(script).await;

    for _ in 0..3 {
        let err = client.authenticate().await.unwrap_err();
        assert!(matches!(err, NntpError::AuthFailed(_)), "{:?}", err);
        assert!(!client.is_authenticated());
    }
    assert!(!client.is_broken());
    server.finish(client).await;
}

#[tokio::test]
async fn test_authinfo_incomplete() {
    let script = Script::new()
        .expect("AUTHINFO USER testuser")
        .reply("381 Password required\r\n")
        .expect("AUTHINFO PASS abcd1234!@#")
        .reply("381 More authentication information required\r\n");
    let (mut client, server) = mock::connect(script).await;

    let err = client.authenticate().await.unwrap_err();
    assert!(matches!(err, NntpError::AuthIncomplete(_)));
    assert!(!client.is_authenticated());
    server.finish(client).await;
}

#[tokio::test]
async fn test_authinfo_unexpected_code_after_pass() {
    let script = Script::new()
        .expect("AUTHINFO USER testuser")
        .reply("381 Password required\r\n")
        .expect("AUTHINFO PASS abcd1234!@#")
        .reply("500 What?\r\n");
    let (mut client, server) = mock::connect(script).await;

    let err = client.authenticate().await.unwrap_err();
    assert!(matches!(err, NntpError::AuthIncomplete(ref m) if m == "What?"));
    assert!(!client.is_authenticated());
    assert!(!client.is_broken());
    server.finish(client).await;
}

#[tokio::test]
async fn test_authinfo_validation() {
    let script = Script::new()
        .expect("AUTHINFO USER nopass")
        .reply("381 Password required\r\n");
    let (mut client, server) = mock::connect(script).await;

    let err = client.authenticate_with("", "secret").await.unwrap_err();
    assert!(matches!(err, NntpError::InvalidParams(_)));

    // The server asks for a password we do not have: PASS is never sent.
    let err = client.authenticate_with("nopass", "").await.unwrap_err();
    assert!(matches!(err, NntpError::InvalidParams(_)));

    assert!(server.finish(client).await.is_empty());
}
