//! RFC 3977 §8.3 / RFC 2980 §2.8 - OVER and XOVER

use super::mock::{self, Script};
use nntp_engine::{NntpError, OverSelector, Range};

const OVERVIEW_BLOCK: &str = "224 Overview information follows\r\n\
3000234\tI am just a test article\t\"Demo User\" <nobody@example.com>\t6 Oct 1998 04:38:40 -0500\t<45223423@example.com>\t<45454@example.net>\t1234\t17\tXref: news.example.com misc.test:3000363\r\n\
3000235\tAnother test article\tnobody@nowhere.to (Demo User)\t6 Oct 1998 04:38:45 -0500\t<45223425@to.to>\t\t4818\t37\t\tDistribution: fi\r\n\
.\r\n";

#[tokio::test]
async fn test_over_range() {
    let script = Script::new()
        .expect("OVER 3000234-3000240")
        .reply(OVERVIEW_BLOCK);
    let (mut client, server) = mock::connect(script).await;

    let entries = client
        .over(&OverSelector::range(Range::new(3000234, 3000240)))
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].subject, "I am just a test article");
    assert_eq!(entries[0].references, "<45454@example.net>");
    assert_eq!(entries[0].bytes, 1234);
    assert_eq!(entries[0].lines, 17);
    assert_eq!(
        entries[0].date.to_datetime().unwrap().to_rfc3339(),
        "1998-10-06T09:38:40+00:00"
    );

    // Empty trailing fields are kept in position.
    assert_eq!(entries[1].extra_fields, vec!["", "Distribution: fi"]);
    server.finish(client).await;
}

#[tokio::test]
async fn test_over_message_id_and_current() {
    let script = Script::new()
        .expect("OVER <45223423@example.com>")
        .reply("224 follows\r\n0\tsubject\tfrom\tdate\t<45223423@example.com>\t\t10\t1\r\n.\r\n")
        .expect("XOVER")
        .reply("224 follows\r\n.\r\n");
    let (mut client, server) = mock::connect(script).await;

    let entries = client
        .over(&OverSelector::message_id("45223423@example.com"))
        .await
        .unwrap();
    assert_eq!(entries[0].article_number, 0);

    let entries = client.xover(&OverSelector::current()).await.unwrap();
    assert!(entries.is_empty());
    server.finish(client).await;
}

#[tokio::test]
async fn test_over_open_range_from_zero() {
    let script = Script::new()
        .expect("XOVER 1-")
        .reply("224 follows\r\n.\r\n");
    let (mut client, server) = mock::connect(script).await;

    client
        .xover(&OverSelector::range(Range::starting_at(0)))
        .await
        .unwrap();
    server.finish(client).await;
}

#[tokio::test]
async fn test_over_errors() {
    let script = Script::new()
        .expect("OVER 1-10")
        .reply("412 No newsgroup selected\r\n")
        .expect("OVER 1-10")
        .reply("423 No articles in that range\r\n")
        .expect("OVER <gone@example.com>")
        .reply("430 No such article\r\n")
        .expect("OVER")
        .reply("420 Current article number is invalid\r\n");
    let (mut client, server) = mock::connect(script).await;

    let range = OverSelector::range(Range::new(1, 10));
    assert!(matches!(
        client.over(&range).await.unwrap_err(),
        NntpError::NoGroupSelected
    ));
    assert!(matches!(
        client.over(&range).await.unwrap_err(),
        NntpError::NoSuchArticle(ref r) if r == "1-10"
    ));
    assert!(matches!(
        client.over(&OverSelector::message_id("<gone@example.com>")).await.unwrap_err(),
        NntpError::NoSuchArticle(_)
    ));
    assert!(matches!(
        client.over(&OverSelector::current()).await.unwrap_err(),
        NntpError::NoCurrentArticle
    ));
    server.finish(client).await;
}

#[tokio::test]
async fn test_over_malformed_line() {
    let script = Script::new()
        .expect("XOVER 5-")
        .reply("224 follows\r\n5\tsubject\tfrom\tdate\t<id@x>\t\tbig\t1\r\n.\r\n")
        .expect("XOVER 5-")
        .reply("224 follows\r\n5\tsubject\tfrom\tdate\t<id@x>\t\r\n.\r\n");
    let (mut client, server) = mock::connect(script).await;

    let selector = OverSelector::range(Range::starting_at(5));
    match client.xover(&selector).await.unwrap_err() {
        NntpError::Parse { context, text } => {
            assert_eq!(context, "overview bytes field");
            assert_eq!(text, "big");
        }
        other => panic!("expected parse error, got {:?}", other),
    }
    assert!(matches!(
        client.xover(&selector).await.unwrap_err(),
        NntpError::Parse { .. }
    ));
    server.finish(client).await;
}
