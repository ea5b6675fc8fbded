//! Basic NNTP client example
//!
//! Run with: cargo run --example basic

use nntp_engine::{ArticleSelector, NntpClient, OverSelector, Range, ServerConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Replace with your actual server credentials
    let config = ServerConfig::new(
        std::env::var("NNTP_HOST").unwrap_or_else(|_| "news.example.com".to_string()),
        std::env::var("NNTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(563),
        true,
        std::env::var("NNTP_USER").unwrap_or_default(),
        std::env::var("NNTP_PASS").unwrap_or_default(),
    );

    println!("Connecting to {}:{}...", config.host, config.port);
    let mut client = NntpClient::connect(Arc::new(config)).await?;
    println!(
        "Connected (posting {})",
        if client.posting_allowed() { "allowed" } else { "not allowed" }
    );

    if client.config().has_credentials() {
        client.authenticate().await?;
        println!("Authenticated!");
    }

    let caps = client.capabilities().await?;
    println!("Server capabilities: {:?}", caps.list());

    let group = std::env::var("NNTP_GROUP").unwrap_or_else(|_| "alt.test".to_string());
    let stat = client.group(&group).await?;
    println!(
        "Selected group '{}': {} articles ({}-{})",
        stat.group, stat.count, stat.first, stat.last
    );

    if stat.count > 0 {
        let start = stat.last.saturating_sub(10).max(stat.first);
        let entries = client
            .xover(&OverSelector::range(Range::new(start, stat.last)))
            .await?;
        println!("\nLast {} articles:", entries.len());
        for entry in &entries {
            println!("  #{}: {}", entry.article_number, entry.subject);
        }

        // Stream the newest body without buffering the listing
        let article = client.body(&ArticleSelector::number(stat.last)).await?;
        if let Some(body) = article.body {
            let bytes = body.read_all().await?;
            println!("\nArticle {} body: {} bytes", article.message_id, bytes.len());
        }
    }

    client.quit().await?;
    println!("Disconnected");

    Ok(())
}
