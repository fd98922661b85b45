//! Basic usage example for the newsdata library.
//!
//! Streams latest news page by page with a cap, stops on Ctrl-C, then lists
//! a few sources. Set `NEWSDATA_API_KEY` before running.

use newsdata::{LatestNewsQuery, NewsDataClient, NewsQuery, SourcesQuery, Timeframe};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = NewsDataClient::from_env()?;

    let query = LatestNewsQuery::new("artificial intelligence")
        .languages(["en"])
        .timeframe(Timeframe::Hours(12))
        .size(10);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    // Pages are fetched as the loop pulls; at most 25 articles come back
    let mut session = client.retrieve(query, 25, cancel)?;
    while let Some(item) = session.next().await {
        match item {
            Ok(article) => println!("- {} ({})", article.title, article.source_label()),
            Err(e) if e.is_cancelled() => {
                println!("Interrupted");
                break;
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }
    println!(
        "\n{} articles from {} pages",
        session.emitted(),
        session.pages_fetched()
    );

    let sources = client
        .list_sources(&SourcesQuery::new().country("us").category("technology"))
        .await?;
    println!("\nFirst technology sources in the US:");
    for source in sources.iter().take(5) {
        println!("  {} - {}", source.name, source.url);
    }

    Ok(())
}
