//! # NewsData
//!
//! A typed async client for the [NewsData.io](https://newsdata.io) news API.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Articles, sources, query parameter sets and response decoding
//! - [`api`]: The [`Transport`] seam, the HTTP transport, errors and [`NewsDataClient`]
//! - [`utils`]: Field tables, validation and the paginated [`RetrievalSession`]
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```rust,no_run
//! use newsdata::{LatestNewsQuery, NewsDataClient, NewsDataError, NewsQuery};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), NewsDataError> {
//! let client = NewsDataClient::new("pub_xxx")?;
//! let articles = client
//!     .latest(LatestNewsQuery::new("climate").countries(["us"]), 25)
//!     .await?;
//! println!("{} articles", articles.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use api::{
    Endpoint, HttpTransport, MockTransport, NewsDataClient, NewsDataClientBuilder, NewsDataError,
    Transport,
};
pub use models::{
    ArchiveNewsQuery, Article, BaseFilters, CryptoNewsQuery, LatestNewsQuery, NewsQuery,
    NewsSource, QueryParams, Sentiment, SentimentStats, SourcesQuery, Timeframe,
};
pub use utils::{ArticleReceiver, RetrievalSession, ValidationError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
