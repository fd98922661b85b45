//! Parameter machinery and the retrieval engine.
//!
//! - [`FieldTable`] / [`encode_fields`]: static per-type field tables and the query-string encoder
//! - [`validate_fields`] / [`ValidationError`]: pre-flight rule checks driven by the same tables
//! - [`allowed`]: allow-lists for enumerated filters
//! - [`RetrievalSession`]: paginated, capped, cancellable article retrieval
//!
//! # Retrieval
//!
//! ```rust,no_run
//! use newsdata::{LatestNewsQuery, NewsDataClient, NewsQuery};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), newsdata::NewsDataError> {
//! let client = NewsDataClient::from_env()?;
//! let query = LatestNewsQuery::new("rust").languages(["en"]);
//!
//! let mut session = client.retrieve(query, 100, CancellationToken::new())?;
//! while let Some(article) = session.next().await {
//!     println!("{}", article?.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod allowed;
mod fields;
mod streaming;
mod validate;

pub use fields::{encode_fields, Field, FieldTable, FieldValue, QueryMap, DATE_FORMAT, LIST_SEPARATOR};
pub use streaming::{ArticleReceiver, RetrievalSession, MAX_SPAWN_BUFFER};
pub use validate::{validate_fields, Rule, ValidationError, MAX_LIST_ITEMS, MAX_QUERY_LEN};
