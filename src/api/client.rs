//! The NewsData client.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, Instrument, Span};

use super::{Endpoint, HttpTransport, NewsDataError, Transport};
use crate::config::{find_config_file, load_config, Config};
use crate::models::{
    decode_sources, ArchiveNewsQuery, Article, CryptoNewsQuery, LatestNewsQuery, NewsQuery,
    NewsSource, QueryParams, SourcesQuery,
};
use crate::utils::RetrievalSession;

/// Typed client for the NewsData REST API.
///
/// Cheap to clone; clones share the transport and its connection pool.
///
/// ```rust,no_run
/// use newsdata::{LatestNewsQuery, NewsDataClient, NewsQuery};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), newsdata::NewsDataError> {
/// let client = NewsDataClient::new("pub_xxx")?;
/// let articles = client
///     .latest(LatestNewsQuery::new("rust").languages(["en"]), 20)
///     .await?;
/// for article in articles {
///     println!("{} ({})", article.title, article.source_label());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NewsDataClient {
    transport: Arc<dyn Transport>,
    span: Span,
}

impl NewsDataClient {
    pub fn builder() -> NewsDataClientBuilder {
        NewsDataClientBuilder::default()
    }

    /// Client for the production API with default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self, NewsDataError> {
        Self::builder().api_key(api_key).build()
    }

    pub fn from_config(config: &Config) -> Result<Self, NewsDataError> {
        Self::builder().config(config.clone()).build()
    }

    /// Load settings from the discovered config file and `NEWSDATA_*` variables
    pub fn from_env() -> Result<Self, NewsDataError> {
        let path = find_config_file();
        let config =
            load_config(path.as_deref()).map_err(|e| NewsDataError::Config(e.to_string()))?;
        Self::from_config(&config)
    }

    /// Client over any transport, e.g. [`MockTransport`](super::MockTransport)
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            span: default_span(),
        }
    }

    /// Start a paginated retrieval.
    ///
    /// The query is validated here, before any request. `cap` limits the
    /// number of articles produced (0 for everything the server reports).
    pub fn retrieve<Q: NewsQuery>(
        &self,
        query: Q,
        cap: u64,
        cancel: CancellationToken,
    ) -> Result<RetrievalSession<Q>, NewsDataError> {
        Ok(
            RetrievalSession::new(Arc::clone(&self.transport), query, cap, cancel)?
                .with_span(self.span.clone()),
        )
    }

    /// Retrieve every article up to `cap` into a `Vec`. Fails without
    /// partial results if any page fails.
    pub async fn retrieve_all<Q: NewsQuery>(
        &self,
        query: Q,
        cap: u64,
        cancel: CancellationToken,
    ) -> Result<Vec<Article>, NewsDataError> {
        self.retrieve(query, cap, cancel)?.collect_all().await
    }

    /// List news sources. This endpoint is not paginated.
    pub async fn list_sources(
        &self,
        query: &SourcesQuery,
    ) -> Result<Vec<NewsSource>, NewsDataError> {
        query.validate()?;
        let params = query.encode();

        let body = self
            .transport
            .get(Endpoint::Sources, &params)
            .instrument(self.span.clone())
            .await?;
        let page = decode_sources(&body)?;

        self.span
            .in_scope(|| debug!(sources = page.results.len(), "sources listed"));
        Ok(page.results)
    }

    /// Latest news (past 48 hours)
    pub async fn latest(
        &self,
        query: LatestNewsQuery,
        cap: u64,
    ) -> Result<Vec<Article>, NewsDataError> {
        self.retrieve_all(query, cap, CancellationToken::new()).await
    }

    /// Historical news
    pub async fn archive(
        &self,
        query: ArchiveNewsQuery,
        cap: u64,
    ) -> Result<Vec<Article>, NewsDataError> {
        self.retrieve_all(query, cap, CancellationToken::new()).await
    }

    /// Crypto news
    pub async fn crypto(
        &self,
        query: CryptoNewsQuery,
        cap: u64,
    ) -> Result<Vec<Article>, NewsDataError> {
        self.retrieve_all(query, cap, CancellationToken::new()).await
    }
}

fn default_span() -> Span {
    tracing::debug_span!("newsdata")
}

/// Builder for [`NewsDataClient`]
#[derive(Debug, Default)]
pub struct NewsDataClientBuilder {
    config: Config,
    transport: Option<Arc<dyn Transport>>,
    span: Option<Span>,
}

impl NewsDataClientBuilder {
    /// Start from loaded configuration. Later setters override it.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api.key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api.base_url = url.into();
        self
    }

    /// Per-request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.http.timeout_secs = secs;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.http.user_agent = user_agent.into();
        self
    }

    /// Use this transport instead of building an HTTP one
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Span that every request and retrieval is logged under
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn build(self) -> Result<NewsDataClient, NewsDataError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::from_config(&self.config)?),
        };

        Ok(NewsDataClient {
            transport,
            span: self.span.unwrap_or_else(default_span),
        })
    }
}
