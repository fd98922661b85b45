//! Scripted in-memory transport for testing purposes.

use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::{Endpoint, NewsDataError, Transport};
use crate::models::{Article, NewsSource};
use crate::utils::QueryMap;

/// A transport that replays queued responses and records every call.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Vec<u8>, NewsDataError>>>,
    calls: Mutex<Vec<(Endpoint, QueryMap)>>,
    delay: Mutex<Option<Duration>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTransport {
    /// Create a new mock transport with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response body.
    pub fn push_body(&self, body: impl Into<Vec<u8>>) {
        lock(&self.responses).push_back(Ok(body.into()));
    }

    /// Queue a successful article page.
    pub fn push_page(&self, articles: &[Article], total_results: u64, next_page: Option<&str>) {
        let body = json!({
            "status": "success",
            "totalResults": total_results,
            "results": articles,
            "nextPage": next_page.unwrap_or_default(),
        });
        self.push_body(body.to_string());
    }

    /// Queue a successful sources listing.
    pub fn push_sources(&self, sources: &[NewsSource]) {
        let body = json!({
            "status": "success",
            "totalResults": sources.len(),
            "results": sources,
        });
        self.push_body(body.to_string());
    }

    /// Queue a failure.
    pub fn push_error(&self, error: NewsDataError) {
        lock(&self.responses).push_back(Err(error));
    }

    /// Delay every response, e.g. to cancel while a call is in flight.
    pub fn set_delay(&self, delay: Duration) {
        *lock(&self.delay) = Some(delay);
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<(Endpoint, QueryMap)> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// The `page` parameter of each call (`None` when omitted).
    pub fn page_tokens(&self) -> Vec<Option<String>> {
        lock(&self.calls)
            .iter()
            .map(|(_, params)| params.get("page").cloned())
            .collect()
    }

    /// Number of scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.responses).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, endpoint: Endpoint, params: &QueryMap) -> Result<Vec<u8>, NewsDataError> {
        lock(&self.calls).push((endpoint, params.clone()));

        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        lock(&self.responses).pop_front().unwrap_or_else(|| {
            Err(NewsDataError::Network(
                "mock transport has no scripted response".to_string(),
            ))
        })
    }
}

/// Helper function to create a mock article for testing.
pub fn make_article(article_id: &str, title: &str) -> Article {
    Article {
        article_id: article_id.to_string(),
        title: title.to_string(),
        link: format!("https://example.com/{}", article_id),
        source_id: "example".to_string(),
        ..Default::default()
    }
}

/// Create `count` articles with ids `{prefix}-{n}`.
pub fn make_articles(prefix: &str, count: usize) -> Vec<Article> {
    (0..count)
        .map(|n| make_article(&format!("{}-{}", prefix, n), &format!("Article {} {}", prefix, n)))
        .collect()
}
