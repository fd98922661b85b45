//! Paginated article retrieval.
//!
//! A [`RetrievalSession`] turns one logical query into a sequence of page
//! requests that follow the server's continuation tokens. It enforces a
//! client-side result cap and stops on cancellation. Pages are fetched
//! lazily: a request is only issued when the consumer asks for an item past
//! the buffered page.
//!
//! Three ways to consume a session:
//!
//! - pull items one at a time with [`RetrievalSession::next`]
//! - adapt it into a `Stream` with [`RetrievalSession::into_stream`]
//! - run it on its own task with [`RetrievalSession::spawn`] and read from
//!   the returned channel pair
//!
//! Every error ends the session and is the last item produced.

use futures_util::stream::Stream;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, Instrument, Span};

use crate::api::{NewsDataError, Transport};
use crate::models::{decode_news_page, Article, NewsQuery};

/// Largest hand-off buffer [`RetrievalSession::spawn`] will allocate.
pub const MAX_SPAWN_BUFFER: usize = 4096;

/// State of one paginated retrieval.
pub struct RetrievalSession<Q: NewsQuery> {
    transport: Arc<dyn Transport>,
    query: Q,
    /// Requested cap; 0 means "everything the server reports"
    cap: u64,
    /// Fixed after the first page is decoded
    effective_cap: Option<u64>,
    emitted: u64,
    pages: u32,
    buffer: VecDeque<Article>,
    /// Token for the next request; `None` after a page without one
    next_token: Option<String>,
    started: bool,
    finished: bool,
    cancel: CancellationToken,
    span: Span,
    started_at: Instant,
}

impl<Q: NewsQuery> std::fmt::Debug for RetrievalSession<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrievalSession")
            .field("endpoint", &Q::ENDPOINT)
            .field("cap", &self.cap)
            .field("effective_cap", &self.effective_cap)
            .field("emitted", &self.emitted)
            .field("pages", &self.pages)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl<Q: NewsQuery> RetrievalSession<Q> {
    /// Validate `query` and prepare a session. No request is sent until the
    /// first item is pulled.
    ///
    /// - `cap`: maximum number of articles to produce, 0 for no limit
    /// - `cancel`: stops the session at the next page fetch or item hand-off
    pub fn new(
        transport: Arc<dyn Transport>,
        query: Q,
        cap: u64,
        cancel: CancellationToken,
    ) -> Result<Self, NewsDataError> {
        query.validate()?;
        Ok(Self {
            transport,
            query,
            cap,
            effective_cap: None,
            emitted: 0,
            pages: 0,
            buffer: VecDeque::new(),
            next_token: None,
            started: false,
            finished: false,
            cancel,
            span: Span::none(),
            started_at: Instant::now(),
        })
    }

    /// Attach the span that requests and the session summary are logged under
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Number of articles produced so far
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> u32 {
        self.pages
    }

    /// The cap in force, once known
    pub fn effective_cap(&self) -> Option<u64> {
        self.effective_cap
    }

    /// Continuation token the next request would send. Can be passed to
    /// [`NewsQuery::page`] to resume later.
    pub fn next_page_token(&self) -> Option<&str> {
        self.next_token.as_deref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    /// Pull the next article.
    ///
    /// Returns `None` once the results are exhausted or the cap is reached.
    /// An error is returned at most once and is always followed by `None`.
    pub async fn next(&mut self) -> Option<Result<Article, NewsDataError>> {
        loop {
            if self.finished {
                return None;
            }
            if self.buffer.is_empty() && self.exhausted() {
                self.finish("complete");
                return None;
            }
            if self.cancel.is_cancelled() {
                return Some(Err(self.fail(NewsDataError::Cancelled)));
            }
            if let Some(article) = self.buffer.pop_front() {
                self.emitted += 1;
                return Some(Ok(article));
            }
            if let Err(err) = self.fetch_page().await {
                return Some(Err(self.fail(err)));
            }
        }
    }

    /// Drain the session into a `Vec`. Any error discards what was collected.
    pub async fn collect_all(mut self) -> Result<Vec<Article>, NewsDataError> {
        let mut articles = Vec::new();
        while let Some(item) = self.next().await {
            articles.push(item?);
        }
        Ok(articles)
    }

    /// Adapt into a lazy `Stream`. A terminal error is the last item.
    pub fn into_stream(mut self) -> impl Stream<Item = Result<Article, NewsDataError>> + Send {
        async_stream::stream! {
            while let Some(item) = self.next().await {
                yield item;
            }
        }
    }

    /// Run the session on its own task.
    ///
    /// Articles are handed off through a bounded channel of `buffer` slots.
    /// The task only pulls the next article once a slot is free, so pages
    /// are never fetched ahead of the consumer. A terminal error, if any,
    /// arrives on the one-shot side. Cancellation is honored while the task
    /// waits for the consumer to make room. `buffer` is clamped to
    /// `1..=MAX_SPAWN_BUFFER`.
    pub fn spawn(mut self, buffer: usize) -> ArticleReceiver {
        let (article_tx, article_rx) = mpsc::channel(buffer.clamp(1, MAX_SPAWN_BUFFER));
        let (error_tx, error_rx) = oneshot::channel();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            loop {
                let permit = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        let err = self.fail(NewsDataError::Cancelled);
                        let _ = error_tx.send(err);
                        return;
                    }
                    permit = article_tx.reserve() => match permit {
                        Ok(permit) => permit,
                        Err(_) => {
                            // Consumer left. Only a fully drained session counts as complete.
                            if self.buffer.is_empty() && self.exhausted() {
                                self.finish("complete");
                            } else {
                                let err = self.fail(NewsDataError::Cancelled);
                                let _ = error_tx.send(err);
                            }
                            return;
                        }
                    },
                };

                match self.next().await {
                    Some(Ok(article)) => permit.send(article),
                    Some(Err(err)) => {
                        drop(permit);
                        let _ = error_tx.send(err);
                        return;
                    }
                    None => return,
                }
            }
        });

        ArticleReceiver {
            articles: article_rx,
            error: error_rx,
        }
    }

    fn cap_reached(&self) -> bool {
        self.effective_cap.is_some_and(|cap| self.emitted >= cap)
    }

    /// No further page may be requested.
    fn exhausted(&self) -> bool {
        self.cap_reached() || (self.started && self.next_token.is_none())
    }

    async fn fetch_page(&mut self) -> Result<(), NewsDataError> {
        // A caller-supplied starting token is kept on the first request.
        if let Some(token) = self.next_token.take() {
            self.query.set_page_token(token);
        }
        let params = self.query.encode();

        let request = self
            .transport
            .get(Q::ENDPOINT, &params)
            .instrument(self.span.clone());
        let body = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(NewsDataError::Cancelled),
            result = request => result?,
        };
        let page = decode_news_page(&body)?;

        self.started = true;
        self.pages += 1;

        let cap = *self.effective_cap.get_or_insert(if self.cap == 0 {
            page.total_results
        } else {
            self.cap
        });
        let remaining = usize::try_from(cap.saturating_sub(self.emitted)).unwrap_or(usize::MAX);

        let mut results = page.results;
        results.truncate(remaining);
        self.buffer.extend(results);
        self.next_token = page.next_page;
        Ok(())
    }

    fn fail(&mut self, err: NewsDataError) -> NewsDataError {
        let outcome = if err.is_cancelled() {
            "cancelled"
        } else {
            "failed"
        };
        self.span.in_scope(|| debug!(error = %err, "retrieval error"));
        self.finish(outcome);
        err
    }

    fn finish(&mut self, outcome: &'static str) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.buffer.clear();
        self.span.in_scope(|| {
            debug!(
                endpoint = %Q::ENDPOINT,
                emitted = self.emitted,
                pages = self.pages,
                outcome,
                elapsed_ms = self.started_at.elapsed().as_millis() as u64,
                "retrieval finished"
            )
        });
    }
}

/// Receiving side of a spawned [`RetrievalSession`].
#[derive(Debug)]
pub struct ArticleReceiver {
    articles: mpsc::Receiver<Article>,
    error: oneshot::Receiver<NewsDataError>,
}

impl ArticleReceiver {
    /// Next article, or `None` once the session has ended
    pub async fn recv(&mut self) -> Option<Article> {
        self.articles.recv().await
    }

    /// Wait for the session to end and report its outcome. Articles not yet
    /// received are dropped. Stopping before the session has fetched
    /// everything it would have produced is reported as
    /// [`NewsDataError::Cancelled`].
    pub async fn finish(self) -> Result<(), NewsDataError> {
        drop(self.articles);
        match self.error.await {
            Ok(err) => Err(err),
            Err(_) => Ok(()),
        }
    }

    /// Split into the raw channel pair
    pub fn into_parts(self) -> (mpsc::Receiver<Article>, oneshot::Receiver<NewsDataError>) {
        (self.articles, self.error)
    }
}
