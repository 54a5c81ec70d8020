//! Debounced search-as-you-type.
//!
//! Keystrokes go in through [`SearchDebouncer::input`]; results come out on a
//! `watch` channel. A request is issued only once the input has been quiet
//! for the configured debounce window, and only if the trimmed query has at
//! least `min_query_chars` characters. Shorter queries publish an empty
//! result without a request.
//!
//! In-flight requests are never cancelled. Each issued query gets a
//! generation number; a response whose generation has been superseded by
//! the time it arrives is dropped, so an older, slower response can never
//! overwrite a newer one.
//!
//! Settling on the same query twice searches once, unless the published
//! result for that query is a failure, in which case it is retried.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::api::ApiClient;
use crate::api::types::Product;
use crate::config::SearchConfig;
use crate::error::ApiError;

/// Whether `query` is long enough to be sent to the backend.
#[must_use]
pub fn is_searchable(query: &str, min_chars: usize) -> bool {
    query.trim().chars().count() >= min_chars
}

/// Something that can run a product search.
pub trait ProductSearch: Send + Sync + 'static {
    /// Search products matching `query`.
    fn search(&self, query: &str)
    -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;
}

impl ProductSearch for ApiClient {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send {
        self.search_products(query)
    }
}

/// A published search result.
#[derive(Debug, Clone)]
pub struct SearchUpdate {
    /// The trimmed query the result belongs to.
    pub query: String,
    /// Monotonic sequence number of the query.
    pub generation: u64,
    /// Matching products, or the failure.
    pub outcome: Result<Vec<Product>, Arc<ApiError>>,
}

impl SearchUpdate {
    /// The products, or an empty slice on failure.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        self.outcome.as_deref().unwrap_or(&[])
    }
}

/// Debounces keystrokes into search requests.
///
/// Dropping the debouncer stops it; requests already in flight still run to
/// completion but their results go nowhere.
pub struct SearchDebouncer {
    input: mpsc::UnboundedSender<String>,
    updates: watch::Receiver<Option<SearchUpdate>>,
    task: JoinHandle<()>,
}

impl SearchDebouncer {
    /// Start a debouncer on the current tokio runtime.
    #[must_use]
    pub fn spawn<S: ProductSearch>(searcher: Arc<S>, config: SearchConfig) -> Self {
        let (input, rx) = mpsc::unbounded_channel();
        let (tx, updates) = watch::channel(None);
        let task = tokio::spawn(run(searcher, config, rx, tx));

        Self {
            input,
            updates,
            task,
        }
    }

    /// Feed the current contents of the search box.
    pub fn input(&self, text: impl Into<String>) {
        if self.input.send(text.into()).is_err() {
            warn!("Search debouncer stopped, dropping input");
        }
    }

    /// A receiver that observes every published result.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<SearchUpdate>> {
        self.updates.clone()
    }

    /// The most recently published result.
    #[must_use]
    pub fn latest(&self) -> Option<SearchUpdate> {
        self.updates.borrow().clone()
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<S: ProductSearch>(
    searcher: Arc<S>,
    config: SearchConfig,
    mut rx: mpsc::UnboundedReceiver<String>,
    tx: watch::Sender<Option<SearchUpdate>>,
) {
    let latest = Arc::new(AtomicU64::new(0));
    let mut last_issued: Option<String> = None;

    while let Some(mut text) = rx.recv().await {
        // Keep absorbing keystrokes until the input goes quiet
        loop {
            match timeout(config.debounce, rx.recv()).await {
                Ok(Some(newer)) => text = newer,
                Ok(None) => return,
                Err(_) => break,
            }
        }

        let query = text.trim().to_string();
        if last_issued.as_deref() == Some(query.as_str()) && !last_failed(&tx, &query) {
            debug!(%query, "Query unchanged, not searching again");
            continue;
        }
        last_issued = Some(query.clone());

        let generation = latest.fetch_add(1, Ordering::AcqRel) + 1;

        if !is_searchable(&query, config.min_query_chars) {
            publish(
                &tx,
                SearchUpdate {
                    query,
                    generation,
                    outcome: Ok(Vec::new()),
                },
            );
            continue;
        }

        tokio::spawn(fetch(
            Arc::clone(&searcher),
            query,
            generation,
            Arc::clone(&latest),
            tx.clone(),
        ));
    }
}

#[instrument(skip(searcher, latest, tx))]
async fn fetch<S: ProductSearch>(
    searcher: Arc<S>,
    query: String,
    generation: u64,
    latest: Arc<AtomicU64>,
    tx: watch::Sender<Option<SearchUpdate>>,
) {
    let outcome = searcher.search(&query).await.map_err(Arc::new);

    if latest.load(Ordering::Acquire) != generation {
        debug!("Discarding stale search response");
        return;
    }

    if let Err(e) = &outcome {
        warn!(error = %e, "Search request failed");
    }

    publish(
        &tx,
        SearchUpdate {
            query,
            generation,
            outcome,
        },
    );
}

fn last_failed(tx: &watch::Sender<Option<SearchUpdate>>, query: &str) -> bool {
    tx.borrow()
        .as_ref()
        .is_some_and(|update| update.query == query && update.outcome.is_err())
}

fn publish(tx: &watch::Sender<Option<SearchUpdate>>, update: SearchUpdate) {
    tx.send_if_modified(|current| {
        if current
            .as_ref()
            .is_some_and(|existing| existing.generation > update.generation)
        {
            return false;
        }
        *current = Some(update);
        true
    });
}
