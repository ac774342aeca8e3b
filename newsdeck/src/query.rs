use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::api::ArticleService;
use crate::error::{ClientError, Result};
use crate::rank::{rank, SortKey, SortOrder};
use crate::types::Article;

/// Result of a settled query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Search path: a ranked flat article list
    Articles(Vec<Article>),
    /// AI path: synthesis text plus the articles it drew on (possibly empty)
    Summary {
        summary: String,
        articles_used: Vec<Article>,
    },
}

/// Lifecycle of one orchestrated query. Exactly one state is live per
/// orchestrator; starting a new query discards the previous result when the
/// new attempt begins.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    Idle,
    Loading,
    Succeeded(QueryOutcome),
    Failed(String),
}

/// Drives a single text query through either the search path or the
/// AI-summary path, owning loading/result/error state.
///
/// Overlapping calls are allowed; each attempt gets a monotonically
/// increasing generation token and a response is applied only if its token
/// is still the latest issued, so a slow earlier request can never
/// overwrite the state of a newer one.
pub struct QueryOrchestrator {
    service: Arc<dyn ArticleService>,
    state: Mutex<QueryState>,
    sort: Mutex<(SortKey, SortOrder)>,
    generation: AtomicU64,
}

impl QueryOrchestrator {
    pub fn new(service: Arc<dyn ArticleService>) -> Self {
        Self {
            service,
            state: Mutex::new(QueryState::Idle),
            // Default matches the search UI: most relevant first
            sort: Mutex::new((SortKey::Relevance, SortOrder::Desc)),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current query state
    pub fn state(&self) -> QueryState {
        self.lock_state().clone()
    }

    /// Select the sort applied to subsequent search results. Does not
    /// re-rank an already stored result.
    pub fn set_sort(&self, key: SortKey, order: SortOrder) {
        *self.sort.lock().expect("sort lock poisoned") = (key, order);
    }

    pub fn sort(&self) -> (SortKey, SortOrder) {
        *self.sort.lock().expect("sort lock poisoned")
    }

    /// Run a search query. Empty/whitespace queries are rejected up front
    /// with `ClientError::EmptyQuery` — no network call, no state change.
    /// Remote failures settle into `QueryState::Failed` and return `Ok(())`.
    pub async fn run_search(&self, query: &str, max_articles: u8) -> Result<()> {
        let generation = self.begin_attempt(query)?;

        let result = self.service.search(query, max_articles).await;
        match result {
            Ok(response) => {
                let (key, order) = self.sort();
                let ranked = rank(&response.articles, key, order);
                self.settle(generation, QueryState::Succeeded(QueryOutcome::Articles(ranked)));
            }
            Err(e) => self.settle(generation, QueryState::Failed(e.to_string())),
        }
        Ok(())
    }

    /// Run an AI-summary query. Same validation as `run_search`; the
    /// response is stored verbatim (no client-side ranking of
    /// `articles_used`).
    pub async fn run_ai_summary(&self, query: &str, max_articles: u8) -> Result<()> {
        let generation = self.begin_attempt(query)?;

        let result = self.service.ai_query(query, max_articles).await;
        match result {
            Ok(response) => self.settle(
                generation,
                QueryState::Succeeded(QueryOutcome::Summary {
                    summary: response.summary,
                    articles_used: response.articles_used,
                }),
            ),
            Err(e) => self.settle(generation, QueryState::Failed(e.to_string())),
        }
        Ok(())
    }

    /// Validate the query and transition to Loading, clearing the previous
    /// result. Returns the generation token for this attempt.
    fn begin_attempt(&self, query: &str) -> Result<u64> {
        if query.trim().is_empty() {
            return Err(ClientError::EmptyQuery);
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.lock_state() = QueryState::Loading;
        Ok(generation)
    }

    /// Apply a settled response only if its generation is still the latest
    /// issued; stale responses are discarded silently.
    fn settle(&self, generation: u64, next: QueryState) {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding stale query response");
            return;
        }
        *self.lock_state() = next;
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, QueryState> {
        self.state.lock().expect("state lock poisoned")
    }
}
