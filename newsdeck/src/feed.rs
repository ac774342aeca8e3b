use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::Result;
use crate::types::Article;

/// Category key that skips the category filter entirely
pub const LATEST_KEY: &str = "latest";

/// What to do when a feed query fails.
///
/// Passive background feeds suppress errors into their current (possibly
/// empty) list; user-initiated loads can choose to surface them. Keeping
/// this a per-call flag makes the fail-soft/fail-loud split a declared
/// contract instead of an accident of call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    Surface,
    SuppressToEmpty,
}

/// Observable state of one category feed
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    pub articles: Vec<Article>,
    pub expanded: bool,
    pub loading: bool,
}

/// Per-category article feed over the local articles table.
///
/// Fetches a bounded list ordered by publish time descending. Articles are
/// swapped atomically on fetch completion — observers see the old full list
/// or the new full list, never a partial one. Overlapping fetches are
/// resolved last-issued-wins via a generation token.
pub struct ArticleFeedStore {
    pool: SqlitePool,
    category_key: String,
    page_size: i64,
    expanded_page_size: i64,
    state: Mutex<FeedState>,
    generation: AtomicU64,
}

impl ArticleFeedStore {
    /// `category_key` is matched case-insensitively as a substring of the
    /// stored category field; the sentinel `"latest"` applies no filter.
    pub fn new(pool: SqlitePool, category_key: impl Into<String>, page_size: i64, expanded_page_size: i64) -> Self {
        Self {
            pool,
            category_key: category_key.into(),
            page_size,
            expanded_page_size,
            state: Mutex::new(FeedState::default()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn category_key(&self) -> &str {
        &self.category_key
    }

    /// Snapshot of the feed state
    pub fn state(&self) -> FeedState {
        self.lock().clone()
    }

    /// Load the collapsed page. Errors are logged and suppressed; the
    /// current list is kept (initially empty), so callers cannot
    /// distinguish "no articles" from "fetch failed" except via the log.
    pub async fn load(&self) {
        // Infallible by contract under SuppressToEmpty
        let _ = self.fetch(self.page_size, ErrorPolicy::SuppressToEmpty).await;
    }

    /// One-shot expansion: refetch with the larger page size. The expanded
    /// flag never reverts automatically.
    pub async fn expand(&self) {
        self.lock().expanded = true;
        let _ = self.fetch(self.expanded_page_size, ErrorPolicy::SuppressToEmpty).await;
    }

    /// Collapse back to the small page. Pure layout-density change: no
    /// refetch, and the already-fetched list is not truncated.
    pub fn collapse(&self) {
        self.lock().expanded = false;
    }

    /// Policy-taking fetch: the declared contract behind `load`/`expand`.
    /// Under `Surface` a data-source error propagates to the caller.
    pub async fn fetch(&self, limit: i64, policy: ErrorPolicy) -> Result<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.lock().loading = true;

        let result = self.query_articles(limit).await;

        // A newer fetch supersedes this one; leave its state alone.
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(category = %self.category_key, generation, "discarding stale feed fetch");
            return Ok(());
        }

        let mut state = self.lock();
        state.loading = false;
        match result {
            Ok(articles) => {
                state.articles = articles;
                Ok(())
            }
            Err(e) => match policy {
                ErrorPolicy::SuppressToEmpty => {
                    warn!(category = %self.category_key, error = %e, "feed query failed; keeping current list");
                    Ok(())
                }
                ErrorPolicy::Surface => Err(e),
            },
        }
    }

    async fn query_articles(&self, limit: i64) -> Result<Vec<Article>> {
        let rows = if self.category_key == LATEST_KEY {
            sqlx::query_as::<_, Article>(
                r#"
                SELECT id, title, excerpt, url, category, relevance_score, publish_time, content
                FROM articles
                ORDER BY publish_time IS NULL, publish_time DESC
                LIMIT ?
                "#,
            )
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Article>(
                r#"
                SELECT id, title, excerpt, url, category, relevance_score, publish_time, content
                FROM articles
                WHERE lower(category) LIKE '%' || lower(?) || '%'
                ORDER BY publish_time IS NULL, publish_time DESC
                LIMIT ?
                "#,
            )
            .bind(&self.category_key)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?
        };
        Ok(rows)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FeedState> {
        self.state.lock().expect("feed state lock poisoned")
    }
}
