use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ClientError, Result};
use crate::types::{QueryResponse, SearchResponse, SummarizeResponse};

/// Core trait for the remote article service.
///
/// The orchestrator and health monitor only see this seam, so tests can
/// substitute scripted implementations without a live endpoint.
#[async_trait::async_trait]
pub trait ArticleService: Send + Sync {
    /// POST /search — ranked articles for a free-text query
    async fn search(&self, query: &str, max_articles: u8) -> Result<SearchResponse>;

    /// POST /query — AI-generated synthesis of a small article set
    async fn ai_query(&self, query: &str, max_articles: u8) -> Result<QueryResponse>;

    /// POST /summarize-url — summarize a single article by URL
    async fn summarize_url(&self, url: &str) -> Result<SummarizeResponse>;

    /// GET / — liveness probe; true iff the service answered with a 2xx
    async fn probe(&self) -> bool;
}

/// Remote article service over JSON/HTTP.
///
/// `max_articles` is passed through verbatim (the caller constrains it to
/// 1..=10); out-of-range values are a server-side concern.
pub struct RemoteArticleService {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteArticleService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post_json<B, T>(&self, path: &str, operation: &'static str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(path))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Http {
                operation,
                status_text: status
                    .canonical_reason()
                    .unwrap_or(status.as_str())
                    .to_string(),
            });
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    query: &'a str,
    max_articles: u8,
}

#[derive(Debug, Serialize)]
struct SummarizeBody<'a> {
    url: &'a str,
}

#[async_trait::async_trait]
impl ArticleService for RemoteArticleService {
    async fn search(&self, query: &str, max_articles: u8) -> Result<SearchResponse> {
        self.post_json("/search", "Search", &QueryBody { query, max_articles })
            .await
    }

    async fn ai_query(&self, query: &str, max_articles: u8) -> Result<QueryResponse> {
        self.post_json("/query", "Query", &QueryBody { query, max_articles })
            .await
    }

    async fn summarize_url(&self, url: &str) -> Result<SummarizeResponse> {
        self.post_json("/summarize-url", "Summarization", &SummarizeBody { url })
            .await
    }

    async fn probe(&self) -> bool {
        match self.client.get(self.endpoint("/")).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
