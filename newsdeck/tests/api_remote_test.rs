use newsdeck::api::{ArticleService, RemoteArticleService};
use newsdeck::error::ClientError;

#[tokio::test]
async fn test_search_sends_exact_body_and_parses_articles() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/search")
        .match_header("content-type", "application/json")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "query": "climate policy",
            "max_articles": 5
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "articles": [
                    {
                        "id": 1,
                        "title": "Climate summit opens",
                        "excerpt": "Leaders gather",
                        "url": "https://example.com/summit",
                        "category": "National News",
                        "relevance_score": 0.91,
                        "publish_time": "2024-06-01T09:00:00Z"
                    },
                    {
                        "title": "Carbon markets explained",
                        "url": "https://example.com/carbon"
                    }
                ]
            }"#,
        )
        .expect(1)
        .create_async()
        .await;

    let service = RemoteArticleService::new(server.url());
    let response = service.search("climate policy", 5).await.expect("search");

    assert_eq!(response.articles.len(), 2);
    assert_eq!(response.articles[0].title, "Climate summit opens");
    assert_eq!(response.articles[0].relevance_score, Some(0.91));
    // Sparse articles deserialize with absent optional fields
    assert_eq!(response.articles[1].id, None);
    assert_eq!(response.articles[1].relevance_score, None);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_search_http_error_carries_operation_and_status_text() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/search")
        .with_status(500)
        .create_async()
        .await;

    let service = RemoteArticleService::new(server.url());
    let err = service.search("anything", 3).await.unwrap_err();

    assert!(matches!(err, ClientError::Http { .. }));
    assert_eq!(err.to_string(), "Search failed: Internal Server Error");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_ai_query_success_and_failure_messages() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/query")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "query": "election results",
            "max_articles": 3
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "summary": "Turnout was high across provinces.",
                "articles_used": []
            }"#,
        )
        .create_async()
        .await;

    let service = RemoteArticleService::new(server.url());
    let response = service.ai_query("election results", 3).await.expect("query");
    assert_eq!(response.summary, "Turnout was high across provinces.");
    // articles_used may be empty even on success
    assert!(response.articles_used.is_empty());
    mock.assert_async().await;

    server.reset_async().await;
    server
        .mock("POST", "/query")
        .with_status(502)
        .create_async()
        .await;

    let err = service.ai_query("election results", 3).await.unwrap_err();
    assert_eq!(err.to_string(), "Query failed: Bad Gateway");
}

#[tokio::test]
async fn test_summarize_url() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/summarize-url")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "url": "https://example.com/story"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "title": "Story title",
                "summary": "Short synthesis of the story.",
                "category": "Technology and Innovation",
                "url": "https://example.com/story"
            }"#,
        )
        .create_async()
        .await;

    let service = RemoteArticleService::new(server.url());
    let response = service
        .summarize_url("https://example.com/story")
        .await
        .expect("summarize");

    assert_eq!(response.title, "Story title");
    assert_eq!(response.category.as_deref(), Some("Technology and Innovation"));
    mock.assert_async().await;

    server.reset_async().await;
    server
        .mock("POST", "/summarize-url")
        .with_status(404)
        .create_async()
        .await;

    let err = service
        .summarize_url("https://example.com/missing")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Summarization failed: Not Found");
}

#[tokio::test]
async fn test_probe_reports_liveness() {
    let mut server = mockito::Server::new_async().await;

    server.mock("GET", "/").with_status(200).create_async().await;
    let service = RemoteArticleService::new(server.url());
    assert!(service.probe().await);

    server.reset_async().await;
    server.mock("GET", "/").with_status(503).create_async().await;
    assert!(!service.probe().await);
}

#[tokio::test]
async fn test_probe_transport_error_is_unhealthy_not_a_panic() {
    // Nothing is listening on this port
    let service = RemoteArticleService::new("http://127.0.0.1:9");
    assert!(!service.probe().await);
}
