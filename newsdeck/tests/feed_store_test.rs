use sqlx::SqlitePool;

use newsdeck::error::ClientError;
use newsdeck::feed::{ArticleFeedStore, ErrorPolicy, LATEST_KEY};

async fn test_pool() -> (tempfile::TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("feeds.db");
    let pool = common::init_db_pool(&db_path.to_string_lossy())
        .await
        .expect("init pool");
    common::run_migrations(&pool).await.expect("migrations");
    (dir, pool)
}

async fn seed_article(pool: &SqlitePool, title: &str, category: Option<&str>, publish_time: &str) {
    sqlx::query(
        "INSERT INTO articles (title, url, category, publish_time) VALUES (?, ?, ?, ?)",
    )
    .bind(title)
    .bind(format!("https://example.com/{}", title.replace(' ', "-")))
    .bind(category)
    .bind(publish_time)
    .execute(pool)
    .await
    .expect("seed article");
}

async fn seed_mixed_articles(pool: &SqlitePool) {
    seed_article(pool, "cricket final", Some("Sports & Athletics"), "2024-06-05").await;
    seed_article(pool, "chip shortage", Some("Technology and Innovation"), "2024-06-04").await;
    seed_article(pool, "budget passed", Some("Corporate and Business News"), "2024-06-03").await;
    seed_article(pool, "transfer window", Some("sports"), "2024-06-02").await;
    seed_article(pool, "flood relief", Some("National News from Pakistan"), "2024-06-01").await;
    seed_article(pool, "uncategorized note", None, "2024-05-31").await;
}

#[tokio::test]
async fn test_latest_feed_applies_no_filter_and_caps_at_page_size() {
    let (_dir, pool) = test_pool().await;
    seed_mixed_articles(&pool).await;

    let store = ArticleFeedStore::new(pool, LATEST_KEY, 4, 12);
    store.load().await;

    let state = store.state();
    assert_eq!(state.articles.len(), 4);
    assert!(!state.loading);

    // Newest first
    let titles: Vec<_> = state.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["cricket final", "chip shortage", "budget passed", "transfer window"]
    );
}

#[tokio::test]
async fn test_category_feed_matches_substring_case_insensitively() {
    let (_dir, pool) = test_pool().await;
    seed_mixed_articles(&pool).await;

    let store = ArticleFeedStore::new(pool, "sports", 4, 12);
    store.load().await;

    let state = store.state();
    let titles: Vec<_> = state.articles.iter().map(|a| a.title.as_str()).collect();
    // "Sports & Athletics" and "sports" both match; nothing else does
    assert_eq!(titles, vec!["cricket final", "transfer window"]);
}

#[tokio::test]
async fn test_latest_feed_includes_uncategorized_articles() {
    let (_dir, pool) = test_pool().await;
    seed_mixed_articles(&pool).await;

    let store = ArticleFeedStore::new(pool, LATEST_KEY, 12, 12);
    store.load().await;

    let state = store.state();
    assert!(state
        .articles
        .iter()
        .any(|a| a.title == "uncategorized note" && a.category.is_none()));
}

#[tokio::test]
async fn test_expand_refetches_larger_page_and_collapse_keeps_articles() {
    let (_dir, pool) = test_pool().await;
    seed_mixed_articles(&pool).await;

    let store = ArticleFeedStore::new(pool, LATEST_KEY, 4, 12);
    store.load().await;
    assert_eq!(store.state().articles.len(), 4);
    assert!(!store.state().expanded);

    store.expand().await;
    let expanded = store.state();
    assert!(expanded.expanded);
    assert!(!expanded.loading);
    assert_eq!(expanded.articles.len(), 6);

    // Collapse is a layout change only: no refetch, no truncation
    store.collapse();
    let collapsed = store.state();
    assert!(!collapsed.expanded);
    assert_eq!(collapsed.articles.len(), 6);
}

#[tokio::test]
async fn test_fetch_error_is_suppressed_and_keeps_current_list() {
    let (_dir, pool) = test_pool().await;
    seed_mixed_articles(&pool).await;

    let store = ArticleFeedStore::new(pool.clone(), LATEST_KEY, 4, 12);
    store.load().await;
    assert_eq!(store.state().articles.len(), 4);

    // Break the data source underneath the store
    sqlx::query("DROP TABLE articles")
        .execute(&pool)
        .await
        .expect("drop table");

    store.expand().await;
    let state = store.state();
    // Old full list survives the failed expansion
    assert_eq!(state.articles.len(), 4);
    assert!(!state.loading);
}

#[tokio::test]
async fn test_surface_policy_propagates_data_source_errors() {
    let (_dir, pool) = test_pool().await;
    sqlx::query("DROP TABLE articles")
        .execute(&pool)
        .await
        .expect("drop table");

    let store = ArticleFeedStore::new(pool, "sports", 4, 12);
    let err = store.fetch(4, ErrorPolicy::Surface).await.unwrap_err();
    assert!(matches!(err, ClientError::DataSource(_)));
}

#[tokio::test]
async fn test_load_on_empty_table_yields_empty_list() {
    let (_dir, pool) = test_pool().await;

    let store = ArticleFeedStore::new(pool, "sports", 4, 12);
    store.load().await;

    let state = store.state();
    assert!(state.articles.is_empty());
    assert!(!state.loading);
}
