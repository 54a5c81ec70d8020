//! Integration tests for product search.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use jaelle_integration_tests::FakeBackend;
use jaelle_storefront::config::SearchConfig;
use jaelle_storefront::search::SearchDebouncer;

#[tokio::test]
async fn test_short_query_issues_no_request() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    for query in ["", "r", "  r  "] {
        assert!(client.search_products(query).await.unwrap().is_empty());
    }
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_search_sends_trimmed_query() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    let hits = client.search_products("  robe ").await.unwrap();

    let slugs: Vec<&str> = hits.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["robe-en-lin", "robe-boheme"]);

    let sent = backend.requests_to("/api/products/search/");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].query.as_deref(), Some("q=robe"));
}

#[tokio::test]
async fn test_debouncer_issues_one_request_for_a_burst() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();
    let config = SearchConfig {
        debounce: Duration::from_millis(100),
        min_query_chars: 2,
    };

    let debouncer = SearchDebouncer::spawn(Arc::new(client), config);
    let mut updates = debouncer.subscribe();

    for text in ["s", "sa", "sac"] {
        debouncer.input(text);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    tokio::time::timeout(Duration::from_secs(5), updates.changed())
        .await
        .unwrap()
        .unwrap();

    let update = debouncer.latest().unwrap();
    assert_eq!(update.query, "sac");
    assert_eq!(update.products().len(), 1);
    assert_eq!(update.products()[0].slug, "sac-cabas");
    assert_eq!(backend.requests_to("/api/products/search/").len(), 1);
}
