//! Integration tests for catalogue endpoints.
//!
//! These run the real `ApiClient` against the in-process fake backend and
//! check paths, list flattening and error mapping.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use jaelle_core::Slug;
use jaelle_integration_tests::{FakeBackend, MALFORMED_SLUG};
use jaelle_storefront::api::types::{ProductQuery, SortField, SortOrder};
use jaelle_storefront::config::ApiConfig;
use jaelle_storefront::{ApiClient, ApiError};
use rust_decimal::Decimal;

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_paginated_list_is_flattened_to_results() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    let products = client.list_products().await.unwrap();

    let slugs: Vec<&str> = products.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["robe-en-lin", "robe-boheme", "sac-cabas"]);
    assert_eq!(products[0].price, Decimal::new(4590, 2));
}

#[tokio::test]
async fn test_bare_array_list_is_returned_as_is() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    let featured = client.featured_products().await.unwrap();

    assert_eq!(featured.len(), 2);
    assert!(featured.iter().all(|p| p.featured));
    assert_eq!(backend.requests_to("/api/products/featured/").len(), 1);
}

#[tokio::test]
async fn test_filtered_list_sends_query_string() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    let query = ProductQuery {
        category: Some(Slug::parse("sacs").unwrap()),
        max_price: Some(Decimal::new(30, 0)),
        sort_by: Some(SortField::Price),
        sort_order: Some(SortOrder::Asc),
        ..ProductQuery::default()
    };
    let products = client.list_products_filtered(&query).await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].slug, "sac-cabas");

    let sent = backend.requests_to("/api/products/");
    let qs = sent[0].query.as_deref().unwrap();
    assert!(qs.contains("category=sacs"));
    assert!(qs.contains("max_price=30"));
    assert!(qs.contains("sort_by=price"));
    assert!(qs.contains("sort_order=asc"));
    assert!(!qs.contains("min_price"));
}

#[tokio::test]
async fn test_product_detail_inlines_category() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    let product = client.get_product("robe-en-lin").await.unwrap();

    assert_eq!(product.category.slug, "robes");
    assert_eq!(
        product.main_image().unwrap().url(),
        "https://cdn.example.com/robe-2.jpg"
    );
    assert!(product.can_order(5));
    assert!(!product.can_order(6));
}

#[tokio::test]
async fn test_missing_product_maps_to_not_found() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    let err = client.get_product("inconnu").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(), "No Product matches the given query.");
}

#[tokio::test]
async fn test_wrong_shaped_success_body_is_a_decode_error() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    let err = client.get_product(MALFORMED_SLUG).await.unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
    assert_eq!(err.status(), None);
    assert!(!err.is_not_found());
    assert_eq!(backend.requests_to(&format!("/api/products/{MALFORMED_SLUG}/")).len(), 1);
}

#[tokio::test]
async fn test_invalid_slug_is_rejected_without_request() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    let err = client.get_product("../admin").await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidSlug(_)));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_a_network_error() {
    // Grab a free port, then release it so nothing is listening there
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let config = ApiConfig::new(&format!("http://{addr}/api/")).unwrap();
    let client = ApiClient::new(&config).unwrap();

    let err = client.list_categories().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.status(), None);
}

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
async fn test_categories_and_their_products() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    let categories = client.list_categories().await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(
        categories[0].display_image(),
        Some("https://cdn.example.com/robes.jpg")
    );

    let category = client.get_category("sacs").await.unwrap();
    assert_eq!(category.name, "Sacs");

    let products = client.category_products("robes").await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(backend.requests_to("/api/categories/robes/products/").len(), 1);
}

#[tokio::test]
async fn test_subcategories() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    assert_eq!(client.list_subcategories().await.unwrap().len(), 2);

    let under_sacs = client.subcategories_for("sacs").await.unwrap();
    assert_eq!(under_sacs.len(), 1);
    assert_eq!(under_sacs[0].slug, "cabas");
    let sent = backend.requests_to("/api/subcategories/");
    assert_eq!(sent[1].query.as_deref(), Some("category=sacs"));

    let sub = client.get_subcategory("robes-longues").await.unwrap();
    assert_eq!(sub.category_name.as_deref(), Some("Robes"));

    let products = client.subcategory_products("cabas").await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].slug, "sac-cabas");
}
