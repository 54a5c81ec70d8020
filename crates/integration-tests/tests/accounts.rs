//! Integration tests for account endpoints, CSRF forwarding and bearer auth.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use jaelle_core::Email;
use jaelle_integration_tests::{CSRF_TOKEN, FakeBackend, GOOD_PASSWORD, TAKEN_EMAIL};
use jaelle_storefront::ApiClient;
use jaelle_storefront::api::types::{Credentials, RegisterRequest};
use secrecy::{ExposeSecret, SecretString};

fn credentials(password: &str) -> Credentials {
    Credentials {
        email: Email::parse("ana@example.com").unwrap(),
        password: SecretString::from(password),
    }
}

fn registration(email: &str) -> RegisterRequest {
    RegisterRequest {
        email: Email::parse(email).unwrap(),
        password: SecretString::from("s3cret-pass"),
        first_name: "Ana".to_string(),
        last_name: "Lopez".to_string(),
    }
}

// =============================================================================
// CSRF
// =============================================================================

#[tokio::test]
async fn test_csrf_header_on_post_but_not_on_get() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    // The first GET picks up the csrftoken cookie
    client.list_categories().await.unwrap();
    assert_eq!(client.csrf_token().as_deref(), Some(CSRF_TOKEN));

    client.obtain_token(&credentials(GOOD_PASSWORD)).await.unwrap();
    client.list_products().await.unwrap();

    for request in backend.requests() {
        if request.method == "POST" {
            assert_eq!(request.csrf_header.as_deref(), Some(CSRF_TOKEN));
        } else {
            assert_eq!(request.csrf_header, None, "{} {}", request.method, request.path);
        }
    }
}

#[tokio::test]
async fn test_post_without_cookie_sends_no_csrf_header() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    client.obtain_token(&credentials(GOOD_PASSWORD)).await.unwrap();

    let sent = backend.requests_to("/api/token/");
    assert_eq!(sent[0].csrf_header, None);
}

#[tokio::test]
async fn test_seeded_csrf_token_is_forwarded() {
    let backend = FakeBackend::start().await.unwrap();
    let mut config = backend.api_config().unwrap();
    config.csrf_token = Some(SecretString::from("seeded-token"));
    let client = ApiClient::new(&config).unwrap();

    client.register(&registration("new@example.com")).await.unwrap();

    let sent = backend.requests_to("/api/users/register/");
    assert_eq!(sent[0].csrf_header.as_deref(), Some("seeded-token"));
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_returns_created_user() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    let user = client.register(&registration("new@example.com")).await.unwrap();

    assert_eq!(user.id.as_i32(), 42);
    assert_eq!(user.email, "new@example.com");
    assert_eq!(user.first_name, "Ana");
}

#[tokio::test]
async fn test_register_rejection_keeps_field_details() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    let err = client.register(&registration(TAKEN_EMAIL)).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.field_errors(),
        vec![(
            "email".to_string(),
            "user with this email already exists.".to_string()
        )]
    );
    assert_eq!(
        err.user_message(),
        "email: user with this email already exists."
    );
    assert!(err.details().unwrap()["email"].is_array());
}

// =============================================================================
// Tokens
// =============================================================================

#[tokio::test]
async fn test_obtain_and_refresh_tokens() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    let tokens = client.obtain_token(&credentials(GOOD_PASSWORD)).await.unwrap();
    assert_eq!(tokens.access.expose_secret(), "access-token-1");
    let refresh = tokens.refresh.unwrap();

    let renewed = client.refresh_token(&refresh).await.unwrap();
    assert_eq!(renewed.access.expose_secret(), "access-token-2");
    assert!(renewed.refresh.is_none());
}

#[tokio::test]
async fn test_bad_credentials_map_to_401() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    let err = client.obtain_token(&credentials("wrong")).await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(
        err.user_message(),
        "No active account found with the given credentials"
    );
}

#[tokio::test]
async fn test_access_token_is_sent_as_bearer() {
    let backend = FakeBackend::start().await.unwrap();
    let client = backend.client().unwrap();

    client.list_products().await.unwrap();
    let authed = client.with_access_token(SecretString::from("access-token-1"));
    authed.list_products().await.unwrap();

    let sent = backend.requests_to("/api/products/");
    assert_eq!(sent[0].authorization, None);
    assert_eq!(sent[1].authorization.as_deref(), Some("Bearer access-token-1"));
}
