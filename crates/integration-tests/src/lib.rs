//! Integration tests for the Jaelle storefront client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p jaelle-integration-tests
//! ```
//!
//! Tests run against [`FakeBackend`], an in-process axum server bound to an
//! ephemeral port that serves a small fixed catalogue with the same paths,
//! list shapes and error bodies as the real REST API. Every request it
//! receives is recorded so tests can assert on what the client sent.
//!
//! # Test Categories
//!
//! - `catalog` - Products, categories, subcategories and pagination
//! - `search` - Search threshold and debounced search
//! - `accounts` - Registration, tokens, CSRF and bearer auth

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use jaelle_storefront::ApiClient;
use jaelle_storefront::config::ApiConfig;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Value of the `csrftoken` cookie the fake backend hands out.
pub const CSRF_TOKEN: &str = "fake-csrf-token";

/// Password accepted by the fake token endpoint.
pub const GOOD_PASSWORD: &str = "correct-horse";

/// Email the fake registration endpoint reports as taken.
pub const TAKEN_EMAIL: &str = "taken@example.com";

/// Product slug whose detail endpoint answers 200 with a body that is not a
/// product.
pub const MALFORMED_SLUG: &str = "robe-cassee";

/// A request as seen by the fake backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub csrf_header: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Clone, Default)]
struct FakeState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// An in-process backend serving the storefront REST paths under `/api/`.
pub struct FakeBackend {
    addr: SocketAddr,
    state: FakeState,
    handle: JoinHandle<()>,
}

impl FakeBackend {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = FakeState::default();
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let app = router(state.clone());
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    /// The API root, with trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api/", self.addr)
    }

    /// Client configuration pointing at this backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is rejected.
    pub fn api_config(&self) -> Result<ApiConfig, jaelle_storefront::config::ConfigError> {
        ApiConfig::new(&self.base_url())
    }

    /// A client pointing at this backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn client(&self) -> Result<ApiClient, Box<dyn std::error::Error>> {
        Ok(ApiClient::new(&self.api_config()?)?)
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests received for `path` (e.g. `/api/token/`).
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router(state: FakeState) -> Router {
    Router::new()
        .route("/api/products/", get(list_products))
        .route("/api/products/featured/", get(featured_products))
        .route("/api/products/search/", get(search_products))
        .route("/api/products/{slug}/", get(product_detail))
        .route("/api/categories/", get(list_categories))
        .route("/api/categories/{slug}/", get(category_detail))
        .route("/api/categories/{slug}/products/", get(category_products))
        .route("/api/subcategories/", get(list_subcategories))
        .route("/api/subcategories/{slug}/", get(subcategory_detail))
        .route("/api/subcategories/{slug}/products/", get(subcategory_products))
        .route("/api/users/register/", post(register))
        .route("/api/token/", post(obtain_token))
        .route("/api/token/refresh/", post(refresh_token))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

/// Record the request and hand out the CSRF cookie on every response.
async fn record(State(state): State<FakeState>, req: Request, next: Next) -> Response {
    let recorded = {
        let header_str = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        RecordedRequest {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(str::to_string),
            csrf_header: header_str("x-csrftoken"),
            authorization: header_str("authorization"),
        }
    };
    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(recorded);

    let mut response = next.run(req).await;
    response.headers_mut().append(
        header::SET_COOKIE,
        HeaderValue::from_static("csrftoken=fake-csrf-token; Path=/"),
    );
    response
}

// =============================================================================
// Fixtures
// =============================================================================

fn robes() -> Value {
    json!({
        "id": 1, "name": "Robes", "slug": "robes",
        "description": "Robes d'été", "image": null,
        "image_url": "https://cdn.example.com/robes.jpg", "products_count": 2
    })
}

fn sacs() -> Value {
    json!({
        "id": 2, "name": "Sacs", "slug": "sacs",
        "description": "", "image": null, "image_url": null, "products_count": 1
    })
}

fn products() -> Vec<Value> {
    vec![
        json!({
            "id": 10, "name": "Robe en lin", "slug": "robe-en-lin",
            "description": "Robe légère", "price": "45.90", "stock": 5,
            "available": true, "featured": true, "category": 1, "category_name": "Robes",
            "images": [
                {"id": 100, "image": "/media/robe-1.jpg", "is_main": false},
                {"id": 101, "image": "/media/robe-2.jpg", "image_url": "https://cdn.example.com/robe-2.jpg", "is_main": true}
            ],
            "created_at": "2025-03-01T10:00:00Z"
        }),
        json!({
            "id": 11, "name": "Robe bohème", "slug": "robe-boheme",
            "description": "", "price": "59.00", "stock": 0,
            "available": false, "featured": true, "category": 1, "category_name": "Robes",
            "images": [],
            "created_at": "2025-02-01T10:00:00Z"
        }),
        json!({
            "id": 12, "name": "Sac cabas", "slug": "sac-cabas",
            "description": "Sac en toile", "price": "25.00", "stock": 12,
            "available": true, "featured": false, "category": 2, "category_name": "Sacs",
            "images": [{"id": 120, "image": "/media/sac.jpg"}],
            "created_at": "2025-01-01T10:00:00Z"
        }),
    ]
}

fn subcategories() -> Vec<Value> {
    vec![
        json!({"id": 5, "name": "Robes longues", "slug": "robes-longues", "description": "",
               "category": 1, "category_name": "Robes", "products_count": 1}),
        json!({"id": 6, "name": "Cabas", "slug": "cabas", "description": "",
               "category": 2, "category_name": "Sacs", "products_count": 1}),
    ]
}

fn paginated(results: Vec<Value>) -> Value {
    json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results,
    })
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": "No Product matches the given query."})),
    )
        .into_response()
}

fn in_category(product: &Value, category_id: i64) -> bool {
    product["category"].as_i64() == Some(category_id)
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_products(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let mut items = products();
    if let Some(category) = params.get("category") {
        let id = if category == "sacs" { 2 } else { 1 };
        items.retain(|p| in_category(p, id));
    }
    Json(paginated(items))
}

async fn featured_products() -> Json<Value> {
    let items: Vec<Value> = products()
        .into_iter()
        .filter(|p| p["featured"].as_bool() == Some(true))
        .collect();
    Json(Value::Array(items))
}

async fn search_products(Query(params): Query<HashMap<String, String>>) -> Response {
    let Some(q) = params.get("q").filter(|q| !q.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Search query is required"})),
        )
            .into_response();
    };
    let needle = q.to_lowercase();
    let items: Vec<Value> = products()
        .into_iter()
        .filter(|p| {
            p["name"]
                .as_str()
                .is_some_and(|n| n.to_lowercase().contains(&needle))
        })
        .collect();
    Json(paginated(items)).into_response()
}

async fn product_detail(Path(slug): Path<String>) -> Response {
    if slug == MALFORMED_SLUG {
        return Json(json!({"detail": "nope"})).into_response();
    }
    let Some(mut product) = products().into_iter().find(|p| p["slug"] == slug.as_str()) else {
        return not_found();
    };
    let category = if in_category(&product, 2) { sacs() } else { robes() };
    product["category"] = category;
    product["updated_at"] = json!("2025-03-02T08:30:00Z");
    Json(product).into_response()
}

async fn list_categories() -> Json<Value> {
    Json(paginated(vec![robes(), sacs()]))
}

async fn category_detail(Path(slug): Path<String>) -> Response {
    match slug.as_str() {
        "robes" => Json(robes()).into_response(),
        "sacs" => Json(sacs()).into_response(),
        _ => not_found(),
    }
}

async fn category_products(Path(slug): Path<String>) -> Response {
    let id = match slug.as_str() {
        "robes" => 1,
        "sacs" => 2,
        _ => return not_found(),
    };
    let items: Vec<Value> = products()
        .into_iter()
        .filter(|p| in_category(p, id))
        .collect();
    Json(Value::Array(items)).into_response()
}

async fn list_subcategories(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let mut items = subcategories();
    if let Some(category) = params.get("category") {
        let id = if category == "sacs" { 2 } else { 1 };
        items.retain(|s| s["category"].as_i64() == Some(id));
    }
    Json(Value::Array(items))
}

async fn subcategory_detail(Path(slug): Path<String>) -> Response {
    subcategories()
        .into_iter()
        .find(|s| s["slug"] == slug.as_str())
        .map_or_else(not_found, |s| Json(s).into_response())
}

async fn subcategory_products(Path(slug): Path<String>) -> Response {
    let Some(sub) = subcategories().into_iter().find(|s| s["slug"] == slug.as_str()) else {
        return not_found();
    };
    let category_id = sub["category"].as_i64().unwrap_or_default();
    let items: Vec<Value> = products()
        .into_iter()
        .filter(|p| in_category(p, category_id))
        .take(1)
        .collect();
    Json(paginated(items)).into_response()
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == TAKEN_EMAIL {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"email": ["user with this email already exists."]})),
        )
            .into_response();
    }
    if body["password"].as_str().is_none_or(str::is_empty) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"password": ["This field may not be blank."]})),
        )
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "id": 42,
            "email": body["email"],
            "first_name": body["first_name"],
            "last_name": body["last_name"],
        })),
    )
        .into_response()
}

async fn obtain_token(Json(body): Json<Value>) -> Response {
    if body["password"] == GOOD_PASSWORD {
        Json(json!({"access": "access-token-1", "refresh": "refresh-token-1"})).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
            .into_response()
    }
}

async fn refresh_token(Json(body): Json<Value>) -> Response {
    if body["refresh"] == "refresh-token-1" {
        Json(json!({"access": "access-token-2"})).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired", "code": "token_not_valid"})),
        )
            .into_response()
    }
}
