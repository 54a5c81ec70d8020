//! REST client for the Jaelle backend.
//!
//! # Architecture
//!
//! - One `reqwest::Client` with a shared cookie [`Jar`](reqwest::cookie::Jar)
//! - Every accessor is request → parse → normalize; no retry, no caching
//! - List endpoints are flattened through [`Listing`]
//! - Mutating requests carry the `X-CSRFToken` header (see [`csrf`])
//! - All failures surface as [`ApiError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use jaelle_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//!
//! let featured = client.featured_products().await?;
//! let product = client.get_product("robe-en-lin").await?;
//! let hits = client.search_products("robe").await?;
//! ```

pub mod csrf;
pub mod pagination;
pub mod types;

mod accounts;
mod categories;
mod products;

use std::sync::Arc;

use jaelle_core::Slug;
use reqwest::cookie::Jar;
use reqwest::{Method, header};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::error::ApiError;

pub use pagination::{Listing, Page};
pub use types::*;

/// How much of a response body is echoed into logs.
const LOG_BODY_LIMIT: usize = 500;

/// Client for the storefront REST API.
///
/// Cheap to clone; clones share the connection pool and cookie jar.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

#[derive(Clone)]
struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cookies: Arc<Jar>,
    access_token: Option<SecretString>,
    min_search_chars: usize,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field(
                "access_token",
                &self.inner.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unexpected` if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let cookies = Arc::new(Jar::default());

        if let Some(token) = &config.csrf_token {
            csrf::seed_token(&cookies, &config.base_url, token.expose_secret());
        }

        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .timeout(config.request_timeout)
            .user_agent(concat!("jaelle-storefront/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Unexpected(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                cookies,
                access_token: None,
                min_search_chars: config.min_search_chars,
            }),
        })
    }

    /// A client that also sends `Authorization: Bearer <token>`.
    ///
    /// The returned client shares the connection pool and cookies.
    #[must_use]
    pub fn with_access_token(&self, token: SecretString) -> Self {
        let mut inner = (*self.inner).clone();
        inner.access_token = Some(token);
        Self {
            inner: Arc::new(inner),
        }
    }

    /// The API root every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Seed the `csrftoken` cookie explicitly.
    pub fn set_csrf_token(&self, token: &str) {
        csrf::seed_token(&self.inner.cookies, &self.inner.base_url, token);
    }

    /// The token that will be forwarded on the next mutating request.
    #[must_use]
    pub fn csrf_token(&self) -> Option<String> {
        csrf::read_token(&self.inner.cookies, &self.inner.base_url)
    }

    /// Minimum trimmed query length for product search.
    #[must_use]
    pub fn min_search_chars(&self) -> usize {
        self.inner.min_search_chars
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    /// Resolve an endpoint path (`"products/"`) against the API root.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| ApiError::Unexpected(format!("invalid endpoint '{path}': {e}")))
    }

    /// Parse a slug argument before it is placed in a path.
    fn slug(raw: &str) -> Result<Slug, ApiError> {
        Ok(Slug::parse(raw.trim())?)
    }

    /// `GET` a JSON resource.
    async fn get<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.execute::<T, ()>(Method::GET, path, query, None).await
    }

    /// `GET` a list resource, accepting either list shape.
    async fn get_list<T>(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let listing: Listing<T> = self.get(path, query).await?;
        Ok(listing.into_vec())
    }

    /// `POST` a JSON body.
    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute::<T, B>(Method::POST, path, &[], Some(body)).await
    }

    /// Execute a request and decode the JSON response.
    async fn execute<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;

        let mut request = self
            .inner
            .client
            .request(method.clone(), url.clone())
            .header(header::ACCEPT, "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }

        if csrf::is_mutating(&method) {
            match csrf::read_token(&self.inner.cookies, &url) {
                Some(token) => request = request.header(csrf::CSRF_HEADER, token),
                None => debug!(%method, path, "No csrftoken cookie for mutating request"),
            }
        }

        if let Some(token) = &self.inner.access_token {
            request = request.bearer_auth(token.expose_secret());
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%method, path, error = %e, "Request to backend failed");
            ApiError::Network(e)
        })?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let err = ApiError::from_response(status, &response_text);
            warn!(
                %method,
                path,
                status = %status,
                body = %truncate(&response_text),
                "Backend returned non-success status"
            );
            return Err(err);
        }

        serde_json::from_str::<T>(&response_text).map_err(|e| {
            error!(
                %method,
                path,
                error = %e,
                body = %truncate(&response_text),
                "Failed to parse backend response"
            );
            ApiError::Decode(e)
        })
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}
