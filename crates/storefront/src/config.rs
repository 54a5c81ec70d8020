//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `JAELLE_API_URL` - Backend API root (default: `http://localhost:8000/api/`)
//! - `JAELLE_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `JAELLE_SEARCH_DEBOUNCE_MS` - Quiet period before a search fires (default: 300)
//! - `JAELLE_SEARCH_MIN_CHARS` - Minimum query length that hits the network (default: 2)
//! - `JAELLE_CART_PATH` - Where the cart is persisted (default: `.jaelle-cart.json`)
//! - `JAELLE_CSRF_TOKEN` - Seeds the `csrftoken` cookie for mutating calls
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000/api/";
const DEFAULT_TIMEOUT_SECS: &str = "10";
const DEFAULT_DEBOUNCE_MS: &str = "300";
const DEFAULT_MIN_SEARCH_CHARS: &str = "2";
const DEFAULT_CART_PATH: &str = ".jaelle-cart.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Search-as-you-type tuning
    pub search: SearchConfig,
    /// File the CLI persists the cart to
    pub cart_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Backend API configuration.
///
/// Implements `Debug` manually to redact the CSRF token.
#[derive(Clone)]
pub struct ApiConfig {
    /// API root; always ends with `/` so relative endpoint paths join under it
    pub base_url: Url,
    /// Timeout applied to every request
    pub request_timeout: Duration,
    /// Minimum trimmed query length for product search
    pub min_search_chars: usize,
    /// Pre-seeded CSRF token, for backends that never set the cookie themselves
    pub csrf_token: Option<SecretString>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("request_timeout", &self.request_timeout)
            .field("min_search_chars", &self.min_search_chars)
            .field(
                "csrf_token",
                &self.csrf_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ApiConfig {
    /// Configuration pointing at `base_url` with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if the URL cannot be parsed or
    /// is not http(s).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("JAELLE_API_URL", base_url)?,
            request_timeout: Duration::from_secs(10),
            min_search_chars: 2,
            csrf_token: None,
        })
    }
}

/// Search-as-you-type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a request is issued
    pub debounce: Duration,
    /// Queries shorter than this (after trimming) never reach the network
    pub min_query_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_chars: 2,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let base_url = parse_base_url(
            "JAELLE_API_URL",
            &env.get_or_default("JAELLE_API_URL", DEFAULT_API_URL),
        )?;
        let timeout_secs: u64 =
            env.parse_or_default("JAELLE_REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let debounce_ms: u64 = env.parse_or_default("JAELLE_SEARCH_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)?;
        let min_chars: usize =
            env.parse_or_default("JAELLE_SEARCH_MIN_CHARS", DEFAULT_MIN_SEARCH_CHARS)?;

        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "JAELLE_REQUEST_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let api = ApiConfig {
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            min_search_chars: min_chars,
            csrf_token: env.get_optional("JAELLE_CSRF_TOKEN").map(SecretString::from),
        };

        let search = SearchConfig {
            debounce: Duration::from_millis(debounce_ms),
            min_query_chars: min_chars,
        };

        Ok(Self {
            api,
            search,
            cart_path: PathBuf::from(env.get_or_default("JAELLE_CART_PATH", DEFAULT_CART_PATH)),
            sentry_dsn: env.get_optional("SENTRY_DSN"),
            sentry_environment: env.get_optional("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the defaulting and parsing helpers.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable; blank values count as unset.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to the default text.
    fn parse_or_default<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_or_default(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

/// Parse an API root URL and make sure it ends with a slash.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
