//! Uniform error contract for backend calls.
//!
//! Every API accessor returns `Result<T, ApiError>`. Failures fall into four
//! groups: the request never completed ([`ApiError::Network`]), the backend
//! answered with a non-2xx status ([`ApiError::Api`]), a 2xx body did not
//! have the expected shape ([`ApiError::Decode`]), or something else went
//! wrong before a request could be made.

use jaelle_core::SlugError;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when talking to the storefront backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: connection refused, timeout, TLS, body read.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Human-readable message extracted from the body or status.
        message: String,
        /// The JSON body, when the backend returned one.
        details: Option<Value>,
    },

    /// A success response did not match the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A slug argument was rejected before building the request.
    #[error("Invalid slug: {0}")]
    InvalidSlug(#[from] SlugError),

    /// Any other failure (bad URL join, client construction).
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ApiError {
    /// Build an [`ApiError::Api`] from a status and raw response body.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let details = serde_json::from_str::<Value>(body).ok();
        let message = error_message(details.as_ref(), status);
        Self::Api {
            status: status.as_u16(),
            message,
            details,
        }
    }

    /// HTTP status for [`ApiError::Api`], `None` otherwise.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured body for [`ApiError::Api`], if any.
    #[must_use]
    pub const fn details(&self) -> Option<&Value> {
        match self {
            Self::Api { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Whether the backend reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(404))
    }

    /// Field-level validation errors from a DRF-style body
    /// (`{"email": ["already taken"], "password": ["too short"]}`).
    ///
    /// Returns `(field, message)` pairs sorted by field name.
    #[must_use]
    pub fn field_errors(&self) -> Vec<(String, String)> {
        let Some(Value::Object(map)) = self.details() else {
            return Vec::new();
        };

        let mut errors: Vec<(String, String)> = map
            .iter()
            .filter(|(field, _)| !matches!(field.as_str(), "detail" | "error" | "code"))
            .flat_map(|(field, value)| {
                messages_of(value)
                    .into_iter()
                    .map(move |msg| (field.clone(), msg))
            })
            .collect();
        errors.sort();
        errors
    }

    /// Text suitable for showing to a shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Unable to reach the shop, please try again".to_string(),
            Self::Api { message, .. } => message.clone(),
            Self::Decode(_) | Self::Unexpected(_) => "Unexpected response from the shop".to_string(),
            Self::InvalidSlug(err) => err.to_string(),
        }
    }
}

/// Pick the most useful message from an error body.
///
/// Order: `detail`, then `error`, then `non_field_errors`, then the first
/// field error, then the status reason phrase.
fn error_message(details: Option<&Value>, status: StatusCode) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_string)
    };

    let Some(details) = details else {
        return fallback();
    };

    if let Value::String(s) = details
        && !s.is_empty()
    {
        return s.clone();
    }

    for key in ["detail", "error", "non_field_errors"] {
        if let Some(msg) = details.get(key).and_then(|v| messages_of(v).into_iter().next()) {
            return msg;
        }
    }

    if let Value::Object(map) = details
        && let Some((field, msg)) = map
            .iter()
            .find_map(|(field, v)| messages_of(v).into_iter().next().map(|m| (field, m)))
    {
        return format!("{field}: {msg}");
    }

    fallback()
}

/// Flatten a string or list-of-strings value into messages.
fn messages_of(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if !s.is_empty() => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().filter(|s| !s.is_empty()).map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}
