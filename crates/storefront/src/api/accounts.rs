//! Registration and token endpoints.
//!
//! Returned tokens are handed to the caller; persisting them is outside this
//! crate.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::ApiClient;
use super::types::{Credentials, RegisterRequest, RegisteredUser, TokenPair};
use crate::error::ApiError;

/// Wire body for registration; borrows so the password is never copied.
#[derive(Serialize)]
struct RegisterBody<'a> {
    email: &'a str,
    password: &'a str,
    first_name: &'a str,
    last_name: &'a str,
}

#[derive(Serialize)]
struct TokenBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshBody<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RawTokens {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

impl From<RawTokens> for TokenPair {
    fn from(raw: RawTokens) -> Self {
        Self {
            access: SecretString::from(raw.access),
            refresh: raw.refresh.map(SecretString::from),
        }
    }
}

impl ApiClient {
    /// Create a customer account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with field details when the backend rejects
    /// the registration, or another error if the request fails.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisteredUser, ApiError> {
        let body = RegisterBody {
            email: request.email.as_str(),
            password: request.password.expose_secret(),
            first_name: request.first_name.trim(),
            last_name: request.last_name.trim(),
        };

        let user: RegisteredUser = self.post("users/register/", &body).await?;
        info!(user_id = %user.id, "Account registered");
        Ok(user)
    }

    /// Exchange credentials for a JWT pair.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` (usually 401) for bad credentials, or another
    /// error if the request fails.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn obtain_token(&self, credentials: &Credentials) -> Result<TokenPair, ApiError> {
        let body = TokenBody {
            email: credentials.email.as_str(),
            password: credentials.password.expose_secret(),
        };

        let tokens: RawTokens = self.post("token/", &body).await?;
        Ok(tokens.into())
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` if the refresh token is expired or invalid,
    /// or another error if the request fails.
    #[instrument(skip(self, refresh))]
    pub async fn refresh_token(&self, refresh: &SecretString) -> Result<TokenPair, ApiError> {
        let body = RefreshBody {
            refresh: refresh.expose_secret(),
        };

        let tokens: RawTokens = self.post("token/refresh/", &body).await?;
        Ok(tokens.into())
    }
}
