//! Cross-site request forgery token forwarding.
//!
//! The backend sets a `csrftoken` cookie and expects its value back in the
//! `X-CSRFToken` header on state-changing requests. The client keeps the
//! cookies in a [`Jar`] shared with `reqwest`, so a cookie set by any earlier
//! response is picked up automatically.

use reqwest::Method;
use reqwest::cookie::{CookieStore, Jar};
use url::Url;

/// Name of the cookie carrying the token.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header the token is forwarded in.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Whether `method` changes server state and so needs the token.
#[must_use]
pub fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Current token for `url`, read from the jar.
#[must_use]
pub fn read_token(jar: &Jar, url: &Url) -> Option<String> {
    let header = jar.cookies(url)?;
    let header = header.to_str().ok()?;
    cookie_value(header, CSRF_COOKIE)
}

/// Store `token` as the `csrftoken` cookie for `url`'s host.
pub fn seed_token(jar: &Jar, url: &Url, token: &str) {
    jar.add_cookie_str(&format!("{CSRF_COOKIE}={token}; Path=/"), url);
}

/// Find `name` in a `Cookie:` header value (`a=1; csrftoken=abc`).
#[must_use]
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}
