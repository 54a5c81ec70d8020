//! Normalization of list responses.
//!
//! List endpoints answer either with a bare JSON array or with a paginated
//! envelope `{count, next, previous, results}`. Callers only ever see the
//! flattened items.

use serde::{Deserialize, Serialize};

/// A paginated envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items across all pages.
    #[serde(default)]
    pub count: u64,
    /// URL of the next page.
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page.
    #[serde(default)]
    pub previous: Option<String>,
    /// Items on this page.
    pub results: Vec<T>,
}

/// Either shape a list endpoint may return.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    /// A bare JSON array.
    Bare(Vec<T>),
    /// A paginated envelope.
    Paginated(Page<T>),
}

impl<T> Listing<T> {
    /// The items, whichever shape carried them.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) => items,
            Self::Paginated(page) => page.results,
        }
    }

    /// Whether the backend reported more pages after this one.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        match self {
            Self::Bare(_) => false,
            Self::Paginated(page) => page.next.is_some(),
        }
    }
}

impl<T> From<Listing<T>> for Vec<T> {
    fn from(listing: Listing<T>) -> Self {
        listing.into_vec()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq, Deserialize)]
    struct Item {
        id: u32,
    }

    #[test]
    fn test_paginated_returns_exactly_results() {
        let json = r#"{"count": 5, "next": "http://api/categories/?page=2", "previous": null,
                       "results": [{"id": 1}, {"id": 2}]}"#;
        let listing: Listing<Item> = serde_json::from_str(json).unwrap();
        assert!(listing.has_more());
        assert_eq!(listing.into_vec(), vec![Item { id: 1 }, Item { id: 2 }]);
    }

    #[test]
    fn test_bare_array_is_unchanged() {
        let listing: Listing<Item> = serde_json::from_str(r#"[{"id": 7}, {"id": 3}]"#).unwrap();
        assert!(!listing.has_more());
        assert_eq!(listing.into_vec(), vec![Item { id: 7 }, Item { id: 3 }]);
    }

    #[test]
    fn test_empty_shapes() {
        let bare: Listing<Item> = serde_json::from_str("[]").unwrap();
        assert!(bare.into_vec().is_empty());

        let page: Listing<Item> = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(Vec::from(page).is_empty());
    }

    #[test]
    fn test_object_without_results_is_rejected() {
        assert!(serde_json::from_str::<Listing<Item>>(r#"{"count": 1}"#).is_err());
        assert!(serde_json::from_str::<Listing<Item>>(r#"{"detail": "nope"}"#).is_err());
    }
}
