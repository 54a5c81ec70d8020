//! URL slug type.
//!
//! Products, categories and subcategories are addressed by slug in the
//! backend's URLs (`/products/{slug}/`). Parsing a [`Slug`] up front keeps
//! path separators and query characters out of request paths.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The input is empty.
    #[error("slug cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[A-Za-z0-9_-]`.
    #[error("slug contains invalid character {0:?}")]
    InvalidChar(char),
}

/// A URL-safe identifier (`robe-en-lin`, `accessoires_2024`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Maximum slug length (matches the backend's `SlugField(max_length=200)`).
    pub const MAX_LENGTH: usize = 200;

    /// Parse a `Slug` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than
    /// [`Self::MAX_LENGTH`], or contains characters other than ASCII
    /// letters, digits, `-` and `_`.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(SlugError::InvalidChar(c));
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_slugs() {
        assert!(Slug::parse("robe-en-lin").is_ok());
        assert!(Slug::parse("accessoires_2024").is_ok());
        assert!(Slug::parse("X").is_ok());
    }

    #[test]
    fn test_parse_rejects_path_characters() {
        assert_eq!(Slug::parse("../admin"), Err(SlugError::InvalidChar('.')));
        assert_eq!(Slug::parse("a/b"), Err(SlugError::InvalidChar('/')));
        assert_eq!(Slug::parse("a?q=1"), Err(SlugError::InvalidChar('?')));
        assert_eq!(Slug::parse("été"), Err(SlugError::InvalidChar('é')));
    }

    #[test]
    fn test_parse_empty_and_long() {
        assert_eq!(Slug::parse(""), Err(SlugError::Empty));
        assert!(matches!(
            Slug::parse(&"a".repeat(201)),
            Err(SlugError::TooLong { max: 200 })
        ));
    }
}
