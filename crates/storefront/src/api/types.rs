//! Domain types mirrored from the backend's REST serializers.
//!
//! These are read-only DTOs: the client fetches and displays them, it never
//! mutates them locally.

use chrono::{DateTime, Utc};
use jaelle_core::{CategoryId, Email, Price, ProductId, ProductImageId, Slug, SubCategoryId, UserId};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalogue Types
// =============================================================================

/// An image attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Image ID.
    pub id: ProductImageId,
    /// Stored image path or URL.
    pub image: String,
    /// Resolved CDN URL, when the backend provides one.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Whether this is the product's main image.
    #[serde(default)]
    pub is_main: bool,
}

impl ProductImage {
    /// URL to display: `image_url` when set, otherwise `image`.
    #[must_use]
    pub fn url(&self) -> &str {
        self.image_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(&self.image)
    }
}

/// A product as returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Unit price in the store currency.
    pub price: Decimal,
    /// Units in stock.
    #[serde(default)]
    pub stock: u32,
    /// Whether the product can be ordered.
    #[serde(default = "default_true")]
    pub available: bool,
    /// Whether the product is promoted on the home page.
    #[serde(default)]
    pub featured: bool,
    /// Owning category.
    #[serde(default)]
    pub category: Option<CategoryId>,
    /// Owning category's name.
    #[serde(default)]
    pub category_name: Option<String>,
    /// Attached images.
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The main image, or the first image, if any.
    #[must_use]
    pub fn main_image(&self) -> Option<&ProductImage> {
        main_image_of(&self.images)
    }

    /// Unit price with currency.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::from_amount(self.price)
    }
}

/// A product as returned by the detail endpoint, with its category inlined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock: u32,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub featured: bool,
    pub category: Category,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProductDetail {
    /// The main image, or the first image, if any.
    #[must_use]
    pub fn main_image(&self) -> Option<&ProductImage> {
        main_image_of(&self.images)
    }

    /// Whether the requested quantity can be fulfilled from stock.
    #[must_use]
    pub const fn can_order(&self, quantity: u32) -> bool {
        self.available && quantity >= 1 && quantity <= self.stock
    }

    /// Flatten into the list representation.
    #[must_use]
    pub fn into_product(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            price: self.price,
            stock: self.stock,
            available: self.available,
            featured: self.featured,
            category: Some(self.category.id),
            category_name: Some(self.category.name),
            images: self.images,
            created_at: self.created_at,
        }
    }
}

/// A top-level product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Number of published products, when the endpoint annotates it.
    #[serde(default)]
    pub products_count: Option<u32>,
}

impl Category {
    /// URL to display: `image_url` when set, otherwise `image`.
    #[must_use]
    pub fn display_image(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .or_else(|| self.image.as_deref().filter(|url| !url.is_empty()))
    }
}

/// A subcategory nested under a [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: SubCategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub products_count: Option<u32>,
}

const fn default_true() -> bool {
    true
}

fn main_image_of(images: &[ProductImage]) -> Option<&ProductImage> {
    images
        .iter()
        .find(|img| img.is_main)
        .or_else(|| images.first())
}

// =============================================================================
// Product Filtering
// =============================================================================

/// Field the product list is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    Price,
    Name,
}

impl SortField {
    /// Backend query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Price => "price",
            Self::Name => "name",
        }
    }

    /// Parse a query value, defaulting to creation date.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" => Self::Price,
            "name" => Self::Name,
            _ => Self::CreatedAt,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Backend query value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Filters accepted by `GET /products/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Restrict to a category slug.
    pub category: Option<Slug>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
    /// Case-insensitive match on name or description.
    pub search: Option<String>,
    /// Sort field.
    pub sort_by: Option<SortField>,
    /// Sort direction.
    pub sort_order: Option<SortOrder>,
}

impl ProductQuery {
    /// Query-string pairs, omitting unset and blank filters.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = &self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("max_price", max.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(sort_by) = self.sort_by {
            pairs.push(("sort_by", sort_by.as_str().to_string()));
        }
        if let Some(sort_order) = self.sort_order {
            pairs.push(("sort_order", sort_order.as_str().to_string()));
        }
        pairs
    }
}

// =============================================================================
// Account Types
// =============================================================================

/// Body of `POST /users/register/`.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: Email,
    pub password: SecretString,
    pub first_name: String,
    pub last_name: String,
}

/// The account created by a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Body of `POST /token/`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: Email,
    pub password: SecretString,
}

/// JWT pair issued by the backend.
///
/// Storing the tokens is the caller's responsibility.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Short-lived access token for `Authorization: Bearer`.
    pub access: SecretString,
    /// Refresh token; absent when a refresh call does not rotate it.
    pub refresh: Option<SecretString>,
}
