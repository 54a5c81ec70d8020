//! Product endpoints.

use tracing::{debug, instrument};

use super::ApiClient;
use super::types::{Product, ProductDetail, ProductQuery};
use crate::error::ApiError;
use crate::search::is_searchable;

impl ApiClient {
    /// List all published products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let products = self.get_list::<Product>("products/", &[]).await?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// List products matching the given filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products_filtered(
        &self,
        query: &ProductQuery,
    ) -> Result<Vec<Product>, ApiError> {
        let products = self
            .get_list::<Product>("products/", &query.to_pairs())
            .await?;
        debug!(count = products.len(), "Fetched filtered products");
        Ok(products)
    }

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is invalid, the product is not found, or
    /// the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_product(&self, slug: &str) -> Result<ProductDetail, ApiError> {
        let slug = Self::slug(slug)?;
        self.get(&format!("products/{slug}/"), &[]).await
    }

    /// List featured products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn featured_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get_list("products/featured/", &[]).await
    }

    /// Search products by name or description.
    ///
    /// Queries shorter than the configured minimum (2 characters by default,
    /// after trimming) return an empty list without touching the network.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let query = query.trim();
        if !is_searchable(query, self.min_search_chars()) {
            debug!("Query too short, skipping search request");
            return Ok(Vec::new());
        }

        let products = self
            .get_list::<Product>("products/search/", &[("q", query.to_string())])
            .await?;
        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }
}
