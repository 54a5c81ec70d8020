//! Category and subcategory endpoints.

use tracing::instrument;

use super::ApiClient;
use super::types::{Category, Product, SubCategory};
use crate::error::ApiError;

impl ApiClient {
    /// List published categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get_list("categories/", &[]).await
    }

    /// Get a category by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is invalid, the category is not found,
    /// or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_category(&self, slug: &str) -> Result<Category, ApiError> {
        let slug = Self::slug(slug)?;
        self.get(&format!("categories/{slug}/"), &[]).await
    }

    /// List the products of a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is invalid, the category is not found,
    /// or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn category_products(&self, slug: &str) -> Result<Vec<Product>, ApiError> {
        let slug = Self::slug(slug)?;
        self.get_list(&format!("categories/{slug}/products/"), &[])
            .await
    }

    /// List published subcategories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_subcategories(&self) -> Result<Vec<SubCategory>, ApiError> {
        self.get_list("subcategories/", &[]).await
    }

    /// List the subcategories under a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is invalid or the API request fails.
    #[instrument(skip(self), fields(category = %category_slug))]
    pub async fn subcategories_for(
        &self,
        category_slug: &str,
    ) -> Result<Vec<SubCategory>, ApiError> {
        let slug = Self::slug(category_slug)?;
        self.get_list("subcategories/", &[("category", slug.to_string())])
            .await
    }

    /// Get a subcategory by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is invalid, the subcategory is not found,
    /// or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_subcategory(&self, slug: &str) -> Result<SubCategory, ApiError> {
        let slug = Self::slug(slug)?;
        self.get(&format!("subcategories/{slug}/"), &[]).await
    }

    /// List the products of a subcategory.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is invalid, the subcategory is not
    /// found, or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn subcategory_products(&self, slug: &str) -> Result<Vec<Product>, ApiError> {
        let slug = Self::slug(slug)?;
        self.get_list(&format!("subcategories/{slug}/products/"), &[])
            .await
    }
}
