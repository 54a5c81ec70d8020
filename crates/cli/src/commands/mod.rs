//! Subcommand implementations.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod search;

use jaelle_core::Price;
use jaelle_storefront::api::types::{Category, Product, ProductDetail, SubCategory};
use jaelle_storefront::cart::CartStoreError;
use jaelle_storefront::forms::FormError;
use jaelle_storefront::{ApiClient, ApiError, StorefrontConfig};
use thiserror::Error;

/// Errors surfaced by any subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    #[error(transparent)]
    CartStore(#[from] CartStoreError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("Input error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Json(#[from] serde_json::Error),

    /// The referenced item is not in the cart.
    #[error("No cart line for product {0}")]
    NotInCart(i32),
}

/// Everything a subcommand needs.
pub struct Context {
    pub config: StorefrontConfig,
    pub client: ApiClient,
}

impl Context {
    /// Build the API client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, CommandError> {
        let client = ApiClient::new(&config.api)?;
        Ok(Self { config, client })
    }
}

pub fn print_products(products: &[Product]) {
    if products.is_empty() {
        println!("No products found.");
        return;
    }
    for p in products {
        let stock = if p.available { "" } else { "  (unavailable)" };
        println!(
            "{:>5}  {:<36} {:>12}  {}{stock}",
            p.id.to_string(),
            p.name,
            p.unit_price().to_string(),
            p.slug
        );
    }
}

pub fn print_product_detail(p: &ProductDetail) {
    println!("{} [{}]", p.name, p.slug);
    println!("  Price:     {}", Price::from_amount(p.price));
    println!("  Category:  {}", p.category.name);
    println!("  Stock:     {}", p.stock);
    if let Some(img) = p.main_image() {
        println!("  Image:     {}", img.url());
    }
    if !p.description.is_empty() {
        println!();
        println!("{}", p.description);
    }
}

pub fn print_categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("No categories found.");
        return;
    }
    for c in categories {
        let count = c
            .products_count
            .map(|n| format!(" ({n} products)"))
            .unwrap_or_default();
        println!("{:>5}  {:<30} {}{count}", c.id.to_string(), c.name, c.slug);
    }
}

pub fn print_subcategories(subcategories: &[SubCategory]) {
    if subcategories.is_empty() {
        println!("No subcategories found.");
        return;
    }
    for s in subcategories {
        let parent = s.category_name.as_deref().unwrap_or("-");
        println!("{:>5}  {:<30} {:<24} {}", s.id.to_string(), s.name, s.slug, parent);
    }
}
