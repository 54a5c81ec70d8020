//! Catalogue browsing commands.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally filtered and sorted
//! jaelle products list --category robes --max-price 80 --sort-by price --asc
//!
//! # Show one product
//! jaelle products show robe-en-lin
//!
//! # Show a random featured product
//! jaelle products featured --random
//!
//! # Browse categories
//! jaelle categories list
//! jaelle categories show robes
//! ```

use jaelle_storefront::api::types::ProductQuery;
use jaelle_storefront::featured::main_image;
use rand::rng;
use tracing::warn;

use super::{
    CommandError, Context, print_categories, print_product_detail, print_products,
    print_subcategories,
};

/// List products, using the filtered endpoint only when a filter is set.
pub async fn list_products(ctx: &Context, query: &ProductQuery) -> Result<(), CommandError> {
    let products = if *query == ProductQuery::default() {
        ctx.client.list_products().await?
    } else {
        ctx.client.list_products_filtered(query).await?
    };
    print_products(&products);
    Ok(())
}

pub async fn show_product(ctx: &Context, slug: &str) -> Result<(), CommandError> {
    let product = ctx.client.get_product(slug).await?;
    print_product_detail(&product);
    Ok(())
}

/// Show featured products, or one picked at random.
///
/// The home page hero is decorative: a failed request is logged and shown as
/// "nothing featured" rather than failing the command.
pub async fn featured(ctx: &Context, random: bool) -> Result<(), CommandError> {
    if !random {
        let products = ctx.client.featured_products().await?;
        print_products(&products);
        return Ok(());
    }

    let picked = match ctx.client.random_featured_product(&mut rng()).await {
        Ok(picked) => picked,
        Err(e) => {
            warn!(error = %e, "Could not load featured products");
            None
        }
    };

    match picked {
        Some(product) => {
            println!("{} - {}", product.name, product.unit_price());
            if let Some(img) = main_image(&product) {
                println!("  {}", img.url());
            }
            println!("  jaelle products show {}", product.slug);
        }
        None => println!("No featured product right now."),
    }
    Ok(())
}

pub async fn list_categories(ctx: &Context) -> Result<(), CommandError> {
    let categories = ctx.client.list_categories().await?;
    print_categories(&categories);
    Ok(())
}

/// Show a category with its subcategories and products.
pub async fn show_category(ctx: &Context, slug: &str) -> Result<(), CommandError> {
    let category = ctx.client.get_category(slug).await?;
    println!("{} [{}]", category.name, category.slug);
    if !category.description.is_empty() {
        println!("{}", category.description);
    }

    let (subcategories, products) = tokio::try_join!(
        ctx.client.subcategories_for(slug),
        ctx.client.category_products(slug),
    )?;

    if !subcategories.is_empty() {
        println!();
        println!("Subcategories:");
        print_subcategories(&subcategories);
    }
    println!();
    print_products(&products);
    Ok(())
}

pub async fn category_products(ctx: &Context, slug: &str) -> Result<(), CommandError> {
    let products = ctx.client.category_products(slug).await?;
    print_products(&products);
    Ok(())
}

pub async fn list_subcategories(
    ctx: &Context,
    category: Option<&str>,
) -> Result<(), CommandError> {
    let subcategories = match category {
        Some(slug) => ctx.client.subcategories_for(slug).await?,
        None => ctx.client.list_subcategories().await?,
    };
    print_subcategories(&subcategories);
    Ok(())
}

pub async fn show_subcategory(ctx: &Context, slug: &str) -> Result<(), CommandError> {
    let (subcategory, products) = tokio::try_join!(
        ctx.client.get_subcategory(slug),
        ctx.client.subcategory_products(slug),
    )?;
    let parent = subcategory.category_name.as_deref().unwrap_or("-");
    println!("{} [{}] in {parent}", subcategory.name, subcategory.slug);
    println!();
    print_products(&products);
    Ok(())
}
