//! Cart commands.
//!
//! The cart lives in a JSON file (`JAELLE_CART_PATH`) so it survives between
//! invocations. Every command loads it, applies one action and saves it back.

use jaelle_core::{Price, ProductId};
use jaelle_storefront::cart::{Cart, CartAction, CartItem, CartStore, JsonFileCartStore};
use tracing::info;

use super::{CommandError, Context};

fn store(ctx: &Context) -> JsonFileCartStore {
    JsonFileCartStore::new(&ctx.config.cart_path)
}

fn apply(ctx: &Context, action: CartAction) -> Result<Cart, CommandError> {
    let store = store(ctx);
    let mut cart = store.load()?;
    cart.dispatch(action);
    store.save(&cart)?;
    Ok(cart)
}

/// Look up a product by slug and add it to the cart.
pub async fn add(ctx: &Context, slug: &str, quantity: u32) -> Result<(), CommandError> {
    let product = ctx.client.get_product(slug).await?;
    if !product.available {
        println!("Warning: \"{}\" is currently unavailable.", product.name);
    } else if !product.can_order(quantity.max(1)) {
        println!(
            "Warning: only {} of \"{}\" in stock.",
            product.stock, product.name
        );
    }

    let item = CartItem::from_detail(&product, quantity);
    let cart = apply(ctx, CartAction::Add(item))?;
    info!(product = %product.slug, quantity, "Added to cart");

    println!(
        "Added {} x {}. Cart now holds {} item(s).",
        quantity.max(1),
        product.name,
        cart.total_items()
    );
    Ok(())
}

pub fn remove(ctx: &Context, id: ProductId) -> Result<(), CommandError> {
    let current = store(ctx).load()?;
    if current.item_count_for(id) == 0 {
        return Err(CommandError::NotInCart(id.as_i32()));
    }
    let cart = apply(ctx, CartAction::Remove(id))?;
    println!("Removed product {id}. {} item(s) left.", cart.total_items());
    Ok(())
}

pub fn update(ctx: &Context, id: ProductId, quantity: u32) -> Result<(), CommandError> {
    let current = store(ctx).load()?;
    if current.item_count_for(id) == 0 {
        return Err(CommandError::NotInCart(id.as_i32()));
    }
    let cart = apply(ctx, CartAction::UpdateQuantity { id, quantity })?;
    println!(
        "Product {id} quantity set to {}.",
        cart.item_count_for(id)
    );
    Ok(())
}

pub fn clear(ctx: &Context) -> Result<(), CommandError> {
    apply(ctx, CartAction::Clear)?;
    println!("Cart cleared.");
    Ok(())
}

pub fn show(ctx: &Context, json: bool) -> Result<(), CommandError> {
    let cart = store(ctx).load()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&cart)?);
        return Ok(());
    }
    print_cart(&cart);
    Ok(())
}

pub fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for line in cart.items() {
        println!(
            "{:>5}  {:<36} {:>3} x {:>10} = {:>10}",
            line.id.to_string(),
            line.name,
            line.quantity,
            Price::from_amount(line.price).to_string(),
            Price::from_amount(line.line_total()).to_string(),
        );
    }
    println!(
        "Total: {} item(s), {}",
        cart.total_items(),
        cart.total_price()
    );
}
