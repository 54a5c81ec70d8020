//! Simulated checkout.
//!
//! There is no order endpoint: the form is validated against the stored
//! cart, the summary is printed and the cart is emptied.

use jaelle_core::Price;
use jaelle_storefront::cart::{CartStore, JsonFileCartStore};
use jaelle_storefront::forms::CheckoutForm;
use tracing::info;

use super::cart::print_cart;
use super::{CommandError, Context};

pub fn run(ctx: &Context, form: &CheckoutForm, json: bool) -> Result<(), CommandError> {
    let store = JsonFileCartStore::new(&ctx.config.cart_path);
    let mut cart = store.load()?;
    let order = form.validate(&cart)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&order)?);
    } else {
        let c = &order.customer;
        println!("Order for {} {} <{}>", c.first_name, c.last_name, c.email);
        println!("Ship to: {}, {} {}, {}", c.address, c.postal_code, c.city, c.country);
        println!("Payment: {}", order.payment_method);
        println!();
        print_cart(&cart);
        println!();
        println!(
            "Order confirmed (simulated): {}",
            Price::from_amount(order.total_amount)
        );
    }

    info!(
        lines = order.lines.len(),
        total = %order.total_amount,
        payment = %order.payment_method,
        "Simulated order placed"
    );

    cart.clear();
    store.save(&cart)?;
    Ok(())
}
