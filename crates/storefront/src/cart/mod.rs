//! Client-held shopping cart.
//!
//! The cart is a reducer over line items: every mutation updates the item
//! list and then recomputes `total_items` and `total_amount` before
//! returning. Two invariants hold after every operation:
//!
//! - each line has `quantity >= 1`
//! - line ids are unique (adding an existing id merges into its line)
//!
//! The cart is not persisted implicitly; see [`store`] for the optional JSON
//! file store.

pub mod store;

use jaelle_core::{Price, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::types::{Product, ProductDetail};

pub use store::{CartStore, CartStoreError, JsonFileCartStore};

/// Highest unit price the backend stores (`max_digits=10, decimal_places=2`),
/// i.e. 99 999 999.99.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(0x540B_E3FF, 0x2, 0, false, 2);

/// A product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    /// Display image URL; empty when the product has none.
    #[serde(default)]
    pub image: String,
    pub slug: String,
}

impl CartItem {
    /// Build a line for `quantity` units of a listed product.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity: quantity.max(1),
            image: product
                .main_image()
                .map(|img| img.url().to_string())
                .unwrap_or_default(),
            slug: product.slug.clone(),
        }
    }

    /// Build a line from a product detail page.
    #[must_use]
    pub fn from_detail(product: &ProductDetail, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            quantity: quantity.max(1),
            image: product
                .main_image()
                .map(|img| img.url().to_string())
                .unwrap_or_default(),
            slug: product.slug.clone(),
        }
    }

    /// `price × quantity`, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.checked_line_total().unwrap_or(Decimal::MAX)
    }

    /// `price × quantity`, or `None` if it does not fit in a [`Decimal`].
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }

    /// Whether the unit price is within what the backend can hold.
    #[must_use]
    pub fn has_valid_price(&self) -> bool {
        self.price >= Decimal::ZERO && self.price <= MAX_UNIT_PRICE
    }
}

/// Actions understood by [`Cart::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    Add(CartItem),
    Remove(ProductId),
    UpdateQuantity { id: ProductId, quantity: u32 },
    Clear,
}

/// The shopping cart with derived totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    items: Vec<CartItem>,
    total_items: u32,
    total_amount: Decimal,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from stored lines, restoring the invariants.
    ///
    /// Lines are re-added in order, so duplicate ids merge and zero
    /// quantities become 1.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            cart.add(item);
        }
        cart
    }

    /// Apply an action.
    pub fn dispatch(&mut self, action: CartAction) {
        match action {
            CartAction::Add(item) => self.add(item),
            CartAction::Remove(id) => self.remove(id),
            CartAction::UpdateQuantity { id, quantity } => self.update_quantity(id, quantity),
            CartAction::Clear => self.clear(),
        }
    }

    /// Add a line, merging into an existing line with the same id.
    ///
    /// When merging, only the quantity changes; the existing line's name,
    /// price and image are kept. A quantity of 0 counts as 1.
    pub fn add(&mut self, mut item: CartItem) {
        item.quantity = item.quantity.max(1);

        if let Some(existing) = self.items.iter_mut().find(|line| line.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            self.items.push(item);
        }

        self.recompute();
    }

    /// Remove the line with `id`, if present.
    pub fn remove(&mut self, id: ProductId) {
        self.items.retain(|line| line.id != id);
        self.recompute();
    }

    /// Set the quantity of the line with `id`, clamped to at least 1.
    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) {
        if let Some(line) = self.items.iter_mut().find(|line| line.id == id) {
            line.quantity = quantity.max(1);
        }
        self.recompute();
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
        self.recompute();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of line quantities.
    #[must_use]
    pub const fn total_items(&self) -> u32 {
        self.total_items
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub const fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    /// Total as a [`Price`] in the store currency.
    #[must_use]
    pub fn total_price(&self) -> Price {
        Price::from_amount(self.total_amount)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity held for `id` (0 when absent).
    #[must_use]
    pub fn item_count_for(&self, id: ProductId) -> u32 {
        self.items
            .iter()
            .find(|line| line.id == id)
            .map_or(0, |line| line.quantity)
    }

    /// Consume the cart, returning its lines.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    fn recompute(&mut self) {
        self.total_items = self
            .items
            .iter()
            .fold(0_u32, |acc, line| acc.saturating_add(line.quantity));
        self.total_amount = self
            .items
            .iter()
            .try_fold(Decimal::ZERO, |acc, line| {
                line.checked_line_total().and_then(|t| acc.checked_add(t))
            })
            .unwrap_or(Decimal::MAX);
    }
}
