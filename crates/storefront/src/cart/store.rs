//! Optional cart persistence.
//!
//! Only the lines are stored; totals are re-derived on load, and
//! [`Cart::from_items`] re-applies the cart invariants to whatever was on
//! disk. Lines whose price the backend could never have produced are
//! rejected rather than repaired.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use jaelle_core::ProductId;
use tracing::{debug, warn};

use super::{Cart, CartItem};

/// Current on-disk format version.
const SNAPSHOT_VERSION: u32 = 1;

/// Errors that can occur when loading or saving a cart.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// Reading or writing the backing file failed.
    #[error("Cart storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stored cart is not valid JSON for the expected shape.
    #[error("Cart storage format error: {0}")]
    Format(#[from] serde_json::Error),

    /// The stored cart was written by an incompatible version.
    #[error("Unsupported cart format version {0}")]
    UnsupportedVersion(u32),

    /// A stored line has a price or total no cart could hold.
    #[error("Invalid cart line for product {id}: {reason}")]
    InvalidLine { id: ProductId, reason: &'static str },
}

/// Somewhere a cart can be kept between runs.
pub trait CartStore {
    /// Load the stored cart; an absent cart loads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored cart cannot be read or parsed.
    fn load(&self) -> Result<Cart, CartStoreError>;

    /// Replace the stored cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written.
    fn save(&self, cart: &Cart) -> Result<(), CartStoreError>;
}

#[derive(Serialize, Deserialize)]
struct CartSnapshot {
    version: u32,
    items: Vec<CartItem>,
}

/// Stores the cart as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileCartStore {
    path: PathBuf,
}

impl JsonFileCartStore {
    /// A store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStore for JsonFileCartStore {
    fn load(&self) -> Result<Cart, CartStoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No stored cart, starting empty");
                return Ok(Cart::new());
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: CartSnapshot = serde_json::from_slice(&bytes)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(CartStoreError::UnsupportedVersion(snapshot.version));
        }

        for line in &snapshot.items {
            check_line(line).inspect_err(|e| {
                warn!(path = %self.path.display(), error = %e, "Rejecting stored cart");
            })?;
        }

        Ok(Cart::from_items(snapshot.items))
    }

    fn save(&self, cart: &Cart) -> Result<(), CartStoreError> {
        let snapshot = CartSnapshot {
            version: SNAPSHOT_VERSION,
            items: cart.items().to_vec(),
        };
        let json = serde_json::to_vec_pretty(&snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write to a sibling file first so a crash never leaves half a cart
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!(
            path = %self.path.display(),
            lines = cart.items().len(),
            "Cart saved"
        );
        Ok(())
    }
}

fn check_line(line: &CartItem) -> Result<(), CartStoreError> {
    let reason = if line.checked_line_total().is_none() {
        "line total overflows"
    } else if line.has_valid_price() {
        return Ok(());
    } else {
        "price out of range"
    };
    Err(CartStoreError::InvalidLine {
        id: line.id,
        reason,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn item(id: i32, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: format!("Produit {id}"),
            price: Decimal::new(1250, 2),
            quantity,
            image: String::new(),
            slug: format!("produit-{id}"),
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileCartStore::new(dir.path().join("cart.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileCartStore::new(dir.path().join("nested/cart.json"));

        let cart = Cart::from_items([item(1, 2), item(2, 1)]);
        store.save(&cart).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, cart);
        assert_eq!(loaded.total_amount(), Decimal::new(3750, 2));
    }

    #[test]
    fn test_load_repairs_hand_edited_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        fs::write(
            &path,
            r#"{"version": 1, "items": [
                {"id": 1, "name": "A", "price": "2.00", "quantity": 0, "slug": "a"},
                {"id": 1, "name": "A", "price": "2.00", "quantity": 3, "slug": "a"}
            ]}"#,
        )
        .unwrap();

        let cart = JsonFileCartStore::new(&path).load().unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_items(), 4);
        assert_eq!(cart.total_amount(), Decimal::new(8, 0));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        fs::write(&path, r#"{"version": 7, "items": []}"#).unwrap();

        let err = JsonFileCartStore::new(&path).load().unwrap_err();
        assert!(matches!(err, CartStoreError::UnsupportedVersion(7)));
    }

    #[test]
    fn test_rejects_out_of_range_price_instead_of_overflowing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        fs::write(
            &path,
            r#"{"version":1,"items":[{"id":1,"name":"A","price":"50000000000000000000000000000","quantity":2,"slug":"a"}]}"#,
        )
        .unwrap();

        let err = JsonFileCartStore::new(&path).load().unwrap_err();
        assert!(matches!(
            err,
            CartStoreError::InvalidLine { id, .. } if id == ProductId::new(1)
        ));
    }

    #[test]
    fn test_rejects_negative_price() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        fs::write(
            &path,
            r#"{"version":1,"items":[{"id":3,"name":"C","price":"-4.00","quantity":1,"slug":"c"}]}"#,
        )
        .unwrap();

        let err = JsonFileCartStore::new(&path).load().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid cart line for product 3: price out of range"
        );
    }

    #[test]
    fn test_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        fs::write(&path, "not json").unwrap();

        let err = JsonFileCartStore::new(&path).load().unwrap_err();
        assert!(matches!(err, CartStoreError::Format(_)));
    }
}
