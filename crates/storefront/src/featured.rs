//! Home page hero product selection.

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, instrument};

use crate::api::ApiClient;
use crate::api::types::{Product, ProductImage};
use crate::error::ApiError;

/// Pick one product uniformly at random among those with at least one image.
#[must_use]
pub fn pick_featured<'a, R>(products: &'a [Product], rng: &mut R) -> Option<&'a Product>
where
    R: Rng + ?Sized,
{
    let candidates: Vec<&Product> = products.iter().filter(|p| !p.images.is_empty()).collect();
    candidates.choose(rng).copied()
}

/// The image to show for a product: its main image, else its first.
#[must_use]
pub fn main_image(product: &Product) -> Option<&ProductImage> {
    product.main_image()
}

impl ApiClient {
    /// Fetch the featured products and pick one to showcase.
    ///
    /// Returns `Ok(None)` when no featured product has an image.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, rng))]
    pub async fn random_featured_product<R>(&self, rng: &mut R) -> Result<Option<Product>, ApiError>
    where
        R: Rng + ?Sized,
    {
        let products = self.featured_products().await?;
        let picked = pick_featured(&products, rng).cloned();
        debug!(
            candidates = products.len(),
            picked = ?picked.as_ref().map(|p| &p.slug),
            "Featured product selected"
        );
        Ok(picked)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    use super::*;

    fn product(id: i32, images: serde_json::Value) -> Product {
        serde_json::from_value(json!({
            "id": id,
            "name": format!("P{id}"),
            "slug": format!("p-{id}"),
            "price": "5.00",
            "images": images,
        }))
        .unwrap()
    }

    #[test]
    fn test_only_products_with_images_are_picked() {
        let products = vec![
            product(1, json!([])),
            product(2, json!([{"id": 1, "image": "a.jpg"}])),
            product(3, json!([])),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(pick_featured(&products, &mut rng).unwrap().id.as_i32(), 2);
        }
    }

    #[test]
    fn test_none_when_no_images() {
        let products = vec![product(1, json!([]))];
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pick_featured(&products, &mut rng).is_none());
        assert!(pick_featured(&[], &mut rng).is_none());
    }

    #[test]
    fn test_every_candidate_can_be_picked() {
        let products: Vec<Product> = (1..=4)
            .map(|id| product(id, json!([{"id": id, "image": "x.jpg"}])))
            .collect();
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<i32> = (0..200)
            .filter_map(|_| pick_featured(&products, &mut rng))
            .map(|p| p.id.as_i32())
            .collect();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_main_image_prefers_flagged_image() {
        let p = product(
            1,
            json!([
                {"id": 1, "image": "first.jpg"},
                {"id": 2, "image": "main.jpg", "is_main": true}
            ]),
        );
        assert_eq!(main_image(&p).unwrap().url(), "main.jpg");

        let p = product(2, json!([{"id": 3, "image": "only.jpg"}]));
        assert_eq!(main_image(&p).unwrap().url(), "only.jpg");

        assert!(main_image(&product(3, json!([]))).is_none());
    }
}
