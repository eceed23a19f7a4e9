//! Deterministic demo catalogue for local runs.

use crate::domain::{Price, Product};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ADJECTIVES: &[&str] = &[
    "Classic", "Compact", "Deluxe", "Everyday", "Heritage", "Modern", "Rustic", "Vintage",
];
const NOUNS: &[&str] = &[
    "Backpack", "Candle", "Desk Lamp", "Kettle", "Mug", "Notebook", "Scarf", "Teapot", "Wallet",
];
const CATEGORIES: &[&str] = &["accessories", "home", "kitchen", "office", "outdoor"];

/// Builds `count` products from `seed`. The same inputs always give the same catalogue.
///
/// Names repeat across products on purpose so paging exercises the id tie-break.
pub fn demo_products(count: usize, seed: u64) -> Vec<Product> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let id = format!("prod-{:05}", i + 1);
            let name = format!(
                "{} {}",
                ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())],
                NOUNS[rng.gen_range(0..NOUNS.len())]
            );
            let category = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
            // Prices snap to .99/.49/.00 endings like a real shelf.
            let dollars: i64 = rng.gen_range(1..500);
            let cents = [99, 49, 0][rng.gen_range(0..3)];
            // About one product in ten has no stock figure.
            let stock = if rng.gen_bool(0.1) {
                None
            } else {
                Some(rng.gen_range(0..250))
            };
            Product {
                description: Some(format!("{} for the {} shelf.", name, category)),
                image_url: Some(format!("https://picsum.photos/seed/{}/400/400", id)),
                category: Some(category.to_string()),
                price: Price::from_cents(dollars * 100 + cents),
                stock,
                name,
                id,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_catalogue() {
        assert_eq!(demo_products(50, 7), demo_products(50, 7));
        assert_ne!(demo_products(50, 7), demo_products(50, 8));
    }

    #[test]
    fn ids_are_unique_and_prices_positive() {
        let products = demo_products(300, 42);
        let mut ids: Vec<_> = products.iter().map(|p| p.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 300);
        assert!(products.iter().all(|p| p.price.cents() > 0));
        assert!(products.iter().all(|p| p.stock.map_or(true, |s| s >= 0)));
    }
}
