//! Category-filtered low-footprint ranking.

use tracing::info;

use crate::models::{Consumer, Product, RankedProduct};
use crate::services::carbon::{CarbonModel, Result};

/// Ranks a category's products by total footprint, lowest first.
pub struct GenreRanker {
    carbon: CarbonModel,
}

impl GenreRanker {
    pub fn new(carbon: CarbonModel) -> Self {
        Self { carbon }
    }

    /// Lowest-footprint products in `category`, at most `n`.
    ///
    /// Fewer than `n` in-category products is not an error; the list is
    /// just shorter, down to empty for an unknown category.
    pub fn top_n(
        &self,
        category: &str,
        consumer: &Consumer,
        catalog: &[Product],
        n: usize,
    ) -> Result<Vec<RankedProduct>> {
        let mut ranked = Vec::new();
        for product in catalog.iter().filter(|p| p.category == category) {
            let total_footprint = self.carbon.total_footprint(product, consumer)?;
            ranked.push(RankedProduct {
                product: product.clone(),
                total_footprint,
            });
        }

        // Note: NaN footprints are treated as equal
        ranked.sort_by(|a, b| {
            a.total_footprint
                .partial_cmp(&b.total_footprint)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(n);

        info!(
            category = category,
            count = ranked.len(),
            "Category ranking completed"
        );

        Ok(ranked)
    }

    /// Cross-category picks for a whole cart: the top `per_category`
    /// products for every distinct category in the cart, deduplicated by
    /// product id preserving order, capped at `limit` overall.
    pub fn cart_recommendations(
        &self,
        cart_products: &[Product],
        consumer: &Consumer,
        catalog: &[Product],
        per_category: usize,
        limit: usize,
    ) -> Result<Vec<RankedProduct>> {
        let mut categories: Vec<&str> = Vec::new();
        for product in cart_products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }

        let mut recommendations: Vec<RankedProduct> = Vec::new();
        for category in categories {
            for entry in self.top_n(category, consumer, catalog, per_category)? {
                if !recommendations
                    .iter()
                    .any(|r| r.product.id == entry.product.id)
                {
                    recommendations.push(entry);
                }
            }
        }

        recommendations.truncate(limit);
        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoPoint, PackagingType};
    use crate::services::carbon::PackagingFootprintTable;

    fn product(id: &str, category: &str, base: f64) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_string(),
            category: category.to_string(),
            base_footprint: base,
            packaging: PackagingType::Cardboard,
            origin: GeoPoint::new(36.1699, -115.1398),
            price: 1.0,
            brand: None,
            tags: Vec::new(),
        }
    }

    fn consumer() -> Consumer {
        Consumer {
            location: GeoPoint::new(36.1699, -115.1398),
        }
    }

    fn ranker() -> GenreRanker {
        GenreRanker::new(CarbonModel::new(PackagingFootprintTable::default(), 0.1))
    }

    #[test]
    fn test_top_n_orders_ascending_and_truncates() {
        // Same origin as the consumer, so footprint is base + packaging
        let catalog = vec![
            product("apple", "Food", 6.5),
            product("banana", "Food", 6.0),
            product("tshirt", "Clothing", 3.0),
        ];

        let top = ranker().top_n("Food", &consumer(), &catalog, 1).unwrap();

        assert_eq!(top.len(), 1);
        assert_eq!(top[0].product.id, "banana");
        assert!((top[0].total_footprint - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_n_with_fewer_members_than_n() {
        let catalog = vec![product("apple", "Food", 5.0)];

        let top = ranker().top_n("Food", &consumer(), &catalog, 3).unwrap();
        assert_eq!(top.len(), 1);

        let none = ranker().top_n("Toys", &consumer(), &catalog, 3).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_cart_recommendations_dedupe_and_cap() {
        let catalog = vec![
            product("apple", "Food", 5.0),
            product("banana", "Food", 4.5),
            product("tshirt", "Clothing", 3.0),
            product("jeans", "Clothing", 2.8),
        ];
        // Two cart items share a category, so its picks appear once
        let cart = vec![
            product("apple", "Food", 5.0),
            product("banana", "Food", 4.5),
            product("tshirt", "Clothing", 3.0),
        ];

        let recs = ranker()
            .cart_recommendations(&cart, &consumer(), &catalog, 2, 3)
            .unwrap();

        assert_eq!(recs.len(), 3);
        let ids: Vec<&str> = recs.iter().map(|r| r.product.id.as_str()).collect();
        assert_eq!(ids, vec!["banana", "apple", "jeans"]);
    }
}
