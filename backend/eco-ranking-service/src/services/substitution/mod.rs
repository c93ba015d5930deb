//! Category-constrained substitute selection with savings accounting.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info};

use crate::models::{CartItem, GreenerAlternative, Product, SwapReport, SwapSuggestion};
use crate::utils::round2;

#[derive(Debug, Error)]
pub enum SubstitutionError {
    #[error("no alternative available in category {category} for {product_id}")]
    NoAlternativeAvailable {
        product_id: String,
        category: String,
    },

    #[error("unknown cart product: {0}")]
    UnknownCartProduct(String),
}

pub type Result<T> = std::result::Result<T, SubstitutionError>;

/// Capability to look up same-category neighbors of a product.
///
/// Production deployments may back this with an ANN index over product
/// feature space; the in-memory catalog is small enough for a linear scan.
pub trait NeighborIndex {
    /// Products sharing `product`'s category, the product itself excluded,
    /// in catalog order.
    fn same_category(&self, product: &Product) -> Vec<Product>;

    /// Look up a product by id.
    fn product(&self, product_id: &str) -> Option<Product>;
}

/// Linear-scan index over the in-memory catalog.
pub struct CatalogIndex {
    catalog: Vec<Product>,
}

impl CatalogIndex {
    pub fn new(catalog: Vec<Product>) -> Self {
        Self { catalog }
    }
}

impl NeighborIndex for CatalogIndex {
    fn same_category(&self, product: &Product) -> Vec<Product> {
        self.catalog
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .cloned()
            .collect()
    }

    fn product(&self, product_id: &str) -> Option<Product> {
        self.catalog.iter().find(|p| p.id == product_id).cloned()
    }
}

/// Suggests in-category substitutes for cart items and accounts for the
/// carbon saved (or lost) by taking them.
pub struct SubstituteRecommender<I: NeighborIndex> {
    index: I,
}

impl<I: NeighborIndex> SubstituteRecommender<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }

    /// Substitute for one item: the same-category product with the minimum
    /// carbon score, the item itself excluded. The earliest candidate in
    /// catalog order wins ties. Candidates missing from `carbon_scores`
    /// are skipped.
    ///
    /// The minimum may still exceed the original's footprint; the
    /// resulting negative savings are reported as-is, never clamped.
    pub fn suggest_swap(
        &self,
        item: &Product,
        carbon_scores: &HashMap<String, f64>,
    ) -> Result<SwapSuggestion> {
        let candidates = self.index.same_category(item);

        let mut best: Option<(Product, f64)> = None;
        for candidate in candidates {
            let score = match carbon_scores.get(&candidate.id) {
                Some(&score) => score,
                None => continue,
            };
            match &best {
                Some((_, best_score)) if score >= *best_score => {}
                _ => best = Some((candidate, score)),
            }
        }

        let (substitute, substitute_footprint) =
            best.ok_or_else(|| SubstitutionError::NoAlternativeAvailable {
                product_id: item.id.clone(),
                category: item.category.clone(),
            })?;

        let original_footprint = carbon_scores.get(&item.id).copied().unwrap_or(0.0);

        debug!(
            original = %item.id,
            substitute = %substitute.id,
            footprint = substitute_footprint,
            "Swap candidate selected"
        );

        Ok(SwapSuggestion {
            original_id: item.id.clone(),
            substitute_id: substitute.id,
            substitute_footprint,
            savings: original_footprint - substitute_footprint,
        })
    }

    /// Swap suggestions for a whole cart. Per-item savings scale with the
    /// cart quantity; the aggregate may be negative when the in-category
    /// minima are worse than the originals.
    pub fn suggest_swaps(
        &self,
        cart: &[CartItem],
        carbon_scores: &HashMap<String, f64>,
    ) -> Result<SwapReport> {
        let mut report = SwapReport::default();

        for line in cart {
            let item = self
                .index
                .product(&line.product_id)
                .ok_or_else(|| SubstitutionError::UnknownCartProduct(line.product_id.clone()))?;

            let mut suggestion = self.suggest_swap(&item, carbon_scores)?;
            suggestion.savings *= f64::from(line.quantity);

            report.total_savings += suggestion.savings;
            report.suggestions.push(suggestion);
        }

        info!(
            cart_size = cart.len(),
            total_savings = report.total_savings,
            "Cart swap suggestions computed"
        );

        Ok(report)
    }

    /// Strictly-lower-footprint in-category alternatives to `item`, sorted
    /// by footprint ascending and capped at `limit`. An empty result is not
    /// an error; it just means the item is already the greenest choice.
    pub fn greener_alternatives(
        &self,
        item: &Product,
        carbon_scores: &HashMap<String, f64>,
        limit: usize,
    ) -> Vec<GreenerAlternative> {
        let original_footprint = carbon_scores.get(&item.id).copied().unwrap_or(0.0);

        let mut alternatives: Vec<GreenerAlternative> = self
            .index
            .same_category(item)
            .into_iter()
            .filter_map(|candidate| {
                let &footprint = carbon_scores.get(&candidate.id)?;
                if footprint >= original_footprint {
                    return None;
                }
                Some(GreenerAlternative {
                    footprint,
                    savings: original_footprint - footprint,
                    price_difference: candidate.price - item.price,
                    similarity: similarity(item, &candidate),
                    product_id: candidate.id,
                })
            })
            .collect();

        // Note: NaN footprints are treated as equal
        alternatives.sort_by(|a, b| {
            a.footprint
                .partial_cmp(&b.footprint)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        alternatives.truncate(limit);
        alternatives
    }
}

/// Similarity between two products in [0, 1]: same category 0.4, same
/// brand 0.2, price within 20% of the pair average 0.3, shared tags up
/// to 0.1. Rounded to two decimals for reporting.
pub fn similarity(a: &Product, b: &Product) -> f64 {
    let mut similarity = 0.0;

    if a.category == b.category {
        similarity += 0.4;
    }

    if let (Some(brand_a), Some(brand_b)) = (&a.brand, &b.brand) {
        if brand_a == brand_b {
            similarity += 0.2;
        }
    }

    let price_diff = (a.price - b.price).abs();
    let avg_price = (a.price + b.price) / 2.0;
    if avg_price > 0.0 && price_diff / avg_price <= 0.2 {
        similarity += 0.3;
    }

    let common_tags = a.tags.iter().filter(|tag| b.tags.contains(tag)).count();
    similarity += (common_tags as f64 * 0.1).min(0.1);

    round2(similarity)
}
