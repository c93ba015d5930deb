use std::collections::HashMap;

use ndarray::Array2;
use tracing::{debug, info};

use super::{normalize, Result, ScoringError};
use crate::models::{Product, Recommendation};

/// Externally fitted relevance source, e.g. the output of an offline
/// matrix-factorization job. Injected so the scoring logic can be tested
/// against deterministic stubs without a trained model.
#[cfg_attr(test, mockall::automock)]
pub trait RelevanceProvider {
    /// Relevance of `product_id` for `user_id`. Pairs unknown to the
    /// provider score 0.
    fn relevance(&self, user_id: &str, product_id: &str) -> f64;
}

/// Relevance provider backed by a dense users x products matrix.
pub struct MatrixRelevanceProvider {
    user_index: HashMap<String, usize>,
    product_index: HashMap<String, usize>,
    scores: Array2<f64>,
}

impl MatrixRelevanceProvider {
    /// `scores` must be shaped `users.len() x products.len()`, rows in
    /// `users` order and columns in `products` order.
    pub fn new(users: &[String], products: &[String], scores: Array2<f64>) -> Self {
        assert_eq!(
            scores.shape(),
            [users.len(), products.len()],
            "relevance matrix must be users x products"
        );

        let user_index = users
            .iter()
            .enumerate()
            .map(|(i, u)| (u.clone(), i))
            .collect();
        let product_index = products
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i))
            .collect();

        Self {
            user_index,
            product_index,
            scores,
        }
    }
}

impl RelevanceProvider for MatrixRelevanceProvider {
    fn relevance(&self, user_id: &str, product_id: &str) -> f64 {
        match (
            self.user_index.get(user_id),
            self.product_index.get(product_id),
        ) {
            (Some(&u), Some(&p)) => self.scores[[u, p]],
            _ => 0.0,
        }
    }
}

/// Re-Ranking Layer
///
/// Blends external relevance with carbon desirability and applies a fixed
/// boost to each user's most recently viewed product.
pub struct ReRankLayer {
    alpha: f64,
    activity_boost: f64,
}

impl ReRankLayer {
    pub const DEFAULT_ACTIVITY_BOOST: f64 = 0.1;

    /// `alpha` weighs relevance against desirability:
    /// alpha = 1.0 ranks purely on relevance, alpha = 0.0 purely on carbon.
    pub fn new(alpha: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(ScoringError::InvalidAlpha(alpha));
        }
        Ok(Self {
            alpha,
            activity_boost: Self::DEFAULT_ACTIVITY_BOOST,
        })
    }

    /// Override the recent-activity boost.
    pub fn with_activity_boost(mut self, boost: f64) -> Self {
        self.activity_boost = boost;
        self
    }

    /// Blended final score for every (user, product) pair.
    ///
    /// For each pair: `alpha * relevance + (1 - alpha) * desirability`,
    /// then the boost is added to the product a user viewed most recently,
    /// for that user only and only when the product is in the candidate
    /// set. Boosted scores may exceed 1.0.
    ///
    /// Desirability is normalized from `carbon_scores` per call, so the
    /// output is specific to this candidate set.
    pub fn rank(
        &self,
        users: &[String],
        products: &[Product],
        relevance: &dyn RelevanceProvider,
        carbon_scores: &HashMap<String, f64>,
        recent_activity: &HashMap<String, String>,
    ) -> Result<HashMap<String, HashMap<String, f64>>> {
        if products.is_empty() {
            return Err(ScoringError::EmptyCandidateSet(
                "rank requested over zero products".to_string(),
            ));
        }

        let desirability = normalize::desirability(carbon_scores)?;

        let mut final_scores: HashMap<String, HashMap<String, f64>> =
            HashMap::with_capacity(users.len());

        for user in users {
            let mut scores: HashMap<String, f64> = HashMap::with_capacity(products.len());
            for product in products {
                let rel = relevance.relevance(user, &product.id);
                let desir = desirability.get(&product.id).copied().unwrap_or(0.0);
                scores.insert(
                    product.id.clone(),
                    self.alpha * rel + (1.0 - self.alpha) * desir,
                );
            }

            if let Some(viewed) = recent_activity.get(user) {
                if let Some(score) = scores.get_mut(viewed) {
                    *score += self.activity_boost;
                    debug!(
                        user_id = %user,
                        product_id = %viewed,
                        boost = self.activity_boost,
                        "Recent-activity boost applied"
                    );
                }
            }

            final_scores.insert(user.clone(), scores);
        }

        Ok(final_scores)
    }

    /// Top recommendation per user.
    ///
    /// Ties resolve to the product that comes first in catalog order, so
    /// the selection is deterministic for a fixed catalog.
    pub fn recommend(
        &self,
        users: &[String],
        products: &[Product],
        relevance: &dyn RelevanceProvider,
        carbon_scores: &HashMap<String, f64>,
        recent_activity: &HashMap<String, String>,
    ) -> Result<Vec<Recommendation>> {
        let final_scores = self.rank(users, products, relevance, carbon_scores, recent_activity)?;

        let mut recommendations = Vec::with_capacity(users.len());
        for user in users {
            let scores = &final_scores[user];

            let mut best: Option<(&Product, f64)> = None;
            for product in products {
                let score = scores[&product.id];
                // strict comparison keeps the earliest product on ties
                match best {
                    Some((_, best_score)) if score <= best_score => {}
                    _ => best = Some((product, score)),
                }
            }

            if let Some((product, score)) = best {
                recommendations.push(Recommendation {
                    user_id: user.clone(),
                    product_id: product.id.clone(),
                    score,
                });
            }
        }

        info!(
            user_count = users.len(),
            product_count = products.len(),
            "Re-ranking completed"
        );

        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GeoPoint, PackagingType};
    use ndarray::array;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: id.to_string(),
            category: "Misc".to_string(),
            base_footprint: 1.0,
            packaging: PackagingType::Cardboard,
            origin: GeoPoint::new(0.0, 0.0),
            price: 1.0,
            brand: None,
            tags: Vec::new(),
        }
    }

    fn users(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn carbon(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_alpha_out_of_range_is_rejected() {
        assert!(matches!(
            ReRankLayer::new(1.5),
            Err(ScoringError::InvalidAlpha(_))
        ));
        assert!(matches!(
            ReRankLayer::new(-0.1),
            Err(ScoringError::InvalidAlpha(_))
        ));
        assert!(ReRankLayer::new(0.0).is_ok());
        assert!(ReRankLayer::new(1.0).is_ok());
    }

    #[test]
    fn test_empty_product_set_is_an_error() {
        let layer = ReRankLayer::new(0.7).unwrap();
        let mut provider = MockRelevanceProvider::new();
        provider.expect_relevance().returning(|_, _| 0.0);

        let result = layer.rank(
            &users(&["user1"]),
            &[],
            &provider,
            &carbon(&[("a", 1.0)]),
            &HashMap::new(),
        );
        assert!(matches!(result, Err(ScoringError::EmptyCandidateSet(_))));
    }

    #[test]
    fn test_final_score_is_monotone_in_relevance_and_desirability() {
        let layer = ReRankLayer::new(0.7).unwrap();
        let products = vec![product("low_cf"), product("high_cf")];
        let scores = carbon(&[("low_cf", 10.0), ("high_cf", 50.0)]);

        let mut low_rel = MockRelevanceProvider::new();
        low_rel.expect_relevance().returning(|_, _| 0.2);
        let mut high_rel = MockRelevanceProvider::new();
        high_rel.expect_relevance().returning(|_, _| 0.8);

        let ranked_low = layer
            .rank(&users(&["u"]), &products, &low_rel, &scores, &HashMap::new())
            .unwrap();
        let ranked_high = layer
            .rank(&users(&["u"]), &products, &high_rel, &scores, &HashMap::new())
            .unwrap();

        // Higher relevance raises the blended score, desirability held fixed
        assert!(ranked_high["u"]["low_cf"] > ranked_low["u"]["low_cf"]);
        // Higher desirability raises the blended score, relevance held fixed
        assert!(ranked_low["u"]["low_cf"] > ranked_low["u"]["high_cf"]);
    }

    #[test]
    fn test_activity_boost_is_exact_and_scoped_to_the_viewer() {
        let products = vec![product("a"), product("b")];
        let scores = carbon(&[("a", 10.0), ("b", 20.0)]);
        let all_users = users(&["user1", "user2"]);

        let mut provider = MockRelevanceProvider::new();
        provider.expect_relevance().returning(|_, _| 0.5);

        let layer = ReRankLayer::new(0.7).unwrap();

        let unboosted = layer
            .rank(&all_users, &products, &provider, &scores, &HashMap::new())
            .unwrap();

        let mut activity = HashMap::new();
        activity.insert("user1".to_string(), "b".to_string());
        let boosted = layer
            .rank(&all_users, &products, &provider, &scores, &activity)
            .unwrap();

        let delta = boosted["user1"]["b"] - unboosted["user1"]["b"];
        assert!((delta - 0.1).abs() < 1e-9);
        assert_eq!(boosted["user2"]["b"], unboosted["user2"]["b"]);
        assert_eq!(boosted["user1"]["a"], unboosted["user1"]["a"]);
    }

    #[test]
    fn test_boost_ignores_products_outside_the_candidate_set() {
        let products = vec![product("a")];
        let scores = carbon(&[("a", 10.0)]);

        let mut provider = MockRelevanceProvider::new();
        provider.expect_relevance().returning(|_, _| 0.5);

        let mut activity = HashMap::new();
        activity.insert("user1".to_string(), "not_in_catalog".to_string());

        let layer = ReRankLayer::new(0.7).unwrap();
        let ranked = layer
            .rank(&users(&["user1"]), &products, &provider, &scores, &activity)
            .unwrap();

        // Only the catalog product is scored, unboosted
        assert_eq!(ranked["user1"].len(), 1);
    }

    #[test]
    fn test_recommend_picks_argmax() {
        let products = vec![product("a"), product("b"), product("c")];
        let scores = carbon(&[("a", 30.0), ("b", 10.0), ("c", 20.0)]);

        let mut provider = MockRelevanceProvider::new();
        provider.expect_relevance().returning(|_, _| 0.0);

        // alpha = 0 ranks purely on desirability, so the lowest footprint wins
        let layer = ReRankLayer::new(0.0).unwrap();
        let recs = layer
            .recommend(&users(&["u"]), &products, &provider, &scores, &HashMap::new())
            .unwrap();

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].product_id, "b");
    }

    #[test]
    fn test_recommend_tie_breaks_to_catalog_order() {
        let products = vec![product("first"), product("second")];
        let scores = carbon(&[("first", 5.0), ("second", 5.0)]);

        let mut provider = MockRelevanceProvider::new();
        provider.expect_relevance().returning(|_, _| 0.5);

        let layer = ReRankLayer::new(0.7).unwrap();
        let recs = layer
            .recommend(&users(&["u"]), &products, &provider, &scores, &HashMap::new())
            .unwrap();

        assert_eq!(recs[0].product_id, "first");
    }

    #[test]
    fn test_matrix_provider_lookup() {
        let user_ids = users(&["user1", "user2"]);
        let product_ids: Vec<String> = vec!["a".to_string(), "b".to_string()];
        let provider =
            MatrixRelevanceProvider::new(&user_ids, &product_ids, array![[0.1, 0.9], [0.6, 0.4]]);

        assert_eq!(provider.relevance("user1", "b"), 0.9);
        assert_eq!(provider.relevance("user2", "a"), 0.6);
        assert_eq!(provider.relevance("stranger", "a"), 0.0);
        assert_eq!(provider.relevance("user1", "unknown"), 0.0);
    }
}
