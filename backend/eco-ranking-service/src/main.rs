use std::fs;

use anyhow::{Context, Result};
use ndarray::Array2;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use eco_ranking_service::models::{BatchInput, Consumer, GeoPoint, Product};
use eco_ranking_service::services::carbon::PackagingFootprintTable;
use eco_ranking_service::services::scoring::MatrixRelevanceProvider;
use eco_ranking_service::utils::round2;
use eco_ranking_service::{
    CarbonModel, CatalogIndex, Config, GenreRanker, ReRankLayer, SubstituteRecommender,
};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Load config
    let config = Config::from_env().expect("Failed to load config");

    info!(
        "Starting {} (one-shot batch) with input {}",
        config.service.service_name, config.service.input_path
    );

    let raw = fs::read_to_string(&config.service.input_path)
        .with_context(|| format!("failed to read batch input {}", config.service.input_path))?;
    let input: BatchInput = serde_json::from_str(&raw)
        .with_context(|| format!("invalid batch input in {}", config.service.input_path))?;

    let consumer = Consumer {
        location: GeoPoint::new(config.carbon.consumer_lat, config.carbon.consumer_lon),
    };

    // Initialize layers
    let carbon_model = CarbonModel::new(
        PackagingFootprintTable::default(),
        config.carbon.emission_factor,
    );
    let carbon_scores = carbon_model.score_catalog(&input.products, &consumer)?;
    let genre_ranker = GenreRanker::new(carbon_model.clone());

    // Per-user recommendations
    if !input.users.is_empty() {
        let product_ids: Vec<String> = input.products.iter().map(|p| p.id.clone()).collect();
        let flat: Vec<f64> = input.relevance.iter().flatten().copied().collect();
        let matrix = Array2::from_shape_vec((input.users.len(), product_ids.len()), flat)
            .context("relevance matrix must be users x products")?;
        let provider = MatrixRelevanceProvider::new(&input.users, &product_ids, matrix);

        let reranker = ReRankLayer::new(config.scoring.alpha)?
            .with_activity_boost(config.scoring.activity_boost);
        let recommendations = reranker.recommend(
            &input.users,
            &input.products,
            &provider,
            &carbon_scores,
            &input.recent_activity,
        )?;

        println!("Per-user recommendations:");
        for rec in &recommendations {
            println!(
                "  {}: recommend {} (score {:.2})",
                rec.user_id, rec.product_id, rec.score
            );
        }
    }

    // Cart swap suggestions
    if !input.cart.is_empty() {
        let recommender = SubstituteRecommender::new(CatalogIndex::new(input.products.clone()));
        match recommender.suggest_swaps(&input.cart, &carbon_scores) {
            Ok(report) => {
                println!("Cart swap suggestions:");
                for swap in &report.suggestions {
                    println!(
                        "  swap {} for {} (carbon score {:.2})",
                        swap.original_id, swap.substitute_id, swap.substitute_footprint
                    );
                }
                println!(
                    "  carbon savings: {:.2} kg CO2e",
                    round2(report.total_savings)
                );
            }
            Err(e) => warn!(error = %e, "Cart swap computation failed"),
        }

        for line in &input.cart {
            let item = match find_product(&input.products, &line.product_id) {
                Some(item) => item,
                None => continue,
            };
            let alternatives = recommender.greener_alternatives(&item, &carbon_scores, 3);
            for alt in &alternatives {
                println!(
                    "  greener than {}: {} (saves {:.2} kg CO2e, price diff {:+.2}, similarity {:.2})",
                    item.id, alt.product_id, alt.savings, alt.price_difference, alt.similarity
                );
            }
        }

        let cart_products: Vec<Product> = input
            .cart
            .iter()
            .filter_map(|line| find_product(&input.products, &line.product_id))
            .collect();
        let picks = genre_ranker.cart_recommendations(
            &cart_products,
            &consumer,
            &input.products,
            config.scoring.per_category_limit,
            config.scoring.cart_recommendation_limit,
        )?;

        println!("Low-footprint picks for your cart's categories:");
        for pick in &picks {
            println!(
                "  {} ({:.2} kg CO2e)",
                pick.product.name, pick.total_footprint
            );
        }
    }

    // Category ranking
    if let Some(category) = &input.category {
        let top = genre_ranker.top_n(category, &consumer, &input.products, config.scoring.top_n)?;

        println!("Top {} in category {}:", top.len(), category);
        for entry in &top {
            println!(
                "  {} ({:.2} kg CO2e)",
                entry.product.name, entry.total_footprint
            );
        }
    }

    Ok(())
}

fn find_product(catalog: &[Product], product_id: &str) -> Option<Product> {
    catalog.iter().find(|p| p.id == product_id).cloned()
}
