use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub carbon: CarbonConfig,
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    /// Path of the batch input JSON consumed by the runner.
    pub input_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarbonConfig {
    /// Transport emissions in kg CO2e per km.
    pub emission_factor: f64,
    pub consumer_lat: f64,
    pub consumer_lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Blend weight between relevance and carbon desirability, in [0, 1].
    pub alpha: f64,
    /// Fixed boost added to a user's most recently viewed product.
    pub activity_boost: f64,
    /// Category ranking depth.
    pub top_n: usize,
    /// Picks per category when recommending across a cart.
    pub per_category_limit: usize,
    /// Overall cap on cross-category cart recommendations.
    pub cart_recommendation_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        Ok(Config {
            service: ServiceConfig {
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "eco-ranking-service".to_string()),
                input_path: env::var("INPUT_PATH")
                    .unwrap_or_else(|_| "data/demo.json".to_string()),
            },
            carbon: CarbonConfig {
                emission_factor: env::var("EMISSION_FACTOR")
                    .unwrap_or_else(|_| "0.1".to_string())
                    .parse()
                    .expect("EMISSION_FACTOR must be a valid f64"),
                consumer_lat: env::var("CONSUMER_LAT")
                    .unwrap_or_else(|_| "36.1699".to_string())
                    .parse()
                    .expect("CONSUMER_LAT must be a valid f64"),
                consumer_lon: env::var("CONSUMER_LON")
                    .unwrap_or_else(|_| "-115.1398".to_string())
                    .parse()
                    .expect("CONSUMER_LON must be a valid f64"),
            },
            scoring: ScoringConfig {
                alpha: env::var("ALPHA")
                    .unwrap_or_else(|_| "0.7".to_string())
                    .parse()
                    .expect("ALPHA must be a valid f64"),
                activity_boost: env::var("ACTIVITY_BOOST")
                    .unwrap_or_else(|_| "0.1".to_string())
                    .parse()
                    .expect("ACTIVITY_BOOST must be a valid f64"),
                top_n: env::var("TOP_N")
                    .unwrap_or_else(|_| "3".to_string())
                    .parse()
                    .expect("TOP_N must be a valid usize"),
                per_category_limit: env::var("PER_CATEGORY_LIMIT")
                    .unwrap_or_else(|_| "3".to_string())
                    .parse()
                    .expect("PER_CATEGORY_LIMIT must be a valid usize"),
                cart_recommendation_limit: env::var("CART_RECOMMENDATION_LIMIT")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .expect("CART_RECOMMENDATION_LIMIT must be a valid usize"),
            },
        })
    }
}
