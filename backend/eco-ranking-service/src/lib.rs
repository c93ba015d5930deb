pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::{
    CarbonModel, CatalogIndex, GenreRanker, PackagingFootprintTable, ReRankLayer,
    SubstituteRecommender,
};
