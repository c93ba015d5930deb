pub mod carbon;
pub mod genre;
pub mod geo;
pub mod scoring;
pub mod substitution;

pub use carbon::{CarbonModel, PackagingFootprintTable};
pub use genre::GenreRanker;
pub use scoring::{MatrixRelevanceProvider, ReRankLayer, RelevanceProvider};
pub use substitution::{CatalogIndex, NeighborIndex, SubstituteRecommender};
