//! Carbon-Aware Scoring
//!
//! Blends externally computed relevance with normalized carbon
//! desirability and selects a top recommendation per user.
//!
//! # Workflow
//! 1. Normalize the candidate set's carbon scores to desirability in [0, 1]
//! 2. Blend: alpha * relevance + (1 - alpha) * desirability
//! 3. Boost each user's most recently viewed product
//! 4. Argmax per user

pub mod normalize;
pub mod rerank;

pub use normalize::desirability;
pub use rerank::{MatrixRelevanceProvider, ReRankLayer, RelevanceProvider};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("empty candidate set: {0}")]
    EmptyCandidateSet(String),

    #[error("blend weight must be in [0, 1], got {0}")]
    InvalidAlpha(f64),
}

pub type Result<T> = std::result::Result<T, ScoringError>;
