use std::collections::HashMap;

use super::{Result, ScoringError};

/// Map raw carbon scores to desirability values in [0, 1], where a lower
/// footprint yields a higher desirability: `1 - score / max(scores)`.
///
/// When every score in the set is zero the whole set is uniformly best and
/// each member gets desirability 1.0 instead of a division by zero.
///
/// Desirability is only meaningful relative to the set it was computed
/// from; callers must normalize per candidate set and never reuse the
/// output across sets.
pub fn desirability(carbon_scores: &HashMap<String, f64>) -> Result<HashMap<String, f64>> {
    if carbon_scores.is_empty() {
        return Err(ScoringError::EmptyCandidateSet(
            "no carbon scores to normalize".to_string(),
        ));
    }

    let max = carbon_scores.values().fold(f64::MIN, |acc, &v| acc.max(v));

    if max < f64::EPSILON {
        return Ok(carbon_scores.keys().map(|k| (k.clone(), 1.0)).collect());
    }

    Ok(carbon_scores
        .iter()
        .map(|(k, v)| (k.clone(), 1.0 - v / max))
        .collect())
}
