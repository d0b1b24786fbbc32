use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::ScoreBand;
use super::scheme::ReviewScheme;

pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 10.0;
pub const RATING_STEP: f64 = 0.5;

/// Rating validation and scoring failures, surfaced with the offending
/// category so callers can point at the exact input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("rating {value} for category '{category}' is outside the 0-10 range")]
    OutOfRange { category: String, value: f64 },
    #[error("rating {value} for category '{category}' is not on the half-point scale")]
    OffGrid { category: String, value: f64 },
    #[error("category '{0}' is not part of the scoring scheme")]
    UnknownCategory(String),
}

/// Result of scoring a finished review. Created exactly once at submit time
/// and never recomputed for a stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub overall_score: f64,
    pub band: ScoreBand,
    pub category_contributions: BTreeMap<String, f64>,
}

/// Weighted mean over every category the scheme defines, normalized by the
/// actual weight total. A category the reviewer never rated counts as zero
/// rather than dropping out of the denominator.
pub fn score_review(
    scheme: &ReviewScheme,
    ratings: &BTreeMap<String, f64>,
) -> Result<ScoreSummary, ScoringError> {
    for (category, value) in ratings {
        ensure_in_range(category, *value)?;
    }

    let total_weight = scheme.total_weight();
    let mut contributions = BTreeMap::new();
    let mut weighted_sum = 0.0;

    for category in scheme.categories() {
        let raw = ratings.get(category.key).copied().unwrap_or(0.0);
        weighted_sum += raw * category.weight;
        contributions.insert(category.key.to_string(), raw * category.weight / total_weight);
    }

    let overall_score = weighted_sum / total_weight;

    Ok(ScoreSummary {
        overall_score,
        band: ScoreBand::for_score(overall_score),
        category_contributions: contributions,
    })
}

pub(crate) fn ensure_in_range(category: &str, value: f64) -> Result<(), ScoringError> {
    if !(RATING_MIN..=RATING_MAX).contains(&value) {
        return Err(ScoringError::OutOfRange {
            category: category.to_string(),
            value,
        });
    }
    Ok(())
}

/// Full check applied when a rating enters a draft: range plus the
/// half-point granularity the rating widget allows.
pub(crate) fn ensure_valid_rating(category: &str, value: f64) -> Result<(), ScoringError> {
    ensure_in_range(category, value)?;

    let halves = value / RATING_STEP;
    if (halves - halves.round()).abs() > 1e-9 {
        return Err(ScoringError::OffGrid {
            category: category.to_string(),
            value,
        });
    }
    Ok(())
}
