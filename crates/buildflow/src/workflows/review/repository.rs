use serde::{Deserialize, Serialize};

use super::domain::{ReviewDraft, ReviewId, ReviewStatus, ReviewType, ScoreBand};
use super::scoring::ScoreSummary;

/// Repository record pairing a draft with the score it earned at submit
/// time. `score` stays `None` for work-in-progress drafts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub draft: ReviewDraft,
    pub score: Option<ScoreSummary>,
}

impl ReviewRecord {
    pub fn id(&self) -> &ReviewId {
        &self.draft.id
    }

    pub fn collection(&self) -> ReviewType {
        self.draft.review_type
    }

    pub fn is_submitted(&self) -> bool {
        self.draft.status == ReviewStatus::Submitted
    }

    pub fn status_view(&self) -> ReviewStatusView {
        ReviewStatusView {
            id: self.draft.id.clone(),
            status: self.draft.status.label(),
            overall_score: self.score.as_ref().map(|score| score.overall_score),
            band: self.score.as_ref().map(|score| score.band),
            band_label: self.score.as_ref().map(|score| score.band.label()),
        }
    }
}

/// Storage abstraction so the workflow and log views can be exercised in
/// isolation. `save` is an idempotent upsert keyed by review id; callers
/// retrying a save must reuse the same identifier.
pub trait ReviewRepository: Send + Sync {
    fn save(&self, record: ReviewRecord) -> Result<ReviewId, RepositoryError>;
    fn load_all(&self, collection: ReviewType) -> Result<Vec<ReviewRecord>, RepositoryError>;
    fn delete_by_id(&self, id: &ReviewId) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of a record's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewStatusView {
    pub id: ReviewId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<ScoreBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_label: Option<&'static str>,
}
