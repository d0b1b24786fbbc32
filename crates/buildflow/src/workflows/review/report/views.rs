use chrono::NaiveDate;
use serde::Serialize;

use super::super::domain::{ReviewId, ReviewStatus, ReviewType, ScoreBand};
use super::super::repository::ReviewRecord;

/// Mean raw rating for one scheme category across completed reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAverage {
    pub key: &'static str,
    pub name: &'static str,
    pub average: f64,
}

/// Aggregate for one group-by bucket, keyed by the dimension value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group_key: String,
    pub count: usize,
    pub average_score: f64,
}

/// Flattened row for tabular log views.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntryView {
    pub id: ReviewId,
    pub review_type: ReviewType,
    pub project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_label: Option<&'static str>,
    pub reviewer_name: String,
    pub review_date: NaiveDate,
    pub status: ReviewStatus,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<ScoreBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_label: Option<&'static str>,
}

impl From<&ReviewRecord> for LogEntryView {
    fn from(record: &ReviewRecord) -> Self {
        Self {
            id: record.draft.id.clone(),
            review_type: record.draft.review_type,
            project_name: record.draft.project_name.clone(),
            stage_label: record.draft.project_stage.map(|stage| stage.label()),
            reviewer_name: record.draft.reviewer_name.clone(),
            review_date: record.draft.review_date,
            status: record.draft.status,
            status_label: record.draft.status.label(),
            overall_score: record.score.as_ref().map(|score| score.overall_score),
            band: record.score.as_ref().map(|score| score.band),
            band_label: record.score.as_ref().map(|score| score.band.label()),
        }
    }
}
