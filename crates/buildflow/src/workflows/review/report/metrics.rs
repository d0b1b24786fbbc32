use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::repository::ReviewRecord;
use super::super::scheme::ReviewScheme;
use super::views::{CategoryAverage, GroupSummary};

/// Inclusive date range limiting which records feed the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Dimension the breakdown buckets on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Stage,
    Reviewer,
    Project,
}

impl GroupBy {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.trim().to_ascii_lowercase().as_str() {
            "stage" => Some(Self::Stage),
            "reviewer" => Some(Self::Reviewer),
            "project" => Some(Self::Project),
            _ => None,
        }
    }
}

/// Derived dashboard numbers, recomputed on demand from the full record
/// set. Every ratio degrades to 0 on empty input instead of NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub total_count: usize,
    pub completed_count: usize,
    pub completion_rate: f64,
    pub average_score: f64,
    pub trend_pct: f64,
    pub category_distribution: Vec<CategoryAverage>,
    pub groups: Vec<GroupSummary>,
}

/// Summarize a collection snapshot against its scheme. Records of another
/// review type or outside the window are ignored.
pub fn aggregate(
    records: &[ReviewRecord],
    scheme: &ReviewScheme,
    window: Option<DateWindow>,
    group_by: GroupBy,
) -> DashboardMetrics {
    let in_window: Vec<&ReviewRecord> = records
        .iter()
        .filter(|record| record.draft.review_type == scheme.review_type())
        .filter(|record| {
            window
                .map(|window| window.contains(record.draft.review_date))
                .unwrap_or(true)
        })
        .collect();

    let total_count = in_window.len();
    let completed: Vec<&ReviewRecord> = in_window
        .iter()
        .copied()
        .filter(|record| record.is_submitted())
        .collect();
    let completed_count = completed.len();

    let completion_rate = if total_count == 0 {
        0.0
    } else {
        completed_count as f64 / total_count as f64
    };

    let mut dated_scores: Vec<(NaiveDate, f64)> = completed
        .iter()
        .filter_map(|record| {
            record
                .score
                .as_ref()
                .map(|score| (record.draft.review_date, score.overall_score))
        })
        .collect();
    dated_scores.sort_by_key(|(date, _)| *date);

    let average_score = mean(dated_scores.iter().map(|(_, score)| *score));
    let trend_pct = trend(&dated_scores);

    let category_distribution = scheme
        .categories()
        .iter()
        .map(|category| CategoryAverage {
            key: category.key,
            name: category.name,
            average: mean(completed.iter().map(|record| {
                record
                    .draft
                    .ratings
                    .get(category.key)
                    .copied()
                    .unwrap_or(0.0)
            })),
        })
        .collect();

    let groups = group_summaries(&in_window, group_by);

    DashboardMetrics {
        total_count,
        completed_count,
        completion_rate,
        average_score,
        trend_pct,
        category_distribution,
        groups,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Split the date-ordered scores into halves by count and compare means.
/// Either half being empty (or a zero baseline) reads as no trend.
fn trend(dated_scores: &[(NaiveDate, f64)]) -> f64 {
    let mid = dated_scores.len() / 2;
    let (first, second) = dated_scores.split_at(mid);
    if first.is_empty() || second.is_empty() {
        return 0.0;
    }

    let first_mean = mean(first.iter().map(|(_, score)| *score));
    let second_mean = mean(second.iter().map(|(_, score)| *score));
    if first_mean == 0.0 {
        return 0.0;
    }

    (second_mean - first_mean) / first_mean * 100.0
}

fn group_summaries(records: &[&ReviewRecord], group_by: GroupBy) -> Vec<GroupSummary> {
    #[derive(Default)]
    struct Bucket {
        count: usize,
        score_sum: f64,
        scored: usize,
    }

    let mut buckets: BTreeMap<String, Bucket> = BTreeMap::new();
    for record in records {
        let key = group_key(record, group_by);
        let bucket = buckets.entry(key).or_default();
        bucket.count += 1;
        if let Some(score) = record.score.as_ref().filter(|_| record.is_submitted()) {
            bucket.score_sum += score.overall_score;
            bucket.scored += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(group_key, bucket)| GroupSummary {
            group_key,
            count: bucket.count,
            average_score: if bucket.scored == 0 {
                0.0
            } else {
                bucket.score_sum / bucket.scored as f64
            },
        })
        .collect()
}

fn group_key(record: &ReviewRecord, group_by: GroupBy) -> String {
    match group_by {
        GroupBy::Stage => record
            .draft
            .project_stage
            .map(|stage| stage.label().to_string())
            .unwrap_or_else(|| "Unspecified".to_string()),
        GroupBy::Reviewer => {
            let reviewer = record.draft.reviewer_name.trim();
            if reviewer.is_empty() {
                "Unassigned".to_string()
            } else {
                reviewer.to_string()
            }
        }
        GroupBy::Project => record.draft.project_name.trim().to_string(),
    }
}
