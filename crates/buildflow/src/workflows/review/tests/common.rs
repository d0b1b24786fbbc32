use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::review::domain::{
    ProjectStage, ReviewDraft, ReviewId, ReviewSubmission, ReviewType,
};
use crate::workflows::review::repository::{RepositoryError, ReviewRecord, ReviewRepository};
use crate::workflows::review::router::review_log_router;
use crate::workflows::review::scheme::{CategoryDefinition, ReviewScheme};
use crate::workflows::review::scoring::ScoreSummary;
use crate::workflows::review::service::ReviewLogService;
use crate::workflows::review::workflow::{ReviewWorkflow, SubmitterPolicy};
use crate::workflows::review::{ReviewStatus, ScoreBand};

pub(super) fn review_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid review date")
}

pub(super) fn scheme() -> ReviewScheme {
    ReviewScheme::constructability()
}

/// Two-category scheme with hand-checkable weights for scoring math tests.
pub(super) fn two_part_scheme() -> ReviewScheme {
    ReviewScheme::new(
        ReviewType::Constructability,
        vec![
            CategoryDefinition {
                key: "alpha",
                name: "Alpha",
                weight: 60.0,
                description: "Primary factor.",
            },
            CategoryDefinition {
                key: "beta",
                name: "Beta",
                weight: 40.0,
                description: "Secondary factor.",
            },
        ],
        scheme().steps().to_vec(),
    )
}

pub(super) fn blank_draft(suffix: &str) -> ReviewDraft {
    ReviewDraft::new(
        ReviewId(format!("rev-{suffix}")),
        ReviewType::Constructability,
        review_date(),
    )
}

pub(super) fn begin_blank(suffix: &str) -> ReviewWorkflow {
    ReviewWorkflow::begin(
        scheme(),
        blank_draft(suffix),
        "project-manager",
        &SubmitterPolicy::default(),
    )
    .expect("role accepted")
}

/// Workflow with every gate satisfied, parked on the details step.
pub(super) fn begin_filled(suffix: &str) -> ReviewWorkflow {
    let mut workflow = begin_blank(suffix);
    workflow
        .set_project_name("Riverside Clinic")
        .expect("editable");
    workflow
        .set_project_stage(ProjectStage::Design)
        .expect("editable");
    workflow.set_reviewer_name("Dana Mori").expect("editable");
    workflow.rate("design_completeness", 8.0).expect("rateable");
    workflow.rate("constructability", 6.5).expect("rateable");
    workflow
        .set_comments("Foundation details need rebar callouts.")
        .expect("editable");
    workflow
        .add_recommendation("Issue revised structural details before GMP.")
        .expect("editable");
    workflow
}

pub(super) fn submission() -> ReviewSubmission {
    let mut ratings = BTreeMap::new();
    ratings.insert("design_completeness".to_string(), 8.0);
    ratings.insert("constructability".to_string(), 7.5);
    ratings.insert("coordination".to_string(), 6.0);
    ratings.insert("safety_in_design".to_string(), 9.0);
    ratings.insert("cost_alignment".to_string(), 7.0);
    ratings.insert("schedule_feasibility".to_string(), 8.5);

    ReviewSubmission {
        review_type: ReviewType::Constructability,
        role: "project-manager".to_string(),
        project_name: "Riverside Clinic".to_string(),
        project_stage: ProjectStage::Design,
        reviewer_name: "Dana Mori".to_string(),
        review_date: review_date(),
        ratings,
        comments: "Structure and envelope are buildable as drawn.".to_string(),
        recommendations: vec!["Pre-order long-lead switchgear.".to_string()],
        issues: Vec::new(),
        attachments: vec!["attachments/riverside/markups.pdf".to_string()],
        submitted_on: None,
    }
}

/// Stored record shorthand for query and dashboard fixtures.
pub(super) fn stored_record(
    suffix: &str,
    project: &str,
    stage: ProjectStage,
    reviewer: &str,
    review_date: NaiveDate,
    overall_score: Option<f64>,
) -> ReviewRecord {
    let mut draft = ReviewDraft::new(
        ReviewId(format!("rev-{suffix}")),
        ReviewType::Constructability,
        review_date,
    );
    draft.project_name = project.to_string();
    draft.project_stage = Some(stage);
    draft.reviewer_name = reviewer.to_string();

    let score = overall_score.map(|value| {
        draft.status = ReviewStatus::Submitted;
        draft.submitted_on = Some(review_date);
        ScoreSummary {
            overall_score: value,
            band: ScoreBand::for_score(value),
            category_contributions: BTreeMap::new(),
        }
    });

    ReviewRecord { draft, score }
}

pub(super) fn build_service() -> (
    ReviewLogService<MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = ReviewLogService::new(repository.clone());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ReviewId, ReviewRecord>>>,
}

impl ReviewRepository for MemoryRepository {
    fn save(&self, record: ReviewRecord) -> Result<ReviewId, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let id = record.draft.id.clone();
        guard.insert(id.clone(), record);
        Ok(id)
    }

    fn load_all(&self, collection: ReviewType) -> Result<Vec<ReviewRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<ReviewRecord> = guard
            .values()
            .filter(|record| record.draft.review_type == collection)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.draft.id.cmp(&b.draft.id));
        Ok(records)
    }

    fn delete_by_id(&self, id: &ReviewId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

pub(super) struct UnavailableRepository;

impl ReviewRepository for UnavailableRepository {
    fn save(&self, _record: ReviewRecord) -> Result<ReviewId, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn load_all(&self, _collection: ReviewType) -> Result<Vec<ReviewRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete_by_id(&self, _id: &ReviewId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn router_with_service(
    service: ReviewLogService<MemoryRepository>,
) -> axum::Router {
    review_log_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
