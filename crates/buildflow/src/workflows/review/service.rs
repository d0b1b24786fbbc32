use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use super::domain::{ReviewDraft, ReviewId, ReviewSubmission, ReviewType};
use super::query::{search, QueryError, QueryPage, QuerySpec};
use super::report::{aggregate, DashboardMetrics, DateWindow, GroupBy};
use super::repository::{RepositoryError, ReviewRecord, ReviewRepository};
use super::scheme::ReviewScheme;
use super::workflow::{ReviewWorkflow, SubmitterPolicy, WorkflowError};

static REVIEW_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_review_id() -> ReviewId {
    let id = REVIEW_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReviewId(format!("rev-{id:06}"))
}

/// Service composing the workflow state machine, scoring, query engine, and
/// dashboard over a pluggable repository.
pub struct ReviewLogService<R> {
    repository: Arc<R>,
    policy: SubmitterPolicy,
}

impl<R> ReviewLogService<R>
where
    R: ReviewRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_policy(repository, SubmitterPolicy::default())
    }

    pub fn with_policy(repository: Arc<R>, policy: SubmitterPolicy) -> Self {
        Self { repository, policy }
    }

    pub fn policy(&self) -> &SubmitterPolicy {
        &self.policy
    }

    /// Open a fresh workflow for a new review. The caller's role is checked
    /// here, once, against the submitter allow-list.
    pub fn begin_review(
        &self,
        review_type: ReviewType,
        role: &str,
        opened_on: NaiveDate,
    ) -> Result<ReviewWorkflow, ReviewServiceError> {
        let scheme = ReviewScheme::for_type(review_type);
        let draft = ReviewDraft::new(next_review_id(), review_type, opened_on);
        let workflow = ReviewWorkflow::begin(scheme, draft, role, &self.policy)?;
        Ok(workflow)
    }

    /// Resume editing a stored draft. Submitted records cannot be resumed;
    /// amend them instead.
    pub fn resume(
        &self,
        record: ReviewRecord,
        role: &str,
    ) -> Result<ReviewWorkflow, ReviewServiceError> {
        if record.is_submitted() {
            return Err(WorkflowError::AlreadySubmitted.into());
        }

        let scheme = ReviewScheme::for_type(record.draft.review_type);
        let workflow = ReviewWorkflow::begin(scheme, record.draft, role, &self.policy)?;
        Ok(workflow)
    }

    /// Start a new draft seeded from an earlier review, under a fresh id.
    pub fn amend_review(
        &self,
        source: &ReviewRecord,
        role: &str,
        opened_on: NaiveDate,
    ) -> Result<ReviewWorkflow, ReviewServiceError> {
        let scheme = ReviewScheme::for_type(source.draft.review_type);
        let draft = ReviewDraft::seeded_from(&source.draft, next_review_id(), opened_on);
        let workflow = ReviewWorkflow::begin(scheme, draft, role, &self.policy)?;
        Ok(workflow)
    }

    /// Persist the workflow's current draft. Never blocked by validation;
    /// repeat saves upsert under the same id.
    pub fn save_draft(
        &self,
        workflow: &mut ReviewWorkflow,
    ) -> Result<ReviewId, ReviewServiceError> {
        let record = workflow.checkpoint()?;
        let id = self.repository.save(record)?;
        info!(review = %id.0, "review draft saved");
        Ok(id)
    }

    /// Run the terminal submit transition and persist the scored record.
    pub fn submit(
        &self,
        workflow: &mut ReviewWorkflow,
        submitted_on: NaiveDate,
    ) -> Result<ReviewRecord, ReviewServiceError> {
        let record = workflow.submit(submitted_on)?;
        self.repository.save(record.clone())?;
        info!(
            review = %record.draft.id.0,
            score = record.score.as_ref().map(|score| score.overall_score).unwrap_or(0.0),
            "review submitted"
        );
        Ok(record)
    }

    /// Drive a complete submission payload through every workflow step and
    /// submit it, for callers that collected all fields up front.
    pub fn record_submission(
        &self,
        submission: ReviewSubmission,
    ) -> Result<ReviewRecord, ReviewServiceError> {
        let submitted_on = submission.submitted_on.unwrap_or(submission.review_date);
        let mut workflow =
            self.begin_review(submission.review_type, &submission.role, submission.review_date)?;

        workflow.set_project_name(submission.project_name)?;
        workflow.set_project_stage(submission.project_stage)?;
        workflow.set_reviewer_name(submission.reviewer_name)?;
        for (category, value) in &submission.ratings {
            workflow.rate(category, *value)?;
        }
        workflow.set_comments(submission.comments)?;
        for recommendation in submission.recommendations {
            workflow.add_recommendation(recommendation)?;
        }
        for issue in submission.issues {
            workflow.add_issue(issue)?;
        }
        for attachment in submission.attachments {
            workflow.attach(attachment)?;
        }

        while workflow.current_step() < workflow.total_steps() {
            workflow.advance()?;
        }

        self.submit(&mut workflow, submitted_on)
    }

    /// Store a record produced outside a live workflow, e.g. an archive
    /// import. Same idempotent upsert contract as `save_draft`.
    pub fn save_record(&self, record: ReviewRecord) -> Result<ReviewId, ReviewServiceError> {
        Ok(self.repository.save(record)?)
    }

    /// One page of a log collection under the given query.
    pub fn log_page(
        &self,
        collection: ReviewType,
        spec: &QuerySpec,
    ) -> Result<QueryPage<ReviewRecord>, ReviewServiceError> {
        let records = self.repository.load_all(collection)?;
        Ok(search(&records, spec)?)
    }

    pub fn fetch(
        &self,
        collection: ReviewType,
        id: &ReviewId,
    ) -> Result<Option<ReviewRecord>, ReviewServiceError> {
        let records = self.repository.load_all(collection)?;
        Ok(records.into_iter().find(|record| record.id() == id))
    }

    /// Dashboard metrics for one collection, recomputed from the full set.
    pub fn dashboard(
        &self,
        collection: ReviewType,
        window: Option<DateWindow>,
        group_by: GroupBy,
    ) -> Result<DashboardMetrics, ReviewServiceError> {
        let records = self.repository.load_all(collection)?;
        let scheme = ReviewScheme::for_type(collection);
        Ok(aggregate(&records, &scheme, window, group_by))
    }

    pub fn delete(&self, id: &ReviewId) -> Result<(), ReviewServiceError> {
        self.repository.delete_by_id(id)?;
        info!(review = %id.0, "review deleted");
        Ok(())
    }
}

/// Error raised by the review log service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Query(#[from] QueryError),
}
