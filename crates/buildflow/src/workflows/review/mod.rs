//! Multi-step review authoring, scoring, and log reporting.
//!
//! The workflow walks a draft through the scheme's ordered steps with a
//! validation gate per transition; submission runs the weighted scoring
//! model exactly once and hands the frozen record to the repository. Log
//! views page through stored records with the generic query engine, and
//! dashboards are derived on demand.

pub mod domain;
pub mod query;
pub mod report;
pub mod repository;
pub mod router;
pub mod scheme;
pub mod scoring;
pub mod service;
pub mod validation;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use domain::{
    AttachmentRef, IssueNote, IssueSeverity, ProjectStage, ReviewDraft, ReviewId, ReviewStatus,
    ReviewSubmission, ReviewType, ScoreBand,
};
pub use query::{
    search, FieldValue, QueryError, QueryPage, QuerySpec, Queryable, SortDirection, FILTER_ALL,
};
pub use report::{aggregate, DashboardMetrics, DateWindow, GroupBy};
pub use repository::{
    RepositoryError, ReviewRecord, ReviewRepository, ReviewStatusView,
};
pub use router::review_log_router;
pub use scheme::{CategoryDefinition, ReviewScheme};
pub use scoring::{score_review, ScoreSummary, ScoringError};
pub use service::{ReviewLogService, ReviewServiceError};
pub use validation::{validate_step, FailureReason, ValidationFailure};
pub use workflow::{
    ReviewWorkflow, SubmitterPolicy, WorkflowError, DEFAULT_SUBMITTER_ROLES,
};
