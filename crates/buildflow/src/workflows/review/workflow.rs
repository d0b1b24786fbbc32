use chrono::NaiveDate;

use super::domain::{IssueNote, ProjectStage, ReviewDraft, ReviewStatus};
use super::repository::ReviewRecord;
use super::scheme::ReviewScheme;
use super::scoring::{ensure_valid_rating, score_review, ScoringError};
use super::validation::{validate_step, ValidationFailure};

pub const DEFAULT_SUBMITTER_ROLES: [&str; 3] = ["admin", "project-manager", "project-executive"];

/// Allow-list gating who may author and submit reviews. Checked once at
/// workflow construction, not per transition.
#[derive(Debug, Clone)]
pub struct SubmitterPolicy {
    roles: Vec<String>,
}

impl SubmitterPolicy {
    pub fn new(roles: Vec<String>) -> Self {
        let sanitized: Vec<String> = roles
            .into_iter()
            .map(|role| role.trim().to_ascii_lowercase())
            .filter(|role| !role.is_empty())
            .collect();

        if sanitized.is_empty() {
            Self::default()
        } else {
            Self { roles: sanitized }
        }
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn allows(&self, role: &str) -> bool {
        let candidate = role.trim();
        self.roles
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(candidate))
    }
}

impl Default for SubmitterPolicy {
    fn default() -> Self {
        Self {
            roles: DEFAULT_SUBMITTER_ROLES
                .iter()
                .map(|role| (*role).to_string())
                .collect(),
        }
    }
}

/// Error raised by workflow transitions. Every rejected transition yields
/// one of these; nothing is silently swallowed.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("blocked by {} validation failure(s)", .0.len())]
    ValidationBlocked(Vec<ValidationFailure>),
    #[error("review has already been submitted")]
    AlreadySubmitted,
    #[error("role '{role}' is not permitted to author reviews")]
    PermissionDenied { role: String },
    #[error("already at the first step")]
    AtFirstStep,
    #[error("already at the final step; submit the review instead")]
    AtFinalStep,
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// Finite state machine walking a draft through the scheme's ordered steps.
///
/// One instance belongs to exactly one editing session; calls must be
/// serialized by the owner (the struct holds no interior mutability and all
/// transitions take `&mut self`).
#[derive(Debug)]
pub struct ReviewWorkflow {
    scheme: ReviewScheme,
    draft: ReviewDraft,
    dirty: bool,
}

impl ReviewWorkflow {
    pub fn begin(
        scheme: ReviewScheme,
        mut draft: ReviewDraft,
        role: &str,
        policy: &SubmitterPolicy,
    ) -> Result<Self, WorkflowError> {
        if !policy.allows(role) {
            return Err(WorkflowError::PermissionDenied {
                role: role.trim().to_string(),
            });
        }

        draft.current_step = draft.current_step.clamp(1, scheme.total_steps());

        Ok(Self {
            scheme,
            draft,
            dirty: false,
        })
    }

    pub fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    pub fn scheme(&self) -> &ReviewScheme {
        &self.scheme
    }

    pub fn current_step(&self) -> u8 {
        self.draft.current_step
    }

    pub fn total_steps(&self) -> u8 {
        self.scheme.total_steps()
    }

    pub fn is_submitted(&self) -> bool {
        self.draft.status == ReviewStatus::Submitted
    }

    /// True when the draft carries edits not yet checkpointed to storage.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn editable(&mut self) -> Result<&mut ReviewDraft, WorkflowError> {
        if self.draft.status == ReviewStatus::Submitted {
            return Err(WorkflowError::AlreadySubmitted);
        }
        self.dirty = true;
        Ok(&mut self.draft)
    }

    pub fn set_project_name(&mut self, name: impl Into<String>) -> Result<(), WorkflowError> {
        self.editable()?.project_name = name.into();
        Ok(())
    }

    pub fn set_project_stage(&mut self, stage: ProjectStage) -> Result<(), WorkflowError> {
        self.editable()?.project_stage = Some(stage);
        Ok(())
    }

    pub fn set_reviewer_name(&mut self, name: impl Into<String>) -> Result<(), WorkflowError> {
        self.editable()?.reviewer_name = name.into();
        Ok(())
    }

    pub fn set_comments(&mut self, comments: impl Into<String>) -> Result<(), WorkflowError> {
        self.editable()?.comments = comments.into();
        Ok(())
    }

    /// Record a category rating. Rejects categories outside the scheme and
    /// values off the 0-10 half-point scale.
    pub fn rate(&mut self, category: &str, value: f64) -> Result<(), WorkflowError> {
        if self.draft.status == ReviewStatus::Submitted {
            return Err(WorkflowError::AlreadySubmitted);
        }
        if self.scheme.category(category).is_none() {
            return Err(ScoringError::UnknownCategory(category.to_string()).into());
        }
        ensure_valid_rating(category, value)?;

        self.editable()?.ratings.insert(category.to_string(), value);
        Ok(())
    }

    pub fn add_recommendation(&mut self, text: impl Into<String>) -> Result<(), WorkflowError> {
        self.editable()?.recommendations.push(text.into());
        Ok(())
    }

    pub fn add_issue(&mut self, issue: IssueNote) -> Result<(), WorkflowError> {
        self.editable()?.issues.push(issue);
        Ok(())
    }

    pub fn attach(&mut self, reference: impl Into<String>) -> Result<(), WorkflowError> {
        self.editable()?
            .attachments
            .push(super::domain::AttachmentRef(reference.into()));
        Ok(())
    }

    /// Gate result for the step the workflow currently sits on.
    pub fn validate_current(&self) -> Vec<ValidationFailure> {
        validate_step(&self.scheme, self.draft.current_step, &self.draft)
    }

    /// Move forward one step. Blocked by the current step's gate; at the
    /// final step callers must `submit` instead. Never partially advances.
    pub fn advance(&mut self) -> Result<u8, WorkflowError> {
        if self.draft.status == ReviewStatus::Submitted {
            return Err(WorkflowError::AlreadySubmitted);
        }

        let failures = self.validate_current();
        if !failures.is_empty() {
            return Err(WorkflowError::ValidationBlocked(failures));
        }
        if self.draft.current_step >= self.scheme.total_steps() {
            return Err(WorkflowError::AtFinalStep);
        }

        self.draft.current_step += 1;
        Ok(self.draft.current_step)
    }

    /// Move back one step. Never runs validation.
    pub fn retreat(&mut self) -> Result<u8, WorkflowError> {
        if self.draft.status == ReviewStatus::Submitted {
            return Err(WorkflowError::AlreadySubmitted);
        }
        if self.draft.current_step <= 1 {
            return Err(WorkflowError::AtFirstStep);
        }

        self.draft.current_step -= 1;
        Ok(self.draft.current_step)
    }

    /// Snapshot the draft for persistence. Deliberately permissive: an
    /// invalid or half-finished draft still checkpoints so in-progress work
    /// is never lost.
    pub fn checkpoint(&mut self) -> Result<ReviewRecord, WorkflowError> {
        if self.draft.status == ReviewStatus::Submitted {
            return Err(WorkflowError::AlreadySubmitted);
        }

        self.dirty = false;
        Ok(ReviewRecord {
            draft: self.draft.clone(),
            score: None,
        })
    }

    /// Terminal transition: every step's gate must currently pass, the
    /// scoring model runs once, and the draft freezes. All failures across
    /// all steps are reported together.
    pub fn submit(&mut self, submitted_on: NaiveDate) -> Result<ReviewRecord, WorkflowError> {
        if self.draft.status == ReviewStatus::Submitted {
            return Err(WorkflowError::AlreadySubmitted);
        }

        let mut failures = Vec::new();
        for index in 1..=self.scheme.total_steps() {
            failures.extend(validate_step(&self.scheme, index, &self.draft));
        }
        if !failures.is_empty() {
            return Err(WorkflowError::ValidationBlocked(failures));
        }

        let summary = score_review(&self.scheme, &self.draft.ratings)?;

        self.draft.status = ReviewStatus::Submitted;
        self.draft.submitted_on = Some(submitted_on);
        self.dirty = false;

        Ok(ReviewRecord {
            draft: self.draft.clone(),
            score: Some(summary),
        })
    }
}
