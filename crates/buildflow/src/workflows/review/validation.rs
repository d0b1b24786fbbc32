use serde::Serialize;

use super::domain::ReviewDraft;
use super::scheme::{DraftField, DraftList, ReviewScheme, StepCheck};

/// Machine-checkable reason a gate rejected a field. Callers render their
/// own copy from the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    Required,
    EmptyList,
    NoNonzeroScore,
}

impl FailureReason {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::EmptyList => "empty-list",
            Self::NoNonzeroScore => "no-nonzero-score",
        }
    }
}

/// One unsatisfied gate condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub step: u8,
    pub field: &'static str,
    pub reason: FailureReason,
}

/// Evaluate a single step's gate against the current draft. Step-local:
/// passing step N says nothing about any other step. An index outside the
/// scheme has no checks and trivially passes.
pub fn validate_step(
    scheme: &ReviewScheme,
    step_index: u8,
    draft: &ReviewDraft,
) -> Vec<ValidationFailure> {
    let Some(step) = scheme.step(step_index) else {
        return Vec::new();
    };

    let mut failures = Vec::new();
    for check in &step.checks {
        match check {
            StepCheck::RequiredField(field) => {
                if field_is_blank(draft, *field) {
                    failures.push(ValidationFailure {
                        step: step_index,
                        field: field.field_name(),
                        reason: FailureReason::Required,
                    });
                }
            }
            StepCheck::NonEmptyList(list) => {
                if list_is_empty(draft, *list) {
                    failures.push(ValidationFailure {
                        step: step_index,
                        field: list.field_name(),
                        reason: FailureReason::EmptyList,
                    });
                }
            }
            StepCheck::AnyNonZeroRating => {
                if !draft.ratings.values().any(|value| *value > 0.0) {
                    failures.push(ValidationFailure {
                        step: step_index,
                        field: "ratings",
                        reason: FailureReason::NoNonzeroScore,
                    });
                }
            }
        }
    }

    failures
}

fn field_is_blank(draft: &ReviewDraft, field: DraftField) -> bool {
    match field {
        DraftField::ProjectName => draft.project_name.trim().is_empty(),
        DraftField::ProjectStage => draft.project_stage.is_none(),
        DraftField::ReviewerName => draft.reviewer_name.trim().is_empty(),
        DraftField::Comments => draft.comments.trim().is_empty(),
    }
}

fn list_is_empty(draft: &ReviewDraft, list: DraftList) -> bool {
    match list {
        DraftList::Recommendations => !draft
            .recommendations
            .iter()
            .any(|entry| !entry.trim().is_empty()),
        DraftList::Issues => draft.issues.is_empty(),
    }
}
