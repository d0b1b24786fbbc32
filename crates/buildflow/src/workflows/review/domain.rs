use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for review records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReviewId(pub String);

/// The log collection a review belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewType {
    Constructability,
    PermitInspection,
    Constraint,
}

impl ReviewType {
    pub const fn ordered() -> [Self; 3] {
        [Self::Constructability, Self::PermitInspection, Self::Constraint]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Constructability => "Constructability Review",
            Self::PermitInspection => "Permit & Inspection",
            Self::Constraint => "Constraint",
        }
    }

    pub const fn collection_key(self) -> &'static str {
        match self {
            Self::Constructability => "constructability_reviews",
            Self::PermitInspection => "permit_inspections",
            Self::Constraint => "constraints",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.trim().to_ascii_lowercase().as_str() {
            "constructability" | "constructability_reviews" => Some(Self::Constructability),
            "permit-inspection" | "permit_inspection" | "permit_inspections" => {
                Some(Self::PermitInspection)
            }
            "constraint" | "constraints" => Some(Self::Constraint),
            _ => None,
        }
    }
}

/// Project lifecycle stage a review is filed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStage {
    Planning,
    Design,
    Preconstruction,
    Construction,
    Closeout,
}

impl ProjectStage {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Planning,
            Self::Design,
            Self::Preconstruction,
            Self::Construction,
            Self::Closeout,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::Design => "Design",
            Self::Preconstruction => "Preconstruction",
            Self::Construction => "Construction",
            Self::Closeout => "Closeout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Draft,
    Submitted,
}

impl ReviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Submitted => "Submitted",
        }
    }
}

/// Qualitative band derived from the overall weighted score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Poor,
    NeedsImprovement,
    Satisfactory,
    Good,
    Excellent,
}

impl ScoreBand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::NeedsImprovement => "Needs Improvement",
            Self::Satisfactory => "Satisfactory",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }

    /// Band boundaries are inclusive at the lower bound.
    pub fn for_score(score: f64) -> Self {
        if score >= 9.0 {
            Self::Excellent
        } else if score >= 8.0 {
            Self::Good
        } else if score >= 6.0 {
            Self::Satisfactory
        } else if score >= 4.0 {
            Self::NeedsImprovement
        } else {
            Self::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Observation,
    Minor,
    Major,
}

impl IssueSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Observation => "Observation",
            Self::Minor => "Minor",
            Self::Major => "Major",
        }
    }
}

/// Finding captured while walking a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueNote {
    pub detail: String,
    pub severity: IssueSeverity,
}

/// Opaque pointer into the attachment store; the engine never reads bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef(pub String);

/// Mutable working record for a review in progress.
///
/// `current_step` is 1-based and stays within the scheme's step count; once
/// `status` flips to `Submitted` the draft is frozen and further edits must go
/// through a freshly seeded draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub id: ReviewId,
    pub review_type: ReviewType,
    pub project_name: String,
    pub project_stage: Option<ProjectStage>,
    pub reviewer_name: String,
    pub review_date: NaiveDate,
    pub ratings: BTreeMap<String, f64>,
    pub comments: String,
    pub recommendations: Vec<String>,
    pub issues: Vec<IssueNote>,
    pub attachments: Vec<AttachmentRef>,
    pub current_step: u8,
    pub status: ReviewStatus,
    pub submitted_on: Option<NaiveDate>,
}

impl ReviewDraft {
    pub fn new(id: ReviewId, review_type: ReviewType, opened_on: NaiveDate) -> Self {
        Self {
            id,
            review_type,
            project_name: String::new(),
            project_stage: None,
            reviewer_name: String::new(),
            review_date: opened_on,
            ratings: BTreeMap::new(),
            comments: String::new(),
            recommendations: Vec::new(),
            issues: Vec::new(),
            attachments: Vec::new(),
            current_step: 1,
            status: ReviewStatus::Draft,
            submitted_on: None,
        }
    }

    /// Seed a fresh draft from an earlier review. Submitted records are never
    /// edited in place; amendments start here.
    pub fn seeded_from(source: &ReviewDraft, id: ReviewId, opened_on: NaiveDate) -> Self {
        Self {
            id,
            review_type: source.review_type,
            project_name: source.project_name.clone(),
            project_stage: source.project_stage,
            reviewer_name: source.reviewer_name.clone(),
            review_date: opened_on,
            ratings: source.ratings.clone(),
            comments: source.comments.clone(),
            recommendations: source.recommendations.clone(),
            issues: source.issues.clone(),
            attachments: source.attachments.clone(),
            current_step: 1,
            status: ReviewStatus::Draft,
            submitted_on: None,
        }
    }
}

/// Inbound payload describing a complete review in one shot, used by callers
/// that collect every field up front and let the service drive the steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSubmission {
    pub review_type: ReviewType,
    pub role: String,
    pub project_name: String,
    pub project_stage: ProjectStage,
    pub reviewer_name: String,
    pub review_date: NaiveDate,
    pub ratings: BTreeMap<String, f64>,
    pub comments: String,
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub issues: Vec<IssueNote>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub submitted_on: Option<NaiveDate>,
}
