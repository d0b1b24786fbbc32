use serde::Serialize;

use super::domain::ReviewType;

/// Weighted scoring category owned by a scheme. Weights across a scheme sum
/// to 100 within rounding tolerance; the scoring math normalizes by the real
/// total so drift never skews results.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryDefinition {
    pub key: &'static str,
    pub name: &'static str,
    pub weight: f64,
    pub description: &'static str,
}

/// Scalar draft fields a step can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    ProjectName,
    ProjectStage,
    ReviewerName,
    Comments,
}

impl DraftField {
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::ProjectName => "project_name",
            Self::ProjectStage => "project_stage",
            Self::ReviewerName => "reviewer_name",
            Self::Comments => "comments",
        }
    }
}

/// List-valued draft fields a step can require to be non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftList {
    Recommendations,
    Issues,
}

impl DraftList {
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Recommendations => "recommendations",
            Self::Issues => "issues",
        }
    }
}

/// A single gate condition attached to a step.
#[derive(Debug, Clone, Copy)]
pub enum StepCheck {
    RequiredField(DraftField),
    NonEmptyList(DraftList),
    AnyNonZeroRating,
}

/// One wizard step and the checks guarding advancement past it.
#[derive(Debug, Clone)]
pub struct StepTemplate {
    pub key: &'static str,
    pub title: &'static str,
    pub checks: Vec<StepCheck>,
}

/// Ordered categories plus the step templates for one review type. Selected
/// once per workflow instance and fixed for that instance's lifetime.
#[derive(Debug, Clone)]
pub struct ReviewScheme {
    review_type: ReviewType,
    categories: Vec<CategoryDefinition>,
    steps: Vec<StepTemplate>,
}

impl ReviewScheme {
    /// Assemble a scheme from parts. The standard constructors cover the
    /// built-in logs; bespoke review programs plug in here.
    pub fn new(
        review_type: ReviewType,
        categories: Vec<CategoryDefinition>,
        steps: Vec<StepTemplate>,
    ) -> Self {
        Self {
            review_type,
            categories,
            steps,
        }
    }

    pub fn for_type(review_type: ReviewType) -> Self {
        match review_type {
            ReviewType::Constructability => Self::constructability(),
            ReviewType::PermitInspection => Self::permit_inspection(),
            ReviewType::Constraint => Self::constraint_log(),
        }
    }

    pub fn constructability() -> Self {
        Self {
            review_type: ReviewType::Constructability,
            categories: constructability_categories(),
            steps: standard_steps(),
        }
    }

    pub fn permit_inspection() -> Self {
        Self {
            review_type: ReviewType::PermitInspection,
            categories: permit_inspection_categories(),
            steps: standard_steps(),
        }
    }

    pub fn constraint_log() -> Self {
        Self {
            review_type: ReviewType::Constraint,
            categories: constraint_categories(),
            steps: standard_steps(),
        }
    }

    pub fn review_type(&self) -> ReviewType {
        self.review_type
    }

    pub fn categories(&self) -> &[CategoryDefinition] {
        &self.categories
    }

    pub fn category(&self, key: &str) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|category| category.key == key)
    }

    pub fn total_weight(&self) -> f64 {
        self.categories.iter().map(|category| category.weight).sum()
    }

    pub fn steps(&self) -> &[StepTemplate] {
        &self.steps
    }

    /// 1-based step lookup.
    pub fn step(&self, index: u8) -> Option<&StepTemplate> {
        if index == 0 {
            return None;
        }
        self.steps.get(usize::from(index) - 1)
    }

    pub fn total_steps(&self) -> u8 {
        self.steps.len() as u8
    }
}

fn standard_steps() -> Vec<StepTemplate> {
    vec![
        StepTemplate {
            key: "details",
            title: "Review Details",
            checks: vec![
                StepCheck::RequiredField(DraftField::ProjectName),
                StepCheck::RequiredField(DraftField::ProjectStage),
                StepCheck::RequiredField(DraftField::ReviewerName),
            ],
        },
        StepTemplate {
            key: "scoring",
            title: "Category Scoring",
            checks: vec![StepCheck::AnyNonZeroRating],
        },
        StepTemplate {
            key: "findings",
            title: "Findings & Recommendations",
            checks: vec![
                StepCheck::RequiredField(DraftField::Comments),
                StepCheck::NonEmptyList(DraftList::Recommendations),
            ],
        },
        StepTemplate {
            key: "confirm",
            title: "Attachments & Sign-Off",
            checks: Vec::new(),
        },
    ]
}

fn constructability_categories() -> Vec<CategoryDefinition> {
    vec![
        CategoryDefinition {
            key: "design_completeness",
            name: "Design Completeness",
            weight: 20.0,
            description: "Drawings and specifications are complete for the current stage.",
        },
        CategoryDefinition {
            key: "constructability",
            name: "Constructability",
            weight: 25.0,
            description: "Details can be built with conventional means and methods.",
        },
        CategoryDefinition {
            key: "coordination",
            name: "Cross-Discipline Coordination",
            weight: 15.0,
            description: "Structural, mechanical, and electrical scopes are clash-free.",
        },
        CategoryDefinition {
            key: "safety_in_design",
            name: "Safety in Design",
            weight: 15.0,
            description: "Design avoids hazards for construction and maintenance crews.",
        },
        CategoryDefinition {
            key: "cost_alignment",
            name: "Cost Alignment",
            weight: 10.0,
            description: "Scope matches the current estimate and approved budget.",
        },
        CategoryDefinition {
            key: "schedule_feasibility",
            name: "Schedule Feasibility",
            weight: 15.0,
            description: "Sequencing and procurement lead times support the master schedule.",
        },
    ]
}

fn permit_inspection_categories() -> Vec<CategoryDefinition> {
    vec![
        CategoryDefinition {
            key: "code_compliance",
            name: "Code Compliance",
            weight: 30.0,
            description: "Work conforms to the permitted drawings and applicable codes.",
        },
        CategoryDefinition {
            key: "documentation",
            name: "Documentation",
            weight: 20.0,
            description: "Permits, approvals, and inspection records are on file and current.",
        },
        CategoryDefinition {
            key: "site_readiness",
            name: "Site Readiness",
            weight: 20.0,
            description: "Areas called for inspection are complete and accessible.",
        },
        CategoryDefinition {
            key: "safety_controls",
            name: "Safety Controls",
            weight: 30.0,
            description: "Protection, signage, and temporary systems meet the safety plan.",
        },
    ]
}

fn constraint_categories() -> Vec<CategoryDefinition> {
    vec![
        CategoryDefinition {
            key: "impact",
            name: "Impact",
            weight: 40.0,
            description: "Severity of the constraint's effect on cost, scope, or schedule.",
        },
        CategoryDefinition {
            key: "likelihood",
            name: "Likelihood",
            weight: 30.0,
            description: "Probability the constraint materializes if left unresolved.",
        },
        CategoryDefinition {
            key: "mitigation_readiness",
            name: "Mitigation Readiness",
            weight: 30.0,
            description: "Maturity of the workaround or resolution plan.",
        },
    ]
}
