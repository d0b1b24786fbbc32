use crate::workflows::review::{ProjectStage, ReviewType};

pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// Map a legacy log column value onto a collection. Export tooling has used
/// several spellings over the years; all of them funnel here.
pub(crate) fn review_type_for(label: &str) -> Option<ReviewType> {
    match normalize_label(label).as_str() {
        "constructability" | "constructability review" | "constructability review log" => {
            Some(ReviewType::Constructability)
        }
        "permit" | "permits" | "permit & inspection" | "permit and inspection"
        | "permit / inspection" | "permit/inspection log" => Some(ReviewType::PermitInspection),
        "constraint" | "constraints" | "constraints log" => Some(ReviewType::Constraint),
        _ => None,
    }
}

pub(crate) fn stage_for(label: &str) -> Option<ProjectStage> {
    match normalize_label(label).as_str() {
        "planning" | "pre-design" | "predesign" => Some(ProjectStage::Planning),
        "design" | "schematic design" | "design development" | "construction documents" => {
            Some(ProjectStage::Design)
        }
        "preconstruction" | "pre-construction" => Some(ProjectStage::Preconstruction),
        "construction" => Some(ProjectStage::Construction),
        "closeout" | "close-out" | "close out" => Some(ProjectStage::Closeout),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) fn lookup_for_tests(label: &str) -> Option<ReviewType> {
    review_type_for(label)
}
