mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use common::InMemoryRepository;

use buildflow::workflows::review::{
    ProjectStage, QuerySpec, ReviewLogService, ReviewSubmission, ReviewType, SortDirection,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).expect("valid date")
}

fn submission(
    project: &str,
    stage: ProjectStage,
    reviewer: &str,
    review_date: NaiveDate,
    rating: f64,
) -> ReviewSubmission {
    let mut ratings = BTreeMap::new();
    for key in [
        "design_completeness",
        "constructability",
        "coordination",
        "safety_in_design",
        "cost_alignment",
        "schedule_feasibility",
    ] {
        ratings.insert(key.to_string(), rating);
    }

    ReviewSubmission {
        review_type: ReviewType::Constructability,
        role: "project-manager".to_string(),
        project_name: project.to_string(),
        project_stage: stage,
        reviewer_name: reviewer.to_string(),
        review_date,
        ratings,
        comments: format!("Constructability pass for {project}."),
        recommendations: vec!["Carry forward to the next design package.".to_string()],
        issues: Vec::new(),
        attachments: Vec::new(),
        submitted_on: None,
    }
}

fn seeded_service() -> ReviewLogService<InMemoryRepository> {
    let service = ReviewLogService::new(Arc::new(InMemoryRepository::default()));

    for (project, stage, reviewer, day, rating) in [
        ("Riverside Clinic", ProjectStage::Design, "Dana Mori", 1, 8.0),
        ("Harbor Garage", ProjectStage::Construction, "Lee Ortiz", 3, 5.0),
        ("Summit Tower", ProjectStage::Design, "Priya Nair", 5, 9.0),
        ("Riverside Clinic", ProjectStage::Construction, "Dana Mori", 7, 6.5),
        ("Harbor Garage", ProjectStage::Closeout, "Lee Ortiz", 9, 7.0),
    ] {
        service
            .record_submission(submission(project, stage, reviewer, date(day), rating))
            .expect("submission accepted");
    }

    // One unsubmitted draft sits alongside the scored records.
    let mut workflow = service
        .begin_review(ReviewType::Constructability, "project-manager", date(11))
        .expect("role accepted");
    workflow.set_project_name("Summit Tower").unwrap();
    workflow.set_reviewer_name("Priya Nair").unwrap();
    service.save_draft(&mut workflow).expect("draft saved");

    service
}

#[test]
fn log_pages_combine_term_filter_sort_and_slice() {
    let service = seeded_service();

    let mut spec = QuerySpec::new("overall_score", 2);
    spec.term = "harbor".to_string();
    spec.sort_direction = SortDirection::Desc;

    let page = service
        .log_page(ReviewType::Constructability, &spec)
        .expect("query runs");
    assert_eq!(page.total_count, 2);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.page[0].draft.project_name, "Harbor Garage");
    let scores: Vec<f64> = page
        .page
        .iter()
        .filter_map(|record| record.score.as_ref().map(|score| score.overall_score))
        .collect();
    assert_eq!(scores, vec![7.0, 5.0]);
}

#[test]
fn status_filter_separates_drafts_from_submitted_reviews() {
    let service = seeded_service();

    let mut spec = QuerySpec::new("review_date", 10);
    spec.filters
        .insert("status".to_string(), "Draft".to_string());
    let drafts = service
        .log_page(ReviewType::Constructability, &spec)
        .expect("query runs");
    assert_eq!(drafts.total_count, 1);
    assert!(drafts.page.iter().all(|record| !record.is_submitted()));

    spec.filters
        .insert("status".to_string(), "Submitted".to_string());
    let submitted = service
        .log_page(ReviewType::Constructability, &spec)
        .expect("query runs");
    assert_eq!(submitted.total_count, 5);
}

#[test]
fn paging_through_the_log_reproduces_the_whole_collection() {
    let service = seeded_service();

    let mut spec = QuerySpec::new("review_date", 2);
    let mut collected = Vec::new();
    let total_pages = service
        .log_page(ReviewType::Constructability, &spec)
        .expect("query runs")
        .total_pages;

    for index in 1..=total_pages {
        spec.page_index = index;
        let page = service
            .log_page(ReviewType::Constructability, &spec)
            .expect("query runs");
        collected.extend(page.page.into_iter().map(|record| record.draft.id));
    }

    assert_eq!(collected.len(), 6);
    let mut unique = collected.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), collected.len(), "no duplicates across pages");
}

#[test]
fn identical_queries_return_identical_pages() {
    let service = seeded_service();

    let mut spec = QuerySpec::new("project_name", 3);
    spec.filters
        .insert("project_stage".to_string(), "Design".to_string());

    let first = service
        .log_page(ReviewType::Constructability, &spec)
        .expect("query runs");
    let second = service
        .log_page(ReviewType::Constructability, &spec)
        .expect("query runs");
    assert_eq!(first, second);
}

#[test]
fn collections_are_isolated_from_each_other() {
    let service = seeded_service();

    let page = service
        .log_page(ReviewType::Constraint, &QuerySpec::new("review_date", 10))
        .expect("query runs");
    assert_eq!(page.total_count, 0);
    assert_eq!(page.total_pages, 1);
}
