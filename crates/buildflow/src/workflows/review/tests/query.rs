use chrono::NaiveDate;

use super::common::*;
use crate::workflows::review::domain::ProjectStage;
use crate::workflows::review::query::{search, QueryError, QuerySpec, SortDirection};
use crate::workflows::review::repository::ReviewRecord;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).expect("valid date")
}

fn fixture() -> Vec<ReviewRecord> {
    vec![
        stored_record("q1", "Riverside Clinic", ProjectStage::Design, "Dana Mori", date(1), Some(7.2)),
        stored_record("q2", "Harbor Garage", ProjectStage::Construction, "Lee Ortiz", date(3), Some(4.8)),
        stored_record("q3", "Riverside Clinic", ProjectStage::Construction, "Dana Mori", date(5), None),
        stored_record("q4", "Summit Tower", ProjectStage::Design, "Priya Nair", date(7), Some(9.1)),
        stored_record("q5", "Harbor Garage", ProjectStage::Closeout, "Lee Ortiz", date(9), Some(6.0)),
    ]
}

fn spec() -> QuerySpec {
    QuerySpec::new("review_date", 10)
}

#[test]
fn empty_term_matches_everything() {
    let page = search(&fixture(), &spec()).expect("valid spec");
    assert_eq!(page.total_count, 5);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.page.len(), 5);
}

#[test]
fn term_matches_searchable_fields_case_insensitively() {
    let mut spec = spec();
    spec.term = "riverside".to_string();
    let page = search(&fixture(), &spec).expect("valid spec");
    assert_eq!(page.total_count, 2);

    spec.term = "ORTIZ".to_string();
    let page = search(&fixture(), &spec).expect("valid spec");
    assert_eq!(page.total_count, 2);

    spec.term = "no such project".to_string();
    let page = search(&fixture(), &spec).expect("valid spec");
    assert_eq!(page.total_count, 0);
    assert_eq!(page.total_pages, 1, "total pages never drops below one");
}

#[test]
fn filters_are_anded_and_the_all_sentinel_is_ignored() {
    let mut spec = spec();
    spec.filters
        .insert("project_stage".to_string(), "Construction".to_string());
    let page = search(&fixture(), &spec).expect("valid spec");
    assert_eq!(page.total_count, 2);

    spec.filters
        .insert("reviewer_name".to_string(), "dana mori".to_string());
    let page = search(&fixture(), &spec).expect("valid spec");
    assert_eq!(page.total_count, 1);
    assert_eq!(page.page[0].draft.id.0, "rev-q3");

    spec.filters
        .insert("project_stage".to_string(), "All".to_string());
    let page = search(&fixture(), &spec).expect("valid spec");
    assert_eq!(page.total_count, 2, "sentinel filter drops out");
}

#[test]
fn sorts_dates_by_instant_and_numbers_by_value() {
    let mut spec = spec();
    spec.sort_direction = SortDirection::Desc;
    let page = search(&fixture(), &spec).expect("valid spec");
    assert_eq!(page.page[0].draft.id.0, "rev-q5");

    spec.sort_field = "overall_score".to_string();
    spec.sort_direction = SortDirection::Asc;
    let page = search(&fixture(), &spec).expect("valid spec");
    // The unscored draft has no value for the field and sorts first.
    assert_eq!(page.page[0].draft.id.0, "rev-q3");
    assert_eq!(page.page[1].draft.id.0, "rev-q2");
    assert_eq!(page.page.last().unwrap().draft.id.0, "rev-q4");
}

#[test]
fn sorting_is_stable_for_ties() {
    let mut spec = spec();
    spec.sort_field = "project_name".to_string();
    let page = search(&fixture(), &spec).expect("valid spec");

    let ids: Vec<&str> = page.page.iter().map(|record| record.draft.id.0.as_str()).collect();
    // Harbor Garage q2 before q5, Riverside q1 before q3: input order survives
    // within equal keys.
    assert_eq!(ids, vec!["rev-q2", "rev-q5", "rev-q1", "rev-q3", "rev-q4"]);
}

#[test]
fn pagination_slices_and_reports_totals() {
    let mut spec = spec();
    spec.page_size = 2;

    let first = search(&fixture(), &spec).expect("valid spec");
    assert_eq!(first.total_count, 5);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.page.len(), 2);

    spec.page_index = 3;
    let last = search(&fixture(), &spec).expect("valid spec");
    assert_eq!(last.page.len(), 1);

    spec.page_index = 9;
    let beyond = search(&fixture(), &spec).expect("valid spec");
    assert!(beyond.page.is_empty(), "past the end is empty, not an error");
}

#[test]
fn concatenated_pages_reproduce_the_full_filtered_set() {
    let records = fixture();
    let mut spec = spec();
    spec.page_size = 2;

    let mut seen = Vec::new();
    let total_pages = search(&records, &spec).expect("valid spec").total_pages;
    for index in 1..=total_pages {
        spec.page_index = index;
        let page = search(&records, &spec).expect("valid spec");
        seen.extend(page.page.into_iter().map(|record| record.draft.id.0));
    }

    spec.page_index = 1;
    spec.page_size = 100;
    let full: Vec<String> = search(&records, &spec)
        .expect("valid spec")
        .page
        .into_iter()
        .map(|record| record.draft.id.0)
        .collect();

    assert_eq!(seen, full, "no duplicates, no omissions");
}

#[test]
fn identical_inputs_yield_identical_pages() {
    let records = fixture();
    let mut spec = spec();
    spec.term = "harbor".to_string();
    spec.sort_field = "overall_score".to_string();

    let first = search(&records, &spec).expect("valid spec");
    let second = search(&records, &spec).expect("valid spec");
    assert_eq!(first, second);
}

#[test]
fn zero_page_size_is_a_caller_error() {
    let mut spec = spec();
    spec.page_size = 0;
    let error = search(&fixture(), &spec).expect_err("zero page size rejected");
    assert_eq!(error, QueryError::InvalidPageSize);
}

#[test]
fn unknown_sort_field_is_rejected() {
    let mut spec = spec();
    spec.sort_field = "square_footage".to_string();
    let error = search(&fixture(), &spec).expect_err("unknown sort field rejected");
    assert_eq!(
        error,
        QueryError::UnknownSortField("square_footage".to_string())
    );
}
