use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::repository::ReviewRecord;

/// Sentinel filter value meaning "do not filter on this field".
pub const FILTER_ALL: &str = "all";

/// Typed field projection so comparisons respect the underlying type
/// instead of falling back to string order for everything.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl FieldValue {
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Number(value) => value.to_string(),
            Self::Date(value) => value.to_string(),
        }
    }

    fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (a, b) => a.as_text().cmp(&b.as_text()),
        }
    }
}

/// Record shape the query engine can search, filter, and sort. The
/// implementor declares which fields participate in free-text search and
/// which are legal sort keys.
pub trait Queryable {
    fn searchable_fields() -> &'static [&'static str];
    fn sortable_fields() -> &'static [&'static str];
    fn field(&self, name: &str) -> Option<FieldValue>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl Default for SortDirection {
    fn default() -> Self {
        Self::Asc
    }
}

/// Caller-owned description of one list query. Transient; build a fresh one
/// per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
    pub sort_field: String,
    #[serde(default)]
    pub sort_direction: SortDirection,
    pub page_size: usize,
    pub page_index: usize,
}

impl QuerySpec {
    pub fn new(sort_field: impl Into<String>, page_size: usize) -> Self {
        Self {
            term: String::new(),
            filters: BTreeMap::new(),
            sort_field: sort_field.into(),
            sort_direction: SortDirection::Asc,
            page_size,
            page_index: 1,
        }
    }
}

/// One page of a filtered, sorted view plus the totals needed for pagers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPage<T> {
    pub page: Vec<T>,
    pub total_count: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("page size must be at least 1")]
    InvalidPageSize,
    #[error("unknown sort field '{0}'")]
    UnknownSortField(String),
}

/// Filter, sort, and paginate a snapshot of records. Pure and
/// deterministic: identical inputs produce identical pages.
///
/// Term matching is a case-insensitive substring test over the searchable
/// fields; filters are case-insensitive equality tests ANDed together, with
/// absent or `all` values ignored. Sorting is stable, so ties keep their
/// original relative order. `page_index` is 1-based and an index past the
/// last page yields an empty page rather than an error.
pub fn search<T>(records: &[T], spec: &QuerySpec) -> Result<QueryPage<T>, QueryError>
where
    T: Queryable + Clone,
{
    if spec.page_size == 0 {
        return Err(QueryError::InvalidPageSize);
    }
    if !T::sortable_fields().contains(&spec.sort_field.as_str()) {
        return Err(QueryError::UnknownSortField(spec.sort_field.clone()));
    }

    let term = spec.term.trim().to_lowercase();
    let mut matched: Vec<&T> = records
        .iter()
        .filter(|record| matches_term(*record, &term) && matches_filters(*record, &spec.filters))
        .collect();

    matched.sort_by(|a, b| {
        let ordering = compare_on(*a, *b, &spec.sort_field);
        match spec.sort_direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    let total_count = matched.len();
    let total_pages = total_count.div_ceil(spec.page_size).max(1);
    let start = spec
        .page_index
        .saturating_sub(1)
        .saturating_mul(spec.page_size);
    let page = matched
        .into_iter()
        .skip(start)
        .take(spec.page_size)
        .cloned()
        .collect();

    Ok(QueryPage {
        page,
        total_count,
        total_pages,
    })
}

fn matches_term<T: Queryable>(record: &T, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }

    T::searchable_fields().iter().any(|field| {
        record
            .field(field)
            .map(|value| value.as_text().to_lowercase().contains(term))
            .unwrap_or(false)
    })
}

fn matches_filters<T: Queryable>(record: &T, filters: &BTreeMap<String, String>) -> bool {
    filters.iter().all(|(field, expected)| {
        let expected = expected.trim();
        if expected.is_empty() || expected.eq_ignore_ascii_case(FILTER_ALL) {
            return true;
        }

        record
            .field(field)
            .map(|value| value.as_text().eq_ignore_ascii_case(expected))
            .unwrap_or(false)
    })
}

fn compare_on<T: Queryable>(a: &T, b: &T, field: &str) -> Ordering {
    match (a.field(field), b.field(field)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(left), Some(right)) => left.compare(&right),
    }
}

impl Queryable for ReviewRecord {
    fn searchable_fields() -> &'static [&'static str] {
        &["project_name", "reviewer_name", "comments"]
    }

    fn sortable_fields() -> &'static [&'static str] {
        &[
            "project_name",
            "project_stage",
            "reviewer_name",
            "review_date",
            "status",
            "overall_score",
        ]
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Text(self.draft.id.0.clone())),
            "project_name" => Some(FieldValue::Text(self.draft.project_name.clone())),
            "project_stage" => self
                .draft
                .project_stage
                .map(|stage| FieldValue::Text(stage.label().to_string())),
            "reviewer_name" => Some(FieldValue::Text(self.draft.reviewer_name.clone())),
            "review_date" => Some(FieldValue::Date(self.draft.review_date)),
            "status" => Some(FieldValue::Text(self.draft.status.label().to_string())),
            "review_type" => Some(FieldValue::Text(self.draft.review_type.label().to_string())),
            "comments" => Some(FieldValue::Text(self.draft.comments.clone())),
            "overall_score" => self
                .score
                .as_ref()
                .map(|score| FieldValue::Number(score.overall_score)),
            "band" => self
                .score
                .as_ref()
                .map(|score| FieldValue::Text(score.band.label().to_string())),
            _ => None,
        }
    }
}
