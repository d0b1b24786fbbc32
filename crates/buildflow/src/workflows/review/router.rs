use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::domain::{ReviewSubmission, ReviewType};
use super::query::{QuerySpec, SortDirection};
use super::report::{views::LogEntryView, DateWindow, GroupBy};
use super::repository::{RepositoryError, ReviewRepository};
use super::service::{ReviewLogService, ReviewServiceError};
use super::workflow::WorkflowError;

const DEFAULT_PAGE_SIZE: usize = 25;

/// Router builder exposing HTTP endpoints for submission, log pages, and
/// dashboards.
pub fn review_log_router<R>(service: Arc<ReviewLogService<R>>) -> Router
where
    R: ReviewRepository + 'static,
{
    Router::new()
        .route("/api/v1/reviews", post(submit_handler::<R>))
        .route("/api/v1/reviews/:collection", get(log_handler::<R>))
        .route(
            "/api/v1/reviews/:collection/dashboard",
            get(dashboard_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<ReviewLogService<R>>>,
    axum::Json(submission): axum::Json<ReviewSubmission>,
) -> Response
where
    R: ReviewRepository + 'static,
{
    match service.record_submission(submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(ReviewServiceError::Workflow(WorkflowError::PermissionDenied { role })) => {
            let payload = json!({
                "error": format!("role '{role}' is not permitted to author reviews"),
            });
            (StatusCode::FORBIDDEN, axum::Json(payload)).into_response()
        }
        Err(ReviewServiceError::Workflow(WorkflowError::ValidationBlocked(failures))) => {
            let payload = json!({
                "error": "review is blocked by validation failures",
                "failures": failures,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(ReviewServiceError::Workflow(WorkflowError::Scoring(error))) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LogQueryParams {
    term: Option<String>,
    stage: Option<String>,
    status: Option<String>,
    reviewer: Option<String>,
    sort: Option<String>,
    direction: Option<String>,
    page: Option<usize>,
    per_page: Option<usize>,
}

impl LogQueryParams {
    fn into_spec(self) -> QuerySpec {
        let mut filters = BTreeMap::new();
        if let Some(stage) = self.stage {
            filters.insert("project_stage".to_string(), stage);
        }
        if let Some(status) = self.status {
            filters.insert("status".to_string(), status);
        }
        if let Some(reviewer) = self.reviewer {
            filters.insert("reviewer_name".to_string(), reviewer);
        }

        let sort_direction = match self.direction.as_deref() {
            Some(direction) if direction.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        };

        QuerySpec {
            term: self.term.unwrap_or_default(),
            filters,
            sort_field: self.sort.unwrap_or_else(|| "review_date".to_string()),
            sort_direction,
            page_size: self.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
            page_index: self.page.unwrap_or(1),
        }
    }
}

pub(crate) async fn log_handler<R>(
    State(service): State<Arc<ReviewLogService<R>>>,
    Path(collection): Path<String>,
    Query(params): Query<LogQueryParams>,
) -> Response
where
    R: ReviewRepository + 'static,
{
    let Some(collection) = ReviewType::from_slug(&collection) else {
        return unknown_collection(&collection);
    };

    match service.log_page(collection, &params.into_spec()) {
        Ok(result) => {
            let payload = json!({
                "page": result.page.iter().map(LogEntryView::from).collect::<Vec<_>>(),
                "total_count": result.total_count,
                "total_pages": result.total_pages,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(ReviewServiceError::Query(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => service_failure(other),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardParams {
    from: Option<String>,
    to: Option<String>,
    group_by: Option<String>,
}

pub(crate) async fn dashboard_handler<R>(
    State(service): State<Arc<ReviewLogService<R>>>,
    Path(collection): Path<String>,
    Query(params): Query<DashboardParams>,
) -> Response
where
    R: ReviewRepository + 'static,
{
    let Some(collection) = ReviewType::from_slug(&collection) else {
        return unknown_collection(&collection);
    };

    let window = match parse_window(params.from.as_deref(), params.to.as_deref()) {
        Ok(window) => window,
        Err(message) => {
            let payload = json!({ "error": message });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    let group_by = match params.group_by.as_deref() {
        None => GroupBy::Stage,
        Some(slug) => match GroupBy::from_slug(slug) {
            Some(group_by) => group_by,
            None => {
                let payload = json!({ "error": format!("unknown group_by '{slug}'") });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        },
    };

    match service.dashboard(collection, window, group_by) {
        Ok(metrics) => (StatusCode::OK, axum::Json(metrics)).into_response(),
        Err(other) => service_failure(other),
    }
}

fn parse_window(from: Option<&str>, to: Option<&str>) -> Result<Option<DateWindow>, String> {
    match (from, to) {
        (None, None) => Ok(None),
        (Some(from), Some(to)) => {
            let from = parse_date(from)?;
            let to = parse_date(to)?;
            Ok(Some(DateWindow { from, to }))
        }
        _ => Err("window requires both 'from' and 'to'".to_string()),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("failed to parse '{raw}' as YYYY-MM-DD"))
}

fn unknown_collection(slug: &str) -> Response {
    let payload = json!({ "error": format!("unknown log collection '{slug}'") });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

fn service_failure(error: ReviewServiceError) -> Response {
    let status = match &error {
        ReviewServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
