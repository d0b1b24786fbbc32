use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use buildflow::config::EngineConfig;
use buildflow::workflows::review::{
    RepositoryError, ReviewId, ReviewRecord, ReviewRepository, ReviewType, SubmitterPolicy,
};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store backing the service until a durable repository is
/// wired in.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReviewRepository {
    records: Arc<Mutex<HashMap<ReviewId, ReviewRecord>>>,
}

impl ReviewRepository for InMemoryReviewRepository {
    fn save(&self, record: ReviewRecord) -> Result<ReviewId, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let id = record.draft.id.clone();
        guard.insert(id.clone(), record);
        Ok(id)
    }

    fn load_all(&self, collection: ReviewType) -> Result<Vec<ReviewRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<ReviewRecord> = guard
            .values()
            .filter(|record| record.draft.review_type == collection)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.draft.id.cmp(&b.draft.id));
        Ok(records)
    }

    fn delete_by_id(&self, id: &ReviewId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

pub(crate) fn submitter_policy(engine: &EngineConfig) -> SubmitterPolicy {
    SubmitterPolicy::new(engine.submitter_roles.clone())
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
