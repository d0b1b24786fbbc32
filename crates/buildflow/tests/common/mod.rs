use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use buildflow::workflows::review::{
    RepositoryError, ReviewId, ReviewRecord, ReviewRepository, ReviewType,
};

/// Process-local repository standing in for the real persistence
/// collaborator.
#[derive(Default, Clone)]
pub struct InMemoryRepository {
    records: Arc<Mutex<HashMap<ReviewId, ReviewRecord>>>,
}

impl ReviewRepository for InMemoryRepository {
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
