//! Process-local tracker store

use crate::error::{CldsyncError, Result};
use crate::tracker::record::UploadRecord;
use crate::tracker::store::{is_extension_form, TrackerStore};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// In-memory store with the same insert/update/remove rules as the
/// database backend
#[derive(Debug, Default)]
pub struct MemoryTrackerStore {
    records: Mutex<BTreeMap<String, UploadRecord>>,
}

impl MemoryTrackerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = UploadRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.public_id.clone(), r))
            .collect();
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn get(&self, public_id: &str) -> Option<UploadRecord> {
        self.lock().ok()?.get(public_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().map(|records| records.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, UploadRecord>>> {
        self.records
            .lock()
            .map_err(|_| CldsyncError::storage("in-memory tracker lock poisoned"))
    }
}

#[async_trait]
impl TrackerStore for MemoryTrackerStore {
    async fn find_one(&self, public_ids: &[String]) -> Result<Option<UploadRecord>> {
        let records = self.lock()?;
        Ok(public_ids.iter().find_map(|id| records.get(id).cloned()))
    }

    async fn insert(&self, record: &UploadRecord) -> Result<()> {
        let mut records = self.lock()?;
        if records.contains_key(&record.public_id) {
            return Err(CldsyncError::storage(format!(
                "duplicate key: {}",
                record.public_id
            )));
        }
        records.insert(record.public_id.clone(), record.clone());
        Ok(())
    }

    async fn update(&self, record: &UploadRecord) -> Result<()> {
        let mut records = self.lock()?;
        match records.get_mut(&record.public_id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(CldsyncError::storage(format!(
                "no record to update: {}",
                record.public_id
            ))),
        }
    }

    async fn remove(&self, public_id: &str) -> Result<bool> {
        let mut records = self.lock()?;
        Ok(records.remove(public_id).is_some())
    }

    async fn remove_all_forms(&self, public_id: &str) -> Result<u64> {
        let mut records = self.lock()?;
        let before = records.len();
        records.retain(|id, _| id != public_id && !is_extension_form(id, public_id));
        Ok((before - records.len()) as u64)
    }
}
