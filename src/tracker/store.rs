use crate::error::Result;
use crate::tracker::record::UploadRecord;
use async_trait::async_trait;

/// Storage backend for upload records.
///
/// Calls are independent; there is no transaction spanning several records.
#[async_trait]
pub trait TrackerStore: Send + Sync {
    /// First record whose public id is one of `public_ids`
    async fn find_one(&self, public_ids: &[String]) -> Result<Option<UploadRecord>>;

    /// Insert a new record; fails if the public id is already present
    async fn insert(&self, record: &UploadRecord) -> Result<()>;

    /// Update the record with the same public id in place; fails if absent
    async fn update(&self, record: &UploadRecord) -> Result<()>;

    /// Remove the record for `public_id`, returning whether one existed
    async fn remove(&self, public_id: &str) -> Result<bool>;

    /// Remove the record for `public_id` and any stored as `public_id.<ext>`,
    /// returning how many were removed
    async fn remove_all_forms(&self, public_id: &str) -> Result<u64>;
}

/// Whether `candidate` is `public_id` followed by a single file extension
pub fn is_extension_form(candidate: &str, public_id: &str) -> bool {
    candidate
        .strip_prefix(public_id)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|ext| !ext.is_empty() && !ext.contains(['.', '/']))
}
