//! Change tracker
//!
//! Correlates public ids with the checksum of the content last uploaded
//! under them, so unchanged files can be skipped without contacting the
//! remote service. The storage backend is pluggable.

mod memory;
mod mongo;
mod record;
mod store;

pub use memory::MemoryTrackerStore;
pub use mongo::{MongoTrackerStore, TRACKER_COLLECTION};
pub use record::UploadRecord;
pub use store::{is_extension_form, TrackerStore};

use crate::error::{CldsyncError, Result};
use crate::service::models::UploadResponse;
use sha1::{Digest, Sha1};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Whether a local file has to be sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Checksum matches the tracked record
    Skip,
    /// No record for this public id
    UploadNew,
    /// Record exists with a different checksum
    UploadChanged,
}

impl Decision {
    pub fn needs_upload(&self) -> bool {
        !matches!(self, Decision::Skip)
    }
}

/// Tracker facade over a storage backend
#[derive(Clone)]
pub struct ChangeTracker {
    store: Arc<dyn TrackerStore>,
}

impl ChangeTracker {
    pub fn new(store: Arc<dyn TrackerStore>) -> Self {
        Self { store }
    }

    /// Connect to a `mongodb://` tracker
    pub async fn connect(uri: &str) -> Result<Self> {
        let store = MongoTrackerStore::connect(uri).await?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Find the record stored under either form of the public id
    pub async fn lookup(&self, public_id: &str, alternate_with_extension: &str) -> Result<Option<UploadRecord>> {
        let mut ids = vec![public_id.to_string()];
        if alternate_with_extension != public_id {
            ids.push(alternate_with_extension.to_string());
        }
        self.store.find_one(&ids).await
    }

    /// Compare the file's current checksum against `record`
    pub fn decide(&self, path: &Path, record: Option<&UploadRecord>) -> Result<Decision> {
        let checksum = file_checksum(path)?;
        Ok(decide_for_checksum(&checksum, record))
    }

    /// Write back the result of an upload. `previous` is the record found
    /// before uploading: it is updated in place when it has the same public
    /// id, replaced when it was stored under the other id form.
    pub async fn commit(
        &self,
        response: &UploadResponse,
        checksum: String,
        previous: Option<&UploadRecord>,
    ) -> Result<UploadRecord> {
        let record = UploadRecord::from_response(response, checksum);
        match previous {
            Some(previous) if previous.public_id == record.public_id => {
                self.store.update(&record).await?;
            }
            Some(previous) => {
                self.store.remove(&previous.public_id).await?;
                self.store.insert(&record).await?;
            }
            None => self.store.insert(&record).await?,
        }
        Ok(record)
    }

    /// Forget `public_id`, including a record kept under its
    /// extension-suffixed form
    pub async fn remove(&self, public_id: &str) -> Result<bool> {
        Ok(self.store.remove_all_forms(public_id).await? > 0)
    }
}

/// Decision for content whose checksum is already known
pub fn decide_for_checksum(checksum: &str, record: Option<&UploadRecord>) -> Decision {
    match record {
        None => Decision::UploadNew,
        Some(record) if record.checksum == checksum => Decision::Skip,
        Some(_) => Decision::UploadChanged,
    }
}

/// Lowercase hex SHA-1 of in-memory content
pub fn bytes_checksum(data: &[u8]) -> String {
    hex::encode(Sha1::digest(data))
}

/// Lowercase hex SHA-1 of a file's raw bytes
pub fn file_checksum(path: &Path) -> Result<String> {
    let fs_error = |e| CldsyncError::filesystem(path.display().to_string(), e);

    let mut file = std::fs::File::open(path).map_err(fs_error)?;
    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; 64 * 1024];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(fs_error)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
