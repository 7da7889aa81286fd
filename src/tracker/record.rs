use crate::service::models::UploadResponse;
use serde::{Deserialize, Serialize};

/// Tracker entry for one uploaded resource.
///
/// Stored as a document whose `_id` is the public id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    #[serde(rename = "_id")]
    pub public_id: String,
    pub version: u64,
    pub format: String,
    pub resource_type: String,
    #[serde(rename = "bytes")]
    pub size: u64,
    /// Lowercase hex SHA-1 of the uploaded content
    pub checksum: String,
}

impl UploadRecord {
    pub fn from_response(response: &UploadResponse, checksum: String) -> Self {
        Self {
            public_id: response.public_id.clone(),
            version: response.version,
            format: response.format.clone(),
            resource_type: response.resource_type.clone(),
            size: response.bytes,
            checksum,
        }
    }
}
