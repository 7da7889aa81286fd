//! Data models for Cloudinary operations
//!
//! This module defines resource types and actions, upload requests and
//! outcomes, and the JSON payloads returned by the upload and admin APIs.

use crate::error::{CldsyncError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Asset category; selects the API path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    #[default]
    Image,
    Raw,
    Video,
    Pdf,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Image,
        ResourceType::Raw,
        ResourceType::Video,
        ResourceType::Pdf,
    ];

    /// URL path segment used by every endpoint for this type
    pub fn segment(&self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::Raw => "raw",
            ResourceType::Video => "video",
            ResourceType::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

impl FromStr for ResourceType {
    type Err = CldsyncError;

    fn from_str(s: &str) -> Result<Self> {
        ResourceType::ALL
            .into_iter()
            .find(|rtype| rtype.segment().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CldsyncError::invalid_argument(format!("Invalid resource type: {s}")))
    }
}

/// Delivery type of an upload, sent as the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceAction {
    #[default]
    Upload,
    Private,
    Download,
}

impl ResourceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceAction::Upload => "upload",
            ResourceAction::Private => "private",
            ResourceAction::Download => "download",
        }
    }
}

impl fmt::Display for ResourceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceAction {
    type Err = CldsyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "upload" => Ok(ResourceAction::Upload),
            "private" => Ok(ResourceAction::Private),
            "download" => Ok(ResourceAction::Download),
            other => Err(CldsyncError::invalid_argument(format!(
                "Invalid resource action: {other}"
            ))),
        }
    }
}

/// Per-call upload options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    pub action: ResourceAction,
    /// Explicit public id; wins over the derived one
    pub public_id: Option<String>,
}

/// Request for uploading a file, a directory tree, a remote URL or
/// in-memory content
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub path: String,
    /// When set, `path` is only used for naming and logging
    pub data: Option<Vec<u8>>,
    pub prepend: String,
    pub random_public_id: bool,
    pub resource_type: ResourceType,
    pub options: UploadOptions,
}

impl UploadRequest {
    pub fn new<S: Into<String>>(path: S, resource_type: ResourceType) -> Self {
        Self {
            path: path.into(),
            data: None,
            prepend: String::new(),
            random_public_id: false,
            resource_type,
            options: UploadOptions::default(),
        }
    }

    pub fn image<S: Into<String>>(path: S) -> Self {
        Self::new(path, ResourceType::Image)
    }

    pub fn raw<S: Into<String>>(path: S) -> Self {
        Self::new(path, ResourceType::Raw)
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_prepend<S: Into<String>>(mut self, prepend: S) -> Self {
        self.prepend = prepend.into();
        self
    }

    pub fn with_random_public_id(mut self, random: bool) -> Self {
        self.random_public_id = random;
        self
    }

    pub fn with_options(mut self, options: UploadOptions) -> Self {
        self.options = options;
        self
    }
}

/// JSON body returned after a successful upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub public_id: String,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub bytes: u64,
}

/// What happened to a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded(UploadResponse),
    /// Tracker checksum matched, nothing sent
    Unchanged { path: String },
    /// Zero-byte content, nothing sent
    Empty { path: String },
    /// Dry run: request built but not sent
    Simulated {
        path: String,
        public_id: Option<String>,
    },
}

impl UploadOutcome {
    /// Service-assigned public id for uploads, the source path otherwise
    pub fn into_public_id(self) -> String {
        match self {
            UploadOutcome::Uploaded(response) => response.public_id,
            UploadOutcome::Unchanged { path }
            | UploadOutcome::Empty { path }
            | UploadOutcome::Simulated { path, .. } => path,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, UploadOutcome::Uploaded(_))
    }
}

/// A remote image or raw file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub public_id: String,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub secure_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One page of an admin listing
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceList {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Derived (transformed) version of a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedResource {
    #[serde(default)]
    pub transformation: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub secure_url: String,
}

/// Full description of a single resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDetails {
    pub public_id: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default, rename = "type")]
    pub delivery_type: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub secure_url: String,
    #[serde(default)]
    pub derived: Vec<DerivedResource>,
}

/// Result of a single delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Service answer, e.g. `ok` or `not found`
    Deleted { result: String },
    /// Matched the keep pattern
    Kept,
    Simulated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_segments_are_distinct() {
        let segments: std::collections::HashSet<&str> =
            ResourceType::ALL.iter().map(|r| r.segment()).collect();
        assert_eq!(segments.len(), ResourceType::ALL.len());
        assert_eq!(ResourceType::Raw.segment(), "raw");
    }

    #[test]
    fn test_parse_resource_type() {
        assert_eq!("image".parse::<ResourceType>().unwrap(), ResourceType::Image);
        assert_eq!("RAW".parse::<ResourceType>().unwrap(), ResourceType::Raw);
        assert!("audio".parse::<ResourceType>().is_err());
    }

    #[test]
    fn test_parse_resource_action() {
        assert_eq!("private".parse::<ResourceAction>().unwrap(), ResourceAction::Private);
        assert_eq!(ResourceAction::Download.to_string(), "download");
        assert!("public".parse::<ResourceAction>().is_err());
    }

    #[test]
    fn test_decode_upload_response() {
        let body = r#"{"public_id":"Downloads/file","version":1369431906,"format":"png","resource_type":"image","bytes":1024,"url":"http://x"}"#;
        let response: UploadResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.public_id, "Downloads/file");
        assert_eq!(response.version, 1369431906);
        assert_eq!(response.bytes, 1024);
    }

    #[test]
    fn test_decode_details_with_derived() {
        let body = r#"{
            "public_id": "sample", "format": "jpg", "version": 1312461204,
            "resource_type": "image", "type": "upload",
            "created_at": "2011-08-04T12:33:24Z", "bytes": 120253,
            "width": 864, "height": 576,
            "url": "http://res.cloudinary.com/demo/image/upload/v1312461204/sample.jpg",
            "secure_url": "https://res.cloudinary.com/demo/image/upload/v1312461204/sample.jpg",
            "derived": [{"transformation": "c_fill,w_100,h_100", "format": "jpg", "bytes": 7112,
                         "id": "8267a869b62a93a59248f35d7f124c1f",
                         "url": "http://res.cloudinary.com/demo/image/upload/c_fill,w_100,h_100/v1312461204/sample.jpg",
                         "secure_url": "https://res.cloudinary.com/demo/image/upload/c_fill,w_100,h_100/v1312461204/sample.jpg"}]
        }"#;
        let details: ResourceDetails = serde_json::from_str(body).unwrap();
        assert_eq!(details.delivery_type, "upload");
        assert_eq!(details.width, 864);
        assert_eq!(details.derived.len(), 1);
        assert_eq!(details.derived[0].transformation, "c_fill,w_100,h_100");
    }

    #[test]
    fn test_outcome_public_id() {
        let uploaded = UploadOutcome::Uploaded(UploadResponse {
            public_id: "a/b".to_string(),
            version: 1,
            format: "png".to_string(),
            resource_type: "image".to_string(),
            bytes: 3,
        });
        assert_eq!(uploaded.into_public_id(), "a/b");
        let empty = UploadOutcome::Empty { path: "/tmp/x".to_string() };
        assert_eq!(empty.into_public_id(), "/tmp/x");
    }
}
