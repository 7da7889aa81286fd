//! Upload orchestration
//!
//! A request names a single file, a directory tree, a remote URL or an
//! in-memory buffer. Trees are walked one file at a time; each file goes
//! through the same sequence: empty check, tracker decision, naming,
//! signing, sending and recording.

use crate::auth::signer::{self, TIMESTAMP_FIELD};
use crate::error::{CldsyncError, Result};
use crate::service::client::Service;
use crate::service::models::{UploadOptions, UploadOutcome, UploadRequest, UploadResponse};
use crate::tracker::{self, Decision, UploadRecord};
use crate::utils::naming::{derive_public_id, extension_of, is_http, public_id_from_url};
use reqwest::multipart::{Form, Part};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

const PUBLIC_ID_FIELD: &str = "public_id";
const TYPE_FIELD: &str = "type";
const FILE_FIELD: &str = "file";

/// Tracker state captured before sending, replayed after a successful upload
struct PendingCommit {
    checksum: String,
    previous: Option<UploadRecord>,
}

impl Service {
    /// Upload a file, a directory tree, a URL or in-memory data.
    ///
    /// Returns the service-assigned public id of a single upload. For
    /// directory walks, skipped files and dry runs the input path is
    /// returned instead.
    pub async fn upload(&self, request: &UploadRequest) -> Result<String> {
        if request.data.is_some() || is_http(&request.path) {
            return Ok(self.upload_file(request).await?.into_public_id());
        }

        let metadata = tokio::fs::metadata(&request.path)
            .await
            .map_err(|e| CldsyncError::filesystem(request.path.as_str(), e))?;

        if metadata.is_dir() {
            self.upload_tree(request).await?;
            return Ok(request.path.clone());
        }

        Ok(self.upload_file(request).await?.into_public_id())
    }

    /// Upload a single logical file and report what happened to it
    pub async fn upload_file(&self, request: &UploadRequest) -> Result<UploadOutcome> {
        self.upload_one(request, "").await
    }

    pub async fn upload_image(&self, path: &str, prepend: &str, options: UploadOptions) -> Result<String> {
        let request = UploadRequest::image(path)
            .with_prepend(prepend)
            .with_options(options);
        self.upload(&request).await
    }

    pub async fn upload_raw(&self, path: &str, prepend: &str, options: UploadOptions) -> Result<String> {
        let request = UploadRequest::raw(path)
            .with_prepend(prepend)
            .with_options(options);
        self.upload(&request).await
    }

    /// Depth-first walk in file name order; the first failure stops the walk
    async fn upload_tree(&self, request: &UploadRequest) -> Result<()> {
        let base_path = request.path.as_str();
        debug!("Walking {base_path}");

        for entry in WalkDir::new(base_path).sort_by_file_name() {
            let entry = entry?;
            // follows links to files; WalkDir itself does not
            if !entry.path().is_file() {
                continue;
            }

            let file_request = UploadRequest {
                path: entry.path().display().to_string(),
                data: None,
                prepend: request.prepend.clone(),
                random_public_id: false,
                resource_type: request.resource_type,
                options: UploadOptions {
                    action: request.options.action,
                    public_id: None,
                },
            };
            self.upload_one(&file_request, base_path).await?;
        }
        Ok(())
    }

    async fn upload_one(&self, request: &UploadRequest, base_path: &str) -> Result<UploadOutcome> {
        let path = request.path.as_str();
        let remote = request.data.is_none() && is_http(path);

        let content = match &request.data {
            Some(data) => Some(data.clone()),
            None if remote => None,
            None => Some(
                tokio::fs::read(path)
                    .await
                    .map_err(|e| CldsyncError::filesystem(path, e))?,
            ),
        };

        if content.as_ref().is_some_and(|bytes| bytes.is_empty()) {
            info!("Not uploading empty file: {path}");
            return Ok(UploadOutcome::Empty {
                path: path.to_string(),
            });
        }

        let derived_id = derive_public_id(path, base_path, &request.prepend);
        let public_id = if request.random_public_id {
            None
        } else if let Some(explicit) = request.options.public_id.clone() {
            Some(explicit)
        } else if remote {
            Some(public_id_from_url(path))
        } else {
            Some(derived_id.clone())
        };

        let pending = match (&self.tracker, &content) {
            (Some(tracker), Some(bytes)) if !remote => {
                // records are keyed by the id the content is sent under
                let tracked_id = public_id.as_deref().unwrap_or(&derived_id);
                let alternate = format!("{tracked_id}{}", extension_of(path));
                let previous = tracker.lookup(tracked_id, &alternate).await?;
                let checksum = tracker::bytes_checksum(bytes);

                match tracker::decide_for_checksum(&checksum, previous.as_ref()) {
                    Decision::Skip => {
                        self.report(&format!("{path}: no local changes"));
                        return Ok(UploadOutcome::Unchanged {
                            path: path.to_string(),
                        });
                    }
                    Decision::UploadChanged => {
                        self.report(&format!("{path}: changed locally, needs upload"));
                    }
                    Decision::UploadNew => {}
                }
                Some(PendingCommit { checksum, previous })
            }
            _ => None,
        };

        let mut fields = BTreeMap::new();
        if let Some(public_id) = &public_id {
            fields.insert(PUBLIC_ID_FIELD.to_string(), public_id.clone());
        }
        fields.insert(TIMESTAMP_FIELD.to_string(), signer::unix_timestamp());
        fields.insert(TYPE_FIELD.to_string(), request.options.action.to_string());
        let signed = signer::sign(fields, &self.config.api_key, self.config.api_secret());

        let mut form = Form::new();
        for (key, value) in signed.into_pairs() {
            form = form.text(key, value);
        }
        form = match content {
            Some(bytes) => form.part(FILE_FIELD, file_part(path, bytes)?),
            None => form.text(FILE_FIELD, path.to_string()),
        };

        if self.config.dry_run {
            self.report(&format!("Simulating upload of {path}"));
            return Ok(UploadOutcome::Simulated {
                path: path.to_string(),
                public_id,
            });
        }

        let endpoint = self.upload_url(request.resource_type);
        info!("Uploading {path}");
        let response = self
            .send(self.http.post(&endpoint).multipart(form), &endpoint)
            .await?;
        let body = Self::success_body(response).await?;
        let uploaded: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| CldsyncError::decode(format!("Invalid upload response: {e}")))?;
        debug!(
            "Uploaded {path} as {} (version {})",
            uploaded.public_id, uploaded.version
        );

        if let (Some(tracker), Some(pending)) = (&self.tracker, pending) {
            tracker
                .commit(&uploaded, pending.checksum, pending.previous.as_ref())
                .await?;
        }

        Ok(UploadOutcome::Uploaded(uploaded))
    }
}

fn file_part(path: &str, bytes: Vec<u8>) -> Result<Part> {
    let file_name = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok(Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime.essence_str())?)
}
