//! Administrative operations: listing, details, delete, rename and bulk drop

use crate::auth::signer::{self, TIMESTAMP_FIELD};
use crate::error::{CldsyncError, Result};
use crate::service::client::Service;
use crate::service::models::{DeleteOutcome, Resource, ResourceDetails, ResourceList, ResourceType};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    #[serde(default)]
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

/// Message of a `{"error":{"message":...}}` body, or the body itself
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string())
}

impl Service {
    /// All resources of a type, following `next_cursor` until exhausted
    pub async fn list_resources(&self, resource_type: ResourceType) -> Result<Vec<Resource>> {
        let endpoint = self.admin_endpoint(&format!("resources/{}", resource_type.segment()));
        let max_results = self.config.max_results.to_string();
        let mut cursor: Option<String> = None;
        let mut resources = Vec::new();

        loop {
            let mut query = vec![("max_results", max_results.clone())];
            if let Some(cursor) = &cursor {
                query.push(("next_cursor", cursor.clone()));
            }

            let request = self
                .http
                .get(&endpoint)
                .basic_auth(&self.config.api_key, Some(self.config.api_secret()))
                .query(&query);
            let response = self.send(request, &endpoint).await?;
            let body = Self::success_body(response).await?;
            let page: ResourceList = serde_json::from_str(&body)
                .map_err(|e| CldsyncError::decode(format!("Invalid resource listing: {e}")))?;

            debug!(
                "Listed {} {} resource(s), more: {}",
                page.resources.len(),
                resource_type,
                page.next_cursor.is_some()
            );
            resources.extend(page.resources);

            match page.next_cursor.filter(|c| !c.is_empty()) {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(resources)
    }

    /// Details of one uploaded resource, derived versions included
    pub async fn resource_details(&self, public_id: &str, resource_type: ResourceType) -> Result<ResourceDetails> {
        let endpoint = self.admin_endpoint(&format!(
            "resources/{}/upload/{}",
            resource_type.segment(),
            public_id.trim_start_matches('/')
        ));
        let request = self
            .http
            .get(&endpoint)
            .basic_auth(&self.config.api_key, Some(self.config.api_secret()));
        let response = self.send(request, &endpoint).await?;
        let body = Self::success_body(response).await?;
        serde_json::from_str(&body)
            .map_err(|e| CldsyncError::decode(format!("Invalid resource details: {e}")))
    }

    /// Delete `prepend + public_id`, then forget its tracker record under
    /// either id form.
    ///
    /// Ids matching the keep pattern are left alone. A tracker failure after
    /// the remote delete succeeded is reported as a cleanup error.
    pub async fn delete(&self, public_id: &str, prepend: &str, resource_type: ResourceType) -> Result<DeleteOutcome> {
        let full_id = format!("{prepend}{public_id}");

        if let Some(pattern) = &self.config.keep_files_pattern {
            if pattern.is_match(&full_id) {
                self.report(&format!("{full_id}: kept"));
                return Ok(DeleteOutcome::Kept);
            }
        }

        if self.config.dry_run {
            self.report(&format!("Simulating delete of {full_id}"));
            return Ok(DeleteOutcome::Simulated);
        }

        let mut fields = BTreeMap::new();
        fields.insert("public_id".to_string(), full_id.clone());
        fields.insert(TIMESTAMP_FIELD.to_string(), signer::unix_timestamp());
        let signed = signer::sign(fields, &self.config.api_key, self.config.api_secret());

        let endpoint = self.api_endpoint(resource_type, "destroy/");
        let response = self
            .send(self.http.post(&endpoint).form(&signed.into_pairs()), &endpoint)
            .await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CldsyncError::network(format!("Failed to read response body: {e}")))?;
        if !status.is_success() {
            return Err(CldsyncError::remote_rejection(status.as_u16(), rejection_message(&body)));
        }
        let destroyed: DestroyResponse = serde_json::from_str(&body)
            .map_err(|e| CldsyncError::decode(format!("Invalid destroy response: {e}")))?;
        info!("Deleted {full_id}: {}", destroyed.result);

        if let Some(tracker) = &self.tracker {
            if let Err(e) = tracker.remove(&full_id).await {
                warn!("Remote resource {full_id} deleted but tracker record was not removed: {e}");
                return Err(CldsyncError::tracker_cleanup(full_id, e.to_string()));
            }
        }

        Ok(DeleteOutcome::Deleted {
            result: destroyed.result,
        })
    }

    /// Rename a resource. Leading slashes are stripped from both ids and the
    /// prefix is applied to both.
    pub async fn rename(&self, from: &str, to: &str, prepend: &str, resource_type: ResourceType) -> Result<()> {
        let from_id = format!("{prepend}{}", from.trim_start_matches('/'));
        let to_id = format!("{prepend}{}", to.trim_start_matches('/'));

        if self.config.dry_run {
            self.report(&format!("Simulating rename of {from_id} to {to_id}"));
            return Ok(());
        }

        let mut fields = BTreeMap::new();
        fields.insert("from_public_id".to_string(), from_id.clone());
        fields.insert(TIMESTAMP_FIELD.to_string(), signer::unix_timestamp());
        fields.insert("to_public_id".to_string(), to_id.clone());
        let signed = signer::sign(fields, &self.config.api_key, self.config.api_secret());

        let endpoint = self.api_endpoint(resource_type, "rename");
        let response = self
            .send(self.http.post(&endpoint).form(&signed.into_pairs()), &endpoint)
            .await?;
        Self::success_body(response).await?;
        info!("Renamed {from_id} to {to_id}");
        Ok(())
    }

    /// Delete every resource of a type. Failures on individual items are
    /// written to `sink` and logged; only a listing failure is returned.
    pub async fn drop_all(&self, resource_type: ResourceType, mut sink: Option<&mut dyn Write>) -> Result<()> {
        let resources = self.list_resources(resource_type).await?;
        info!("Dropping {} {} resource(s)", resources.len(), resource_type);

        for resource in &resources {
            let public_id = resource.public_id.as_str();
            if let Some(out) = sink.as_deref_mut() {
                write!(out, "Deleting {public_id} ... ")?;
            }

            match self.delete(public_id, "", resource_type).await {
                Ok(outcome) => {
                    if let Some(out) = sink.as_deref_mut() {
                        let status = match outcome {
                            DeleteOutcome::Deleted { result } => result,
                            DeleteOutcome::Kept => "kept".to_string(),
                            DeleteOutcome::Simulated => "ok".to_string(),
                        };
                        writeln!(out, "{status}")?;
                    }
                }
                Err(e) => {
                    warn!("Failed to delete {public_id}: {e}");
                    if let Some(out) = sink.as_deref_mut() {
                        writeln!(out, "Error: {public_id}: {e}")?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Drop all images, then all raw files
    pub async fn drop_everything(&self, mut sink: Option<&mut dyn Write>) -> Result<()> {
        self.drop_all(ResourceType::Image, sink.as_mut().map(|s| &mut **s as &mut dyn Write))
            .await?;
        self.drop_all(ResourceType::Raw, sink).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message() {
        assert_eq!(
            rejection_message(r#"{"error":{"message":"Missing required parameter - public_id"}}"#),
            "Missing required parameter - public_id"
        );
        assert_eq!(rejection_message("Bad Gateway"), "Bad Gateway");
    }
}
