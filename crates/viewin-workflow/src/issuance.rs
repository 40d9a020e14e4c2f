// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Presigned URL issuance for uploads and reads.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{join_all, try_join_all};
use serde::Serialize;
use tracing::{debug, info, warn};
use viewin_core::{
    ArtifactRecord, JobReportId, PresignerAdapter, StorageAdapter, StoragePath, ViewinError,
};

use crate::settings::IssuanceSettings;
use crate::validation::validate_key_segment;

const UPLOAD_CONTENT_TYPE: &str = "audio/mpeg";

/// One presigned upload target in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSlot {
    pub index: usize,
    pub presigned_url: String,
    pub storage_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBatch {
    pub job_report_id: JobReportId,
    pub session_id: String,
    pub slots: Vec<UploadSlot>,
    pub expires_in: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleUpload {
    pub session_id: String,
    pub presigned_url: String,
    pub storage_key: String,
    pub expires_in: Duration,
}

/// A read URL for a stored artifact, or the reason it could not be issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedUrl {
    #[serde(rename = "s3_path")]
    pub storage_path: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presigned_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Storage key for the answer at `index` (zero-based) of a job report.
pub fn upload_key(prefix: &str, id: JobReportId, index: usize) -> String {
    format!("{prefix}/job-{id}/answer_{}.mp3", index + 1)
}

/// Fresh session id for a job report with none linked yet.
pub fn new_session_id(id: JobReportId) -> String {
    format!("job-{id}-{}", uuid::Uuid::new_v4())
}

/// Issues presigned URLs and links upload sessions.
pub struct UrlIssuanceCoordinator {
    storage: Arc<dyn StorageAdapter>,
    presigner: Arc<dyn PresignerAdapter>,
    settings: IssuanceSettings,
}

impl UrlIssuanceCoordinator {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        presigner: Arc<dyn PresignerAdapter>,
        settings: IssuanceSettings,
    ) -> Self {
        Self {
            storage,
            presigner,
            settings,
        }
    }

    pub fn settings(&self) -> &IssuanceSettings {
        &self.settings
    }

    /// Allocates `count` presigned PUT URLs for a job report.
    ///
    /// All URLs are produced before the session is linked. Any failure
    /// aborts the whole batch and leaves the job report untouched.
    pub async fn allocate_upload_batch(
        &self,
        id: JobReportId,
        count: usize,
        callback_url: Option<&str>,
    ) -> Result<UploadBatch, ViewinError> {
        if count == 0 || count > self.settings.max_batch_size {
            return Err(ViewinError::Validation(format!(
                "upload count must be between 1 and {}, got {count}",
                self.settings.max_batch_size
            )));
        }

        let report = self
            .storage
            .get_job_report(id)
            .await?
            .ok_or_else(|| ViewinError::job_report_not_found(id))?;
        let candidate = report
            .session_id
            .clone()
            .unwrap_or_else(|| new_session_id(id));

        let keys: Vec<String> = (0..count)
            .map(|index| upload_key(&self.settings.upload_key_prefix, id, index))
            .collect();
        let urls = try_join_all(keys.iter().map(|key| {
            self.bounded(self.presigner.presign_put(
                &self.settings.bucket,
                key,
                self.settings.upload_ttl,
                Some(UPLOAD_CONTENT_TYPE),
            ))
        }))
        .await
        .map_err(|e| {
            warn!(job_report_id = %id, count, error = %e, "upload batch aborted");
            ViewinError::ExternalService {
                message: format!("could not presign upload batch for job report {id}"),
                source: Some(Box::new(e)),
            }
        })?;

        let session_id = if report.session_id.is_some() {
            candidate
        } else {
            let update = self
                .storage
                .link_session(id, &candidate, false)
                .await?
                .ok_or_else(|| ViewinError::job_report_not_found(id))?;
            if update.current != candidate {
                debug!(job_report_id = %id, session_id = %update.current, "concurrent session link kept");
            }
            update.current
        };

        info!(
            job_report_id = %id,
            session_id = %session_id,
            count,
            callback_url = callback_url.unwrap_or("-"),
            "upload batch issued"
        );

        Ok(UploadBatch {
            job_report_id: id,
            session_id,
            slots: urls
                .into_iter()
                .zip(keys)
                .enumerate()
                .map(|(index, (presigned_url, storage_key))| UploadSlot {
                    index,
                    presigned_url,
                    storage_key,
                })
                .collect(),
            expires_in: self.settings.upload_ttl,
        })
    }

    /// Issues one presigned PUT URL under an existing session.
    pub async fn allocate_single_upload_url(
        &self,
        session_id: &str,
        filename: Option<&str>,
    ) -> Result<SingleUpload, ViewinError> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(ViewinError::Validation("session_id must not be empty".into()));
        }
        validate_key_segment("session_id", session_id)?;

        let filename = match filename.map(str::trim).filter(|f| !f.is_empty()) {
            Some(name) => {
                validate_key_segment("filename", name)?;
                name.to_string()
            }
            None => format!("answer_{}.mp3", chrono::Utc::now().timestamp_millis()),
        };
        let storage_key = format!(
            "{}/{session_id}/{filename}",
            self.settings.upload_key_prefix
        );

        let presigned_url = self
            .bounded(self.presigner.presign_put(
                &self.settings.bucket,
                &storage_key,
                self.settings.upload_ttl,
                Some(UPLOAD_CONTENT_TYPE),
            ))
            .await
            .map_err(|e| ViewinError::ExternalService {
                message: format!("could not presign upload for {storage_key}"),
                source: Some(Box::new(e)),
            })?;

        debug!(session_id, storage_key = %storage_key, "single upload URL issued");
        Ok(SingleUpload {
            session_id: session_id.to_string(),
            presigned_url,
            storage_key,
            expires_in: self.settings.upload_ttl,
        })
    }

    /// Presigns read URLs for artifacts. Failures are reported per item.
    pub async fn resolve_read_urls(&self, artifacts: &[ArtifactRecord]) -> Vec<ResolvedUrl> {
        join_all(
            artifacts
                .iter()
                .map(|artifact| self.resolve_one(&artifact.storage_path, &artifact.display_name)),
        )
        .await
    }

    /// Presigns a read URL for an object-store reference.
    pub async fn presign_read(&self, reference: &str) -> Result<String, ViewinError> {
        let path = StoragePath::parse(reference)?;
        self.bounded(
            self.presigner
                .presign_get(&path.bucket, &path.key, self.settings.read_ttl),
        )
        .await
    }

    async fn resolve_one(&self, storage_path: &str, display_name: &str) -> ResolvedUrl {
        let (presigned_url, error) = match self.presign_read(storage_path).await {
            Ok(url) => (Some(url), None),
            Err(e) => {
                warn!(storage_path, error = %e, "read URL not issued");
                (None, Some(e.to_string()))
            }
        };
        ResolvedUrl {
            storage_path: storage_path.to_string(),
            file_name: display_name.to_string(),
            presigned_url,
            error,
        }
    }

    async fn bounded<F>(&self, call: F) -> Result<String, ViewinError>
    where
        F: Future<Output = Result<String, ViewinError>>,
    {
        let duration = self.settings.presign_timeout;
        tokio::time::timeout(duration, call)
            .await
            .map_err(|_| ViewinError::Timeout { duration })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_keys_are_one_based() {
        assert_eq!(
            upload_key("responses-audios", JobReportId(7), 0),
            "responses-audios/job-7/answer_1.mp3"
        );
        assert_eq!(
            upload_key("responses-audios", JobReportId(7), 4),
            "responses-audios/job-7/answer_5.mp3"
        );
    }

    #[test]
    fn session_ids_embed_job_report_id() {
        let a = new_session_id(JobReportId(3));
        let b = new_session_id(JobReportId(3));
        assert!(a.starts_with("job-3-"));
        assert_ne!(a, b);
    }

    #[test]
    fn resolved_url_omits_absent_fields() {
        let resolved = ResolvedUrl {
            storage_path: "s3://b/k.mp3".into(),
            file_name: "k.mp3".into(),
            presigned_url: None,
            error: Some("boom".into()),
        };
        let json = serde_json::to_value(&resolved).unwrap();
        assert!(json.get("presigned_url").is_none());
        assert_eq!(json["s3_path"], "s3://b/k.mp3");
        assert_eq!(json["error"], "boom");
    }
}
