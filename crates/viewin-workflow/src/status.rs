// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-side projection of a job report.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;
use viewin_core::{JobReportId, LifecycleState, StorageAdapter, StoragePath, ViewinError};

use crate::issuance::{ResolvedUrl, UrlIssuanceCoordinator};

/// What a client sees when polling a job report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub status: LifecycleState,
    pub audio_urls: Vec<ResolvedUrl>,
    pub report_url: Option<String>,
}

pub struct StatusProjector {
    storage: Arc<dyn StorageAdapter>,
    issuance: Arc<UrlIssuanceCoordinator>,
}

impl StatusProjector {
    pub fn new(storage: Arc<dyn StorageAdapter>, issuance: Arc<UrlIssuanceCoordinator>) -> Self {
        Self { storage, issuance }
    }

    /// Builds the status view. Valid at every lifecycle stage.
    pub async fn get_status(&self, id: JobReportId) -> Result<StatusView, ViewinError> {
        let report = self
            .storage
            .get_job_report(id)
            .await?
            .ok_or_else(|| ViewinError::job_report_not_found(id))?;
        let artifacts = self.storage.list_artifacts(id).await?;
        let status = LifecycleState::derive(
            artifacts.len() as u64,
            report.report_reference.is_some(),
        );

        let audio_urls = self.issuance.resolve_read_urls(&artifacts).await;
        let report_url = match report.report_reference {
            Some(reference) => Some(self.project_reference(id, reference).await),
            None => None,
        };

        Ok(StatusView {
            status,
            audio_urls,
            report_url,
        })
    }

    /// Read URLs for the audio artifacts alone.
    pub async fn list_audio_urls(&self, id: JobReportId) -> Result<Vec<ResolvedUrl>, ViewinError> {
        if self.storage.get_job_report(id).await?.is_none() {
            return Err(ViewinError::job_report_not_found(id));
        }
        let artifacts = self.storage.list_artifacts(id).await?;
        Ok(self.issuance.resolve_read_urls(&artifacts).await)
    }

    // Object-store references are presigned; anything else is already a URL.
    async fn project_reference(&self, id: JobReportId, reference: String) -> String {
        if !StoragePath::is_storage_path(&reference) {
            return reference;
        }
        match self.issuance.presign_read(&reference).await {
            Ok(url) => url,
            Err(e) => {
                warn!(job_report_id = %id, reference = %reference, error = %e, "report URL not presigned, returning raw reference");
                reference
            }
        }
    }
}
