// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory storage adapter.
//!
//! Mirrors the SQLite repository's semantics (sequential ids, conditional
//! session link, additive artifact insert) behind a single async mutex.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use viewin_core::{
    AdapterType, ArtifactInsert, ArtifactRecord, FieldUpdate, HealthStatus, JobReport,
    JobReportId, NewArtifact, NewJobReport, PluginAdapter, StorageAdapter, ViewinError,
};

#[derive(Default)]
struct State {
    next_report_id: i64,
    next_artifact_id: i64,
    reports: BTreeMap<JobReportId, JobReport>,
    artifacts: Vec<ArtifactRecord>,
}

/// A repository held entirely in process memory.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<State>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

#[async_trait]
impl PluginAdapter for MemoryStorage {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, ViewinError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ViewinError> {
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn initialize(&self) -> Result<(), ViewinError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), ViewinError> {
        Ok(())
    }

    async fn insert_job_report(&self, report: &NewJobReport) -> Result<JobReport, ViewinError> {
        let mut state = self.state.lock().await;
        state.next_report_id += 1;
        let record = JobReport {
            id: JobReportId(state.next_report_id),
            owner_id: report.owner_id,
            company: report.company.clone(),
            title: report.title.clone(),
            description: report.description.clone(),
            session_id: None,
            report_reference: None,
            created_at: timestamp(),
        };
        state.reports.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_job_report(&self, id: JobReportId) -> Result<Option<JobReport>, ViewinError> {
        Ok(self.state.lock().await.reports.get(&id).cloned())
    }

    async fn link_session(
        &self,
        id: JobReportId,
        session_id: &str,
        overwrite: bool,
    ) -> Result<Option<FieldUpdate>, ViewinError> {
        let mut state = self.state.lock().await;
        let Some(report) = state.reports.get_mut(&id) else {
            return Ok(None);
        };
        let previous = report.session_id.clone();
        if overwrite || previous.is_none() {
            report.session_id = Some(session_id.to_string());
        }
        Ok(Some(FieldUpdate {
            previous,
            current: report.session_id.clone().unwrap_or_default(),
        }))
    }

    async fn set_report_reference(
        &self,
        id: JobReportId,
        reference: &str,
    ) -> Result<Option<FieldUpdate>, ViewinError> {
        let mut state = self.state.lock().await;
        let Some(report) = state.reports.get_mut(&id) else {
            return Ok(None);
        };
        let previous = report.report_reference.replace(reference.to_string());
        Ok(Some(FieldUpdate {
            previous,
            current: reference.to_string(),
        }))
    }

    async fn insert_artifacts(
        &self,
        id: JobReportId,
        artifacts: &[NewArtifact],
    ) -> Result<ArtifactInsert, ViewinError> {
        let mut state = self.state.lock().await;
        if !state.reports.contains_key(&id) {
            return Err(ViewinError::Storage {
                source: "FOREIGN KEY constraint failed".into(),
            });
        }
        let mut outcome = ArtifactInsert::default();
        for artifact in artifacts {
            let exists = state
                .artifacts
                .iter()
                .any(|a| a.job_report_id == id && a.storage_path == artifact.storage_path);
            if exists {
                outcome.duplicates.push(artifact.storage_path.clone());
                continue;
            }
            state.next_artifact_id += 1;
            let record = ArtifactRecord {
                id: state.next_artifact_id,
                job_report_id: id,
                storage_path: artifact.storage_path.clone(),
                display_name: artifact.display_name.clone(),
                created_at: timestamp(),
            };
            state.artifacts.push(record.clone());
            outcome.inserted.push(record);
        }
        Ok(outcome)
    }

    async fn list_artifacts(&self, id: JobReportId) -> Result<Vec<ArtifactRecord>, ViewinError> {
        Ok(self
            .state
            .lock()
            .await
            .artifacts
            .iter()
            .filter(|a| a.job_report_id == id)
            .cloned()
            .collect())
    }

    async fn count_artifacts(&self, id: JobReportId) -> Result<u64, ViewinError> {
        let state = self.state.lock().await;
        Ok(state
            .artifacts
            .iter()
            .filter(|a| a.job_report_id == id)
            .count() as u64)
    }
}
