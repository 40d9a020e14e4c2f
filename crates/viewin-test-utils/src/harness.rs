// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end workflow testing.
//!
//! `TestHarness` wires a [`ReportWorkflow`] to a temp SQLite database and a
//! [`MockPresigner`], and offers shortcuts for the common callback steps.

use std::sync::Arc;
use std::time::Duration;

use viewin_config::model::StorageConfig;
use viewin_core::{JobReport, JobReportId, StorageAdapter, UserId, ViewinError};
use viewin_storage::SqliteStorage;
use viewin_workflow::{
    AudioReadyEvent, AudioReadyOutcome, CreateJobReport, IssuanceSettings, ReportReadyEvent,
    ReportReadyOutcome, ReportWorkflow,
};

use crate::mock_presigner::MockPresigner;

/// A description long enough to pass creation validation.
pub const SAMPLE_DESCRIPTION: &str =
    "Own the backend services that power candidate interviews, from API design to on-call.";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    presigner: MockPresigner,
    settings: IssuanceSettings,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            presigner: MockPresigner::new(),
            settings: IssuanceSettings {
                bucket: "test-answers".into(),
                ..IssuanceSettings::default()
            },
        }
    }

    /// Use a preconfigured presigner (failure injection, delays).
    pub fn with_presigner(mut self, presigner: MockPresigner) -> Self {
        self.presigner = presigner;
        self
    }

    pub fn with_presign_timeout(mut self, timeout: Duration) -> Self {
        self.settings.presign_timeout = timeout;
        self
    }

    pub fn with_max_batch_size(mut self, max: usize) -> Self {
        self.settings.max_batch_size = max;
        self
    }

    /// Build the harness, creating and migrating a temp database.
    pub async fn build(self) -> Result<TestHarness, ViewinError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| ViewinError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
            run_migrations: true,
        });
        storage.initialize().await?;
        let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

        let presigner = Arc::new(self.presigner);
        let workflow = ReportWorkflow::new(storage.clone(), presigner.clone(), self.settings);

        Ok(TestHarness {
            workflow,
            storage,
            presigner,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete workflow with temp storage and a mock presigner.
pub struct TestHarness {
    pub workflow: ReportWorkflow,
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<dyn StorageAdapter>,
    pub presigner: Arc<MockPresigner>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Create a valid job report owned by user 1.
    pub async fn create_report(&self, company: &str) -> Result<JobReport, ViewinError> {
        self.workflow
            .lifecycle
            .create_job_report(
                UserId(1),
                CreateJobReport {
                    company: company.into(),
                    title: "Backend Engineer".into(),
                    description: SAMPLE_DESCRIPTION.into(),
                },
            )
            .await
    }

    /// Deliver an audio-ready callback.
    pub async fn audios_ready(
        &self,
        id: JobReportId,
        session_id: Option<&str>,
        paths: &[&str],
    ) -> Result<AudioReadyOutcome, ViewinError> {
        self.workflow
            .lifecycle
            .apply_audio_ready(AudioReadyEvent {
                job_report_id: id,
                session_id: session_id.map(str::to_string),
                artifact_paths: paths.iter().map(|p| p.to_string()).collect(),
                correct_session: false,
            })
            .await
    }

    /// Deliver a report-ready callback.
    pub async fn report_ready(
        &self,
        id: JobReportId,
        reference: &str,
    ) -> Result<ReportReadyOutcome, ViewinError> {
        self.workflow
            .lifecycle
            .apply_report_ready(ReportReadyEvent {
                job_report_id: id,
                session_id: None,
                report_reference: reference.into(),
                correct_session: false,
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewin_core::LifecycleState;

    #[tokio::test]
    async fn harness_creates_pending_report() {
        let harness = TestHarness::builder().build().await.unwrap();
        let report = harness.create_report("Acme").await.unwrap();
        let state = harness
            .workflow
            .lifecycle
            .resolve_state(report.id)
            .await
            .unwrap();
        assert_eq!(state, LifecycleState::Pending);
    }
}
