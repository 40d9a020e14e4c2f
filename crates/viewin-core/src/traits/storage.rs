// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the job-report repository.

use async_trait::async_trait;

use crate::error::ViewinError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    ArtifactInsert, ArtifactRecord, FieldUpdate, JobReport, JobReportId, NewArtifact,
    NewJobReport,
};

/// Adapter for the persisted workflow state.
///
/// Every method is a single atomic repository operation. Callers rely on
/// this for consistency instead of in-process locking. Methods returning
/// `Option` yield `None` when the job report does not exist.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, schema check).
    async fn initialize(&self) -> Result<(), ViewinError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), ViewinError>;

    /// Inserts a job report and returns it with its assigned id.
    async fn insert_job_report(&self, report: &NewJobReport) -> Result<JobReport, ViewinError>;

    /// Looks up a job report by id.
    async fn get_job_report(&self, id: JobReportId) -> Result<Option<JobReport>, ViewinError>;

    /// Links a session id to the job report.
    ///
    /// Without `overwrite` the value is written only when none is stored
    /// and the stored value is returned unchanged otherwise.
    async fn link_session(
        &self,
        id: JobReportId,
        session_id: &str,
        overwrite: bool,
    ) -> Result<Option<FieldUpdate>, ViewinError>;

    /// Sets the report reference, returning the value it replaced.
    async fn set_report_reference(
        &self,
        id: JobReportId,
        reference: &str,
    ) -> Result<Option<FieldUpdate>, ViewinError>;

    /// Appends artifacts. Paths already recorded for the job report are skipped.
    async fn insert_artifacts(
        &self,
        id: JobReportId,
        artifacts: &[NewArtifact],
    ) -> Result<ArtifactInsert, ViewinError>;

    /// Lists artifacts of a job report in insertion order.
    async fn list_artifacts(&self, id: JobReportId) -> Result<Vec<ArtifactRecord>, ViewinError>;

    /// Counts artifacts of a job report.
    async fn count_artifacts(&self, id: JobReportId) -> Result<u64, ViewinError>;
}
