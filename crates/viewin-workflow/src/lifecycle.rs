// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job report lifecycle: creation and callback reconciliation.
//!
//! State is never stored. It is derived from the artifact count and the
//! presence of a report reference on every read, so callbacks may arrive in
//! any order, more than once, or not at all.
//!
//! Session ids follow first-write-wins: a differing value is discarded with
//! a [`ConflictWarning`] unless the event asks for a correction. Report
//! references follow last-write-wins.

use std::sync::Arc;

use tracing::{info, warn};
use viewin_core::{
    ConflictWarning, JobReport, JobReportId, LifecycleState, NewArtifact, NewJobReport,
    StorageAdapter, StoragePath, UserId, ViewinError,
};

use crate::events::{
    AudioReadyEvent, AudioReadyOutcome, CreateJobReport, RejectedArtifact, ReportReadyEvent,
    ReportReadyOutcome,
};
use crate::validation::validate_job_report;

/// Applies lifecycle transitions against the repository.
pub struct LifecycleManager {
    storage: Arc<dyn StorageAdapter>,
}

impl LifecycleManager {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    /// Validates and persists a new job report in `PENDING`.
    pub async fn create_job_report(
        &self,
        owner_id: UserId,
        input: CreateJobReport,
    ) -> Result<JobReport, ViewinError> {
        validate_job_report(&input)?;
        let report = self
            .storage
            .insert_job_report(&NewJobReport {
                owner_id,
                company: input.company.trim().to_string(),
                title: input.title.trim().to_string(),
                description: input.description.trim().to_string(),
            })
            .await?;
        info!(job_report_id = %report.id, owner_id = %owner_id, "job report created");
        Ok(report)
    }

    /// Loads a job report or fails with `NotFound`.
    pub async fn get_job_report(&self, id: JobReportId) -> Result<JobReport, ViewinError> {
        self.storage
            .get_job_report(id)
            .await?
            .ok_or_else(|| ViewinError::job_report_not_found(id))
    }

    /// Records audio artifacts and, optionally, the upload session.
    ///
    /// Malformed paths are rejected one by one; the valid subset is still
    /// persisted. Paths delivered before are reported as duplicates.
    pub async fn apply_audio_ready(
        &self,
        event: AudioReadyEvent,
    ) -> Result<AudioReadyOutcome, ViewinError> {
        let id = event.job_report_id;
        self.get_job_report(id).await?;

        let mut valid = Vec::with_capacity(event.artifact_paths.len());
        let mut rejected = Vec::new();
        for raw in &event.artifact_paths {
            match StoragePath::parse(raw) {
                Ok(path) => valid.push(NewArtifact {
                    display_name: path.file_name().to_string(),
                    storage_path: path.to_string(),
                }),
                Err(e) => {
                    warn!(job_report_id = %id, path = %raw, "rejected artifact path");
                    rejected.push(RejectedArtifact {
                        path: raw.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let mut warnings = Vec::new();
        if let Some(warning) = self
            .apply_session(id, event.session_id.as_deref(), event.correct_session)
            .await?
        {
            warnings.push(warning);
        }

        let insert = if valid.is_empty() {
            Default::default()
        } else {
            self.storage.insert_artifacts(id, &valid).await?
        };

        let state = self.resolve_state(id).await?;
        info!(
            job_report_id = %id,
            inserted = insert.inserted.len(),
            duplicates = insert.duplicates.len(),
            rejected = rejected.len(),
            %state,
            "audio-ready applied"
        );

        Ok(AudioReadyOutcome {
            state,
            inserted: insert.inserted,
            duplicates: insert.duplicates,
            rejected,
            warnings,
        })
    }

    /// Stores the report reference, and optionally the upload session.
    pub async fn apply_report_ready(
        &self,
        event: ReportReadyEvent,
    ) -> Result<ReportReadyOutcome, ViewinError> {
        let reference = event.report_reference.trim();
        if reference.is_empty() {
            return Err(ViewinError::Validation(
                "report reference must not be empty".into(),
            ));
        }

        let id = event.job_report_id;
        self.get_job_report(id).await?;

        let mut warnings = Vec::new();
        if let Some(warning) = self
            .apply_session(id, event.session_id.as_deref(), event.correct_session)
            .await?
        {
            warnings.push(warning);
        }

        let update = self
            .storage
            .set_report_reference(id, reference)
            .await?
            .ok_or_else(|| ViewinError::job_report_not_found(id))?;

        if let Some(previous) = update.previous.as_ref().filter(|_| update.changed()) {
            let warning = ConflictWarning {
                job_report_id: id,
                field: "report_reference".into(),
                kept: update.current.clone(),
                discarded: previous.clone(),
            };
            warn!(%warning, "report reference replaced");
            warnings.push(warning);
        }

        let state = self.resolve_state(id).await?;
        info!(job_report_id = %id, changed = update.changed(), %state, "report-ready applied");

        Ok(ReportReadyOutcome {
            state,
            changed: update.changed(),
            warnings,
        })
    }

    /// Derives the current lifecycle state.
    pub async fn resolve_state(&self, id: JobReportId) -> Result<LifecycleState, ViewinError> {
        let report = self.get_job_report(id).await?;
        let artifacts = self.storage.count_artifacts(id).await?;
        Ok(LifecycleState::derive(
            artifacts,
            report.report_reference.is_some(),
        ))
    }

    /// Links `session_id` under first-write-wins, or overwrites when `correct` is set.
    ///
    /// Returns a warning whenever two different values met.
    async fn apply_session(
        &self,
        id: JobReportId,
        session_id: Option<&str>,
        correct: bool,
    ) -> Result<Option<ConflictWarning>, ViewinError> {
        let Some(session_id) = session_id.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        let update = self
            .storage
            .link_session(id, session_id, correct)
            .await?
            .ok_or_else(|| ViewinError::job_report_not_found(id))?;

        let Some(previous) = update.previous.filter(|p| p != session_id) else {
            return Ok(None);
        };

        let (kept, discarded) = if correct {
            (update.current, previous)
        } else {
            (update.current, session_id.to_string())
        };
        let warning = ConflictWarning {
            job_report_id: id,
            field: "session_id".into(),
            kept,
            discarded,
        };
        if correct {
            warn!(%warning, "session id corrected");
        } else {
            warn!(%warning, "session id conflict, keeping first value");
        }
        Ok(Some(warning))
    }
}

/// Human-readable summary of a job report.
pub fn job_info(report: &JobReport) -> String {
    format!(
        "Company: {}\nTitle: {}\nDescription: {}",
        report.company, report.title, report.description
    )
}
