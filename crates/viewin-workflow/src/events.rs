// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inputs and outcomes of lifecycle transitions.

use serde::{Deserialize, Serialize};
use viewin_core::{ArtifactRecord, ConflictWarning, JobReportId, LifecycleState};

/// Fields a client submits to open a job report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateJobReport {
    pub company: String,
    pub title: String,
    pub description: String,
}

/// The processing pipeline finished storing audio answers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioReadyEvent {
    pub job_report_id: JobReportId,
    pub session_id: Option<String>,
    /// `s3://bucket/key` paths. May be empty for a session-only update.
    pub artifact_paths: Vec<String>,
    /// Replace a stored session id instead of keeping the first one.
    pub correct_session: bool,
}

/// The processing pipeline finished generating the report document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportReadyEvent {
    pub job_report_id: JobReportId,
    pub session_id: Option<String>,
    pub report_reference: String,
    pub correct_session: bool,
}

/// An artifact path that could not be recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedArtifact {
    pub path: String,
    pub reason: String,
}

/// Result of applying an [`AudioReadyEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioReadyOutcome {
    pub state: LifecycleState,
    pub inserted: Vec<ArtifactRecord>,
    /// Paths already recorded by an earlier delivery.
    pub duplicates: Vec<String>,
    pub rejected: Vec<RejectedArtifact>,
    pub warnings: Vec<ConflictWarning>,
}

impl AudioReadyOutcome {
    /// True when every supplied path was recorded or already present.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.warnings.is_empty()
    }
}

/// Result of applying a [`ReportReadyEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportReadyOutcome {
    pub state: LifecycleState,
    /// False when the same reference was already stored.
    pub changed: bool,
    pub warnings: Vec<ConflictWarning>,
}
