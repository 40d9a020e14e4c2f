// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the workflow components.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Repository-assigned identifier of a job report.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct JobReportId(pub i64);

impl fmt::Display for JobReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an authenticated end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of an injected adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Storage,
    Presigner,
    Auth,
}

/// Lifecycle state of a job report.
///
/// Never persisted. Derived from the artifact count and the presence of a
/// report reference every time it is read.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Pending,
    AudiosReady,
    ReportReady,
    Completed,
}

impl LifecycleState {
    /// Derives the state from what has been recorded so far.
    pub fn derive(artifact_count: u64, has_report: bool) -> Self {
        match (artifact_count > 0, has_report) {
            (false, false) => Self::Pending,
            (true, false) => Self::AudiosReady,
            (false, true) => Self::ReportReady,
            (true, true) => Self::Completed,
        }
    }
}

/// A bearer credential presented by a caller.
#[derive(Clone)]
pub struct AuthToken(pub String);

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

/// A verified identity from an auth adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    pub user_id: UserId,
}

/// Fields supplied when a job report is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewJobReport {
    pub owner_id: UserId,
    pub company: String,
    pub title: String,
    pub description: String,
}

/// A persisted job report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    pub id: JobReportId,
    pub owner_id: UserId,
    pub company: String,
    pub title: String,
    pub description: String,
    /// Links the report to the upload session of its audio artifacts.
    pub session_id: Option<String>,
    /// Reference to the generated report document. Either a URL or an
    /// object-store path.
    pub report_reference: Option<String>,
    pub created_at: String,
}

/// An artifact about to be recorded against a job report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArtifact {
    pub storage_path: String,
    pub display_name: String,
}

/// A stored audio answer belonging to a job report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub id: i64,
    pub job_report_id: JobReportId,
    pub storage_path: String,
    pub display_name: String,
    pub created_at: String,
}

/// Result of a conditional single-field update on a job report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    /// Value before the update was attempted.
    pub previous: Option<String>,
    /// Value stored after the update.
    pub current: String,
}

impl FieldUpdate {
    /// True when the stored value differs from what was there before.
    pub fn changed(&self) -> bool {
        self.previous.as_deref() != Some(self.current.as_str())
    }
}

/// A competing write that was resolved by policy instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictWarning {
    pub job_report_id: JobReportId,
    pub field: String,
    /// Value stored after resolution.
    pub kept: String,
    /// Value that lost.
    pub discarded: String,
}

impl fmt::Display for ConflictWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "conflicting {} for job report {}: kept '{}', discarded '{}'",
            self.field, self.job_report_id, self.kept, self.discarded
        )
    }
}

/// Outcome of inserting a batch of artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactInsert {
    /// Records created by this call.
    pub inserted: Vec<ArtifactRecord>,
    /// Paths already recorded for the job report.
    pub duplicates: Vec<String>,
}
