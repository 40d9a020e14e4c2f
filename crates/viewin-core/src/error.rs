// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Viewin job-report service.

use thiserror::Error;

/// The primary error type used across all Viewin adapter traits and workflow operations.
#[derive(Debug, Error)]
pub enum ViewinError {
    /// Malformed or missing input. Always raised before any state is mutated.
    #[error("validation error: {0}")]
    Validation(String),

    /// The referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Missing, malformed, or rejected bearer credential.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// An external collaborator (object-store presigner) failed. Retryable.
    #[error("external service error: {message}")]
    ExternalService {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Storage backend errors (database connection, query failure, schema mismatch).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// A bounded external call did not complete in time.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ViewinError {
    /// Shorthand for a missing job report.
    pub fn job_report_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: "job report",
            id: id.to_string(),
        }
    }

    /// Returns true for failures a caller may retry unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalService { .. } | Self::Timeout { .. })
    }
}
