// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job-report workflow for the Viewin service.
//!
//! Three components share the injected adapters:
//!
//! - [`LifecycleManager`] creates job reports and reconciles pipeline callbacks.
//! - [`UrlIssuanceCoordinator`] issues presigned upload and read URLs.
//! - [`StatusProjector`] renders the client-facing status view.

pub mod events;
pub mod issuance;
pub mod lifecycle;
pub mod settings;
pub mod status;
pub mod validation;

use std::sync::Arc;

use viewin_core::{PresignerAdapter, StorageAdapter};

pub use events::{
    AudioReadyEvent, AudioReadyOutcome, CreateJobReport, RejectedArtifact, ReportReadyEvent,
    ReportReadyOutcome,
};
pub use issuance::{ResolvedUrl, SingleUpload, UploadBatch, UploadSlot, UrlIssuanceCoordinator};
pub use lifecycle::{LifecycleManager, job_info};
pub use settings::IssuanceSettings;
pub use status::{StatusProjector, StatusView};

/// The wired workflow components.
pub struct ReportWorkflow {
    pub lifecycle: LifecycleManager,
    pub issuance: Arc<UrlIssuanceCoordinator>,
    pub status: StatusProjector,
}

impl ReportWorkflow {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        presigner: Arc<dyn PresignerAdapter>,
        settings: IssuanceSettings,
    ) -> Self {
        let issuance = Arc::new(UrlIssuanceCoordinator::new(
            storage.clone(),
            presigner,
            settings,
        ));
        Self {
            lifecycle: LifecycleManager::new(storage.clone()),
            status: StatusProjector::new(storage, issuance.clone()),
            issuance,
        }
    }
}
