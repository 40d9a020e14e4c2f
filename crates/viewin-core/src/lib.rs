// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Viewin job-report service.
//!
//! This crate provides the adapter trait definitions, the error type, and the
//! domain types shared by the workflow, storage, presigner, and gateway crates.

pub mod error;
pub mod path;
pub mod traits;
pub mod types;

pub use error::ViewinError;
pub use path::StoragePath;
pub use types::{
    AdapterType, ArtifactInsert, ArtifactRecord, AuthIdentity, AuthToken, ConflictWarning,
    FieldUpdate, HealthStatus, JobReport, JobReportId, LifecycleState, NewArtifact,
    NewJobReport, UserId,
};

pub use traits::{AuthAdapter, PluginAdapter, PresignerAdapter, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn lifecycle_state_derivation_table() {
        assert_eq!(LifecycleState::derive(0, false), LifecycleState::Pending);
        assert_eq!(LifecycleState::derive(2, false), LifecycleState::AudiosReady);
        assert_eq!(LifecycleState::derive(0, true), LifecycleState::ReportReady);
        assert_eq!(LifecycleState::derive(1, true), LifecycleState::Completed);
    }

    #[test]
    fn lifecycle_state_wire_names() {
        assert_eq!(LifecycleState::AudiosReady.to_string(), "AUDIOS_READY");
        let json = serde_json::to_string(&LifecycleState::ReportReady).unwrap();
        assert_eq!(json, "\"REPORT_READY\"");
        let parsed: LifecycleState = "COMPLETED".parse().unwrap();
        assert_eq!(parsed, LifecycleState::Completed);
    }

    proptest! {
        #[test]
        fn report_presence_alone_decides_report_states(count in 0u64..1000, has_report in any::<bool>()) {
            let state = LifecycleState::derive(count, has_report);
            let report_side = matches!(state, LifecycleState::ReportReady | LifecycleState::Completed);
            prop_assert_eq!(report_side, has_report);
            let audio_side = matches!(state, LifecycleState::AudiosReady | LifecycleState::Completed);
            prop_assert_eq!(audio_side, count > 0);
        }
    }

    #[test]
    fn adapter_type_round_trips() {
        use std::str::FromStr;

        for variant in [AdapterType::Storage, AdapterType::Presigner, AdapterType::Auth] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&JobReportId(7)).unwrap();
        assert_eq!(json, "7");
        assert_eq!(UserId(3).to_string(), "3");
    }

    #[test]
    fn field_update_change_detection() {
        let same = FieldUpdate {
            previous: Some("a".into()),
            current: "a".into(),
        };
        assert!(!same.changed());
        let fresh = FieldUpdate {
            previous: None,
            current: "a".into(),
        };
        assert!(fresh.changed());
    }

    #[test]
    fn auth_token_debug_is_redacted() {
        let token = AuthToken("secret-value".into());
        assert!(!format!("{token:?}").contains("secret-value"));
    }

    #[test]
    fn retryable_errors() {
        let timeout = ViewinError::Timeout {
            duration: std::time::Duration::from_secs(5),
        };
        assert!(timeout.is_retryable());
        assert!(!ViewinError::Validation("bad".into()).is_retryable());
        let nf = ViewinError::job_report_not_found(JobReportId(9));
        assert_eq!(nf.to_string(), "job report not found: 9");
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_presigner_adapter<T: PresignerAdapter>() {}
        fn _assert_auth_adapter<T: AuthAdapter>() {}
    }
}
