// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle transitions against the SQLite repository.

use std::sync::Arc;

use viewin_core::{JobReportId, LifecycleState, StorageAdapter, UserId, ViewinError};
use viewin_test_utils::TestHarness;
use viewin_workflow::{AudioReadyEvent, CreateJobReport, ReportReadyEvent, job_info};

async fn harness() -> TestHarness {
    TestHarness::builder().build().await.unwrap()
}

#[tokio::test]
async fn created_report_is_pending_and_empty() {
    let h = harness().await;
    let report = h.create_report("Acme").await.unwrap();

    assert_eq!(report.id, JobReportId(1));
    assert!(report.session_id.is_none());
    assert!(report.report_reference.is_none());
    assert_eq!(
        h.workflow.lifecycle.resolve_state(report.id).await.unwrap(),
        LifecycleState::Pending
    );
    assert_eq!(h.storage.count_artifacts(report.id).await.unwrap(), 0);
}

#[tokio::test]
async fn creation_rejects_invalid_fields_without_persisting() {
    let h = harness().await;
    let result = h
        .workflow
        .lifecycle
        .create_job_report(
            UserId(1),
            CreateJobReport {
                company: "Acme".into(),
                title: "Dev".into(),
                description: "too short".into(),
            },
        )
        .await;
    assert!(matches!(result, Err(ViewinError::Validation(_))));
    assert!(h.storage.get_job_report(JobReportId(1)).await.unwrap().is_none());
}

#[tokio::test]
async fn job_info_summarizes_fields() {
    let h = harness().await;
    let report = h.create_report("Acme").await.unwrap();
    let info = job_info(&report);
    assert!(info.starts_with("Company: Acme\nTitle: Backend Engineer\nDescription: "));
}

#[tokio::test]
async fn repeated_report_ready_is_idempotent() {
    let h = harness().await;
    let id = h.create_report("Acme").await.unwrap().id;

    let first = h.report_ready(id, "https://reports/1.pdf").await.unwrap();
    assert!(first.changed);
    assert!(first.warnings.is_empty());

    let second = h.report_ready(id, "https://reports/1.pdf").await.unwrap();
    assert!(!second.changed);
    assert!(second.warnings.is_empty());
    assert_eq!(second.state, first.state);
    assert_eq!(second.state, LifecycleState::ReportReady);
}

#[tokio::test]
async fn differing_report_reference_overwrites_with_warning() {
    let h = harness().await;
    let id = h.create_report("Acme").await.unwrap().id;
    h.report_ready(id, "https://reports/old.pdf").await.unwrap();

    let outcome = h.report_ready(id, "https://reports/new.pdf").await.unwrap();
    assert!(outcome.changed);
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].kept, "https://reports/new.pdf");
    assert_eq!(outcome.warnings[0].discarded, "https://reports/old.pdf");

    let stored = h.storage.get_job_report(id).await.unwrap().unwrap();
    assert_eq!(stored.report_reference.as_deref(), Some("https://reports/new.pdf"));
}

#[tokio::test]
async fn report_before_audio_reaches_completed() {
    let h = harness().await;
    let id = h.create_report("Acme").await.unwrap().id;

    let outcome = h.report_ready(id, "https://reports/1.pdf").await.unwrap();
    assert_eq!(outcome.state, LifecycleState::ReportReady);

    let outcome = h.audios_ready(id, None, &["s3://b/1.mp3"]).await.unwrap();
    assert_eq!(outcome.state, LifecycleState::Completed);
}

#[tokio::test]
async fn disjoint_audio_batches_accumulate() {
    let h = harness().await;
    let id = h.create_report("Acme").await.unwrap().id;

    let (a, b) = tokio::join!(
        h.audios_ready(id, None, &["s3://b/1.mp3", "s3://b/2.mp3"]),
        h.audios_ready(id, None, &["s3://b/3.mp3"]),
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(h.storage.count_artifacts(id).await.unwrap(), 3);
    assert_eq!(
        h.workflow.lifecycle.resolve_state(id).await.unwrap(),
        LifecycleState::AudiosReady
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_audio_callbacks_all_persist() {
    let h = Arc::new(harness().await);
    let id = h.create_report("Acme").await.unwrap().id;

    let tasks: Vec<_> = (0..8)
        .map(|batch| {
            let h = Arc::clone(&h);
            tokio::spawn(async move {
                let paths = [
                    format!("s3://b/batch-{batch}/1.mp3"),
                    format!("s3://b/batch-{batch}/2.mp3"),
                ];
                let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
                h.audios_ready(id, None, &refs).await
            })
        })
        .collect();

    for task in tasks {
        let outcome = task.await.unwrap().unwrap();
        assert_eq!(outcome.inserted.len(), 2);
        assert!(outcome.duplicates.is_empty());
    }

    assert_eq!(h.storage.count_artifacts(id).await.unwrap(), 16);
    assert_eq!(h.storage.list_artifacts(id).await.unwrap().len(), 16);
}

#[tokio::test]
async fn redelivered_audio_ready_skips_duplicates() {
    let h = harness().await;
    let id = h.create_report("Acme").await.unwrap().id;
    let paths = ["s3://b/1.mp3", "s3://b/2.mp3"];

    h.audios_ready(id, None, &paths).await.unwrap();
    let again = h.audios_ready(id, None, &paths).await.unwrap();

    assert!(again.inserted.is_empty());
    assert_eq!(again.duplicates.len(), 2);
    assert!(again.is_clean());
    assert_eq!(h.storage.count_artifacts(id).await.unwrap(), 2);
}

#[tokio::test]
async fn malformed_paths_are_rejected_individually() {
    let h = harness().await;
    let id = h.create_report("Acme").await.unwrap().id;

    let outcome = h
        .audios_ready(
            id,
            None,
            &[
                "s3://b/1.mp3",
                "s3://no-key",
                "https://reports.example/1.mp3",
                "s3://b/2.mp3",
            ],
        )
        .await
        .unwrap();

    assert_eq!(outcome.inserted.len(), 2);
    let rejected: Vec<&str> = outcome.rejected.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(rejected, vec!["s3://no-key", "https://reports.example/1.mp3"]);
    assert!(!outcome.is_clean());
    assert_eq!(outcome.state, LifecycleState::AudiosReady);

    let stored = h.storage.list_artifacts(id).await.unwrap();
    assert!(stored.iter().all(|a| a.storage_path.starts_with("s3://b/")));
}

#[tokio::test]
async fn artifact_display_name_is_last_key_segment() {
    let h = harness().await;
    let id = h.create_report("Acme").await.unwrap().id;

    let outcome = h
        .audios_ready(id, None, &["s3://b/responses/job-1/answer_1.mp3"])
        .await
        .unwrap();
    assert_eq!(outcome.inserted[0].display_name, "answer_1.mp3");
    assert_eq!(
        outcome.inserted[0].storage_path,
        "s3://b/responses/job-1/answer_1.mp3"
    );
}

#[tokio::test]
async fn empty_audio_ready_links_session_only() {
    let h = harness().await;
    let id = h.create_report("Acme").await.unwrap().id;

    let outcome = h.audios_ready(id, Some("sess-1"), &[]).await.unwrap();
    assert!(outcome.inserted.is_empty());
    assert_eq!(outcome.state, LifecycleState::Pending);

    let stored = h.storage.get_job_report(id).await.unwrap().unwrap();
    assert_eq!(stored.session_id.as_deref(), Some("sess-1"));
}

#[tokio::test]
async fn conflicting_session_keeps_first_value() {
    let h = harness().await;
    let id = h.create_report("Acme").await.unwrap().id;
    h.audios_ready(id, Some("sess-1"), &[]).await.unwrap();

    let outcome = h.audios_ready(id, Some("sess-2"), &[]).await.unwrap();
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].field, "session_id");
    assert_eq!(outcome.warnings[0].kept, "sess-1");
    assert_eq!(outcome.warnings[0].discarded, "sess-2");

    let stored = h.storage.get_job_report(id).await.unwrap().unwrap();
    assert_eq!(stored.session_id.as_deref(), Some("sess-1"));
}

#[tokio::test]
async fn corrective_session_update_overwrites() {
    let h = harness().await;
    let id = h.create_report("Acme").await.unwrap().id;
    h.audios_ready(id, Some("sess-1"), &[]).await.unwrap();

    let outcome = h
        .workflow
        .lifecycle
        .apply_report_ready(ReportReadyEvent {
            job_report_id: id,
            session_id: Some("sess-2".into()),
            report_reference: "https://reports/1.pdf".into(),
            correct_session: true,
        })
        .await
        .unwrap();
    assert_eq!(outcome.warnings[0].kept, "sess-2");
    assert_eq!(outcome.warnings[0].discarded, "sess-1");

    let stored = h.storage.get_job_report(id).await.unwrap().unwrap();
    assert_eq!(stored.session_id.as_deref(), Some("sess-2"));
}

#[tokio::test]
async fn blank_report_reference_is_validation_even_for_unknown_id() {
    let h = harness().await;
    let result = h.report_ready(JobReportId(99), "   ").await;
    assert!(matches!(result, Err(ViewinError::Validation(_))));
}

#[tokio::test]
async fn unknown_job_report_is_not_found() {
    let h = harness().await;
    let missing = JobReportId(42);

    let audio = h
        .workflow
        .lifecycle
        .apply_audio_ready(AudioReadyEvent {
            job_report_id: missing,
            artifact_paths: vec!["s3://b/1.mp3".into()],
            ..AudioReadyEvent::default()
        })
        .await;
    assert!(matches!(audio, Err(ViewinError::NotFound { .. })));

    let report = h.report_ready(missing, "https://reports/1.pdf").await;
    assert!(matches!(report, Err(ViewinError::NotFound { .. })));

    let state = h.workflow.lifecycle.resolve_state(missing).await;
    assert!(matches!(state, Err(ViewinError::NotFound { .. })));
}
