// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status projection across the lifecycle.

use viewin_core::{JobReportId, LifecycleState, ViewinError};
use viewin_test_utils::{MockPresigner, TestHarness};

#[tokio::test]
async fn pending_status_is_empty() {
    let h = TestHarness::builder().build().await.unwrap();
    let id = h.create_report("Acme").await.unwrap().id;

    let view = h.workflow.status.get_status(id).await.unwrap();
    assert_eq!(view.status, LifecycleState::Pending);
    assert!(view.audio_urls.is_empty());
    assert!(view.report_url.is_none());
}

#[tokio::test]
async fn full_lifecycle_end_to_end() {
    let h = TestHarness::builder().build().await.unwrap();
    let report = h.create_report("Acme").await.unwrap();
    assert_eq!(report.id, JobReportId(1));
    let id = report.id;

    let batch = h
        .workflow
        .issuance
        .allocate_upload_batch(id, 2, None)
        .await
        .unwrap();
    assert_eq!(batch.slots.len(), 2);

    let audio = h
        .audios_ready(id, Some(&batch.session_id), &["s3://b/1.mp3", "s3://b/2.mp3"])
        .await
        .unwrap();
    assert_eq!(audio.state, LifecycleState::AudiosReady);
    assert_eq!(audio.inserted.len(), 2);
    assert!(audio.warnings.is_empty());

    let done = h.report_ready(id, "https://reports/1.pdf").await.unwrap();
    assert_eq!(done.state, LifecycleState::Completed);

    let view = h.workflow.status.get_status(id).await.unwrap();
    assert_eq!(view.status, LifecycleState::Completed);
    assert_eq!(view.audio_urls.len(), 2);
    assert!(view.audio_urls.iter().all(|u| u.presigned_url.is_some()));
    assert_eq!(view.audio_urls[0].file_name, "1.mp3");
    assert_eq!(view.report_url.as_deref(), Some("https://reports/1.pdf"));
}

#[tokio::test]
async fn storage_report_reference_is_presigned() {
    let h = TestHarness::builder().build().await.unwrap();
    let id = h.create_report("Acme").await.unwrap().id;
    h.report_ready(id, "s3://reports/job-1/report.pdf")
        .await
        .unwrap();

    let view = h.workflow.status.get_status(id).await.unwrap();
    assert_eq!(view.status, LifecycleState::ReportReady);
    assert_eq!(
        view.report_url.as_deref(),
        Some("https://mock-store.test/reports/job-1/report.pdf?method=GET&ttl=3600")
    );
}

#[tokio::test]
async fn failed_report_presign_falls_back_to_raw_reference() {
    let h = TestHarness::builder()
        .with_presigner(MockPresigner::new().fail_on_key("report.pdf"))
        .build()
        .await
        .unwrap();
    let id = h.create_report("Acme").await.unwrap().id;
    h.report_ready(id, "s3://reports/report.pdf").await.unwrap();

    let view = h.workflow.status.get_status(id).await.unwrap();
    assert_eq!(view.report_url.as_deref(), Some("s3://reports/report.pdf"));
}

#[tokio::test]
async fn list_audio_urls_matches_status() {
    let h = TestHarness::builder().build().await.unwrap();
    let id = h.create_report("Acme").await.unwrap().id;
    h.audios_ready(id, None, &["s3://b/1.mp3"]).await.unwrap();

    let urls = h.workflow.status.list_audio_urls(id).await.unwrap();
    let view = h.workflow.status.get_status(id).await.unwrap();
    assert_eq!(urls, view.audio_urls);
}

#[tokio::test]
async fn unknown_report_status_is_not_found() {
    let h = TestHarness::builder().build().await.unwrap();
    let missing = JobReportId(5);
    assert!(matches!(
        h.workflow.status.get_status(missing).await,
        Err(ViewinError::NotFound { .. })
    ));
    assert!(matches!(
        h.workflow.status.list_audio_urls(missing).await,
        Err(ViewinError::NotFound { .. })
    ));
}
