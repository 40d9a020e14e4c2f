// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the job-report API.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use viewin_core::{AuthIdentity, ConflictWarning, JobReportId};
use viewin_workflow::{
    AudioReadyEvent, CreateJobReport, RejectedArtifact, ReportReadyEvent, ResolvedUrl,
    StatusView, job_info,
};

use crate::error::ApiError;
use crate::server::GatewayState;

/// Request body for POST /api/job-reports.
#[derive(Debug, Deserialize)]
pub struct CreateJobReportRequest {
    pub company: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub callback_url: Option<String>,
}

/// Response body for POST /api/job-reports.
#[derive(Debug, Serialize)]
pub struct JobReportResponse {
    pub job_report_id: JobReportId,
    pub job_info: String,
    pub session_id: Option<String>,
}

/// Request body for POST /api/job-reports/{id}/upload-urls.
#[derive(Debug, Deserialize)]
pub struct UploadUrlsRequest {
    pub num_questions: usize,
    #[serde(default)]
    pub callback_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadUrlEntry {
    pub question_index: usize,
    pub presigned_url: String,
    pub s3_key: String,
}

/// Response body for POST /api/job-reports/{id}/upload-urls.
#[derive(Debug, Serialize)]
pub struct UploadUrlsResponse {
    pub session_id: String,
    pub job_report_id: JobReportId,
    pub upload_urls: Vec<UploadUrlEntry>,
    /// Seconds until the URLs expire.
    pub expires_in: u64,
}

/// Request body for POST /api/job-reports/upload-url.
#[derive(Debug, Deserialize)]
pub struct UploadUrlRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Response body for POST /api/job-reports/upload-url.
#[derive(Debug, Serialize)]
pub struct UploadUrlResponse {
    pub session_id: String,
    pub presigned_url: String,
    pub s3_key: String,
    pub expires_in: u64,
}

/// Callback body sent once answer audio is stored.
#[derive(Debug, Deserialize)]
pub struct AudiosReadyCallback {
    pub job_report_id: JobReportId,
    #[serde(default)]
    pub session_id: Option<String>,
    /// `null` and a missing field both mean no audio files.
    #[serde(default)]
    pub audio_files: Option<Vec<String>>,
    #[serde(default)]
    pub correct_session: bool,
}

/// Partial-failure details for an audio-ready callback.
#[derive(Debug, Serialize)]
pub struct AudiosReadyResponse {
    pub rejected: Vec<RejectedArtifact>,
    pub duplicates: Vec<String>,
    pub warnings: Vec<ConflictWarning>,
}

/// Conflict details for a report-ready callback.
#[derive(Debug, Serialize)]
pub struct ReportReadyResponse {
    pub warnings: Vec<ConflictWarning>,
}

/// Callback body sent once the report document exists.
///
/// `report_path` is durable; `report_url` is usually an expiring presigned
/// URL. The path wins when both are present.
#[derive(Debug, Deserialize)]
pub struct ReportReadyCallback {
    pub job_report_id: JobReportId,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub report_path: Option<String>,
    #[serde(default)]
    pub report_url: Option<String>,
    #[serde(default)]
    pub correct_session: bool,
}

impl ReportReadyCallback {
    fn reference(&self) -> String {
        [&self.report_path, &self.report_url]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or_default()
            .to_string()
    }
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// POST /api/job-reports
pub async fn create_job_report(
    State(state): State<GatewayState>,
    Extension(identity): Extension<AuthIdentity>,
    Json(body): Json<CreateJobReportRequest>,
) -> Result<Response, ApiError> {
    let report = state
        .workflow
        .lifecycle
        .create_job_report(
            identity.user_id,
            CreateJobReport {
                company: body.company,
                title: body.title,
                description: body.description,
            },
        )
        .await?;
    if let Some(callback_url) = body.callback_url.as_deref() {
        tracing::info!(job_report_id = %report.id, callback_url, "job report callback registered");
    }

    let response = JobReportResponse {
        job_report_id: report.id,
        job_info: job_info(&report),
        session_id: report.session_id.clone(),
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// POST /api/job-reports/{id}/upload-urls
pub async fn generate_upload_urls(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    Json(body): Json<UploadUrlsRequest>,
) -> Result<Json<UploadUrlsResponse>, ApiError> {
    let batch = state
        .workflow
        .issuance
        .allocate_upload_batch(JobReportId(id), body.num_questions, body.callback_url.as_deref())
        .await?;
    Ok(Json(UploadUrlsResponse {
        session_id: batch.session_id,
        job_report_id: batch.job_report_id,
        upload_urls: batch
            .slots
            .into_iter()
            .map(|slot| UploadUrlEntry {
                question_index: slot.index,
                presigned_url: slot.presigned_url,
                s3_key: slot.storage_key,
            })
            .collect(),
        expires_in: batch.expires_in.as_secs(),
    }))
}

/// POST /api/job-reports/upload-url
pub async fn generate_upload_url(
    State(state): State<GatewayState>,
    Json(body): Json<UploadUrlRequest>,
) -> Result<Json<UploadUrlResponse>, ApiError> {
    let upload = state
        .workflow
        .issuance
        .allocate_single_upload_url(&body.session_id, body.filename.as_deref())
        .await?;
    Ok(Json(UploadUrlResponse {
        session_id: upload.session_id,
        presigned_url: upload.presigned_url,
        s3_key: upload.storage_key,
        expires_in: upload.expires_in.as_secs(),
    }))
}

/// POST /api/job-reports/callbacks/audios-ready
///
/// 204 when every path was recorded; 200 with details otherwise.
pub async fn audios_ready(
    State(state): State<GatewayState>,
    Json(body): Json<AudiosReadyCallback>,
) -> Result<Response, ApiError> {
    let outcome = state
        .workflow
        .lifecycle
        .apply_audio_ready(AudioReadyEvent {
            job_report_id: body.job_report_id,
            session_id: body.session_id,
            artifact_paths: body.audio_files.unwrap_or_default(),
            correct_session: body.correct_session,
        })
        .await?;

    if outcome.is_clean() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    let details = AudiosReadyResponse {
        rejected: outcome.rejected,
        duplicates: outcome.duplicates,
        warnings: outcome.warnings,
    };
    Ok((StatusCode::OK, Json(details)).into_response())
}

/// POST /api/job-reports/callbacks/report-ready
///
/// 204 normally; 200 with the warnings when a stored value was replaced or
/// a conflicting session id was discarded.
pub async fn report_ready(
    State(state): State<GatewayState>,
    Json(body): Json<ReportReadyCallback>,
) -> Result<Response, ApiError> {
    let report_reference = body.reference();
    let outcome = state
        .workflow
        .lifecycle
        .apply_report_ready(ReportReadyEvent {
            job_report_id: body.job_report_id,
            session_id: body.session_id,
            report_reference,
            correct_session: body.correct_session,
        })
        .await?;

    if outcome.warnings.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    let details = ReportReadyResponse {
        warnings: outcome.warnings,
    };
    Ok((StatusCode::OK, Json(details)).into_response())
}

/// GET /api/job-reports/{id}/status
pub async fn get_status(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusView>, ApiError> {
    Ok(Json(state.workflow.status.get_status(JobReportId(id)).await?))
}

/// GET /api/job-reports/{id}/audios/presigned-urls
pub async fn get_audio_urls(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ResolvedUrl>>, ApiError> {
    Ok(Json(
        state.workflow.status.list_audio_urls(JobReportId(id)).await?,
    ))
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
