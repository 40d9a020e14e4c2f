// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Artifact record operations.
//!
//! Inserts are additive. A path already recorded for the same job report is
//! skipped, which keeps redelivered callbacks idempotent.

use rusqlite::{OptionalExtension, params};
use viewin_core::{ArtifactInsert, ArtifactRecord, JobReportId, NewArtifact, ViewinError};

use crate::database::{Database, map_tr_err};

/// Insert artifacts for a job report in one transaction.
pub async fn insert_artifacts(
    db: &Database,
    id: JobReportId,
    artifacts: &[NewArtifact],
) -> Result<ArtifactInsert, ViewinError> {
    let artifacts = artifacts.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let mut outcome = ArtifactInsert::default();
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO artifacts (job_report_id, storage_path, display_name)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT (job_report_id, storage_path) DO NOTHING
                     RETURNING id, created_at",
                )?;
                for artifact in artifacts {
                    let row: Option<(i64, String)> = stmt
                        .query_row(
                            params![id.0, artifact.storage_path, artifact.display_name],
                            |row| Ok((row.get(0)?, row.get(1)?)),
                        )
                        .optional()?;
                    match row {
                        Some((artifact_id, created_at)) => outcome.inserted.push(ArtifactRecord {
                            id: artifact_id,
                            job_report_id: id,
                            storage_path: artifact.storage_path,
                            display_name: artifact.display_name,
                            created_at,
                        }),
                        None => outcome.duplicates.push(artifact.storage_path),
                    }
                }
            }
            tx.commit()?;
            Ok(outcome)
        })
        .await
        .map_err(map_tr_err)
}

/// List artifacts of a job report in insertion order.
pub async fn list_artifacts(
    db: &Database,
    id: JobReportId,
) -> Result<Vec<ArtifactRecord>, ViewinError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, job_report_id, storage_path, display_name, created_at
                 FROM artifacts WHERE job_report_id = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map(params![id.0], |row| {
                Ok(ArtifactRecord {
                    id: row.get(0)?,
                    job_report_id: JobReportId(row.get(1)?),
                    storage_path: row.get(2)?,
                    display_name: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

/// Count artifacts of a job report.
pub async fn count_artifacts(db: &Database, id: JobReportId) -> Result<u64, ViewinError> {
    let count = db
        .connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM artifacts WHERE job_report_id = ?1",
                params![id.0],
                |row| row.get::<_, i64>(0),
            )
        })
        .await
        .map_err(map_tr_err)?;
    Ok(u64::try_from(count).unwrap_or_default())
}
