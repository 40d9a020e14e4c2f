// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Job report CRUD and conditional field updates.

use rusqlite::{OptionalExtension, params};
use viewin_core::{FieldUpdate, JobReport, JobReportId, NewJobReport, UserId, ViewinError};

use crate::database::{Database, map_tr_err};

const SELECT_COLUMNS: &str = "SELECT id, owner_id, company, title, description, session_id, \
     report_reference, created_at FROM job_reports";

fn row_to_job_report(row: &rusqlite::Row<'_>) -> Result<JobReport, rusqlite::Error> {
    Ok(JobReport {
        id: JobReportId(row.get(0)?),
        owner_id: UserId(row.get(1)?),
        company: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        session_id: row.get(5)?,
        report_reference: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Insert a job report and return it with the assigned id.
pub async fn insert_job_report(
    db: &Database,
    report: &NewJobReport,
) -> Result<JobReport, ViewinError> {
    let report = report.clone();
    db.connection()
        .call(move |conn| {
            let (id, created_at): (i64, String) = conn.query_row(
                "INSERT INTO job_reports (owner_id, company, title, description)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, created_at",
                params![
                    report.owner_id.0,
                    report.company,
                    report.title,
                    report.description
                ],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            Ok(JobReport {
                id: JobReportId(id),
                owner_id: report.owner_id,
                company: report.company,
                title: report.title,
                description: report.description,
                session_id: None,
                report_reference: None,
                created_at,
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Get a job report by id.
pub async fn get_job_report(
    db: &Database,
    id: JobReportId,
) -> Result<Option<JobReport>, ViewinError> {
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id.0],
                row_to_job_report,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Link a session id, honoring first-write-wins unless `overwrite` is set.
///
/// Read and write happen in one transaction.
pub async fn link_session(
    db: &Database,
    id: JobReportId,
    session_id: &str,
    overwrite: bool,
) -> Result<Option<FieldUpdate>, ViewinError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let previous: Option<Option<String>> = tx
                .query_row(
                    "SELECT session_id FROM job_reports WHERE id = ?1",
                    params![id.0],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(previous) = previous else {
                return Ok(None);
            };

            let keep_existing = match &previous {
                Some(existing) => !overwrite || *existing == session_id,
                None => false,
            };
            let current = match (&previous, keep_existing) {
                (Some(existing), true) => existing.clone(),
                _ => {
                    tx.execute(
                        "UPDATE job_reports SET session_id = ?2 WHERE id = ?1",
                        params![id.0, session_id],
                    )?;
                    session_id
                }
            };
            tx.commit()?;
            Ok(Some(FieldUpdate { previous, current }))
        })
        .await
        .map_err(map_tr_err)
}

/// Set the report reference, returning the value it replaced.
pub async fn set_report_reference(
    db: &Database,
    id: JobReportId,
    reference: &str,
) -> Result<Option<FieldUpdate>, ViewinError> {
    let reference = reference.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let previous: Option<Option<String>> = tx
                .query_row(
                    "SELECT report_reference FROM job_reports WHERE id = ?1",
                    params![id.0],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(previous) = previous else {
                return Ok(None);
            };

            if previous.as_deref() != Some(reference.as_str()) {
                tx.execute(
                    "UPDATE job_reports SET report_reference = ?2 WHERE id = ?1",
                    params![id.0, reference],
                )?;
            }
            tx.commit()?;
            Ok(Some(FieldUpdate {
                previous,
                current: reference,
            }))
        })
        .await
        .map_err(map_tr_err)
}
