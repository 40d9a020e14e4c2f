// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use viewin_config::model::StorageConfig;
use viewin_core::{
    AdapterType, ArtifactInsert, ArtifactRecord, FieldUpdate, HealthStatus, JobReport,
    JobReportId, NewArtifact, NewJobReport, PluginAdapter, StorageAdapter, ViewinError,
};

use crate::database::{Database, OpenOptions, map_tr_err};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// The database is opened lazily by [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage. No connection is opened yet.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, ViewinError> {
        self.db.get().ok_or_else(|| ViewinError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(&self, db: &Database) -> Result<(), ViewinError> {
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, ViewinError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ViewinError> {
        if let Some(db) = self.db.get() {
            self.checkpoint(db).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), ViewinError> {
        let options = OpenOptions {
            wal_mode: self.config.wal_mode,
            run_migrations: self.config.run_migrations,
        };
        let db = Database::open(&self.config.database_path, options).await?;
        self.db.set(db).map_err(|_| ViewinError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), ViewinError> {
        let db = self.db()?;
        self.checkpoint(db).await
    }

    async fn insert_job_report(&self, report: &NewJobReport) -> Result<JobReport, ViewinError> {
        queries::job_reports::insert_job_report(self.db()?, report).await
    }

    async fn get_job_report(&self, id: JobReportId) -> Result<Option<JobReport>, ViewinError> {
        queries::job_reports::get_job_report(self.db()?, id).await
    }

    async fn link_session(
        &self,
        id: JobReportId,
        session_id: &str,
        overwrite: bool,
    ) -> Result<Option<FieldUpdate>, ViewinError> {
        queries::job_reports::link_session(self.db()?, id, session_id, overwrite).await
    }

    async fn set_report_reference(
        &self,
        id: JobReportId,
        reference: &str,
    ) -> Result<Option<FieldUpdate>, ViewinError> {
        queries::job_reports::set_report_reference(self.db()?, id, reference).await
    }

    async fn insert_artifacts(
        &self,
        id: JobReportId,
        artifacts: &[NewArtifact],
    ) -> Result<ArtifactInsert, ViewinError> {
        queries::artifacts::insert_artifacts(self.db()?, id, artifacts).await
    }

    async fn list_artifacts(&self, id: JobReportId) -> Result<Vec<ArtifactRecord>, ViewinError> {
        queries::artifacts::list_artifacts(self.db()?, id).await
    }

    async fn count_artifacts(&self, id: JobReportId) -> Result<u64, ViewinError> {
        queries::artifacts::count_artifacts(self.db()?, id).await
    }
}
