// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, migrations, and schema checks.
//!
//! All statements run on tokio-rusqlite's single background thread, which
//! serializes writes. Do NOT open additional connections for writes.

use tracing::debug;
use viewin_core::ViewinError;

/// Columns the workflow reads, per table.
const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "job_reports",
        &[
            "id",
            "owner_id",
            "company",
            "title",
            "description",
            "session_id",
            "report_reference",
            "created_at",
        ],
    ),
    (
        "artifacts",
        &["id", "job_report_id", "storage_path", "display_name", "created_at"],
    ),
];

/// Converts a tokio-rusqlite failure into [`ViewinError::Storage`].
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> ViewinError {
    ViewinError::Storage {
        source: Box::new(e),
    }
}

/// Options applied when opening the database.
#[derive(Debug, Clone, Copy)]
pub struct OpenOptions {
    pub wal_mode: bool,
    pub run_migrations: bool,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            wal_mode: true,
            run_migrations: true,
        }
    }
}

/// Handle to the single SQLite connection.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path`.
    ///
    /// Applies PRAGMAs, runs pending migrations when enabled, then verifies
    /// the schema so a stale database fails here instead of on first read.
    pub async fn open(path: &str, options: OpenOptions) -> Result<Self, ViewinError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ViewinError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| ViewinError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(options).await?;
        debug!(path, "database opened");
        Ok(db)
    }

    /// Opens an in-memory database with all migrations applied.
    pub async fn open_in_memory() -> Result<Self, ViewinError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| ViewinError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare(OpenOptions {
            wal_mode: false,
            run_migrations: true,
        })
        .await?;
        Ok(db)
    }

    async fn prepare(&self, options: OpenOptions) -> Result<(), ViewinError> {
        let wal_mode = options.wal_mode;
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                if wal_mode {
                    conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
                }
                conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        if options.run_migrations {
            self.conn
                .call(|conn| -> Result<(), refinery::Error> {
                    crate::migrations::run_migrations(conn)
                })
                .await
                .map_err(|e| ViewinError::Storage {
                    source: format!("migration failed: {e}").into(),
                })?;
        }

        self.verify_schema().await
    }

    /// Fails when a table or column the workflow depends on is missing.
    pub async fn verify_schema(&self) -> Result<(), ViewinError> {
        let missing = self
            .conn
            .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
                let mut missing = Vec::new();
                for (table, columns) in REQUIRED_COLUMNS {
                    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
                    let present = stmt
                        .query_map([], |row| row.get::<_, String>(1))?
                        .collect::<Result<Vec<_>, _>>()?;
                    for column in *columns {
                        if !present.iter().any(|p| p == column) {
                            missing.push(format!("{table}.{column}"));
                        }
                    }
                }
                Ok(missing)
            })
            .await
            .map_err(map_tr_err)?;

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ViewinError::Storage {
                source: format!(
                    "database schema is missing {}; run `viewin migrate`",
                    missing.join(", ")
                )
                .into(),
            })
        }
    }

    /// Returns the underlying connection for query modules.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }
}
