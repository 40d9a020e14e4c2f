// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `viewin migrate` command implementation.

use tracing::info;
use viewin_config::ViewinConfig;
use viewin_core::ViewinError;
use viewin_storage::{Database, OpenOptions};

use crate::serve::init_tracing;

/// Applies pending migrations and verifies the resulting schema.
pub async fn run_migrate(config: &ViewinConfig) -> Result<(), ViewinError> {
    init_tracing(&config.service.log_level);
    migrate_database(&config.storage.database_path, config.storage.wal_mode).await?;
    println!(
        "viewin: database at {} is up to date",
        config.storage.database_path
    );
    Ok(())
}

pub(crate) async fn migrate_database(path: &str, wal_mode: bool) -> Result<(), ViewinError> {
    Database::open(
        path,
        OpenOptions {
            wal_mode,
            run_migrations: true,
        },
    )
    .await?;
    info!(path, "database schema verified");
    Ok(())
}
