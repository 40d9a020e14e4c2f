// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `viewin serve` command implementation.
//!
//! Opens SQLite storage, builds the presigner and token validator from config,
//! wires them into the workflow, and serves the HTTP API until a shutdown
//! signal arrives.

use std::sync::Arc;

use tracing::{info, warn};
use viewin_auth::JwtAuthAdapter;
use viewin_config::ViewinConfig;
use viewin_core::{
    AuthAdapter, HealthStatus, PluginAdapter, PresignerAdapter, StorageAdapter, ViewinError,
};
use viewin_gateway::{CallbackAuth, GatewayState, ServerConfig, start_server};
use viewin_presign::S3Presigner;
use viewin_storage::SqliteStorage;
use viewin_workflow::{IssuanceSettings, ReportWorkflow};

use crate::shutdown;

/// Runs the `viewin serve` command.
pub async fn run_serve(config: ViewinConfig) -> Result<(), ViewinError> {
    init_tracing(&config.service.log_level);

    info!(name = %config.service.name, "starting viewin serve");

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage: Arc<dyn StorageAdapter> = Arc::new(storage);
    info!(path = %config.storage.database_path, "storage ready");

    let presigner = S3Presigner::new(&config.object_store)?;
    match presigner.health_check().await? {
        HealthStatus::Healthy => {}
        HealthStatus::Degraded(reason) | HealthStatus::Unhealthy(reason) => {
            warn!(%reason, "presigner reported unhealthy at startup");
        }
    }
    let presigner: Arc<dyn PresignerAdapter> = Arc::new(presigner);

    let auth: Arc<dyn AuthAdapter> = Arc::new(JwtAuthAdapter::from_config(&config.auth)?);

    if config.gateway.callback_token.is_none() {
        warn!("gateway.callback_token is not set -- callback endpoints will reject all requests");
    }

    let settings = IssuanceSettings::from_config(&config);
    info!(
        bucket = %settings.bucket,
        upload_ttl_secs = settings.upload_ttl.as_secs(),
        read_ttl_secs = settings.read_ttl.as_secs(),
        "url issuance configured"
    );
    let workflow = Arc::new(ReportWorkflow::new(storage.clone(), presigner, settings));

    let state = GatewayState {
        workflow,
        auth,
        callback: CallbackAuth {
            token: config.gateway.callback_token.clone(),
        },
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    let cancel = shutdown::install_signal_handler();
    start_server(&server_config, state, cancel.cancelled_owned()).await?;

    storage.close().await?;
    info!("viewin serve shutdown complete");
    Ok(())
}

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` overrides the configured level when set.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("viewin={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
