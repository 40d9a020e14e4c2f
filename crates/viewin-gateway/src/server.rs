// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use viewin_core::{AuthAdapter, ViewinError};
use viewin_workflow::ReportWorkflow;

use crate::auth::{CallbackAuth, callback_auth_middleware, user_auth_middleware};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub workflow: Arc<ReportWorkflow>,
    /// Validates user bearer tokens.
    pub auth: Arc<dyn AuthAdapter>,
    /// Shared token expected on pipeline callbacks.
    pub callback: CallbackAuth,
}

/// Gateway server configuration (mirrors GatewayConfig from viewin-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Builds the application router.
///
/// - GET /health (public)
/// - /api/job-reports/** (user bearer)
/// - /api/job-reports/callbacks/** (callback bearer)
pub fn router(state: GatewayState) -> Router {
    let public_routes = Router::new().route("/health", get(handlers::get_health));

    let user_routes = Router::new()
        .route("/api/job-reports", post(handlers::create_job_report))
        .route(
            "/api/job-reports/upload-url",
            post(handlers::generate_upload_url),
        )
        .route(
            "/api/job-reports/{id}/upload-urls",
            post(handlers::generate_upload_urls),
        )
        .route("/api/job-reports/{id}/status", get(handlers::get_status))
        .route(
            "/api/job-reports/{id}/audios/presigned-urls",
            get(handlers::get_audio_urls),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            user_auth_middleware,
        ))
        .with_state(state.clone());

    let callback_routes = Router::new()
        .route(
            "/api/job-reports/callbacks/audios-ready",
            post(handlers::audios_ready),
        )
        .route(
            "/api/job-reports/callbacks/report-ready",
            post(handlers::report_ready),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.callback.clone(),
            callback_auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(callback_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds to the configured address and serves until `shutdown` resolves.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ViewinError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ViewinError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ViewinError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_debug() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("127.0.0.1"));
        assert!(debug.contains("8080"));
    }
}
