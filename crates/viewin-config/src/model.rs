// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Viewin job-report service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level Viewin configuration.
///
/// All sections are optional and default to values suitable for local development.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ViewinConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// SQLite repository settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP listener and callback credential.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Bearer-token validation for end users.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Object store addressed by presigned URLs.
    #[serde(default)]
    pub object_store: ObjectStoreConfig,

    /// URL issuance and workflow limits.
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Name reported by the health endpoint.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "viewin".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_true")]
    pub wal_mode: bool,

    /// Apply pending migrations when the database is opened.
    ///
    /// When disabled, startup verifies the schema and refuses to run
    /// against a database that lacks required columns.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: true,
            run_migrations: true,
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("viewin").join("viewin.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("viewin.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_true() -> bool {
    true
}

/// HTTP gateway configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Address to bind the HTTP listener to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the HTTP listener.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token the processing pipeline presents on callbacks.
    /// `None` rejects every callback.
    #[serde(default)]
    pub callback_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            callback_token: None,
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("callback_token", &redacted(&self.callback_token))
            .finish()
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// End-user token validation configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// HS256 secret shared with the token issuer.
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Clock skew tolerated when checking `exp`, in seconds.
    #[serde(default = "default_leeway_secs")]
    pub leeway_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            leeway_secs: default_leeway_secs(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &redacted(&self.jwt_secret))
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

fn default_leeway_secs() -> u64 {
    30
}

/// Object store configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectStoreConfig {
    /// Bucket receiving uploaded answers.
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Signing region.
    #[serde(default = "default_region")]
    pub region: String,

    /// Custom endpoint for S3-compatible stores. Enables path-style URLs.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Access key id. Falls back to `AWS_ACCESS_KEY_ID`.
    #[serde(default)]
    pub access_key_id: Option<String>,

    /// Secret access key. Falls back to `AWS_SECRET_ACCESS_KEY`.
    #[serde(default)]
    pub secret_access_key: Option<String>,

    /// Session token for temporary credentials. Falls back to `AWS_SESSION_TOKEN`.
    #[serde(default)]
    pub session_token: Option<String>,
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            region: default_region(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            session_token: None,
        }
    }
}

impl fmt::Debug for ObjectStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStoreConfig")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &redacted(&self.secret_access_key))
            .field("session_token", &redacted(&self.session_token))
            .finish()
    }
}

fn default_bucket() -> String {
    "viewin-answers".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

/// URL issuance and workflow configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowConfig {
    /// Lifetime of presigned upload URLs, in seconds.
    #[serde(default = "default_upload_url_ttl_secs")]
    pub upload_url_ttl_secs: u64,

    /// Lifetime of presigned read URLs, in seconds.
    #[serde(default = "default_read_url_ttl_secs")]
    pub read_url_ttl_secs: u64,

    /// Upper bound on a single presign call, in milliseconds.
    #[serde(default = "default_presign_timeout_ms")]
    pub presign_timeout_ms: u64,

    /// Key prefix for uploaded answers.
    #[serde(default = "default_upload_key_prefix")]
    pub upload_key_prefix: String,

    /// Largest upload batch a single request may allocate.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            upload_url_ttl_secs: default_upload_url_ttl_secs(),
            read_url_ttl_secs: default_read_url_ttl_secs(),
            presign_timeout_ms: default_presign_timeout_ms(),
            upload_key_prefix: default_upload_key_prefix(),
            max_batch_size: default_max_batch_size(),
        }
    }
}

fn default_upload_url_ttl_secs() -> u64 {
    900
}

fn default_read_url_ttl_secs() -> u64 {
    3600
}

fn default_presign_timeout_ms() -> u64 {
    5000
}

fn default_upload_key_prefix() -> String {
    "responses-audios".to_string()
}

fn default_max_batch_size() -> usize {
    50
}

fn redacted(value: &Option<String>) -> &'static str {
    match value {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ViewinConfig::default();
        assert_eq!(config.workflow.upload_url_ttl_secs, 900);
        assert_eq!(config.workflow.read_url_ttl_secs, 3600);
        assert_eq!(config.workflow.presign_timeout_ms, 5000);
        assert_eq!(config.workflow.upload_key_prefix, "responses-audios");
        assert_eq!(config.gateway.port, 8080);
        assert!(config.storage.run_migrations);
    }

    #[test]
    fn secrets_are_redacted_in_debug() {
        let mut config = ViewinConfig::default();
        config.auth.jwt_secret = Some("jwt-secret-value".into());
        config.gateway.callback_token = Some("callback-secret".into());
        config.object_store.secret_access_key = Some("aws-secret".into());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("jwt-secret-value"));
        assert!(!rendered.contains("callback-secret"));
        assert!(!rendered.contains("aws-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn unknown_section_key_rejected() {
        let result = toml::from_str::<ViewinConfig>("[workflow]\nupload_ttl = 10\n");
        assert!(result.is_err());
    }
}
