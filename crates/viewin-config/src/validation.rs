// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde attributes cannot express: non-empty paths and
//! names, TTL bounds, and a usable bind address.

use crate::diagnostic::ConfigError;
use crate::model::ViewinConfig;

/// Longest lifetime an object store accepts for a presigned URL.
pub const MAX_PRESIGN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &ViewinConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "service.log_level `{}` must be one of {}",
            config.service.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::validation("gateway.host must not be empty"));
    } else {
        let is_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_ip && !is_hostname {
            errors.push(ConfigError::validation(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            )));
        }
    }

    if matches!(&config.gateway.callback_token, Some(token) if token.trim().is_empty()) {
        errors.push(ConfigError::validation(
            "gateway.callback_token must not be blank when set",
        ));
    }

    if matches!(&config.auth.jwt_secret, Some(secret) if secret.len() < 16) {
        errors.push(ConfigError::validation(
            "auth.jwt_secret must be at least 16 bytes",
        ));
    }

    if config.object_store.bucket.trim().is_empty() {
        errors.push(ConfigError::validation(
            "object_store.bucket must not be empty",
        ));
    }

    if config.object_store.region.trim().is_empty() {
        errors.push(ConfigError::validation(
            "object_store.region must not be empty",
        ));
    }

    let workflow = &config.workflow;
    for (name, ttl) in [
        ("upload_url_ttl_secs", workflow.upload_url_ttl_secs),
        ("read_url_ttl_secs", workflow.read_url_ttl_secs),
    ] {
        if ttl == 0 || ttl > MAX_PRESIGN_TTL_SECS {
            errors.push(ConfigError::validation(format!(
                "workflow.{name} must be between 1 and {MAX_PRESIGN_TTL_SECS}, got {ttl}"
            )));
        }
    }

    if workflow.presign_timeout_ms == 0 {
        errors.push(ConfigError::validation(
            "workflow.presign_timeout_ms must be greater than 0",
        ));
    }

    if workflow.max_batch_size == 0 {
        errors.push(ConfigError::validation(
            "workflow.max_batch_size must be at least 1",
        ));
    }

    let prefix = workflow.upload_key_prefix.trim_matches('/');
    if prefix.is_empty() {
        errors.push(ConfigError::validation(
            "workflow.upload_key_prefix must not be empty",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
