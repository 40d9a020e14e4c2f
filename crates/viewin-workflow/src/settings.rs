// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runtime settings for URL issuance.

use std::time::Duration;

use viewin_config::ViewinConfig;

/// Bucket, lifetimes, and limits applied by the issuance coordinator.
#[derive(Debug, Clone)]
pub struct IssuanceSettings {
    pub bucket: String,
    pub upload_ttl: Duration,
    pub read_ttl: Duration,
    pub presign_timeout: Duration,
    pub upload_key_prefix: String,
    pub max_batch_size: usize,
}

impl IssuanceSettings {
    pub fn from_config(config: &ViewinConfig) -> Self {
        let workflow = &config.workflow;
        Self {
            bucket: config.object_store.bucket.clone(),
            upload_ttl: Duration::from_secs(workflow.upload_url_ttl_secs),
            read_ttl: Duration::from_secs(workflow.read_url_ttl_secs),
            presign_timeout: Duration::from_millis(workflow.presign_timeout_ms),
            upload_key_prefix: workflow.upload_key_prefix.trim_matches('/').to_string(),
            max_batch_size: workflow.max_batch_size,
        }
    }
}

impl Default for IssuanceSettings {
    fn default() -> Self {
        Self::from_config(&ViewinConfig::default())
    }
}
