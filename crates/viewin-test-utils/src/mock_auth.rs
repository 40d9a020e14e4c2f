// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock auth adapter accepting a fixed set of tokens.

use std::collections::HashMap;

use async_trait::async_trait;

use viewin_core::{
    AdapterType, AuthAdapter, AuthIdentity, AuthToken, HealthStatus, PluginAdapter, UserId,
    ViewinError,
};

/// Maps literal bearer tokens to user ids.
#[derive(Debug, Default, Clone)]
pub struct StaticTokenAuth {
    tokens: HashMap<String, UserId>,
}

impl StaticTokenAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, user_id: UserId) -> Self {
        self.tokens.insert(token.into(), user_id);
        self
    }
}

#[async_trait]
impl PluginAdapter for StaticTokenAuth {
    fn name(&self) -> &str {
        "static-token"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Auth
    }

    async fn health_check(&self) -> Result<HealthStatus, ViewinError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ViewinError> {
        Ok(())
    }
}

#[async_trait]
impl AuthAdapter for StaticTokenAuth {
    async fn authenticate(&self, token: AuthToken) -> Result<AuthIdentity, ViewinError> {
        self.tokens
            .get(&token.0)
            .map(|&user_id| AuthIdentity { user_id })
            .ok_or_else(|| ViewinError::Auth("unknown token".into()))
    }
}
