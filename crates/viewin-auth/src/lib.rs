// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token authentication adapter.
//!
//! Implements `AuthAdapter` by verifying HS256-signed JSON Web Tokens issued
//! by the account service and extracting the user id they carry.

pub mod token;

pub use token::{Claims, issue, verify};

use async_trait::async_trait;
use tracing::debug;

use viewin_config::model::AuthConfig;
use viewin_core::{
    AdapterType, AuthAdapter, AuthIdentity, AuthToken, HealthStatus, PluginAdapter, UserId,
    ViewinError,
};

/// HS256 token validation adapter.
pub struct JwtAuthAdapter {
    secret: Vec<u8>,
    leeway_secs: i64,
}

impl JwtAuthAdapter {
    /// Create an adapter for the given shared secret.
    pub fn new(secret: impl Into<Vec<u8>>, leeway_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            leeway_secs: i64::try_from(leeway_secs).unwrap_or(i64::MAX),
        }
    }

    /// Build from config. Fails when no secret is configured.
    pub fn from_config(config: &AuthConfig) -> Result<Self, ViewinError> {
        let secret = config
            .jwt_secret
            .as_deref()
            .ok_or_else(|| ViewinError::Config("auth.jwt_secret is not set".into()))?;
        Ok(Self::new(secret.as_bytes(), config.leeway_secs))
    }

    /// Issue a token for `user_id`, valid for `ttl_secs`.
    pub fn issue(&self, user_id: UserId, ttl_secs: i64) -> Result<String, ViewinError> {
        token::issue(&self.secret, user_id, chrono::Utc::now().timestamp(), ttl_secs)
    }
}

#[async_trait]
impl PluginAdapter for JwtAuthAdapter {
    fn name(&self) -> &str {
        "jwt-hs256"
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
impl AuthAdapter for JwtAuthAdapter {
    async fn authenticate(&self, token: AuthToken) -> Result<AuthIdentity, ViewinError> {
        let claims = token::verify(
            &self.secret,
            &token.0,
            chrono::Utc::now().timestamp(),
            self.leeway_secs,
        )?;
        let user_id = claims.subject()?;
        debug!(%user_id, "bearer token accepted");
        Ok(AuthIdentity { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> JwtAuthAdapter {
        JwtAuthAdapter::new("integration-secret-xyz".as_bytes(), 0)
    }

    #[tokio::test]
    async fn authenticate_extracts_user_id() {
        let adapter = adapter();
        let token = adapter.issue(UserId(7), 600).unwrap();
        let identity = adapter.authenticate(AuthToken(token)).await.unwrap();
        assert_eq!(identity.user_id, UserId(7));
    }

    #[tokio::test]
    async fn authenticate_rejects_garbage() {
        let result = adapter().authenticate(AuthToken("not-a-token".into())).await;
        assert!(matches!(result, Err(ViewinError::Auth(_))));
    }

    #[tokio::test]
    async fn authenticate_rejects_expired() {
        let adapter = adapter();
        let token = adapter.issue(UserId(7), -10).unwrap();
        let result = adapter.authenticate(AuthToken(token)).await;
        assert!(matches!(result, Err(ViewinError::Auth(_))));
    }

    #[test]
    fn from_config_requires_secret() {
        let config = AuthConfig::default();
        assert!(matches!(
            JwtAuthAdapter::from_config(&config),
            Err(ViewinError::Config(_))
        ));
    }

    #[test]
    fn adapter_identity() {
        let adapter = adapter();
        assert_eq!(adapter.name(), "jwt-hs256");
        assert_eq!(adapter.adapter_type(), AdapterType::Auth);
    }
}
