// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signing credentials.

use std::fmt;

use viewin_config::model::ObjectStoreConfig;
use viewin_core::ViewinError;

/// Access key pair plus optional session token.
#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Resolves credentials from config, then from the standard AWS variables.
    pub fn resolve(config: &ObjectStoreConfig) -> Result<Self, ViewinError> {
        Self::resolve_with(config, |name| std::env::var(name).ok())
    }

    fn resolve_with(
        config: &ObjectStoreConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ViewinError> {
        let pick = |configured: &Option<String>, var: &str| {
            configured
                .clone()
                .or_else(|| env(var))
                .filter(|v| !v.trim().is_empty())
        };

        let access_key_id = pick(&config.access_key_id, "AWS_ACCESS_KEY_ID").ok_or_else(|| {
            ViewinError::Config(
                "object_store.access_key_id is not set and AWS_ACCESS_KEY_ID is empty".into(),
            )
        })?;
        let secret_access_key = pick(&config.secret_access_key, "AWS_SECRET_ACCESS_KEY")
            .ok_or_else(|| {
                ViewinError::Config(
                    "object_store.secret_access_key is not set and AWS_SECRET_ACCESS_KEY is empty"
                        .into(),
                )
            })?;

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token: pick(&config.session_token, "AWS_SESSION_TOKEN"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_takes_precedence_over_env() {
        let config = ObjectStoreConfig {
            access_key_id: Some("from-config".into()),
            secret_access_key: Some("secret".into()),
            ..ObjectStoreConfig::default()
        };
        let creds = Credentials::resolve_with(&config, |_| Some("from-env".into())).unwrap();
        assert_eq!(creds.access_key_id, "from-config");
        assert_eq!(creds.session_token.as_deref(), Some("from-env"));
    }

    #[test]
    fn falls_back_to_env() {
        let config = ObjectStoreConfig::default();
        let creds = Credentials::resolve_with(&config, |name| match name {
            "AWS_ACCESS_KEY_ID" => Some("AKID".into()),
            "AWS_SECRET_ACCESS_KEY" => Some("SECRET".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(creds.access_key_id, "AKID");
        assert!(creds.session_token.is_none());
    }

    #[test]
    fn missing_credentials_is_config_error() {
        let config = ObjectStoreConfig::default();
        let err = Credentials::resolve_with(&config, |_| None).unwrap_err();
        assert!(matches!(err, ViewinError::Config(_)));
    }

    #[test]
    fn debug_redacts_secret() {
        let creds = Credentials::new("AKID", "very-secret");
        assert!(!format!("{creds:?}").contains("very-secret"));
    }
}
