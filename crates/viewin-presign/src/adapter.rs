// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`PresignerAdapter`] backed by local SigV4 signing.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use viewin_config::model::ObjectStoreConfig;
use viewin_core::{AdapterType, HealthStatus, PluginAdapter, PresignerAdapter, ViewinError};

use crate::credentials::Credentials;
use crate::sigv4::{Addressing, HttpMethod, PresignRequest, Signer};

/// Presigner for AWS S3 and S3-compatible stores.
pub struct S3Presigner {
    signer: Signer,
}

impl S3Presigner {
    /// Builds a presigner from config, resolving credentials.
    pub fn new(config: &ObjectStoreConfig) -> Result<Self, ViewinError> {
        let addressing = match config.endpoint.as_deref() {
            Some(endpoint) => Addressing::from_endpoint(endpoint)?,
            None => Addressing::VirtualHosted,
        };
        Ok(Self::with_signer(Signer::new(
            Credentials::resolve(config)?,
            config.region.clone(),
            addressing,
        )))
    }

    pub fn with_signer(signer: Signer) -> Self {
        Self { signer }
    }

    fn presign(
        &self,
        method: HttpMethod,
        bucket: &str,
        key: &str,
        ttl: Duration,
        content_type: Option<&str>,
    ) -> Result<String, ViewinError> {
        let url = self.signer.presign(
            &PresignRequest {
                method,
                bucket,
                key,
                expires: ttl,
                content_type,
            },
            Utc::now(),
        )?;
        debug!(?method, bucket, key, ttl_secs = ttl.as_secs(), "presigned URL issued");
        Ok(url)
    }
}

#[async_trait]
impl PluginAdapter for S3Presigner {
    fn name(&self) -> &str {
        "s3-sigv4"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Presigner
    }

    async fn health_check(&self) -> Result<HealthStatus, ViewinError> {
        // Signing is local; a failure here means the credentials are unusable.
        match self.presign(HttpMethod::Get, "health", "check", Duration::from_secs(1), None) {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), ViewinError> {
        Ok(())
    }
}

#[async_trait]
impl PresignerAdapter for S3Presigner {
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        ttl: Duration,
    ) -> Result<String, ViewinError> {
        self.presign(HttpMethod::Get, bucket, key, ttl, None)
    }

    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        ttl: Duration,
        content_type: Option<&str>,
    ) -> Result<String, ViewinError> {
        self.presign(HttpMethod::Put, bucket, key, ttl, content_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ObjectStoreConfig {
        ObjectStoreConfig {
            bucket: "answers".into(),
            region: "us-east-1".into(),
            endpoint: Some("http://localhost:9000".into()),
            access_key_id: Some("minio".into()),
            secret_access_key: Some("minio-secret".into()),
            session_token: None,
        }
    }

    #[tokio::test]
    async fn presign_put_targets_configured_endpoint() {
        let presigner = S3Presigner::new(&config()).unwrap();
        let url = presigner
            .presign_put(
                "answers",
                "responses-audios/job-1/answer_1.mp3",
                Duration::from_secs(900),
                Some("audio/mpeg"),
            )
            .await
            .unwrap();
        assert!(
            url.starts_with("http://localhost:9000/answers/responses-audios/job-1/answer_1.mp3?")
        );
        assert!(url.contains("X-Amz-Signature="));
    }

    #[tokio::test]
    async fn presign_get_rejects_excessive_ttl() {
        let presigner = S3Presigner::new(&config()).unwrap();
        let result = presigner
            .presign_get("answers", "a.mp3", Duration::from_secs(8 * 24 * 3600))
            .await;
        assert!(matches!(result, Err(ViewinError::Validation(_))));
    }

    #[tokio::test]
    async fn reports_healthy_with_credentials() {
        let presigner = S3Presigner::new(&config()).unwrap();
        assert_eq!(presigner.health_check().await.unwrap(), HealthStatus::Healthy);
        assert_eq!(presigner.adapter_type(), AdapterType::Presigner);
    }
}
