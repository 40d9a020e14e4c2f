// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock presigner adapter for deterministic testing.
//!
//! `MockPresigner` implements `PresignerAdapter` without signing anything.
//! URLs encode the method, bucket, key, and TTL so tests can assert on them.
//! Failures and slow responses can be injected per call or per key.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use viewin_core::{AdapterType, HealthStatus, PluginAdapter, PresignerAdapter, ViewinError};

/// A presign request observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignCall {
    pub method: &'static str,
    pub bucket: String,
    pub key: String,
    pub ttl: Duration,
    pub content_type: Option<String>,
}

/// A presigner that fabricates URLs and records every request.
#[derive(Default)]
pub struct MockPresigner {
    calls: Arc<Mutex<Vec<PresignCall>>>,
    counter: AtomicUsize,
    fail_on_call: Option<usize>,
    fail_on_key: Option<String>,
    delay: Option<Duration>,
}

impl MockPresigner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`th request (1-based).
    pub fn fail_on_call(mut self, n: usize) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    /// Fail every request whose key contains `fragment`.
    pub fn fail_on_key(mut self, fragment: impl Into<String>) -> Self {
        self.fail_on_key = Some(fragment.into());
        self
    }

    /// Sleep before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All requests received so far, in arrival order.
    pub async fn calls(&self) -> Vec<PresignCall> {
        self.calls.lock().await.clone()
    }

    async fn handle(
        &self,
        method: &'static str,
        bucket: &str,
        key: &str,
        ttl: Duration,
        content_type: Option<&str>,
    ) -> Result<String, ViewinError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.calls.lock().await.push(PresignCall {
            method,
            bucket: bucket.to_string(),
            key: key.to_string(),
            ttl,
            content_type: content_type.map(str::to_string),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let key_fails = self
            .fail_on_key
            .as_deref()
            .is_some_and(|fragment| key.contains(fragment));
        if self.fail_on_call == Some(n) || key_fails {
            return Err(ViewinError::ExternalService {
                message: format!("mock presign failure for {bucket}/{key}"),
                source: None,
            });
        }

        Ok(format!(
            "https://mock-store.test/{bucket}/{key}?method={method}&ttl={}",
            ttl.as_secs()
        ))
    }
}

#[async_trait]
impl PluginAdapter for MockPresigner {
    fn name(&self) -> &str {
        "mock-presigner"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Presigner
    }

    async fn health_check(&self) -> Result<HealthStatus, ViewinError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ViewinError> {
        Ok(())
    }
}

#[async_trait]
impl PresignerAdapter for MockPresigner {
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        ttl: Duration,
    ) -> Result<String, ViewinError> {
        self.handle("GET", bucket, key, ttl, None).await
    }

    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        ttl: Duration,
        content_type: Option<&str>,
    ) -> Result<String, ViewinError> {
        self.handle("PUT", bucket, key, ttl, content_type).await
    }
}
