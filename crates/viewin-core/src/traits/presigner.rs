// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object-store presigner trait for time-limited artifact URLs.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ViewinError;
use crate::traits::adapter::PluginAdapter;

/// Adapter issuing presigned URLs against an external object store.
///
/// Implementations may perform network I/O; callers bound every call
/// with a timeout.
#[async_trait]
pub trait PresignerAdapter: PluginAdapter {
    /// Returns a URL granting read access to `bucket/key` for `ttl`.
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        ttl: Duration,
    ) -> Result<String, ViewinError>;

    /// Returns a URL granting a single upload to `bucket/key` for `ttl`.
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        ttl: Duration,
        content_type: Option<&str>,
    ) -> Result<String, ViewinError>;
}
