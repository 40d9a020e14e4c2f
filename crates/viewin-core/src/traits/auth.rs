// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication adapter trait for bearer-token verification.

use async_trait::async_trait;

use crate::error::ViewinError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{AuthIdentity, AuthToken};

/// Adapter resolving a bearer token to the user it was issued for.
#[async_trait]
pub trait AuthAdapter: PluginAdapter {
    /// Authenticates the given token and returns the verified identity.
    ///
    /// Fails with [`ViewinError::Auth`] when the token is malformed,
    /// expired, or carries an invalid signature.
    async fn authenticate(&self, token: AuthToken) -> Result<AuthIdentity, ViewinError>;
}
