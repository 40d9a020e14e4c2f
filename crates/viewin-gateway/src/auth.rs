// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication middleware for the gateway.
//!
//! Two bearer schemes guard the API:
//! 1. User tokens, validated by the configured [`AuthAdapter`]. The resolved
//!    [`AuthIdentity`] is attached to the request for handlers.
//! 2. A shared callback token for the processing pipeline.
//!
//! When no callback token is configured, callback requests are rejected
//! (fail-closed).

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use viewin_core::{AuthAdapter, AuthToken, ViewinError};

use crate::error::ApiError;

/// Expected token for pipeline callbacks.
#[derive(Clone, Default)]
pub struct CallbackAuth {
    pub token: Option<String>,
}

impl std::fmt::Debug for CallbackAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackAuth")
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Compares tokens in constant time.
///
/// Both sides are reduced to fixed-length HMAC tags, so neither the content
/// nor the length of the expected token leaks through timing.
fn tokens_match(presented: &str, expected: &str) -> bool {
    const LABEL: &[u8] = b"viewin-callback-token";
    let tag = |key: &str| {
        Hmac::<Sha256>::new_from_slice(key.as_bytes()).map(|mut mac| {
            mac.update(LABEL);
            mac
        })
    };
    match (tag(presented), tag(expected)) {
        (Ok(presented), Ok(expected)) => presented
            .verify_slice(&expected.finalize().into_bytes())
            .is_ok(),
        _ => false,
    }
}

/// Validates the user bearer token and stores the identity in request extensions.
pub async fn user_auth_middleware(
    State(auth): State<Arc<dyn AuthAdapter>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| ViewinError::Auth("authorization token is required".into()))?
        .to_string();
    let identity = auth.authenticate(AuthToken(token)).await?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Validates the shared callback token.
pub async fn callback_auth_middleware(
    State(auth): State<CallbackAuth>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = auth.token.as_deref() else {
        tracing::error!("no callback token configured -- rejecting callback");
        return Err(ViewinError::Auth("callbacks are disabled".into()).into());
    };
    match bearer_token(request.headers()) {
        Some(token) if tokens_match(token, expected) => Ok(next.run(request).await),
        _ => Err(ViewinError::Auth("invalid callback token".into()).into()),
    }
}
