// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Presigned URL issuance for S3-compatible object stores.
//!
//! URLs are signed locally with AWS Signature Version 4 query-string
//! authentication. No request reaches the object store until a client
//! uses the URL.

pub mod adapter;
pub mod credentials;
pub mod sigv4;

pub use adapter::S3Presigner;
pub use credentials::Credentials;
pub use sigv4::{Addressing, HttpMethod, MAX_EXPIRES_SECS, PresignRequest, Signer};
