// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AWS Signature Version 4 query-string signing for S3.
//!
//! Produces URLs of the form
//! `https://host/key?X-Amz-Algorithm=...&X-Amz-Signature=<hex>`.
//! The payload is never hashed (`UNSIGNED-PAYLOAD`).

use std::time::Duration;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha2::{Digest, Sha256};
use viewin_core::ViewinError;

use crate::credentials::Credentials;

type HmacSha256 = Hmac<Sha256>;

/// Longest expiry S3 accepts for a presigned URL (seven days).
pub const MAX_EXPIRES_SECS: u64 = 604_800;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";
const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Everything except the RFC 3986 unreserved characters.
const URI_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// HTTP verb a URL is signed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
}

impl HttpMethod {
    fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
        }
    }
}

/// Where requests for a bucket are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addressing {
    /// `https://{bucket}.s3[.{region}].amazonaws.com/{key}`.
    VirtualHosted,
    /// `{scheme}://{host}/{bucket}/{key}` for custom endpoints.
    PathStyle { scheme: String, host: String },
}

impl Addressing {
    /// Path-style addressing against `endpoint` (`http://host:port`).
    pub fn from_endpoint(endpoint: &str) -> Result<Self, ViewinError> {
        let (scheme, rest) = endpoint.split_once("://").ok_or_else(|| {
            ViewinError::Config(format!("object store endpoint `{endpoint}` has no scheme"))
        })?;
        let host = rest.trim_end_matches('/');
        if host.is_empty() || host.contains('/') {
            return Err(ViewinError::Config(format!(
                "object store endpoint `{endpoint}` must be scheme://host[:port]"
            )));
        }
        Ok(Self::PathStyle {
            scheme: scheme.to_string(),
            host: host.to_string(),
        })
    }
}

/// One request to be presigned.
#[derive(Debug, Clone)]
pub struct PresignRequest<'a> {
    pub method: HttpMethod,
    pub bucket: &'a str,
    pub key: &'a str,
    pub expires: Duration,
    /// Signed as a header; the uploader must send the same value.
    pub content_type: Option<&'a str>,
}

/// Signs [`PresignRequest`]s for one region and credential set.
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Credentials,
    region: String,
    addressing: Addressing,
}

impl Signer {
    pub fn new(
        credentials: Credentials,
        region: impl Into<String>,
        addressing: Addressing,
    ) -> Self {
        Self {
            credentials,
            region: region.into(),
            addressing,
        }
    }

    /// Presigns `request` as if signed at `now`.
    pub fn presign(
        &self,
        request: &PresignRequest<'_>,
        now: DateTime<Utc>,
    ) -> Result<String, ViewinError> {
        let expires = request.expires.as_secs();
        if expires == 0 || expires > MAX_EXPIRES_SECS {
            return Err(ViewinError::Validation(format!(
                "presigned URL expiry must be between 1 and {MAX_EXPIRES_SECS} seconds, got {expires}"
            )));
        }
        if request.bucket.is_empty() || request.key.is_empty() {
            return Err(ViewinError::Validation(
                "bucket and key must not be empty".into(),
            ));
        }

        let (scheme, host, canonical_uri) = self.locate(request.bucket, request.key);
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();
        let scope = format!("{date}/{}/{SERVICE}/aws4_request", self.region);

        let mut headers = vec![("host", host.clone())];
        if let Some(content_type) = request.content_type {
            headers.push(("content-type", content_type.trim().to_string()));
        }
        headers.sort_by(|a, b| a.0.cmp(b.0));
        let signed_headers = headers
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(";");
        let canonical_headers: String = headers
            .iter()
            .map(|(name, value)| format!("{name}:{value}\n"))
            .collect();

        let mut query = vec![
            ("X-Amz-Algorithm".to_string(), ALGORITHM.to_string()),
            (
                "X-Amz-Credential".to_string(),
                format!("{}/{scope}", self.credentials.access_key_id),
            ),
            ("X-Amz-Date".to_string(), amz_date.clone()),
            ("X-Amz-Expires".to_string(), expires.to_string()),
            ("X-Amz-SignedHeaders".to_string(), signed_headers.clone()),
        ];
        if let Some(token) = &self.credentials.session_token {
            query.push(("X-Amz-Security-Token".to_string(), token.clone()));
        }
        let canonical_query = canonical_query_string(&query);

        let canonical_request = format!(
            "{}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n{signed_headers}\n{UNSIGNED_PAYLOAD}",
            request.method.as_str()
        );
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signing_key = self.signing_key(&date)?;
        let signature = hex::encode(hmac(&signing_key, string_to_sign.as_bytes())?);

        Ok(format!(
            "{scheme}://{host}{canonical_uri}?{canonical_query}&X-Amz-Signature={signature}"
        ))
    }

    fn locate(&self, bucket: &str, key: &str) -> (String, String, String) {
        let encoded_key = encode_path(key);
        match &self.addressing {
            Addressing::VirtualHosted => {
                let host = if self.region == "us-east-1" {
                    format!("{bucket}.s3.amazonaws.com")
                } else {
                    format!("{bucket}.s3.{}.amazonaws.com", self.region)
                };
                ("https".to_string(), host, format!("/{encoded_key}"))
            }
            Addressing::PathStyle { scheme, host } => (
                scheme.clone(),
                host.clone(),
                format!("/{}/{encoded_key}", encode(bucket)),
            ),
        }
    }

    fn signing_key(&self, date: &str) -> Result<Vec<u8>, ViewinError> {
        let secret = format!("AWS4{}", self.credentials.secret_access_key);
        let k_date = hmac(secret.as_bytes(), date.as_bytes())?;
        let k_region = hmac(&k_date, self.region.as_bytes())?;
        let k_service = hmac(&k_region, SERVICE.as_bytes())?;
        hmac(&k_service, b"aws4_request")
    }
}

fn hmac(key: &[u8], data: &[u8]) -> Result<Vec<u8>, ViewinError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| ViewinError::Internal(format!("hmac key rejected: {e}")))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, URI_ENCODE).to_string()
}

/// Encodes each key segment, keeping the `/` separators.
fn encode_path(key: &str) -> String {
    key.split('/').map(encode).collect::<Vec<_>>().join("/")
}

fn canonical_query_string(params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}
