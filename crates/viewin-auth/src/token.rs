// SPDX-FileCopyrightText: 2026 Viewin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compact HS256 JSON Web Token encoding and verification.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use viewin_core::{UserId, ViewinError};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

/// Claims read from a token payload. Unknown claims are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    /// The user the token was issued for: `userId`, else a numeric `sub`.
    pub fn subject(&self) -> Result<UserId, ViewinError> {
        if let Some(id) = self.user_id {
            return Ok(UserId(id));
        }
        self.sub
            .as_deref()
            .and_then(|sub| sub.trim().parse::<i64>().ok())
            .map(UserId)
            .ok_or_else(|| ViewinError::Auth("token carries no numeric user id".into()))
    }
}

fn keyed_mac(secret: &[u8]) -> Result<HmacSha256, ViewinError> {
    HmacSha256::new_from_slice(secret)
        .map_err(|e| ViewinError::Internal(format!("hmac key rejected: {e}")))
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, ViewinError> {
    let json = serde_json::to_vec(value)
        .map_err(|e| ViewinError::Internal(format!("token encoding failed: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, ViewinError> {
    URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|_| ViewinError::Auth("malformed token encoding".into()))
}

/// Issues a signed token for `user_id`, valid for `ttl_secs` from `now`.
pub fn issue(
    secret: &[u8],
    user_id: UserId,
    now: i64,
    ttl_secs: i64,
) -> Result<String, ViewinError> {
    let header = Header {
        alg: ALGORITHM.into(),
        typ: Some("JWT".into()),
    };
    let claims = Claims {
        sub: Some(user_id.to_string()),
        user_id: Some(user_id.0),
        iat: Some(now),
        exp: Some(now + ttl_secs),
    };
    let signing_input = format!("{}.{}", encode_segment(&header)?, encode_segment(&claims)?);

    let mut mac = keyed_mac(secret)?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    Ok(format!("{signing_input}.{signature}"))
}

/// Verifies signature, algorithm, and expiry, then returns the claims.
///
/// `exp` is honored with `leeway_secs` of tolerated clock skew. Tokens
/// without `exp` never expire.
pub fn verify(
    secret: &[u8],
    token: &str,
    now: i64,
    leeway_secs: i64,
) -> Result<Claims, ViewinError> {
    let token = token.trim();
    let (signing_input, signature) = token
        .rsplit_once('.')
        .ok_or_else(|| ViewinError::Auth("token must have three segments".into()))?;
    let (header, payload) = signing_input
        .split_once('.')
        .filter(|(_, payload)| !payload.contains('.'))
        .ok_or_else(|| ViewinError::Auth("token must have three segments".into()))?;

    let header: Header = serde_json::from_slice(&decode_segment(header)?)
        .map_err(|_| ViewinError::Auth("malformed token header".into()))?;
    if header.alg != ALGORITHM {
        return Err(ViewinError::Auth(format!(
            "unsupported token algorithm `{}`",
            header.alg
        )));
    }

    let mut mac = keyed_mac(secret)?;
    mac.update(signing_input.as_bytes());
    mac.verify_slice(&decode_segment(signature)?)
        .map_err(|_| ViewinError::Auth("invalid token signature".into()))?;

    let claims: Claims = serde_json::from_slice(&decode_segment(payload)?)
        .map_err(|_| ViewinError::Auth("malformed token claims".into()))?;
    if let Some(exp) = claims.exp {
        if now > exp + leeway_secs {
            return Err(ViewinError::Auth("token expired".into()));
        }
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-0123456789";
    const NOW: i64 = 1_767_225_600;

    #[test]
    fn issued_token_verifies() {
        let token = issue(SECRET, UserId(42), NOW, 3600).unwrap();
        let claims = verify(SECRET, &token, NOW + 10, 0).unwrap();
        assert_eq!(claims.subject().unwrap(), UserId(42));
        assert_eq!(claims.exp, Some(NOW + 3600));
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue(SECRET, UserId(1), NOW, 3600).unwrap();
        let err = verify(b"another-secret-987654", &token, NOW, 0).unwrap_err();
        assert!(err.to_string().contains("signature"));
    }

    #[test]
    fn tampered_payload_rejected() {
        let token = issue(SECRET, UserId(1), NOW, 3600).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_claims = encode_segment(&Claims {
            user_id: Some(999),
            ..Claims::default()
        })
        .unwrap();
        let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);
        assert!(matches!(verify(SECRET, &forged, NOW, 0), Err(ViewinError::Auth(_))));
    }

    #[test]
    fn expiry_respects_leeway() {
        let token = issue(SECRET, UserId(1), NOW, 60).unwrap();
        assert!(verify(SECRET, &token, NOW + 80, 30).is_ok());
        let err = verify(SECRET, &token, NOW + 100, 30).unwrap_err();
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn non_hs256_header_rejected() {
        let header = encode_segment(&Header {
            alg: "none".into(),
            typ: None,
        })
        .unwrap();
        let claims = encode_segment(&Claims::default()).unwrap();
        let token = format!("{header}.{claims}.");
        let err = verify(SECRET, &token, NOW, 0).unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }

    #[test]
    fn wrong_segment_count_rejected() {
        assert!(verify(SECRET, "abc", NOW, 0).is_err());
        assert!(verify(SECRET, "a.b", NOW, 0).is_err());
        assert!(verify(SECRET, "a.b.c.d", NOW, 0).is_err());
    }

    #[test]
    fn subject_falls_back_to_numeric_sub() {
        let claims = Claims {
            sub: Some("17".into()),
            ..Claims::default()
        };
        assert_eq!(claims.subject().unwrap(), UserId(17));

        let opaque = Claims {
            sub: Some("user@example.com".into()),
            ..Claims::default()
        };
        assert!(opaque.subject().is_err());
    }
}
