//! HMAC-SHA256 token issuing and verification.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

use coedit_core::error::AppError;

use super::claims::EditorClaims;

type HmacSha256 = Hmac<Sha256>;

/// Static token header: the algorithm never varies.
const HEADER_JSON: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Errors produced by token verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The token does not have the expected three-part shape, or a part
    /// failed to decode.
    #[error("malformed token")]
    Malformed,
    /// The signature does not match the header and payload.
    #[error("invalid token signature")]
    InvalidSignature,
    /// The token is past its expiry.
    #[error("token has expired")]
    Expired,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::forbidden(err.to_string())
    }
}

/// Issues and verifies editor tokens.
///
/// When verification is disabled by configuration, `issue` returns an
/// empty string and `verify` accepts anything, yielding empty claims.
/// This mirrors deployments where the editor and coordinator share a
/// trusted network and token checking is switched off.
#[derive(Clone)]
pub struct TokenService {
    secret: Vec<u8>,
    ttl_seconds: i64,
    enabled: bool,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl TokenService {
    /// Create a token service from the shared secret and TTL.
    pub fn new(secret: impl Into<Vec<u8>>, ttl_seconds: i64, enabled: bool) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds,
            enabled,
        }
    }

    /// Whether token verification is enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Sign claims into a compact token. Stamps `iat` and `exp` from the
    /// current clock and the configured TTL.
    pub fn issue(&self, mut claims: EditorClaims) -> Result<String, AppError> {
        if !self.enabled {
            return Ok(String::new());
        }

        let now = Utc::now().timestamp();
        claims.iat = now;
        claims.exp = now + self.ttl_seconds;

        let payload_json = serde_json::to_vec(&claims)?;
        let header = URL_SAFE_NO_PAD.encode(HEADER_JSON.as_bytes());
        let payload = URL_SAFE_NO_PAD.encode(&payload_json);
        let signing_input = format!("{header}.{payload}");

        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AppError::internal(format!("Invalid HMAC key: {e}")))?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{signing_input}.{signature}"))
    }

    /// Verify a token and return its claims.
    ///
    /// An optional `Bearer ` prefix is stripped. Signature comparison is
    /// constant-time via `Mac::verify_slice`.
    pub fn verify(&self, token: &str) -> Result<EditorClaims, TokenError> {
        if !self.enabled {
            return Ok(EditorClaims::default());
        }

        let payload = self.verify_payload(token)?;
        let claims: EditorClaims =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if claims.exp < Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Verify a token and return its payload as arbitrary JSON. Used when
    /// the payload wraps a foreign structure (the editor's token-wrapped
    /// callback body) rather than our claims.
    pub fn verify_raw(&self, token: &str) -> Result<serde_json::Value, TokenError> {
        if !self.enabled {
            return Ok(serde_json::Value::Null);
        }

        let payload = self.verify_payload(token)?;
        serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)
    }

    /// Checks the token shape and signature and returns the decoded
    /// payload bytes.
    fn verify_payload(&self, token: &str) -> Result<Vec<u8>, TokenError> {
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();

        let mut parts = token.split('.');
        let (header, payload, signature) = match (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) {
            (Some(h), Some(p), Some(s), None) if !h.is_empty() && !p.is_empty() => (h, p, s),
            _ => return Err(TokenError::Malformed),
        };

        let signature_bytes = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::Malformed)?;

        let mut mac =
            HmacSha256::new_from_slice(&self.secret).map_err(|_| TokenError::Malformed)?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature_bytes)
            .map_err(|_| TokenError::InvalidSignature)?;

        URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| TokenError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret-key", 3600, true)
    }

    fn sample_claims() -> EditorClaims {
        EditorClaims {
            file_id: Some(42),
            user_id: Some(7),
            tenant_id: Some(1),
            session_token: Some("abc123".into()),
            display_name: Some("Mario Rossi".into()),
            ..Default::default()
        }
    }

    #[test]
    fn issue_then_verify_round_trip() {
        let svc = service();
        let token = svc.issue(sample_claims()).unwrap();
        assert_eq!(token.matches('.').count(), 2);

        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.file_id, Some(42));
        assert_eq!(claims.user_id, Some(7));
        assert_eq!(claims.display_name.as_deref(), Some("Mario Rossi"));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn bearer_prefix_is_stripped() {
        let svc = service();
        let token = svc.issue(sample_claims()).unwrap();
        let claims = svc.verify(&format!("Bearer {token}")).unwrap();
        assert_eq!(claims.file_id, Some(42));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let svc = service();
        let token = svc.issue(sample_claims()).unwrap();

        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let mut payload = URL_SAFE_NO_PAD.decode(&parts[1]).unwrap();
        // Flip one bit inside the payload.
        payload[10] ^= 0x01;
        parts[1] = URL_SAFE_NO_PAD.encode(&payload);

        let err = svc.verify(&parts.join(".")).unwrap_err();
        assert_eq!(err, TokenError::InvalidSignature);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = service().issue(sample_claims()).unwrap();
        let other = TokenService::new("a-different-secret", 3600, true);
        assert_eq!(other.verify(&token).unwrap_err(), TokenError::InvalidSignature);
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = TokenService::new("test-secret-key", -10, true);
        let token = svc.issue(sample_claims()).unwrap();
        assert_eq!(svc.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let svc = service();
        for bad in ["", "only-one-part", "two.parts", "a.b.c.d", "..sig"] {
            assert_eq!(svc.verify(bad).unwrap_err(), TokenError::Malformed, "{bad}");
        }
    }

    #[test]
    fn garbage_signature_encoding_is_malformed() {
        let svc = service();
        let token = svc.issue(sample_claims()).unwrap();
        let (head, _) = token.rsplit_once('.').unwrap();
        let err = svc.verify(&format!("{head}.!!!not-base64!!!")).unwrap_err();
        assert_eq!(err, TokenError::Malformed);
    }

    #[test]
    fn disabled_service_accepts_anything() {
        let svc = TokenService::new("unused", 3600, false);
        assert_eq!(svc.issue(sample_claims()).unwrap(), "");
        let claims = svc.verify("whatever").unwrap();
        assert_eq!(claims, EditorClaims::default());
    }
}
