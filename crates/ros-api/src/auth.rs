//! Caller authentication.
//!
//! Production deployments sit behind a gateway that injects a base64-encoded
//! identity header; this module decodes it into an [`Identity`] and forwards
//! the raw header value as the opaque credential for downstream consumers.
//! The token-validation protocol itself lives in the gateway, not here.

use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ros_core::Identity;
use serde::Deserialize;

pub const IDENTITY_HEADER: &str = "x-rh-identity";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing {IDENTITY_HEADER} header")]
    MissingIdentity,
    #[error("invalid identity header: {0}")]
    InvalidIdentity(String),
}

/// Resolves the caller identity and opaque credential for one request.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> Result<(Identity, String), AuthError>;
}

#[derive(Debug, Deserialize)]
struct IdentityEnvelope {
    identity: IdentityPayload,
}

#[derive(Debug, Deserialize)]
struct IdentityPayload {
    #[serde(default)]
    account_number: String,
    #[serde(default)]
    org_id: String,
    #[serde(default)]
    user: Option<IdentityUser>,
}

#[derive(Debug, Deserialize)]
struct IdentityUser {
    #[serde(default)]
    username: String,
}

/// Decodes the gateway-injected identity header.
pub struct IdentityHeaderAuthenticator;

impl Authenticator for IdentityHeaderAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Result<(Identity, String), AuthError> {
        let raw = headers
            .get(IDENTITY_HEADER)
            .ok_or(AuthError::MissingIdentity)?
            .to_str()
            .map_err(|e| AuthError::InvalidIdentity(e.to_string()))?
            .to_string();

        let decoded = STANDARD
            .decode(&raw)
            .map_err(|e| AuthError::InvalidIdentity(format!("not valid base64: {}", e)))?;
        let envelope: IdentityEnvelope = serde_json::from_slice(&decoded)
            .map_err(|e| AuthError::InvalidIdentity(format!("not valid identity JSON: {}", e)))?;

        let identity = Identity {
            account_number: envelope.identity.account_number,
            org_id: envelope.identity.org_id,
            username: envelope
                .identity
                .user
                .map(|u| u.username)
                .unwrap_or_default(),
        };
        Ok((identity, raw))
    }
}

/// Accepts every request with an empty identity. Development only, selected
/// when `AUTH_ENABLED=false`.
pub struct AnonymousAuthenticator;

impl Authenticator for AnonymousAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Result<(Identity, String), AuthError> {
        // Honor the header when present so local runs can still exercise
        // tenant-specific key layouts.
        match IdentityHeaderAuthenticator.authenticate(headers) {
            Ok(resolved) => Ok(resolved),
            Err(_) => Ok((Identity::default(), String::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn identity_header(json: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            IDENTITY_HEADER,
            HeaderValue::from_str(&STANDARD.encode(json)).unwrap(),
        );
        headers
    }

    #[test]
    fn test_decodes_identity_and_forwards_raw_header() {
        let headers = identity_header(
            r#"{"identity":{"account_number":"12345","org_id":"54321","user":{"username":"alice"}}}"#,
        );

        let (identity, credential) = IdentityHeaderAuthenticator.authenticate(&headers).unwrap();

        assert_eq!(identity.account_number, "12345");
        assert_eq!(identity.org_id, "54321");
        assert_eq!(identity.username, "alice");
        assert_eq!(
            credential,
            headers[IDENTITY_HEADER].to_str().unwrap().to_string()
        );
    }

    #[test]
    fn test_missing_header_is_rejected() {
        let err = IdentityHeaderAuthenticator
            .authenticate(&HeaderMap::new())
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingIdentity));
    }

    #[test]
    fn test_garbage_header_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(IDENTITY_HEADER, HeaderValue::from_static("%%%not-base64"));
        let err = IdentityHeaderAuthenticator.authenticate(&headers).unwrap_err();
        assert!(matches!(err, AuthError::InvalidIdentity(_)));
    }

    #[test]
    fn test_anonymous_falls_back_to_empty_identity() {
        let (identity, credential) = AnonymousAuthenticator
            .authenticate(&HeaderMap::new())
            .unwrap();
        assert!(identity.org_id.is_empty());
        assert!(credential.is_empty());
    }

    #[test]
    fn test_anonymous_still_honors_header_when_present() {
        let headers = identity_header(r#"{"identity":{"account_number":"1","org_id":"2"}}"#);
        let (identity, _) = AnonymousAuthenticator.authenticate(&headers).unwrap();
        assert_eq!(identity.org_id, "2");
    }
}
