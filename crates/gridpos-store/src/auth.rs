//! # Store Authentication Manager
//!
//! Exchanges a service-account key for short-lived bearer tokens and
//! refreshes them before expiry, so request handlers never pay an auth
//! round trip on the hot path.
//!
//! ## Authentication Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store Authentication Flow                          │
//! │                                                                         │
//! │  ┌──────────────┐        ┌──────────────────┐                           │
//! │  │ gridpos      │        │ OAuth token      │                           │
//! │  │ (StoreAuth)  │        │ endpoint         │                           │
//! │  └──────┬───────┘        └────────┬─────────┘                           │
//! │         │  1. RS256 JWT assertion │                                     │
//! │         │     signed with the     │                                     │
//! │         │     service-account key │                                     │
//! │         │────────────────────────►│                                     │
//! │         │  2. access_token,       │                                     │
//! │         │     expires_in          │                                     │
//! │         │◄────────────────────────│                                     │
//! │         │                         │                                     │
//! │         │  [Later: token near expiry → repeat]                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Token Storage
//! Tokens are stored in memory behind an async RwLock. Refresh happens
//! 5 minutes before expiration to ensure seamless operation.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

/// Margin before token expiration to trigger refresh (5 minutes)
const REFRESH_MARGIN_SECS: u64 = 300;

/// Lifetime requested for each assertion (the endpoint caps at 1 hour)
const ASSERTION_TTL_SECS: u64 = 3600;

/// OAuth scope granting read/write access to the tabular store
const STORE_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

// =============================================================================
// Service Account Key
// =============================================================================

/// The credential bundle identifying this deployment to the store.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Issuer of the signed assertion.
    pub client_email: String,
    /// PEM-encoded RSA private key used to sign assertions.
    pub private_key: String,
    /// Token endpoint the assertion is exchanged at.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ServiceAccountKey {
    /// Loads the key from a JSON file on disk.
    pub fn from_file(path: &std::path::Path) -> StoreResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StoreError::auth(format!("cannot read key file {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| StoreError::auth(format!("invalid service account key: {e}")))
    }
}

// =============================================================================
// Token Info
// =============================================================================

/// Token information stored after a successful exchange.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    /// The bearer access token.
    pub access_token: String,
    /// When the token expires (local monotonic time).
    pub expires_at: Instant,
}

impl TokenInfo {
    /// Check if the token is expired or about to expire.
    pub fn needs_refresh(&self) -> bool {
        Instant::now() + Duration::from_secs(REFRESH_MARGIN_SECS) >= self.expires_at
    }

    /// Get remaining valid time.
    pub fn remaining_secs(&self) -> u64 {
        let now = Instant::now();
        if now >= self.expires_at {
            0
        } else {
            (self.expires_at - now).as_secs()
        }
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// Claim set of the signed assertion.
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

// =============================================================================
// Store Auth
// =============================================================================

/// Bearer token manager for the remote store.
///
/// Cheap to share: the token cache lives behind an `Arc` in practice and
/// survives across requests even though the rest of the configuration is
/// re-read per request.
pub struct StoreAuth {
    key: ServiceAccountKey,
    http: reqwest::Client,
    token: RwLock<Option<TokenInfo>>,
}

impl StoreAuth {
    /// Creates a new auth manager. No network traffic until the first
    /// token is requested.
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Self {
        Self {
            key,
            http,
            token: RwLock::new(None),
        }
    }

    /// Returns a valid bearer token, exchanging a fresh assertion when
    /// the cached one is missing or near expiry.
    pub async fn bearer_token(&self) -> StoreResult<String> {
        // Fast path: cached token still comfortably valid.
        {
            let guard = self.token.read().await;
            if let Some(token) = guard.as_ref() {
                if !token.needs_refresh() {
                    debug!(remaining_secs = token.remaining_secs(), "Using cached store token");
                    return Ok(token.access_token.clone());
                }
            }
        }

        let mut guard = self.token.write().await;

        // Double-check after acquiring the write lock.
        if let Some(token) = guard.as_ref() {
            if !token.needs_refresh() {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.exchange().await?;
        info!(
            issuer = %self.key.client_email,
            expires_in_secs = token.remaining_secs(),
            "Store token refreshed"
        );
        let access_token = token.access_token.clone();
        *guard = Some(token);
        Ok(access_token)
    }

    /// Signs an assertion and exchanges it at the token endpoint.
    async fn exchange(&self) -> StoreResult<TokenInfo> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| StoreError::auth(format!("system clock error: {e}")))?
            .as_secs();
        let assertion = self.sign_assertion(now)?;

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", &assertion)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::auth(format!(
                "token exchange failed ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| StoreError::auth(format!("invalid token response: {e}")))?;

        Ok(TokenInfo {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }

    /// Builds the RS256-signed assertion for the given issue time.
    fn sign_assertion(&self, issued_at: u64) -> StoreResult<String> {
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: STORE_SCOPE,
            aud: &self.key.token_uri,
            iat: issued_at,
            exp: issued_at + ASSERTION_TTL_SECS,
        };
        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| StoreError::auth(format!("invalid private key: {e}")))?;
        encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| StoreError::auth(format!("cannot sign assertion: {e}")))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_needs_refresh() {
        let token = TokenInfo {
            access_token: "test".to_string(),
            expires_at: Instant::now() + Duration::from_secs(60), // 1 minute
        };
        // With only 1 minute left and a 5 minute margin, should need refresh
        assert!(token.needs_refresh());
    }

    #[test]
    fn test_token_no_refresh_needed() {
        let token = TokenInfo {
            access_token: "test".to_string(),
            expires_at: Instant::now() + Duration::from_secs(3600), // 1 hour
        };
        assert!(!token.needs_refresh());
        assert!(token.remaining_secs() > 3000);
    }

    #[test]
    fn test_assertion_claims_shape() {
        let claims = AssertionClaims {
            iss: "svc@example.test",
            scope: STORE_SCOPE,
            aud: "https://oauth2.googleapis.com/token",
            iat: 1_700_000_000,
            exp: 1_700_003_600,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["iss"], "svc@example.test");
        assert_eq!(json["aud"], "https://oauth2.googleapis.com/token");
        assert_eq!(
            json["exp"].as_u64().unwrap() - json["iat"].as_u64().unwrap(),
            ASSERTION_TTL_SECS
        );
    }

    #[test]
    fn test_key_defaults_token_uri() {
        let key: ServiceAccountKey = serde_json::from_str(
            r#"{"client_email": "svc@example.test", "private_key": "---"}"#,
        )
        .unwrap();
        assert_eq!(key.token_uri, "https://oauth2.googleapis.com/token");
    }
}
