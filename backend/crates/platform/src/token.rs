//! Token Lifecycle
//!
//! Two families of tokens:
//!
//! - **Signed tokens** (access, refresh): stateless, self-describing,
//!   `base64url(claims) "." base64url(HMAC-SHA256(secret, base64url(claims)))`.
//!   Each kind is signed with its own secret, so a refresh token can never
//!   pass as an access token and the other way round.
//! - **Verification tokens** (email confirmation, password reset): opaque
//!   random strings persisted next to the user with an absolute expiry.
//!   They travel in email links and are single use.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::{
    from_base64url, hmac_sha256, hmac_sha256_verify, random_alphanumeric, random_bytes,
    to_base64url,
};

/// Length of opaque verification tokens (characters)
pub const VERIFICATION_TOKEN_LENGTH: usize = 32;

/// Kind of signed token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token lifetime out of range")]
    InvalidTtl,

    #[error("Signing key rejected")]
    InvalidKey,

    #[error("Claims encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Kind-specific signing secrets
#[derive(Clone)]
pub struct TokenSecrets {
    access: Vec<u8>,
    refresh: Vec<u8>,
}

impl TokenSecrets {
    pub fn new(access: impl Into<Vec<u8>>, refresh: impl Into<Vec<u8>>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }

    /// Fresh random secrets (development only: tokens die with the process)
    pub fn random() -> Self {
        Self::new(random_bytes(32), random_bytes(32))
    }

    fn for_kind(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }
}

impl fmt::Debug for TokenSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSecrets")
            .field("access", &"[REDACTED]")
            .field("refresh", &"[REDACTED]")
            .finish()
    }
}

/// Payload carried by signed tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id
    pub sub: i64,
    pub kind: TokenKind,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expires at (unix seconds)
    pub exp: i64,
}

fn add_ttl(now: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>, TokenError> {
    let delta = TimeDelta::from_std(ttl).map_err(|_| TokenError::InvalidTtl)?;
    now.checked_add_signed(delta).ok_or(TokenError::InvalidTtl)
}

/// Sign a token of `kind` for `user_id`, valid for `ttl`
pub fn create_token(
    user_id: i64,
    ttl: Duration,
    kind: TokenKind,
    secrets: &TokenSecrets,
) -> Result<String, TokenError> {
    create_token_at(user_id, ttl, kind, secrets, Utc::now())
}

pub fn create_token_at(
    user_id: i64,
    ttl: Duration,
    kind: TokenKind,
    secrets: &TokenSecrets,
    now: DateTime<Utc>,
) -> Result<String, TokenError> {
    let claims = TokenClaims {
        sub: user_id,
        kind,
        iat: now.timestamp(),
        exp: add_ttl(now, ttl)?.timestamp(),
    };

    let payload = to_base64url(&serde_json::to_vec(&claims)?);
    let signature =
        hmac_sha256(secrets.for_kind(kind), payload.as_bytes()).ok_or(TokenError::InvalidKey)?;

    Ok(format!("{}.{}", payload, to_base64url(&signature)))
}

/// Check signature, kind and expiry. Any failure yields `None`.
pub fn verify_token(token: &str, kind: TokenKind, secrets: &TokenSecrets) -> Option<TokenClaims> {
    verify_token_at(token, kind, secrets, Utc::now())
}

pub fn verify_token_at(
    token: &str,
    kind: TokenKind,
    secrets: &TokenSecrets,
    now: DateTime<Utc>,
) -> Option<TokenClaims> {
    let (payload, signature_b64) = token.split_once('.')?;
    let signature = from_base64url(signature_b64).ok()?;

    if !hmac_sha256_verify(secrets.for_kind(kind), payload.as_bytes(), &signature) {
        return None;
    }

    let claims: TokenClaims = serde_json::from_slice(&from_base64url(payload).ok()?).ok()?;

    if claims.kind != kind || claims.exp <= now.timestamp() {
        return None;
    }

    Some(claims)
}

/// Opaque single-use token for email links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl VerificationToken {
    /// New random token expiring `ttl` from now
    pub fn generate(ttl: Duration) -> Result<Self, TokenError> {
        Ok(Self {
            token: random_alphanumeric(VERIFICATION_TOKEN_LENGTH),
            expires_at: add_ttl(Utc::now(), ttl)?,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}
