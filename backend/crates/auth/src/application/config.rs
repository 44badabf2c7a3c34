//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::password::PasswordPolicy;
use platform::token::TokenSecrets;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Signing secrets for access and refresh tokens
    pub token_secrets: TokenSecrets,
    /// Access token lifetime (1 minute)
    pub access_token_ttl: Duration,
    /// Refresh token lifetime (7 days), also the cookie Max-Age
    pub refresh_token_ttl: Duration,
    /// Email verification link lifetime (24 hours)
    pub verification_ttl: Duration,
    /// Password reset link lifetime (1 hour)
    pub reset_ttl: Duration,
    pub refresh_cookie_name: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    pub password_policy: PasswordPolicy,
    /// Base of the verification link (`<backend>/users/verify-email/<token>`)
    pub public_backend_url: String,
    /// Base of the reset link and of the post-verification redirect
    pub public_frontend_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secrets: TokenSecrets::new(Vec::new(), Vec::new()),
            access_token_ttl: Duration::from_secs(60),
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600),
            verification_ttl: Duration::from_secs(24 * 3600),
            reset_ttl: Duration::from_secs(3600),
            refresh_cookie_name: "refreshToken".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::None,
            password_pepper: None,
            password_policy: PasswordPolicy::default(),
            public_backend_url: "http://localhost:3000".to_string(),
            public_frontend_url: "http://localhost:5173".to_string(),
        }
    }
}

impl AuthConfig {
    /// Random token secrets (tokens die with the process)
    pub fn with_random_secrets() -> Self {
        Self {
            token_secrets: TokenSecrets::random(),
            ..Default::default()
        }
    }

    /// Plain-HTTP localhost: `SameSite=Lax`, no `Secure`
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            cookie_same_site: SameSite::Lax,
            ..Self::with_random_secrets()
        }
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: self.refresh_cookie_name.clone(),
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            max_age_secs: Some(self.refresh_token_ttl.as_secs() as i64),
            ..CookieConfig::default()
        }
    }

    pub fn verification_link(&self, token: &str) -> String {
        format!(
            "{}/users/verify-email/{}",
            self.public_backend_url.trim_end_matches('/'),
            token
        )
    }

    pub fn reset_password_link(&self, token: &str) -> String {
        format!(
            "{}/auth/reset-password/{}",
            self.public_frontend_url.trim_end_matches('/'),
            token
        )
    }

    pub fn email_verified_redirect(&self) -> String {
        format!(
            "{}/auth/email-verified",
            self.public_frontend_url.trim_end_matches('/')
        )
    }
}
