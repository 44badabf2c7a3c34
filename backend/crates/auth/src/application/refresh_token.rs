//! Refresh Token Use Case
//!
//! Trades a valid refresh token for a fresh access token. The refresh
//! token itself is not rotated.

use std::sync::Arc;

use kernel::id::UserId;
use platform::token::{TokenKind, create_token, verify_token};

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct RefreshTokenUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RefreshTokenUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Returns the new access token
    pub async fn execute(&self, refresh_token: &str) -> AuthResult<String> {
        let claims = verify_token(refresh_token, TokenKind::Refresh, &self.config.token_secrets)
            .ok_or(AuthError::RefreshTokenInvalid)?;

        let user_id = UserId::new(claims.sub);
        let user = self.user_repo.find_by_id(user_id).await?;
        if !user.is_some_and(|u| u.is_verified) {
            return Err(AuthError::InvalidUser);
        }

        let access_token = create_token(
            user_id.get(),
            self.config.access_token_ttl,
            TokenKind::Access,
            &self.config.token_secrets,
        )?;

        tracing::debug!(user_id = %user_id, "Access token refreshed");
        Ok(access_token)
    }
}
