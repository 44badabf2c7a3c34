//! Verify Email Use Case
//!
//! Consumes the sign-up link. An expired link removes the pending account
//! so the user can sign up again with the same name and address.

use std::sync::Arc;

use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct VerifyEmailUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> VerifyEmailUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, token: &str) -> AuthResult<()> {
        let user = self
            .user_repo
            .find_by_token(token)
            .await?
            .ok_or(AuthError::InvalidVerificationLink)?;

        // A verified account only ever holds a reset token
        if user.is_verified {
            return Err(AuthError::InvalidVerificationLink);
        }

        if user.token_expired() {
            self.user_repo.delete(user.id).await?;
            tracing::info!(user_id = %user.id, "Expired sign-up removed");
            return Err(AuthError::VerificationLinkExpired);
        }

        // Swept or re-registered since the lookup
        if !self.user_repo.mark_verified(user.id).await? {
            return Err(AuthError::InvalidVerificationLink);
        }
        tracing::info!(user_id = %user.id, "Email verified");

        Ok(())
    }
}
