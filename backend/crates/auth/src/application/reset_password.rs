//! Reset Password Use Case

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_password::UserPassword;
use crate::error::{AuthError, AuthResult};

pub struct ResetPasswordInput {
    pub token: String,
    pub password: String,
}

pub struct ResetPasswordUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> ResetPasswordUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: ResetPasswordInput) -> AuthResult<()> {
        let user = self
            .user_repo
            .find_by_token(&input.token)
            .await?
            .ok_or(AuthError::InvalidResetLink)?;

        if !user.is_verified || user.token_expired() {
            return Err(AuthError::ResetLinkExpired);
        }

        let password = UserPassword::from_raw(
            input.password,
            &self.config.password_policy,
            self.config.pepper(),
        )?;
        if !self.user_repo.update_password(user.id, &password).await? {
            return Err(AuthError::InvalidResetLink);
        }

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(())
    }
}
