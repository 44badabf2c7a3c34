//! Forgot Password Use Case
//!
//! Stores a short-lived reset token and mails the reset link.

use std::sync::Arc;

use platform::mail::Mailer;
use platform::token::VerificationToken;

use crate::application::config::AuthConfig;
use crate::application::mail_templates;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

pub struct ForgotPasswordUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    user_repo: Arc<U>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<U, M> ForgotPasswordUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    pub fn new(user_repo: Arc<U>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, email: String) -> AuthResult<()> {
        let email = Email::new(email)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_verified {
            return Err(AuthError::ResetNotAllowed);
        }

        let reset = VerificationToken::generate(self.config.reset_ttl)?;
        if !self.user_repo.set_token(user.id, &reset).await? {
            return Err(AuthError::UserNotFound);
        }

        let link = self.config.reset_password_link(&reset.token);
        let mail = mail_templates::reset_password(
            user.email.as_str(),
            &user.first_name,
            &link,
            self.config.reset_ttl,
        );

        if let Err(e) = self.mailer.send(&mail).await {
            tracing::warn!(user_id = %user.id, error = %e, "Reset mail not sent");
        }

        tracing::info!(user_id = %user.id, "Password reset requested");
        Ok(())
    }
}
