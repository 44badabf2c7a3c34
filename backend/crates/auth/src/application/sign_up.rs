//! Sign Up Use Case
//!
//! Creates an unverified account and mails the verification link.

use std::sync::Arc;

use kernel::id::UserId;
use platform::mail::Mailer;
use platform::token::VerificationToken;

use crate::application::config::AuthConfig;
use crate::application::mail_templates;
use crate::domain::entity::user::NewUser;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName, user_password::UserPassword};
use crate::error::{AuthError, AuthResult};

pub struct SignUpInput {
    pub username: String,
    pub first_name: String,
    pub email: String,
    pub password: String,
}

pub struct SignUpOutput {
    pub user_id: UserId,
    /// Whether the verification mail left the process
    pub mail_sent: bool,
}

pub struct SignUpUseCase<U, M>
where
    U: UserRepository,
    M: Mailer,
{
    user_repo: Arc<U>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<U, M> SignUpUseCase<U, M>
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

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let username =
            UserName::new(&input.username).map_err(|e| AuthError::InvalidInput(e.to_string()))?;
        let email = Email::new(input.email)?;
        let first_name = input.first_name.trim().to_string();
        if first_name.is_empty() {
            return Err(AuthError::MissingField("firstname"));
        }

        if self.user_repo.find_by_username(&username).await?.is_some() {
            return Err(AuthError::UserNameTaken);
        }
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password = UserPassword::from_raw(
            input.password,
            &self.config.password_policy,
            self.config.pepper(),
        )?;
        let verification = VerificationToken::generate(self.config.verification_ttl)?;
        let link = self.config.verification_link(&verification.token);

        let user = self
            .user_repo
            .create(&NewUser {
                username,
                email,
                first_name,
                password,
                verification,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User signed up");

        let mail = mail_templates::welcome(
            user.email.as_str(),
            &user.first_name,
            &link,
            self.config.verification_ttl,
        );

        let mail_sent = match self.mailer.send(&mail).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Verification mail not sent");
                false
            }
        };

        Ok(SignUpOutput {
            user_id: user.id,
            mail_sent,
        })
    }
}
