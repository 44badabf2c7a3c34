//! Sign In Use Case
//!
//! Checks credentials and issues an access/refresh token pair.

use std::sync::Arc;

use platform::token::{TokenKind, create_token};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_name::UserName;
use crate::error::{AuthError, AuthResult};

pub struct SignInInput {
    pub username: String,
    pub password: String,
}

pub struct SignInOutput {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> SignInUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        // A name that could never have been registered cannot match a row
        let username = UserName::new(&input.username).map_err(|_| AuthError::WrongUserName)?;

        let user = self
            .user_repo
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::WrongUserName)?;

        if !user.password.verify(input.password, self.config.pepper()) {
            return Err(AuthError::WrongPassword);
        }

        if !user.is_verified {
            return Err(AuthError::EmailNotVerified);
        }

        let secrets = &self.config.token_secrets;
        let access_token = create_token(
            user.id.get(),
            self.config.access_token_ttl,
            TokenKind::Access,
            secrets,
        )?;
        let refresh_token = create_token(
            user.id.get(),
            self.config.refresh_token_ttl,
            TokenKind::Refresh,
            secrets,
        )?;

        tracing::info!(user_id = %user.id, "User signed in");

        Ok(SignInOutput {
            access_token,
            refresh_token,
            user,
        })
    }
}
