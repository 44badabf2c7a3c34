//! Authenticate Use Case
//!
//! Turns a bearer access token into the request principal. Stateless: no
//! store lookup, so a deleted user keeps access until the token expires.

use std::sync::Arc;

use kernel::auth::AuthUser;
use kernel::id::UserId;
use platform::token::{TokenKind, verify_token};

use crate::application::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

pub struct AuthenticateUseCase {
    config: Arc<AuthConfig>,
}

impl AuthenticateUseCase {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }

    pub fn execute(&self, bearer: Option<&str>) -> AuthResult<AuthUser> {
        let token = bearer.ok_or(AuthError::AccessTokenMissing)?;

        let claims = verify_token(token, TokenKind::Access, &self.config.token_secrets)
            .ok_or(AuthError::AccessTokenInvalid)?;

        Ok(AuthUser::new(UserId::new(claims.sub)))
    }
}
