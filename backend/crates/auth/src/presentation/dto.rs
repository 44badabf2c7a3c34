//! API DTOs (Data Transfer Objects)
//!
//! Request bodies keep every field optional so that a missing key and an
//! empty string are both reported as `bad request : missing <field>`.

use serde::{Deserialize, Serialize};

use crate::application::{ResetPasswordInput, SignInInput, SignUpInput};
use crate::domain::entity::user::User;
use crate::error::{AuthError, AuthResult};

/// Name of the last absent or empty field, in declaration order
fn last_missing<const N: usize>(fields: [(&'static str, Option<&str>); N]) -> Option<&'static str> {
    fields
        .into_iter()
        .filter(|(_, value)| value.is_none_or(str::is_empty))
        .map(|(name, _)| name)
        .last()
}

fn require<const N: usize>(fields: [(&'static str, Option<&str>); N]) -> AuthResult<()> {
    match last_missing(fields) {
        Some(field) => Err(AuthError::MissingField(field)),
        None => Ok(()),
    }
}

// ============================================================================
// Sign Up
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignUpRequest {
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl SignUpRequest {
    pub fn into_input(self) -> AuthResult<SignUpInput> {
        require([
            ("username", self.username.as_deref()),
            ("firstname", self.firstname.as_deref()),
            ("email", self.email.as_deref()),
            ("password", self.password.as_deref()),
        ])?;

        Ok(SignUpInput {
            username: self.username.unwrap_or_default(),
            first_name: self.firstname.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
        })
    }
}

// ============================================================================
// Sign In
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignInRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl SignInRequest {
    pub fn into_input(self) -> AuthResult<SignInInput> {
        require([
            ("username", self.username.as_deref()),
            ("password", self.password.as_deref()),
        ])?;

        Ok(SignInInput {
            username: self.username.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
        })
    }
}

/// Public view of the signed-in user
#[derive(Debug, Clone, Serialize)]
pub struct UserPayload {
    pub id: i64,
    pub username: String,
    pub firstname: String,
    pub email: String,
}

impl From<&User> for UserPayload {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            username: user.username.as_str().to_string(),
            firstname: user.first_name.clone(),
            email: user.email.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub access_token: String,
    pub user: UserPayload,
}

// ============================================================================
// Password Reset
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

impl ForgotPasswordRequest {
    pub fn into_email(self) -> AuthResult<String> {
        require([("email", self.email.as_deref())])?;
        Ok(self.email.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    pub password: Option<String>,
}

impl ResetPasswordRequest {
    pub fn into_input(self) -> AuthResult<ResetPasswordInput> {
        require([
            ("token", self.token.as_deref()),
            ("password", self.password.as_deref()),
        ])?;

        Ok(ResetPasswordInput {
            token: self.token.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
        })
    }
}

// ============================================================================
// Refresh
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}
