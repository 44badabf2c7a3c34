//! Auth Error Types
//!
//! Auth-specific variants that render through `kernel::error::AppError`.
//! Display strings double as the public messages.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::db::QueryError;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("bad request : missing {0}")]
    MissingField(&'static str),

    /// Field present but malformed (email format, user name rules, password policy)
    #[error("{0}")]
    InvalidInput(String),

    #[error("User already exists")]
    UserNameTaken,

    #[error("This email is used by another account")]
    EmailTaken,

    #[error("Wrong username")]
    WrongUserName,

    #[error("Wrong password")]
    WrongPassword,

    #[error("Please verify your email address")]
    EmailNotVerified,

    #[error("Invalid Verification Link")]
    InvalidVerificationLink,

    #[error("Token has expired. Please signup again")]
    VerificationLinkExpired,

    #[error("User not found")]
    UserNotFound,

    /// Password reset requested for an unverified account
    #[error("Please check your email address")]
    ResetNotAllowed,

    #[error("Invalid link")]
    InvalidResetLink,

    #[error("reset password link has expired or account not verified")]
    ResetLinkExpired,

    #[error("Token missing")]
    AccessTokenMissing,

    #[error("Token expired or invalid")]
    AccessTokenInvalid,

    #[error("No refresh token provided")]
    RefreshTokenMissing,

    #[error("Invalid or expired refresh token")]
    RefreshTokenInvalid,

    #[error("Invalid User")]
    InvalidUser,

    #[error("Database error: {0}")]
    Database(#[from] QueryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingField(_)
            | AuthError::InvalidInput(_)
            | AuthError::InvalidVerificationLink
            | AuthError::VerificationLinkExpired => ErrorKind::BadRequest,
            AuthError::UserNameTaken | AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::WrongUserName
            | AuthError::WrongPassword
            | AuthError::AccessTokenMissing
            | AuthError::AccessTokenInvalid
            | AuthError::RefreshTokenMissing => ErrorKind::Unauthorized,
            AuthError::EmailNotVerified
            | AuthError::ResetNotAllowed
            | AuthError::ResetLinkExpired
            | AuthError::RefreshTokenInvalid
            | AuthError::InvalidUser => ErrorKind::Forbidden,
            AuthError::UserNotFound | AuthError::InvalidResetLink => ErrorKind::NotFound,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::WrongUserName | AuthError::WrongPassword => {
                tracing::warn!(reason = %self, "Rejected sign-in");
            }
            AuthError::RefreshTokenInvalid | AuthError::InvalidUser => {
                tracing::warn!(reason = %self, "Rejected refresh token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for AuthError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AuthError::InvalidInput(format!("bad request : {}", rejection.body_text()))
    }
}

impl From<platform::token::TokenError> for AuthError {
    fn from(err: platform::token::TokenError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<platform::password::PasswordPolicyError> for AuthError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AuthError::InvalidInput(err.to_string())
    }
}
