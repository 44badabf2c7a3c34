//! User Entity
//!
//! An account row. The optional `token`/`token_expiration` pair holds the
//! pending email-link token: the verification token right after sign-up,
//! a reset token after a forgotten-password request. Consuming either
//! clears both.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::token::VerificationToken;

use crate::domain::value_object::{email::Email, user_name::UserName, user_password::UserPassword};

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: UserName,
    pub email: Email,
    pub first_name: String,
    pub password: UserPassword,
    pub is_verified: bool,
    pub token: Option<String>,
    pub token_expiration: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// A pending token exists and its expiry is in the past
    pub fn token_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.token_expiration {
            Some(expiration) => expiration < now,
            None => false,
        }
    }

    pub fn token_expired(&self) -> bool {
        self.token_expired_at(Utc::now())
    }
}

/// Account about to be inserted, still unverified
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: UserName,
    pub email: Email,
    pub first_name: String,
    pub password: UserPassword,
    pub verification: VerificationToken,
}
