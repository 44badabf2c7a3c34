//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::token::VerificationToken;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::value_object::{email::Email, user_name::UserName, user_password::UserPassword};
use crate::error::AuthResult;

#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert an unverified user. Unique violations surface as
    /// `UserNameTaken` / `EmailTaken`.
    async fn create(&self, user: &NewUser) -> AuthResult<User>;

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>>;

    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// User holding this pending email-link token
    async fn find_by_token(&self, token: &str) -> AuthResult<Option<User>>;

    /// Flip to verified and clear the pending token. `false` if the user
    /// no longer exists.
    async fn mark_verified(&self, id: UserId) -> AuthResult<bool>;

    /// Store a new pending token (replaces any previous one). `false` if the
    /// user no longer exists.
    async fn set_token(&self, id: UserId, token: &VerificationToken) -> AuthResult<bool>;

    /// Replace the password hash and clear the pending token. `false` if the
    /// user no longer exists.
    async fn update_password(&self, id: UserId, password: &UserPassword) -> AuthResult<bool>;

    /// Returns whether a row was deleted
    async fn delete(&self, id: UserId) -> AuthResult<bool>;

    /// Delete unverified users whose verification token expired before `now`
    async fn delete_expired_unverified(&self, now: DateTime<Utc>) -> AuthResult<u64>;
}
