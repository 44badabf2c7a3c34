//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary every crate of the backend agrees on:
//! - Error kinds, the unified `AppError` and its result alias
//! - Typed integer IDs for users, tweets and hashtags
//! - The `{result, message, ...payload}` JSON envelope
//! - The authenticated principal attached by the access-token middleware
//!
//! Only things that are hard to change and mean the same in every
//! domain belong here.

pub mod auth;
pub mod envelope;
pub mod error {
    pub mod app_error;
    pub mod kind;
    #[cfg(feature = "axum")]
    pub mod response;
}
pub mod id;
