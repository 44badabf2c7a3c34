//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Sign up with e-mailed verification link (expires after 24 h)
//! - Sign in with user name + password
//! - Short-lived bearer access tokens, refresh token in an HttpOnly cookie
//! - Password reset through an e-mailed single-use link
//! - Hourly removal of sign-ups that were never verified
//!
//! ## Security Model
//! - Passwords hashed with Argon2id plus optional pepper
//! - Access and refresh tokens signed with distinct HMAC-SHA256 secrets
//! - Unverified accounts can neither sign in nor refresh

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::sweep_expired::SweepExpiredSignupsUseCase;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgUserRepository;
pub use presentation::middleware::require_access_token;
pub use presentation::router::{users_router, users_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
