//! Users Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use platform::mail::{MailTransport, Mailer};

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, UsersAppState};

/// Create the `/users` router with the PostgreSQL repository
pub fn users_router(
    repo: PgUserRepository,
    mailer: MailTransport,
    config: Arc<AuthConfig>,
) -> Router {
    users_router_generic(repo, mailer, config)
}

/// Create a `/users` router for any repository and mailer implementation
pub fn users_router_generic<R, M>(repo: R, mailer: M, config: Arc<AuthConfig>) -> Router
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let state = UsersAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        config,
    };

    Router::new()
        .route("/signup", post(handlers::sign_up::<R, M>))
        .route("/signin", post(handlers::sign_in::<R, M>))
        .route("/verify-email/{token}", get(handlers::verify_email::<R, M>))
        .route("/forgot-password", post(handlers::forgot_password::<R, M>))
        .route("/reset-password", post(handlers::reset_password::<R, M>))
        .route("/refresh_token", post(handlers::refresh_token::<R, M>))
        .route("/logout", post(handlers::logout::<R, M>))
        .with_state(state)
}
