//! Auth Middleware
//!
//! Guards protected routes with the `Authorization: Bearer` access token.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use platform::client::extract_bearer_token;

use crate::application::AuthenticateUseCase;
use crate::application::config::AuthConfig;
use crate::error::AuthError;

/// Rejects the request with 401 unless it carries a valid access token;
/// otherwise inserts `kernel::auth::AuthUser` into the request extensions.
///
/// Mount with `axum::middleware::from_fn_with_state(config, require_access_token)`.
pub async fn require_access_token(
    State(config): State<Arc<AuthConfig>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = AuthenticateUseCase::new(config).execute(extract_bearer_token(req.headers()))?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
