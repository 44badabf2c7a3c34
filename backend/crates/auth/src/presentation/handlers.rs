//! HTTP Handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Redirect};
use std::sync::Arc;

use kernel::envelope::Envelope;
use platform::client::extract_client_ip;
use platform::cookie::{delete_cookie_header, extract_cookie, set_cookie_header};
use platform::mail::Mailer;

use crate::application::config::AuthConfig;
use crate::application::{
    ForgotPasswordUseCase, RefreshTokenUseCase, ResetPasswordUseCase, SignInUseCase,
    SignUpUseCase, VerifyEmailUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    AccessTokenResponse, ForgotPasswordRequest, ResetPasswordRequest, SignInRequest,
    SignInResponse, SignUpRequest, UserPayload,
};

/// Shared state for the `/users` handlers
pub struct UsersAppState<R, M>
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<AuthConfig>,
}

impl<R, M> Clone for UsersAppState<R, M>
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /users/signup
pub async fn sign_up<R, M>(
    State(state): State<UsersAppState<R, M>>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let input = req.into_input()?;

    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );
    use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::message(
            "Signup successful. Please check your email to verify your account.",
        )),
    ))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /users/signin
pub async fn sign_in<R, M>(
    State(state): State<UsersAppState<R, M>>,
    headers: HeaderMap,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let input = req.into_input()?;
    let username = input.username.clone();

    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());
    let output = match use_case.execute(input).await {
        Ok(output) => output,
        Err(e @ (AuthError::WrongUserName | AuthError::WrongPassword)) => {
            let client_ip = extract_client_ip(&headers, None);
            tracing::warn!(%username, client_ip = ?client_ip, "Sign-in failed");
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    let cookie = set_cookie_header(&state.config.refresh_cookie(), &output.refresh_token)
        .ok_or_else(|| AuthError::Internal("refresh cookie is not a valid header".into()))?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(Envelope::ok(SignInResponse {
            access_token: output.access_token,
            user: UserPayload::from(&output.user),
        })),
    ))
}

// ============================================================================
// Email Verification
// ============================================================================

/// GET /users/verify-email/{token}
pub async fn verify_email<R, M>(
    State(state): State<UsersAppState<R, M>>,
    Path(token): Path<String>,
) -> AuthResult<Redirect>
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    VerifyEmailUseCase::new(state.repo.clone())
        .execute(&token)
        .await?;

    Ok(Redirect::to(&state.config.email_verified_redirect()))
}

// ============================================================================
// Password Reset
// ============================================================================

/// POST /users/forgot-password
pub async fn forgot_password<R, M>(
    State(state): State<UsersAppState<R, M>>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let email = req.into_email()?;

    let use_case = ForgotPasswordUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );
    use_case.execute(email).await?;

    Ok(Json(Envelope::message(
        "Reset password E-mail sent. Please check your email",
    )))
}

/// POST /users/reset-password
pub async fn reset_password<R, M>(
    State(state): State<UsersAppState<R, M>>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let input = req.into_input()?;

    ResetPasswordUseCase::new(state.repo.clone(), state.config.clone())
        .execute(input)
        .await?;

    Ok(Json(Envelope::message("Password successfully updated")))
}

// ============================================================================
// Refresh / Logout
// ============================================================================

/// POST /users/refresh_token
pub async fn refresh_token<R, M>(
    State(state): State<UsersAppState<R, M>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let token = extract_cookie(&headers, &state.config.refresh_cookie_name)
        .ok_or(AuthError::RefreshTokenMissing)?;

    let access_token = RefreshTokenUseCase::new(state.repo.clone(), state.config.clone())
        .execute(&token)
        .await?;

    Ok(Json(Envelope::ok(AccessTokenResponse { access_token })))
}

/// POST /users/logout
pub async fn logout<R, M>(
    State(state): State<UsersAppState<R, M>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let mut response_headers = HeaderMap::new();

    if extract_cookie(&headers, &state.config.refresh_cookie_name).is_some()
        && let Some(cookie) = delete_cookie_header(&state.config.refresh_cookie())
    {
        response_headers.insert(header::SET_COOKIE, cookie);
    }

    (StatusCode::NO_CONTENT, response_headers)
}
