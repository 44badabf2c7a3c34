//! Router-level tests against in-memory collaborators

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use kernel::id::UserId;
use platform::mail::{MailError, MailMessage, Mailer};
use platform::token::VerificationToken;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName, user_password::UserPassword};
use crate::error::{AuthError, AuthResult};
use crate::presentation::router::users_router_generic;

// ============================================================================
// In-memory collaborators
// ============================================================================

#[derive(Clone, Default)]
struct MemoryUserRepository {
    users: Arc<Mutex<Vec<User>>>,
    next_id: Arc<AtomicI64>,
    /// Drop the target user right before the next write lands
    delete_before_write: Arc<AtomicBool>,
}

impl MemoryUserRepository {
    fn snapshot(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }

    fn find(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| pred(u)).cloned()
    }

    fn update(&self, id: UserId, f: impl FnOnce(&mut User)) -> bool {
        let mut users = self.users.lock().unwrap();
        if self.delete_before_write.swap(false, Ordering::SeqCst) {
            users.retain(|u| u.id != id);
        }
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                f(user);
                true
            }
            None => false,
        }
    }

    fn delete_before_next_write(&self) {
        self.delete_before_write.store(true, Ordering::SeqCst);
    }
}

impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: &NewUser) -> AuthResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(AuthError::UserNameTaken);
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }

        let created = User {
            id: UserId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            password: user.password.clone(),
            is_verified: false,
            token: Some(user.verification.token.clone()),
            token_expiration: Some(user.verification.expires_at),
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        Ok(self.find(|u| u.id == id))
    }

    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<User>> {
        Ok(self.find(|u| &u.username == username))
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self.find(|u| &u.email == email))
    }

    async fn find_by_token(&self, token: &str) -> AuthResult<Option<User>> {
        Ok(self.find(|u| u.token.as_deref() == Some(token)))
    }

    async fn mark_verified(&self, id: UserId) -> AuthResult<bool> {
        Ok(self.update(id, |u| {
            u.is_verified = true;
            u.token = None;
            u.token_expiration = None;
        }))
    }

    async fn set_token(&self, id: UserId, token: &VerificationToken) -> AuthResult<bool> {
        Ok(self.update(id, |u| {
            u.token = Some(token.token.clone());
            u.token_expiration = Some(token.expires_at);
        }))
    }

    async fn update_password(&self, id: UserId, password: &UserPassword) -> AuthResult<bool> {
        Ok(self.update(id, |u| {
            u.password = password.clone();
            u.token = None;
            u.token_expiration = None;
        }))
    }

    async fn delete(&self, id: UserId) -> AuthResult<bool> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }

    async fn delete_expired_unverified(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.is_verified || !u.token_expired_at(now));
        Ok((before - users.len()) as u64)
    }
}

#[derive(Clone, Default)]
struct RecordingMailer {
    sent: Arc<Mutex<Vec<MailMessage>>>,
}

impl RecordingMailer {
    fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

struct FailingMailer;

impl Mailer for FailingMailer {
    async fn send(&self, _message: &MailMessage) -> Result<(), MailError> {
        Err(MailError::Rejected(503))
    }
}

// ============================================================================
// Helpers
// ============================================================================

struct TestApp {
    router: Router,
    repo: MemoryUserRepository,
    mailer: RecordingMailer,
    config: Arc<AuthConfig>,
}

fn test_app() -> TestApp {
    let repo = MemoryUserRepository::default();
    let mailer = RecordingMailer::default();
    let config = Arc::new(AuthConfig::development());
    let router = users_router_generic(repo.clone(), mailer.clone(), config.clone());

    TestApp {
        router,
        repo,
        mailer,
        config,
    }
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: &Router, req: Request<Body>) -> Response<Body> {
    router.clone().oneshot(req).await.unwrap()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn alice() -> Value {
    json!({"username": "a", "email": "a@x.com", "firstname": "A", "password": "p"})
}

/// Sign up, then follow the verification link
async fn verified_user(app: &TestApp, body: Value) -> User {
    let username = body["username"].as_str().unwrap().to_string();
    let response = send(&app.router, json_request("POST", "/signup", body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let user = app.repo.find(|u| u.username.as_str() == username).unwrap();
    let token = user.token.clone().unwrap();
    let response = send(
        &app.router,
        Request::builder()
            .uri(format!("/verify-email/{token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    app.repo.find(|u| u.id == user.id).unwrap()
}

fn refresh_cookie(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

// ============================================================================
// Sign Up
// ============================================================================

mod sign_up_tests {
    use super::*;

    #[tokio::test]
    async fn test_signup_then_duplicate_is_rejected() {
        let app = test_app();

        let response = send(&app.router, json_request("POST", "/signup", alice())).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["result"], true);

        let response = send(&app.router, json_request("POST", "/signup", alice())).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body, json!({"result": false, "message": "User already exists"}));

        assert_eq!(app.repo.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_signup_duplicate_email() {
        let app = test_app();
        send(&app.router, json_request("POST", "/signup", alice())).await;

        let response = send(
            &app.router,
            json_request(
                "POST",
                "/signup",
                json!({"username": "b", "email": "A@X.com", "firstname": "B", "password": "p"}),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(response).await["message"],
            "This email is used by another account"
        );
        assert_eq!(app.repo.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn test_signup_missing_field() {
        let app = test_app();

        let response = send(
            &app.router,
            json_request("POST", "/signup", json!({"username": "a", "firstname": ""})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "bad request : missing password"
        );
        assert!(app.repo.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_signup_rejects_bad_email() {
        let app = test_app();

        let response = send(
            &app.router,
            json_request(
                "POST",
                "/signup",
                json!({"username": "a", "email": "not-an-email", "firstname": "A", "password": "p"}),
            ),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(app.repo.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_signup_mails_verification_link() {
        let app = test_app();
        send(&app.router, json_request("POST", "/signup", alice())).await;

        let user = app.repo.snapshot().remove(0);
        assert!(!user.is_verified);
        let token = user.token.unwrap();
        assert_eq!(token.len(), 32);

        let sent = app.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@x.com");
        assert!(sent[0].html.contains(&app.config.verification_link(&token)));
    }

    #[tokio::test]
    async fn test_signup_survives_mail_failure() {
        let repo = MemoryUserRepository::default();
        let router = users_router_generic(
            repo.clone(),
            FailingMailer,
            Arc::new(AuthConfig::development()),
        );

        let response = send(&router, json_request("POST", "/signup", alice())).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(repo.snapshot().len(), 1);
    }
}

// ============================================================================
// Verification
// ============================================================================

mod verify_email_tests {
    use super::*;

    #[tokio::test]
    async fn test_verify_redirects_and_clears_token() {
        let app = test_app();
        let user = verified_user(&app, alice()).await;

        assert!(user.is_verified);
        assert!(user.token.is_none());
        assert!(user.token_expiration.is_none());
    }

    #[tokio::test]
    async fn test_verify_redirect_location() {
        let app = test_app();
        send(&app.router, json_request("POST", "/signup", alice())).await;
        let token = app.repo.snapshot()[0].token.clone().unwrap();

        let response = send(
            &app.router,
            Request::builder()
                .uri(format!("/verify-email/{token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            app.config.email_verified_redirect().as_str()
        );
    }

    #[tokio::test]
    async fn test_verify_unknown_token() {
        let app = test_app();

        let response = send(
            &app.router,
            Request::builder()
                .uri("/verify-email/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "Invalid Verification Link"
        );
    }

    #[tokio::test]
    async fn test_verify_expired_token_deletes_user() {
        let app = test_app();
        send(&app.router, json_request("POST", "/signup", alice())).await;
        let user = app.repo.snapshot().remove(0);
        app.repo.update(user.id, |u| {
            u.token_expiration = Some(Utc::now() - ChronoDuration::seconds(1));
        });

        let response = send(
            &app.router,
            Request::builder()
                .uri(format!("/verify-email/{}", user.token.unwrap()))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "Token has expired. Please signup again"
        );
        assert!(app.repo.snapshot().is_empty());

        // The name is free again
        let response = send(&app.router, json_request("POST", "/signup", alice())).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_verify_after_account_vanished() {
        let app = test_app();
        send(&app.router, json_request("POST", "/signup", alice())).await;
        let token = app.repo.snapshot()[0].token.clone().unwrap();
        app.repo.delete_before_next_write();

        let response = send(
            &app.router,
            Request::builder()
                .uri(format!("/verify-email/{token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "Invalid Verification Link"
        );
        assert!(app.repo.snapshot().is_empty());
    }
}

// ============================================================================
// Sign In / Refresh / Logout
// ============================================================================

mod session_tests {
    use super::*;
    use platform::token::{TokenKind, create_token, verify_token};
    use std::time::Duration;

    #[tokio::test]
    async fn test_signin_requires_verification() {
        let app = test_app();
        send(&app.router, json_request("POST", "/signup", alice())).await;

        let response = send(
            &app.router,
            json_request("POST", "/signin", json!({"username": "a", "password": "p"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await["message"],
            "Please verify your email address"
        );
    }

    #[tokio::test]
    async fn test_signin_wrong_credentials() {
        let app = test_app();
        verified_user(&app, alice()).await;

        let response = send(
            &app.router,
            json_request("POST", "/signin", json!({"username": "zz", "password": "p"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "Wrong username");

        let response = send(
            &app.router,
            json_request("POST", "/signin", json!({"username": "a", "password": "q"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "Wrong password");
    }

    #[tokio::test]
    async fn test_signin_issues_tokens() {
        let app = test_app();
        let user = verified_user(&app, alice()).await;

        let response = send(
            &app.router,
            json_request("POST", "/signin", json!({"username": "a", "password": "p"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(set_cookie.starts_with("refreshToken="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Path=/"));
        assert!(set_cookie.contains("SameSite=Lax"));

        let body = body_json(response).await;
        assert_eq!(body["result"], true);
        assert_eq!(
            body["user"],
            json!({"id": user.id.get(), "username": "a", "firstname": "A", "email": "a@x.com"})
        );

        let access = body["accessToken"].as_str().unwrap();
        let claims = verify_token(access, TokenKind::Access, &app.config.token_secrets).unwrap();
        assert_eq!(claims.sub, user.id.get());
    }

    #[tokio::test]
    async fn test_refresh_with_valid_cookie() {
        let app = test_app();
        verified_user(&app, alice()).await;

        let response = send(
            &app.router,
            json_request("POST", "/signin", json!({"username": "a", "password": "p"})),
        )
        .await;
        let cookie = refresh_cookie(&response);

        let response = send(
            &app.router,
            Request::builder()
                .method("POST")
                .uri("/refresh_token")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let access = body["accessToken"].as_str().unwrap();
        assert!(verify_token(access, TokenKind::Access, &app.config.token_secrets).is_some());
    }

    #[tokio::test]
    async fn test_refresh_failures() {
        let app = test_app();
        send(&app.router, json_request("POST", "/signup", alice())).await;
        let unverified = app.repo.snapshot().remove(0);

        let refresh = |cookie: Option<String>| {
            let mut builder = Request::builder().method("POST").uri("/refresh_token");
            if let Some(cookie) = cookie {
                builder = builder.header(header::COOKIE, cookie);
            }
            builder.body(Body::empty()).unwrap()
        };

        let response = send(&app.router, refresh(None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await["message"],
            "No refresh token provided"
        );

        let response = send(&app.router, refresh(Some("refreshToken=forged".into()))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await["message"],
            "Invalid or expired refresh token"
        );

        // An access token is not a refresh token
        let access = create_token(
            unverified.id.get(),
            Duration::from_secs(60),
            TokenKind::Access,
            &app.config.token_secrets,
        )
        .unwrap();
        let response = send(&app.router, refresh(Some(format!("refreshToken={access}")))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let token = create_token(
            unverified.id.get(),
            Duration::from_secs(60),
            TokenKind::Refresh,
            &app.config.token_secrets,
        )
        .unwrap();
        let response = send(&app.router, refresh(Some(format!("refreshToken={token}")))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["message"], "Invalid User");
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let app = test_app();

        let response = send(
            &app.router,
            Request::builder()
                .method("POST")
                .uri("/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let response = send(
            &app.router,
            Request::builder()
                .method("POST")
                .uri("/logout")
                .header(header::COOKIE, "refreshToken=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let set_cookie = response.headers().get(header::SET_COOKIE).unwrap();
        assert!(set_cookie.to_str().unwrap().contains("Max-Age=0"));
    }
}

// ============================================================================
// Password Reset
// ============================================================================

mod password_reset_tests {
    use super::*;

    #[tokio::test]
    async fn test_forgot_password_errors() {
        let app = test_app();

        let response = send(
            &app.router,
            json_request("POST", "/forgot-password", json!({"email": "a@x.com"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "User not found");

        send(&app.router, json_request("POST", "/signup", alice())).await;
        let response = send(
            &app.router,
            json_request("POST", "/forgot-password", json!({"email": "a@x.com"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await["message"],
            "Please check your email address"
        );
    }

    #[tokio::test]
    async fn test_reset_password_flow() {
        let app = test_app();
        let user = verified_user(&app, alice()).await;

        let response = send(
            &app.router,
            json_request("POST", "/forgot-password", json!({"email": "a@x.com"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let token = app.repo.find(|u| u.id == user.id).unwrap().token.unwrap();
        let last_mail = app.mailer.sent().pop().unwrap();
        assert!(last_mail.html.contains(&app.config.reset_password_link(&token)));

        let response = send(
            &app.router,
            json_request(
                "POST",
                "/reset-password",
                json!({"token": token, "password": "new secret"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["message"],
            "Password successfully updated"
        );

        // Single use
        let response = send(
            &app.router,
            json_request(
                "POST",
                "/reset-password",
                json!({"token": token, "password": "again"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "Invalid link");

        let response = send(
            &app.router,
            json_request(
                "POST",
                "/signin",
                json!({"username": "a", "password": "new secret"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_reset_password_expired_link() {
        let app = test_app();
        let user = verified_user(&app, alice()).await;
        send(
            &app.router,
            json_request("POST", "/forgot-password", json!({"email": "a@x.com"})),
        )
        .await;
        app.repo.update(user.id, |u| {
            u.token_expiration = Some(Utc::now() - ChronoDuration::minutes(1));
        });
        let token = app.repo.find(|u| u.id == user.id).unwrap().token.unwrap();

        let response = send(
            &app.router,
            json_request(
                "POST",
                "/reset-password",
                json!({"token": token, "password": "x"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_reset_flow_after_account_vanished() {
        let app = test_app();
        verified_user(&app, alice()).await;
        let mails_before = app.mailer.sent().len();

        app.repo.delete_before_next_write();
        let response = send(
            &app.router,
            json_request("POST", "/forgot-password", json!({"email": "a@x.com"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "User not found");
        assert_eq!(app.mailer.sent().len(), mails_before);

        let app = test_app();
        let user = verified_user(&app, alice()).await;
        send(
            &app.router,
            json_request("POST", "/forgot-password", json!({"email": "a@x.com"})),
        )
        .await;
        let token = app.repo.find(|u| u.id == user.id).unwrap().token.unwrap();

        app.repo.delete_before_next_write();
        let response = send(
            &app.router,
            json_request(
                "POST",
                "/reset-password",
                json!({"token": token, "password": "new secret"}),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "Invalid link");
    }
}

// ============================================================================
// Access-token middleware
// ============================================================================

mod middleware_tests {
    use super::*;
    use axum::extract::Extension;
    use axum::routing::get;
    use kernel::auth::AuthUser;
    use platform::token::{TokenKind, create_token};
    use std::time::Duration;

    use crate::presentation::middleware::require_access_token;

    fn protected(config: Arc<AuthConfig>) -> Router {
        Router::new()
            .route(
                "/me",
                get(|Extension(user): Extension<AuthUser>| async move {
                    user.user_id.get().to_string()
                }),
            )
            .route_layer(axum::middleware::from_fn_with_state(
                config,
                require_access_token,
            ))
    }

    fn get_me(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/me");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_token() {
        let router = protected(Arc::new(AuthConfig::development()));

        let response = send(&router, get_me(None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "Token missing");
    }

    #[tokio::test]
    async fn test_invalid_and_foreign_tokens() {
        let config = Arc::new(AuthConfig::development());
        let router = protected(config.clone());

        let response = send(&router, get_me(Some("Bearer not.a-token"))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await["message"],
            "Token expired or invalid"
        );

        // Signed by another process
        let other = AuthConfig::development();
        let token = create_token(
            1,
            Duration::from_secs(60),
            TokenKind::Access,
            &other.token_secrets,
        )
        .unwrap();
        let response = send(&router, get_me(Some(&format!("Bearer {token}")))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_attaches_user() {
        let config = Arc::new(AuthConfig::development());
        let router = protected(config.clone());
        let token = create_token(
            42,
            Duration::from_secs(60),
            TokenKind::Access,
            &config.token_secrets,
        )
        .unwrap();

        let response = send(&router, get_me(Some(&format!("Bearer {token}")))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"42");
    }
}

// ============================================================================
// Sweeper
// ============================================================================

mod sweep_tests {
    use super::*;
    use crate::application::sweep_expired::SweepExpiredSignupsUseCase;

    #[tokio::test]
    async fn test_sweep_removes_only_expired_signups() {
        let app = test_app();
        verified_user(&app, alice()).await;
        for name in ["b", "c"] {
            send(
                &app.router,
                json_request(
                    "POST",
                    "/signup",
                    json!({"username": name, "email": format!("{name}@x.com"), "firstname": "X", "password": "p"}),
                ),
            )
            .await;
        }
        let stale = app.repo.find(|u| u.username.as_str() == "b").unwrap();
        app.repo.update(stale.id, |u| {
            u.token_expiration = Some(Utc::now() - ChronoDuration::hours(1));
        });

        let sweeper = SweepExpiredSignupsUseCase::new(Arc::new(app.repo.clone()));
        assert_eq!(sweeper.execute().await.unwrap(), 1);
        assert_eq!(sweeper.execute().await.unwrap(), 0);

        let mut names: Vec<_> = app
            .repo
            .snapshot()
            .into_iter()
            .map(|u| u.username.as_str().to_string())
            .collect();
        names.sort();
        assert_eq!(names, ["a", "c"]);
    }
}
