//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod config;
pub mod forgot_password;
pub mod mail_templates;
pub mod refresh_token;
pub mod reset_password;
pub mod sign_in;
pub mod sign_up;
pub mod sweep_expired;
pub mod verify_email;

// Re-exports
pub use authenticate::AuthenticateUseCase;
pub use config::AuthConfig;
pub use forgot_password::ForgotPasswordUseCase;
pub use refresh_token::RefreshTokenUseCase;
pub use reset_password::{ResetPasswordInput, ResetPasswordUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use sweep_expired::SweepExpiredSignupsUseCase;
pub use verify_email::VerifyEmailUseCase;
