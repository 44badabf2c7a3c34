//! Feed Error Types
//!
//! Feed-specific variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::db::QueryError;
use thiserror::Error;

/// Feed-specific result type alias
pub type FeedResult<T> = Result<T, FeedError>;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("bad request : missing {0}")]
    MissingField(&'static str),

    /// Malformed body or path parameter
    #[error("{0}")]
    InvalidInput(String),

    /// Message empty after trimming, or longer than the configured limit
    #[error("Tweet message must be between 1 and {0} characters")]
    InvalidMessage(usize),

    #[error("Tweet does not exist")]
    TweetNotFound,

    #[error("User not allowed to delete this tweet")]
    NotTweetAuthor,

    #[error("You cannot like your own tweet")]
    OwnTweetLike,

    #[error("Tweet already liked")]
    AlreadyLiked,

    #[error("Like not found")]
    LikeNotFound,

    #[error("Database error: {0}")]
    Database(#[from] QueryError),
}

impl FeedError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeedError::MissingField(_)
            | FeedError::InvalidInput(_)
            | FeedError::InvalidMessage(_) => ErrorKind::BadRequest,
            FeedError::TweetNotFound | FeedError::LikeNotFound => ErrorKind::NotFound,
            FeedError::NotTweetAuthor | FeedError::OwnTweetLike => ErrorKind::Forbidden,
            FeedError::AlreadyLiked => ErrorKind::Conflict,
            FeedError::Database(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    fn log(&self) {
        match self {
            FeedError::Database(e) => {
                tracing::error!(error = %e, "Feed database error");
            }
            FeedError::NotTweetAuthor => {
                tracing::warn!("Tweet delete attempted by non-author");
            }
            _ => {
                tracing::debug!(error = %self, "Feed error");
            }
        }
    }
}

impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for FeedError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        FeedError::InvalidInput(format!("bad request : {}", rejection.body_text()))
    }
}

impl From<axum::extract::rejection::PathRejection> for FeedError {
    fn from(_: axum::extract::rejection::PathRejection) -> Self {
        FeedError::InvalidInput("bad request : invalid tweet id".to_string())
    }
}

impl From<sqlx::Error> for FeedError {
    fn from(err: sqlx::Error) -> Self {
        FeedError::Database(QueryError::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_codes() {
        let cases = [
            (FeedError::MissingField("message"), StatusCode::BAD_REQUEST),
            (FeedError::InvalidMessage(280), StatusCode::BAD_REQUEST),
            (FeedError::TweetNotFound, StatusCode::NOT_FOUND),
            (FeedError::NotTweetAuthor, StatusCode::FORBIDDEN),
            (FeedError::OwnTweetLike, StatusCode::FORBIDDEN),
            (FeedError::AlreadyLiked, StatusCode::CONFLICT),
            (FeedError::LikeNotFound, StatusCode::NOT_FOUND),
            (
                FeedError::Database(QueryError::NoColumns("insert")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_server_errors_are_opaque() {
        let err = FeedError::Database(QueryError::NoColumns("update"));
        assert_eq!(err.to_app_error().public_message(), "Server Error");
        assert_eq!(
            FeedError::InvalidMessage(280).to_app_error().public_message(),
            "Tweet message must be between 1 and 280 characters"
        );
    }
}
