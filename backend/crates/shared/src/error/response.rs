//! HTTP rendering of [`AppError`]
//!
//! Every failure leaves the server as `{"result": false, "message": ...}`
//! with the status of its [`ErrorKind`](super::kind::ErrorKind).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::app_error::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
        }

        let body = serde_json::json!({
            "result": false,
            "message": self.public_message(),
        });

        (status, Json(body)).into_response()
    }
}
