use crate::domain::error::WebhookError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// HTTP face of a failed notification delivery. Each status means one class of failure.
pub struct ApiError(pub WebhookError);

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self.0 {
            WebhookError::Authentication(msg) => {
                tracing::warn!("notification rejected: {msg}");
                (
                    StatusCode::UNAUTHORIZED,
                    "invalid_signature",
                    "invalid notification signature".to_string(),
                )
            }
            WebhookError::MalformedPayload(err) => {
                tracing::warn!("malformed notification: {err}");
                (StatusCode::BAD_REQUEST, "malformed_payload", err.to_string())
            }
            WebhookError::Handler(err) => {
                tracing::error!("notification handler failed: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "handler_error",
                    "internal error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error_code": error_code,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}
