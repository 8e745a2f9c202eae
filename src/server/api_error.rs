use crate::user::UserError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Every API failure is answered with `{"error": <message>}`.
pub fn json_error<T: Into<String>>(status: StatusCode, message: T) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

pub fn internal_error(err: anyhow::Error) -> Response {
    error!("Internal error: {:#}", err);
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

impl UserError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UserError::MissingRegistrationFields
            | UserError::MissingLoginFields
            | UserError::PasswordTooShort
            | UserError::UsernameTaken
            | UserError::EmailTaken => StatusCode::BAD_REQUEST,
            UserError::InvalidCredentials | UserError::InvalidToken => StatusCode::UNAUTHORIZED,
            UserError::Forbidden(_) => StatusCode::FORBIDDEN,
            UserError::NotFound => StatusCode::NOT_FOUND,
            UserError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        match self {
            UserError::Internal(err) => internal_error(err),
            other => json_error(other.status_code(), other.to_string()),
        }
    }
}
