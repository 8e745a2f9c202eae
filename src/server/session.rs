use super::state::ServerState;
use crate::user::{AuthTokenKind, AuthTokenValue, UserError};

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;
use tracing::{debug, error};

/// An authenticated request, resolved from a valid access token.
#[derive(Debug)]
pub struct Session {
    pub user_id: usize,
    pub token: String,
}

/// The raw token a request carries, without any validation.
#[derive(Debug)]
pub struct BearerToken(pub AuthTokenValue);

pub const COOKIE_SESSION_TOKEN_KEY: &str = "session_token";
const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug)]
pub enum SessionExtractionError {
    MissingToken,
    InvalidToken,
    InternalError,
}

impl IntoResponse for SessionExtractionError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SessionExtractionError::MissingToken => {
                (StatusCode::UNAUTHORIZED, "Authorization token is missing")
            }
            SessionExtractionError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "Invalid or expired token")
            }
            SessionExtractionError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn extract_token_from_cookies(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(COOKIE_SESSION_TOKEN_KEY)
        .map(Cookie::value)
        .map(|s| s.to_string())
}

fn extract_token_from_headers(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX).unwrap_or(value).trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn extract_token(parts: &Parts) -> Option<AuthTokenValue> {
    extract_token_from_headers(parts)
        .or_else(|| extract_token_from_cookies(parts))
        .map(AuthTokenValue)
}

impl FromRequestParts<ServerState> for BearerToken {
    type Rejection = SessionExtractionError;

    async fn from_request_parts(
        parts: &mut Parts,
        _ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        extract_token(parts)
            .map(BearerToken)
            .ok_or(SessionExtractionError::MissingToken)
    }
}

impl FromRequestParts<ServerState> for Session {
    type Rejection = SessionExtractionError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let value = extract_token(parts).ok_or_else(|| {
            debug!("No token in headers nor cookies.");
            SessionExtractionError::MissingToken
        })?;

        let user_manager = ctx.user_manager.lock().unwrap();
        match user_manager.resolve_token(&value, AuthTokenKind::Access) {
            Ok(token) => {
                debug!("Resolved session of user_id={}", token.user_id);
                Ok(Session {
                    user_id: token.user_id,
                    token: token.value.0,
                })
            }
            Err(UserError::InvalidToken) => Err(SessionExtractionError::InvalidToken),
            Err(err) => {
                error!("Failed to resolve session token: {}", err);
                Err(SessionExtractionError::InternalError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header_name: &str, value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(header_name, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn reads_bearer_authorization_header() {
        let parts = parts_with("Authorization", "Bearer abc123");
        assert_eq!(extract_token(&parts), Some(AuthTokenValue("abc123".into())));
    }

    #[test]
    fn accepts_bare_authorization_header() {
        let parts = parts_with("Authorization", "abc123");
        assert_eq!(extract_token(&parts), Some(AuthTokenValue("abc123".into())));
    }

    #[test]
    fn falls_back_to_session_cookie() {
        let parts = parts_with("Cookie", "theme=dark; session_token=from-cookie");
        assert_eq!(
            extract_token(&parts),
            Some(AuthTokenValue("from-cookie".into()))
        );
    }

    #[test]
    fn empty_bearer_is_no_token() {
        let parts = parts_with("Authorization", "Bearer ");
        assert_eq!(extract_token(&parts), None);
    }
}
