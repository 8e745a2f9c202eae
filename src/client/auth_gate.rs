//! Login, registration and the client side session.

use super::error::AuthError;
use crate::user::{is_password_long_enough, UserView};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

pub const PASSWORD_TOO_SHORT_MESSAGE: &str = "Password must be at least 6 characters";

#[async_trait]
pub trait AuthGate: Send + Sync {
    async fn login(&self, identifier: &str, password: &str) -> Result<UserView, AuthError>;

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserView, AuthError>;

    async fn logout(&self);

    fn current_user(&self) -> Option<UserView>;

    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }
}

/// Registration passwords are checked locally first, so a short one never reaches the
/// backend.
pub fn validate_registration_password(password: &str) -> Result<(), AuthError> {
    if is_password_long_enough(password) {
        Ok(())
    } else {
        Err(AuthError::Validation(PASSWORD_TOO_SHORT_MESSAGE.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthSession {
    pub user: UserView,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Deserialize)]
struct AuthResponse {
    user: UserView,
    access_token: String,
    refresh_token: String,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    login: &'a str,
    password: &'a str,
}

/// [`AuthGate`] backed by the `/api/auth` endpoints.
pub struct HttpAuthGate {
    client: reqwest::Client,
    base_url: String,
    session: Mutex<Option<AuthSession>>,
}

impl HttpAuthGate {
    pub fn new<T: AsRef<str>>(base_url: T) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client<T: AsRef<str>>(client: reqwest::Client, base_url: T) -> Self {
        Self {
            client,
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            session: Mutex::new(None),
        }
    }

    pub fn session(&self) -> Option<AuthSession> {
        self.session.lock().unwrap().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.session
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/auth/{}", self.base_url, path)
    }

    /// Turns a non-success response into the backend's `error` message.
    async fn rejection(response: reqwest::Response) -> AuthError {
        let status = response.status();
        match response.json::<ErrorResponse>().await {
            Ok(body) => AuthError::Rejected(body.error),
            Err(_) => AuthError::Rejected(format!("Request failed with status {}", status)),
        }
    }

    async fn authenticate<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<UserView, AuthError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|err| {
                error!("Auth request to {} failed: {}", path, err);
                AuthError::unavailable()
            })?;

        if !response.status().is_success() {
            let rejection = Self::rejection(response).await;
            debug!("Auth request to {} rejected: {}", path, rejection);
            return Err(rejection);
        }

        let auth: AuthResponse = response.json().await.map_err(|err| {
            error!("Could not parse auth response: {}", err);
            AuthError::unavailable()
        })?;
        let user = auth.user.clone();
        *self.session.lock().unwrap() = Some(AuthSession {
            user: auth.user,
            access_token: auth.access_token,
            refresh_token: auth.refresh_token,
        });
        info!("Authenticated as {}", user.username);
        Ok(user)
    }

    /// Exchanges the refresh token for a new access token.
    pub async fn refresh(&self) -> Result<(), AuthError> {
        let refresh_token = match self.session() {
            Some(session) => session.refresh_token,
            None => return Err(AuthError::Rejected("Not logged in".to_string())),
        };

        let response = self
            .client
            .post(self.url("refresh"))
            .bearer_auth(refresh_token)
            .send()
            .await
            .map_err(|err| {
                error!("Token refresh failed: {}", err);
                AuthError::unavailable()
            })?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        let body: RefreshResponse = response.json().await.map_err(|err| {
            error!("Could not parse refresh response: {}", err);
            AuthError::unavailable()
        })?;
        if let Some(session) = self.session.lock().unwrap().as_mut() {
            session.access_token = body.access_token;
        }
        debug!("Access token refreshed");
        Ok(())
    }

    /// Asks the backend who the current access token belongs to.
    pub async fn fetch_current_user(&self) -> Result<UserView, AuthError> {
        let access_token = self
            .access_token()
            .ok_or_else(|| AuthError::Rejected("Not logged in".to_string()))?;
        let response = self
            .client
            .get(self.url("me"))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|err| {
                error!("Fetching current user failed: {}", err);
                AuthError::unavailable()
            })?;
        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }
        response.json().await.map_err(|err| {
            error!("Could not parse user: {}", err);
            AuthError::unavailable()
        })
    }
}

#[async_trait]
impl AuthGate for HttpAuthGate {
    async fn login(&self, identifier: &str, password: &str) -> Result<UserView, AuthError> {
        self.authenticate(
            "login",
            &LoginRequest {
                login: identifier,
                password,
            },
        )
        .await
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserView, AuthError> {
        validate_registration_password(password)?;
        self.authenticate(
            "register",
            &json!({
                "username": username,
                "email": email,
                "password": password,
            }),
        )
        .await
    }

    /// Forgets the local session. The access token is also revoked on the backend when
    /// possible; failing to do so only gets logged.
    async fn logout(&self) {
        let session = self.session.lock().unwrap().take();
        let Some(session) = session else {
            return;
        };
        let result = self
            .client
            .post(self.url("logout"))
            .bearer_auth(&session.access_token)
            .send()
            .await;
        match result {
            Ok(response) if response.status().is_success() => {
                info!("Logged out {}", session.user.username)
            }
            Ok(response) => warn!("Backend logout answered {}", response.status()),
            Err(err) => warn!("Backend logout failed: {}", err),
        }
    }

    fn current_user(&self) -> Option<UserView> {
        self.session.lock().unwrap().as_ref().map(|s| s.user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_registration_password_is_a_validation_error() {
        assert_eq!(
            validate_registration_password("12345"),
            Err(AuthError::Validation(PASSWORD_TOO_SHORT_MESSAGE.to_string()))
        );
        assert!(validate_registration_password("123456").is_ok());
    }

    #[tokio::test]
    async fn register_validates_before_any_request() {
        // Nothing listens on the discard port; a request would fail as Rejected.
        let gate = HttpAuthGate::new("http://127.0.0.1:9");
        let result = gate.register("kavya", "kavya@example.in", "abc").await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
        assert!(!gate.is_authenticated());
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_generic_rejection() {
        let gate = HttpAuthGate::new("http://127.0.0.1:9/");
        let result = gate.login("kavya", "abcdef").await;
        assert_eq!(result, Err(AuthError::unavailable()));
        assert!(gate.current_user().is_none());
    }

    #[tokio::test]
    async fn refresh_without_session_is_rejected() {
        let gate = HttpAuthGate::new("http://127.0.0.1:9");
        assert!(matches!(gate.refresh().await, Err(AuthError::Rejected(_))));
    }

    #[tokio::test]
    async fn logout_without_session_is_a_noop() {
        let gate = HttpAuthGate::new("http://127.0.0.1:9");
        gate.logout().await;
        assert!(!gate.is_authenticated());
    }
}
