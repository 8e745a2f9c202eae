//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per backend endpoint. When API routes or request
//! formats change, update only this file.
#![allow(dead_code)]

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client with cookie-based session management
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestClient {
    /// Creates a new unauthenticated client
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// Creates a client logged in as [`TEST_USER`]
    ///
    /// # Panics
    ///
    /// Panics if authentication fails (indicates test infrastructure problem).
    pub async fn authenticated(base_url: String) -> Self {
        Self::authenticated_as(base_url, TEST_USER, TEST_PASS).await
    }

    pub async fn authenticated_as(base_url: String, login: &str, password: &str) -> Self {
        let client = Self::new(base_url);

        let response = client.login(login, password).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "Test user authentication failed: {:?}",
            response.text().await
        );

        client
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========================================================================
    // Authentication Endpoints
    // ========================================================================

    /// POST /api/auth/register
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Response {
        self.post_json(
            "/api/auth/register",
            json!({
                "username": username,
                "email": email,
                "password": password,
            }),
        )
        .await
    }

    /// POST /api/auth/login
    pub async fn login(&self, login: &str, password: &str) -> Response {
        self.post_json(
            "/api/auth/login",
            json!({
                "login": login,
                "password": password,
            }),
        )
        .await
    }

    /// POST /api/auth/logout
    pub async fn logout(&self) -> Response {
        self.client
            .post(self.url("/api/auth/logout"))
            .send()
            .await
            .expect("Logout request failed")
    }

    /// POST /api/auth/refresh with the refresh token as bearer
    pub async fn refresh(&self, refresh_token: &str) -> Response {
        self.client
            .post(self.url("/api/auth/refresh"))
            .bearer_auth(refresh_token)
            .send()
            .await
            .expect("Refresh request failed")
    }

    /// GET /api/auth/me
    pub async fn me(&self) -> Response {
        self.get("/api/auth/me").await
    }

    // ========================================================================
    // User Endpoints
    // ========================================================================

    /// GET /api/users
    pub async fn get_users(&self) -> Response {
        self.get("/api/users").await
    }

    /// GET /api/users/{id}
    pub async fn get_user(&self, id: usize) -> Response {
        self.get(&format!("/api/users/{}", id)).await
    }

    /// PUT /api/users/{id}
    pub async fn update_user(&self, id: usize, body: Value) -> Response {
        self.client
            .put(self.url(&format!("/api/users/{}", id)))
            .json(&body)
            .send()
            .await
            .expect("Update user request failed")
    }

    /// DELETE /api/users/{id}
    pub async fn delete_user(&self, id: usize) -> Response {
        self.client
            .delete(self.url(&format!("/api/users/{}", id)))
            .send()
            .await
            .expect("Delete user request failed")
    }

    // ========================================================================
    // Song Endpoints
    // ========================================================================

    /// GET /api/songs, optionally filtered by emotion
    pub async fn get_songs(&self, emotion: Option<&str>) -> Response {
        let mut request = self.client.get(self.url("/api/songs"));
        if let Some(emotion) = emotion {
            request = request.query(&[("emotion", emotion)]);
        }
        request.send().await.expect("Get songs request failed")
    }

    /// GET /api/songs/{id}
    pub async fn get_song(&self, id: u64) -> Response {
        self.get(&format!("/api/songs/{}", id)).await
    }

    /// POST /api/songs
    pub async fn create_song(&self, body: Value) -> Response {
        self.post_json("/api/songs", body).await
    }

    /// GET /api/songs/emotions
    pub async fn get_emotions(&self) -> Response {
        self.get("/api/songs/emotions").await
    }

    /// GET /api/health
    pub async fn health(&self) -> Response {
        self.get("/api/health").await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    async fn post_json(&self, path: &str, body: Value) -> Response {
        self.client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("POST request failed")
    }
}
