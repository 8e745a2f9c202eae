//! End-to-end tests for authentication endpoints
//!
//! Tests registration, login, logout, token refresh and authentication requirements.

mod common;

use common::{TestClient, TestServer, TEST_EMAIL, TEST_PASS, TEST_USER};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_login_with_username() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.login(TEST_USER, TEST_PASS).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["username"], TEST_USER);
    assert!(body["access_token"].as_str().is_some());
    assert!(body["refresh_token"].as_str().is_some());
}

#[tokio::test]
async fn test_login_with_email() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.login(TEST_EMAIL, TEST_PASS).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_with_invalid_password() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.login(TEST_USER, "wrong_password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid username/email or password");
}

#[tokio::test]
async fn test_login_with_nonexistent_user() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.login("nonexistent_user", "password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_missing_fields() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&serde_json::json!({ "login": TEST_USER }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Username/Email and password are required");
}

#[tokio::test]
async fn test_register_logs_in() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .register("lakshmi_kochi", "lakshmi.nair@kochi.in", "secret1")
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["email"], "lakshmi.nair@kochi.in");

    // The session cookie was set by the registration
    let response = client.me().await;
    assert_eq!(response.status(), StatusCode::OK);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["username"], "lakshmi_kochi");
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.register("arun_mysore", "arun.rao@mysore.in", "12345").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Password must be at least 6 characters long");
}

#[tokio::test]
async fn test_register_rejects_taken_username_and_email() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .register(TEST_USER, "someone.else@moodtunes.test", "secret1")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Username already exists");

    let response = client.register("someone_else", TEST_EMAIL, "secret1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Email already exists");
}

#[tokio::test]
async fn test_protected_endpoint_requires_authentication() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.me().await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Authorization token is missing");
}

#[tokio::test]
async fn test_bearer_token_authenticates() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let body: Value = client.login(TEST_USER, TEST_PASS).await.json().await.unwrap();
    let access_token = body["access_token"].as_str().unwrap();

    // A fresh client without the cookie
    let bare = reqwest::Client::new();
    let response = bare
        .get(format!("{}/api/auth/me", server.base_url))
        .bearer_auth(access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = bare
        .get(format!("{}/api/auth/me", server.base_url))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn test_logout_clears_session() {
    let server = TestServer::spawn().await;
    let client = TestClient::authenticated(server.base_url.clone()).await;

    let response = client.me().await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = client.logout().await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Logged out successfully");

    let response = client.me().await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_access_token() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let body: Value = client.login(TEST_USER, TEST_PASS).await.json().await.unwrap();
    let access_token = body["access_token"].as_str().unwrap().to_string();

    let response = client.logout().await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = reqwest::Client::new()
        .get(format!("{}/api/auth/me", server.base_url))
        .bearer_auth(&access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let body: Value = client.login(TEST_USER, TEST_PASS).await.json().await.unwrap();
    let access_token = body["access_token"].as_str().unwrap().to_string();
    let refresh_token = body["refresh_token"].as_str().unwrap().to_string();

    let response = client.refresh(&refresh_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let new_access_token = body["access_token"].as_str().unwrap();
    assert_ne!(new_access_token, access_token);

    let response = reqwest::Client::new()
        .get(format!("{}/api/auth/me", server.base_url))
        .bearer_auth(new_access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let body: Value = client.login(TEST_USER, TEST_PASS).await.json().await.unwrap();
    let access_token = body["access_token"].as_str().unwrap().to_string();

    let response = client.refresh(&access_token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_is_public() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.health().await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}
