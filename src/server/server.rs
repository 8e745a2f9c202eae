use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{debug, error, info};

use crate::song_store::SongStore;
use crate::user::{
    AuthTokenValue, TokenPair, User, UserError, UserManager, UserUpdate, UserView,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use tower_http::{cors::CorsLayer, services::ServeDir};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::session::{BearerToken, Session, COOKIE_SESSION_TOKEN_KEY};
use super::{log_requests, make_song_routes, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug, Default)]
struct RegisterBody {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, Default)]
struct LoginBody {
    pub login: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize)]
struct AuthSuccessResponse {
    message: &'static str,
    user: UserView,
    access_token: String,
    refresh_token: String,
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    };
    Json(stats)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "message": "MoodTunes backend is running",
    }))
}

fn session_cookie(value: &str) -> String {
    Cookie::build((COOKIE_SESSION_TOKEN_KEY, value.to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
        .to_string()
}

fn expired_session_cookie() -> String {
    Cookie::build((COOKIE_SESSION_TOKEN_KEY, ""))
        .path("/")
        .expires(time::OffsetDateTime::now_utc() - time::Duration::days(1))
        .same_site(SameSite::Lax)
        .build()
        .to_string()
}

fn auth_success(
    status: StatusCode,
    message: &'static str,
    user: &User,
    tokens: TokenPair,
) -> Response {
    let cookie = session_cookie(&tokens.access.value.0);
    let body = AuthSuccessResponse {
        message,
        user: UserView::from(user),
        access_token: tokens.access.value.0,
        refresh_token: tokens.refresh.value.0,
    };
    (status, [(header::SET_COOKIE, cookie)], Json(body)).into_response()
}

async fn register(
    State(user_manager): State<GuardedUserManager>,
    body: Result<Json<RegisterBody>, JsonRejection>,
) -> Response {
    let body = body.map(|Json(body)| body).unwrap_or_default();
    let (Some(username), Some(email), Some(password)) = (body.username, body.email, body.password)
    else {
        return UserError::MissingRegistrationFields.into_response();
    };
    debug!("register() called for {}", username);

    let locked_manager = user_manager.lock().unwrap();
    match locked_manager.register(&username, &email, &password) {
        Ok((user, tokens)) => auth_success(
            StatusCode::CREATED,
            "User registered successfully",
            &user,
            tokens,
        ),
        Err(err) => err.into_response(),
    }
}

async fn login(
    State(user_manager): State<GuardedUserManager>,
    body: Result<Json<LoginBody>, JsonRejection>,
) -> Response {
    let body = body.map(|Json(body)| body).unwrap_or_default();
    let (Some(login), Some(password)) = (body.login, body.password) else {
        return UserError::MissingLoginFields.into_response();
    };
    debug!("login() called for {}", login);

    let locked_manager = user_manager.lock().unwrap();
    match locked_manager.login(&login, &password) {
        Ok((user, tokens)) => auth_success(StatusCode::OK, "Login successful", &user, tokens),
        Err(err) => err.into_response(),
    }
}

async fn refresh(
    State(user_manager): State<GuardedUserManager>,
    BearerToken(refresh_token): BearerToken,
) -> Response {
    let locked_manager = user_manager.lock().unwrap();
    match locked_manager.refresh(&refresh_token) {
        Ok(access) => {
            let cookie = session_cookie(&access.value.0);
            (
                [(header::SET_COOKIE, cookie)],
                Json(json!({ "access_token": access.value.0 })),
            )
                .into_response()
        }
        Err(err) => err.into_response(),
    }
}

async fn me(session: Session, State(user_manager): State<GuardedUserManager>) -> Response {
    match user_manager.lock().unwrap().get_user(session.user_id) {
        Ok(user) => Json(UserView::from(&user)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn logout(session: Session, State(user_manager): State<GuardedUserManager>) -> Response {
    let locked_manager = user_manager.lock().unwrap();
    match locked_manager.logout(&AuthTokenValue(session.token)) {
        Ok(()) => (
            [(header::SET_COOKIE, expired_session_cookie())],
            Json(json!({ "message": "Logged out successfully" })),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_users(_session: Session, State(user_manager): State<GuardedUserManager>) -> Response {
    match user_manager.lock().unwrap().get_all_users() {
        Ok(users) => {
            let views: Vec<UserView> = users.iter().map(UserView::from).collect();
            Json(views).into_response()
        }
        Err(err) => err.into_response(),
    }
}

async fn get_user(
    _session: Session,
    State(user_manager): State<GuardedUserManager>,
    id: Result<Path<usize>, PathRejection>,
) -> Response {
    let Ok(Path(id)) = id else {
        return UserError::NotFound.into_response();
    };
    match user_manager.lock().unwrap().get_user(id) {
        Ok(user) => Json(UserView::from(&user)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn put_user(
    session: Session,
    State(user_manager): State<GuardedUserManager>,
    id: Result<Path<usize>, PathRejection>,
    body: Result<Json<UserUpdate>, JsonRejection>,
) -> Response {
    let Ok(Path(id)) = id else {
        return UserError::NotFound.into_response();
    };
    let update = body.map(|Json(update)| update).unwrap_or_default();
    let locked_manager = user_manager.lock().unwrap();
    match locked_manager.update_user(session.user_id, id, update) {
        Ok(user) => Json(UserView::from(&user)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn delete_user(
    session: Session,
    State(user_manager): State<GuardedUserManager>,
    id: Result<Path<usize>, PathRejection>,
) -> Response {
    let Ok(Path(id)) = id else {
        return UserError::NotFound.into_response();
    };
    let locked_manager = user_manager.lock().unwrap();
    match locked_manager.delete_user(session.user_id, id) {
        Ok(()) => Json(json!({ "message": "User deleted successfully" })).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn api_not_found() -> Response {
    super::api_error::json_error(StatusCode::NOT_FOUND, "Not found")
}

pub fn make_app(
    config: ServerConfig,
    song_store: Arc<dyn SongStore>,
    user_manager: GuardedUserManager,
) -> Result<Router> {
    let state = ServerState::new(config.clone(), song_store, user_manager);

    let auth_routes: Router = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/me", get(me))
        .route("/logout", post(logout))
        .with_state(state.clone());

    let user_routes: Router = Router::new()
        .route("/", get(get_users))
        .route("/{id}", get(get_user).put(put_user).delete(delete_user))
        .with_state(state.clone());

    let api_routes: Router = Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .merge(make_song_routes(state.clone()))
        .fallback(api_not_found);

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    let app: Router = home_router
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

/// Periodically removes expired auth tokens until the runtime shuts down.
pub fn spawn_token_pruning(
    user_manager: GuardedUserManager,
    interval: Duration,
) -> Option<tokio::task::JoinHandle<()>> {
    if interval.is_zero() {
        return None;
    }
    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let pruned = user_manager.lock().unwrap().prune_expired_tokens();
            match pruned {
                Ok(0) => {}
                Ok(count) => info!("Pruned {} expired auth tokens", count),
                Err(err) => error!("Failed to prune expired auth tokens: {}", err),
            }
        }
    }))
}

pub async fn run_server(
    config: ServerConfig,
    song_store: Arc<dyn SongStore>,
    user_manager: UserManager,
) -> Result<()> {
    let user_manager: GuardedUserManager = Arc::new(Mutex::new(user_manager));
    let _pruning = spawn_token_pruning(user_manager.clone(), config.token_prune_interval);

    let address = format!("{}:{}", config.host, config.port);
    let app = make_app(config, song_store, user_manager)?;

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on http://{}", address);

    Ok(axum::serve(listener, app).await?)
}
