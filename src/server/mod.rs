mod api_error;
pub mod config;
mod http_layers;
pub mod server;
mod session;
mod songs;
pub mod state;

pub use api_error::json_error;
pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, run_server, spawn_token_pruning};
pub use session::COOKIE_SESSION_TOKEN_KEY;
pub(self) use songs::make_song_routes;
