use axum::extract::FromRef;

use crate::song_store::SongStore;
use crate::user::UserManager;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::ServerConfig;

pub type GuardedSongStore = Arc<dyn SongStore>;
pub type GuardedUserManager = Arc<Mutex<UserManager>>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub song_store: GuardedSongStore,
    pub user_manager: GuardedUserManager,
    pub hash: String,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        song_store: GuardedSongStore,
        user_manager: GuardedUserManager,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            song_store,
            user_manager,
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

impl FromRef<ServerState> for GuardedSongStore {
    fn from_ref(input: &ServerState) -> Self {
        input.song_store.clone()
    }
}

impl FromRef<ServerState> for GuardedUserManager {
    fn from_ref(input: &ServerState) -> Self {
        input.user_manager.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
