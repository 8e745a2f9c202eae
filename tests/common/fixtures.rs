//! Test fixture creation
//!
//! Each server gets fresh databases in its own temp directory.

use super::constants::*;
use anyhow::Result;
use moodtunes::song_store::{seed_sample_songs, SongStore, SqliteSongStore};
use moodtunes::user::{SqliteUserStore, TokenLifetimes, UserManager};
use std::sync::Arc;
use tempfile::TempDir;

/// Creates songs.db in `dir`, seeded with the sample songs.
pub fn create_test_song_store(dir: &TempDir) -> Result<Arc<dyn SongStore>> {
    let store = SqliteSongStore::new(dir.path().join("songs.db"))?;
    seed_sample_songs(&store)?;
    Ok(Arc::new(store))
}

/// Creates user.db in `dir` with [`TEST_USER`] and [`OTHER_USER`] already registered.
pub fn create_test_user_manager(dir: &TempDir) -> Result<UserManager> {
    let user_store = SqliteUserStore::new(dir.path().join("user.db"))?;
    let user_manager = UserManager::new(Arc::new(user_store), TokenLifetimes::default());
    user_manager.add_user(TEST_USER, TEST_EMAIL, TEST_PASS)?;
    user_manager.add_user(OTHER_USER, OTHER_EMAIL, OTHER_PASS)?;
    Ok(user_manager)
}
