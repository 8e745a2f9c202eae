//! MoodTunes: a mood based song browser and its backend.
//!
//! The library exposes the modules used by the binaries and the end-to-end tests.

pub mod browse;
pub mod cli_style;
pub mod client;
pub mod config;
pub mod server;
pub mod song_store;
pub mod songs;
pub mod source;
pub mod sqlite_persistence;
pub mod user;

pub use server::{run_server, RequestsLoggingLevel};
pub use song_store::{SongStore, SqliteSongStore};
pub use songs::{Catalog, Mood, Song};
pub use source::{FetchError, LocalSongSource, RemoteSongSource, SongSource};
pub use user::{SqliteUserStore, UserManager, UserStore};
