mod models;
mod seed;
mod sqlite_song_store;
mod trait_def;

pub use models::{NewSong, SongRecord};
pub use seed::{seed_sample_songs, seed_songs};
pub use sqlite_song_store::SqliteSongStore;
pub use trait_def::SongStore;
