use super::{NewSong, SongRecord};
use anyhow::Result;

/// Persistent storage for the backend's songs.
pub trait SongStore: Send + Sync {
    /// All songs in insertion order, or only those whose emotion tag equals
    /// `emotion` ignoring case.
    fn get_songs(&self, emotion: Option<&str>) -> Result<Vec<SongRecord>>;

    fn get_song(&self, song_id: u64) -> Result<Option<SongRecord>>;

    fn create_song(&self, song: NewSong) -> Result<SongRecord>;

    /// Distinct emotion tags in the order they first appear.
    fn get_emotions(&self) -> Result<Vec<String>>;

    fn get_songs_count(&self) -> Result<usize>;
}
