use super::{FetchError, SongSource};
use crate::songs::{Catalog, Mood, Song};
use async_trait::async_trait;

/// Serves songs from an in-memory [`Catalog`]. Never fails.
pub struct LocalSongSource {
    catalog: &'static Catalog,
}

impl LocalSongSource {
    pub fn new(catalog: &'static Catalog) -> Self {
        Self { catalog }
    }

    pub fn sample() -> Self {
        Self::new(Catalog::sample())
    }
}

#[async_trait]
impl SongSource for LocalSongSource {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn get_by_mood(&self, mood: &Mood) -> Result<Vec<Song>, FetchError> {
        Ok(self.catalog.get_songs(mood).to_vec())
    }

    async fn available_moods(&self) -> Result<Vec<Mood>, FetchError> {
        Ok(self.catalog.moods().cloned().collect())
    }
}
