use crate::songs::{filter, Mood, Song};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The songs could not be retrieved. The underlying cause is logged where it
    /// happens and not carried here.
    #[error("Failed to fetch songs")]
    FetchFailed,
}

/// Where the browser gets its songs from.
#[async_trait]
pub trait SongSource: Send + Sync {
    /// Short name used in logs and the CLI prompt.
    fn name(&self) -> &'static str;

    async fn get_by_mood(&self, mood: &Mood) -> Result<Vec<Song>, FetchError>;

    async fn available_moods(&self) -> Result<Vec<Mood>, FetchError>;

    async fn search(&self, mood: &Mood, term: &str) -> Result<Vec<Song>, FetchError> {
        let songs = self.get_by_mood(mood).await?;
        Ok(filter(&songs, term).into_iter().cloned().collect())
    }
}
