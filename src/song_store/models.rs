use serde::{Deserialize, Serialize};

/// A song row as stored by the backend and served on `/api/songs`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    pub song_id: u64,
    pub title: String,
    pub artist: String,
    pub genre: Option<String>,
    pub emotion_tag: String,
    pub link: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub genre: Option<String>,
    pub emotion_tag: String,
    #[serde(default)]
    pub link: Option<String>,
}

impl NewSong {
    pub fn new<T: Into<String>>(title: T, artist: T, emotion_tag: T) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            genre: None,
            emotion_tag: emotion_tag.into(),
            link: None,
        }
    }

    pub fn with_genre<T: Into<String>>(mut self, genre: T) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_link<T: Into<String>>(mut self, link: T) -> Self {
        self.link = Some(link.into());
        self
    }
}
