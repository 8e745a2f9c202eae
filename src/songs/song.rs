use super::Mood;
use serde::Serialize;
use std::fmt;

const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SongId(pub u64);

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a song can be played.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum MediaRef {
    #[serde(rename = "youtube")]
    YouTube { video_id: String },
    #[serde(rename = "link")]
    Link { url: String },
}

impl MediaRef {
    pub fn playback_url(&self) -> String {
        match self {
            MediaRef::YouTube { video_id } => format!("{}{}", YOUTUBE_WATCH_URL, video_id),
            MediaRef::Link { url } => url.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    /// "M:SS"
    pub duration: Option<String>,
    pub media: Option<MediaRef>,
    pub genre: Option<String>,
    pub year: Option<u16>,
    pub mood: Mood,
}

impl Song {
    pub fn new<T: Into<String>, A: Into<String>>(id: u64, title: T, artist: A, mood: Mood) -> Song {
        Song {
            id: SongId(id),
            title: title.into(),
            artist: artist.into(),
            duration: None,
            media: None,
            genre: None,
            year: None,
            mood,
        }
    }

    pub fn with_duration<T: Into<String>>(mut self, duration: T) -> Song {
        self.duration = Some(duration.into());
        self
    }

    pub fn with_media(mut self, media: MediaRef) -> Song {
        self.media = Some(media);
        self
    }

    pub fn with_genre<T: Into<String>>(mut self, genre: T) -> Song {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_year(mut self, year: u16) -> Song {
        self.year = Some(year);
        self
    }

    pub fn playback_url(&self) -> Option<String> {
        self.media.as_ref().map(MediaRef::playback_url)
    }
}
