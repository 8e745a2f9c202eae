//! JSON shapes returned by the songs backend and their mapping onto [`Song`].

use crate::songs::{MediaRef, Mood, Song};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct SongPayload {
    #[serde(default)]
    pub song_id: Option<u64>,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub genre: Option<String>,
    pub emotion_tag: String,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmotionsPayload {
    pub emotions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthPayload {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl SongPayload {
    /// Maps the payload onto a [`Song`]. `position` is the 1-based index of the entry
    /// in its response and stands in for a missing `song_id`.
    pub fn into_song(self, position: usize) -> Song {
        let id = self.song_id.unwrap_or(position as u64);
        let media = non_blank(self.link).and_then(|link| {
            if link.starts_with("http://") || link.starts_with("https://") {
                Some(MediaRef::Link { url: link })
            } else {
                warn!("Dropping non-http link for song {}: {}", id, link);
                None
            }
        });

        let mut song = Song::new(id, self.title, self.artist, Mood::new(&self.emotion_tag));
        song.genre = non_blank(self.genre);
        song.media = media;
        song
    }
}

pub fn into_songs(payloads: Vec<SongPayload>) -> Vec<Song> {
    payloads
        .into_iter()
        .enumerate()
        .map(|(index, payload)| payload.into_song(index + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_backend_song() {
        let payload: SongPayload = serde_json::from_str(
            r#"{"song_id": 4, "title": "Good Vibrations", "artist": "The Beach Boys",
                "genre": "Rock", "emotion_tag": "Happy",
                "link": "https://www.youtube.com/watch?v=Eab_beh07HU"}"#,
        )
        .unwrap();
        let song = payload.into_song(1);
        assert_eq!(song.id.0, 4);
        assert_eq!(song.mood, Mood::new("happy"));
        assert_eq!(song.genre.as_deref(), Some("Rock"));
        assert_eq!(
            song.playback_url().as_deref(),
            Some("https://www.youtube.com/watch?v=Eab_beh07HU")
        );
    }

    #[test]
    fn minimal_payload_uses_position_as_id() {
        let payloads: Vec<SongPayload> = serde_json::from_str(
            r#"[{"title": "A", "artist": "X", "emotion_tag": "calm"},
                {"title": "B", "artist": "Y", "emotion_tag": "calm", "genre": null}]"#,
        )
        .unwrap();
        let songs = into_songs(payloads);
        assert_eq!(songs[0].id.0, 1);
        assert_eq!(songs[1].id.0, 2);
        assert!(songs[1].genre.is_none());
        assert!(songs[1].media.is_none());
    }

    #[test]
    fn drops_non_http_links() {
        let payload: SongPayload = serde_json::from_str(
            r#"{"title": "A", "artist": "X", "emotion_tag": "sad", "link": "javascript:alert(1)"}"#,
        )
        .unwrap();
        assert!(payload.into_song(1).media.is_none());
    }

    #[test]
    fn missing_required_field_fails() {
        let result: Result<SongPayload, _> =
            serde_json::from_str(r#"{"title": "A", "emotion_tag": "sad"}"#);
        assert!(result.is_err());
    }
}
