//! Song API routes

use crate::song_store::NewSong;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::api_error::{internal_error, json_error};
use super::state::{GuardedSongStore, ServerState};

#[derive(Deserialize, Debug, Default)]
struct SongsQuery {
    emotion: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct CreateSongBody {
    title: Option<String>,
    artist: Option<String>,
    emotion_tag: Option<String>,
    genre: Option<String>,
    link: Option<String>,
}

impl CreateSongBody {
    fn into_new_song(self) -> Option<NewSong> {
        let required = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        let mut song = NewSong::new(
            required(self.title)?,
            required(self.artist)?,
            required(self.emotion_tag)?,
        );
        song.genre = self.genre;
        song.link = self.link;
        Some(song)
    }
}

async fn get_songs(
    State(song_store): State<GuardedSongStore>,
    Query(query): Query<SongsQuery>,
) -> Response {
    let emotion = query.emotion.as_deref().filter(|e| !e.is_empty());
    debug!("get_songs() emotion={:?}", emotion);
    match song_store.get_songs(emotion) {
        Ok(songs) => Json(songs).into_response(),
        Err(err) => internal_error(err),
    }
}

async fn get_song(
    State(song_store): State<GuardedSongStore>,
    id: Result<Path<u64>, PathRejection>,
) -> Response {
    let Ok(Path(id)) = id else {
        return json_error(StatusCode::NOT_FOUND, "Song not found");
    };
    match song_store.get_song(id) {
        Ok(Some(song)) => Json(song).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "Song not found"),
        Err(err) => internal_error(err),
    }
}

async fn post_song(
    State(song_store): State<GuardedSongStore>,
    body: Result<Json<CreateSongBody>, JsonRejection>,
) -> Response {
    let new_song = match body.ok().and_then(|Json(body)| body.into_new_song()) {
        Some(song) => song,
        None => {
            return json_error(
                StatusCode::BAD_REQUEST,
                "Title, artist, and emotion_tag are required",
            )
        }
    };
    match song_store.create_song(new_song) {
        Ok(song) => {
            info!("Created song {} \"{}\"", song.song_id, song.title);
            (StatusCode::CREATED, Json(song)).into_response()
        }
        Err(err) => internal_error(err),
    }
}

async fn get_emotions(State(song_store): State<GuardedSongStore>) -> Response {
    match song_store.get_emotions() {
        Ok(emotions) => Json(json!({ "emotions": emotions })).into_response(),
        Err(err) => internal_error(err),
    }
}

pub fn make_song_routes(state: ServerState) -> Router {
    Router::new()
        .route("/songs", get(get_songs).post(post_song))
        .route("/songs/emotions", get(get_emotions))
        .route("/songs/{id}", get(get_song))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_body_requires_title_artist_and_emotion() {
        let body = CreateSongBody {
            title: Some("Believer".to_string()),
            artist: Some("Imagine Dragons".to_string()),
            emotion_tag: None,
            ..Default::default()
        };
        assert!(body.into_new_song().is_none());

        let body = CreateSongBody {
            title: Some("  ".to_string()),
            artist: Some("Imagine Dragons".to_string()),
            emotion_tag: Some("Angry".to_string()),
            ..Default::default()
        };
        assert!(body.into_new_song().is_none());
    }

    #[test]
    fn create_body_keeps_optional_fields() {
        let body = CreateSongBody {
            title: Some("Believer".to_string()),
            artist: Some("Imagine Dragons".to_string()),
            emotion_tag: Some("Angry".to_string()),
            genre: Some("Rock".to_string()),
            link: None,
        };
        let song = body.into_new_song().unwrap();
        assert_eq!(song.title, "Believer");
        assert_eq!(song.genre.as_deref(), Some("Rock"));
        assert!(song.link.is_none());
    }
}
