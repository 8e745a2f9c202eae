use super::{NewSong, SongRecord, SongStore};
use crate::sqlite_column;
use crate::sqlite_persistence::{open_versioned_db, Column, SqlType, Table, VersionedSchema};
use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// V 0
const SONGS_TABLE_V_0: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("song_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist", &SqlType::Text, non_null = true),
        sqlite_column!("genre", &SqlType::Text),
        sqlite_column!("emotion_tag", &SqlType::Text, non_null = true),
        sqlite_column!("link", &SqlType::Text),
    ],
    indices: &[("idx_songs_emotion_tag", "emotion_tag")],
};

const VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[SONGS_TABLE_V_0],
    migration: None,
}];

#[derive(Clone)]
pub struct SqliteSongStore {
    conn: Arc<Mutex<Connection>>,
}

fn song_from_row(row: &Row) -> rusqlite::Result<SongRecord> {
    Ok(SongRecord {
        song_id: row.get(0)?,
        title: row.get(1)?,
        artist: row.get(2)?,
        genre: row.get(3)?,
        emotion_tag: row.get(4)?,
        link: row.get(5)?,
    })
}

const SELECT_SONGS: &str = "SELECT song_id, title, artist, genre, emotion_tag, link FROM songs";

impl SqliteSongStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = open_versioned_db(db_path, VERSIONED_SCHEMAS)?;
        Ok(SqliteSongStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        VERSIONED_SCHEMAS[VERSIONED_SCHEMAS.len() - 1].create(&conn)?;
        Ok(SqliteSongStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

impl SongStore for SqliteSongStore {
    fn get_songs(&self, emotion: Option<&str>) -> Result<Vec<SongRecord>> {
        let conn = self.conn.lock().unwrap();
        let songs = match emotion {
            Some(emotion) => {
                let mut stmt = conn.prepare(&format!(
                    "{} WHERE emotion_tag = ?1 COLLATE NOCASE ORDER BY song_id",
                    SELECT_SONGS
                ))?;
                let rows = stmt.query_map(params![emotion], song_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare(&format!("{} ORDER BY song_id", SELECT_SONGS))?;
                let rows = stmt.query_map([], song_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(songs)
    }

    fn get_song(&self, song_id: u64) -> Result<Option<SongRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("{} WHERE song_id = ?1", SELECT_SONGS))?;
        let mut rows = stmt.query_map(params![song_id], song_from_row)?;
        Ok(rows.next().transpose()?)
    }

    fn create_song(&self, song: NewSong) -> Result<SongRecord> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO songs (title, artist, genre, emotion_tag, link) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![song.title, song.artist, song.genre, song.emotion_tag, song.link],
        )
        .with_context(|| format!("Failed to create song {}", song.title))?;

        Ok(SongRecord {
            song_id: conn.last_insert_rowid() as u64,
            title: song.title,
            artist: song.artist,
            genre: song.genre,
            emotion_tag: song.emotion_tag,
            link: song.link,
        })
    }

    fn get_emotions(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT emotion_tag FROM songs GROUP BY emotion_tag ORDER BY MIN(song_id)",
        )?;
        let emotions = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(emotions)
    }

    fn get_songs_count(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM songs", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_songs() -> SqliteSongStore {
        let store = SqliteSongStore::in_memory().unwrap();
        store
            .create_song(NewSong::new("Happy", "Pharrell Williams", "Happy").with_genre("Pop"))
            .unwrap();
        store
            .create_song(NewSong::new("Hurt", "Johnny Cash", "Sad"))
            .unwrap();
        store
            .create_song(NewSong::new("Fix You", "Coldplay", "sad"))
            .unwrap();
        store
    }

    #[test]
    fn creates_and_reads_songs() {
        let store = store_with_songs();
        assert_eq!(store.get_songs_count().unwrap(), 3);

        let song = store.get_song(1).unwrap().unwrap();
        assert_eq!(song.title, "Happy");
        assert_eq!(song.genre.as_deref(), Some("Pop"));
        assert!(song.link.is_none());
        assert!(store.get_song(42).unwrap().is_none());
    }

    #[test]
    fn emotion_filter_ignores_case() {
        let store = store_with_songs();
        let sad = store.get_songs(Some("SAD")).unwrap();
        assert_eq!(
            sad.iter().map(|s| s.title.as_str()).collect::<Vec<_>>(),
            vec!["Hurt", "Fix You"]
        );
        assert_eq!(store.get_songs(None).unwrap().len(), 3);
        assert!(store.get_songs(Some("calm")).unwrap().is_empty());
    }

    #[test]
    fn emotion_filter_has_no_wildcards() {
        let store = store_with_songs();
        assert!(store.get_songs(Some("%")).unwrap().is_empty());
    }

    #[test]
    fn emotions_are_distinct_in_first_seen_order() {
        let store = store_with_songs();
        store
            .create_song(NewSong::new("Bodies", "Drowning Pool", "Angry"))
            .unwrap();
        // Tags are distinct as stored, so "Sad" and "sad" both show up.
        assert_eq!(
            store.get_emotions().unwrap(),
            vec!["Happy", "Sad", "sad", "Angry"]
        );
    }

    #[test]
    fn reopens_existing_database() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("songs.db");
        {
            let store = SqliteSongStore::new(&path).unwrap();
            store
                .create_song(NewSong::new("Weightless", "Marconi Union", "Relaxed"))
                .unwrap();
        }
        let store = SqliteSongStore::new(&path).unwrap();
        assert_eq!(store.get_songs_count().unwrap(), 1);
    }
}
