use super::{sample, Mood, Song, SongId};
use anyhow::{bail, Result};
use std::collections::HashSet;

lazy_static::lazy_static! {
    static ref SAMPLE_CATALOG: Catalog = sample::build_sample_catalog();
}

#[derive(Debug)]
struct MoodShelf {
    mood: Mood,
    songs: Vec<Song>,
}

/// An immutable, ordered mapping from mood to songs.
#[derive(Debug)]
pub struct Catalog {
    shelves: Vec<MoodShelf>,
}

impl Catalog {
    /// Builds a catalog from `(mood, songs)` entries, keeping the given order.
    ///
    /// Fails if a mood appears twice, if a song is placed on a shelf that doesn't match
    /// its own mood, or if two songs share an id.
    pub fn build(entries: Vec<(Mood, Vec<Song>)>) -> Result<Catalog> {
        let mut seen_moods = HashSet::new();
        let mut seen_ids: HashSet<SongId> = HashSet::new();
        let mut shelves = Vec::with_capacity(entries.len());

        for (mood, songs) in entries {
            if mood.is_empty() {
                bail!("Mood tag cannot be empty");
            }
            if !seen_moods.insert(mood.clone()) {
                bail!("Mood {} appears more than once", mood);
            }
            for song in &songs {
                if song.mood != mood {
                    bail!(
                        "Song {} ({}) has mood {} but was placed under {}",
                        song.id,
                        song.title,
                        song.mood,
                        mood
                    );
                }
                if !seen_ids.insert(song.id) {
                    bail!("Duplicate song id {}", song.id);
                }
            }
            shelves.push(MoodShelf { mood, songs });
        }

        Ok(Catalog { shelves })
    }

    /// The built-in catalog: four moods, six songs each.
    pub fn sample() -> &'static Catalog {
        &SAMPLE_CATALOG
    }

    /// Songs for `mood`, in catalog order. Unknown moods yield an empty slice.
    pub fn get_songs(&self, mood: &Mood) -> &[Song] {
        self.shelves
            .iter()
            .find(|shelf| &shelf.mood == mood)
            .map(|shelf| shelf.songs.as_slice())
            .unwrap_or(&[])
    }

    pub fn moods(&self) -> impl Iterator<Item = &Mood> {
        self.shelves.iter().map(|shelf| &shelf.mood)
    }

    pub fn get_song(&self, id: SongId) -> Option<&Song> {
        self.shelves
            .iter()
            .flat_map(|shelf| shelf.songs.iter())
            .find(|song| song.id == id)
    }

    pub fn get_songs_count(&self) -> usize {
        self.shelves.iter().map(|shelf| shelf.songs.len()).sum()
    }
}
