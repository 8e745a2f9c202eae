use super::{Catalog, Mood, Song};

fn field_matches(field: &str, needle: &str) -> bool {
    field.to_lowercase().contains(needle)
}

/// Returns the songs whose title, artist or genre contains `term`, ignoring case.
///
/// An empty term keeps every song. The term is used as-is (no trimming, no
/// tokenization) and the input order is preserved.
pub fn filter<'a>(songs: &'a [Song], term: &str) -> Vec<&'a Song> {
    if term.is_empty() {
        return songs.iter().collect();
    }
    let needle = term.to_lowercase();
    songs
        .iter()
        .filter(|song| {
            field_matches(&song.title, &needle)
                || field_matches(&song.artist, &needle)
                || song
                    .genre
                    .as_deref()
                    .is_some_and(|genre| field_matches(genre, &needle))
        })
        .collect()
}

/// A mood selection plus an optional search term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Query {
    pub mood: Mood,
    pub term: Option<String>,
}

impl Query {
    pub fn new(mood: Mood) -> Query {
        Query { mood, term: None }
    }

    pub fn with_term<T: Into<String>>(mut self, term: T) -> Query {
        self.term = Some(term.into());
        self
    }

    pub fn run<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Song> {
        filter(
            catalog.get_songs(&self.mood),
            self.term.as_deref().unwrap_or(""),
        )
    }
}
