use super::{NewSong, SongStore};
use anyhow::Result;
use tracing::info;

/// (title, artist, genre, emotion, youtube video id)
const SEED_SONGS: &[(&str, &str, &str, &str, &str)] = &[
    ("Happy", "Pharrell Williams", "Pop", "Happy", "ZbZSe6N_BXs"),
    ("Don't Stop Me Now", "Queen", "Rock", "Happy", "HgzGwKwLmgM"),
    ("Walking on Sunshine", "Katrina and the Waves", "Pop", "Happy", "iPUmE-tne5U"),
    ("Good Vibrations", "The Beach Boys", "Rock", "Happy", "Eab_beh07HU"),
    ("I Gotta Feeling", "Black Eyed Peas", "Pop", "Happy", "uSD4vsh1zDA"),
    ("Someone Like You", "Adele", "Pop", "Sad", "hLQl3WQQoQ0"),
    ("The Night We Met", "Lord Huron", "Indie", "Sad", "KtlgYxa6BMU"),
    ("Hurt", "Johnny Cash", "Country", "Sad", "8AHCfZTRGiI"),
    ("Fix You", "Coldplay", "Alternative", "Sad", "k4V3Mo61fJM"),
    ("Tears in Heaven", "Eric Clapton", "Rock", "Sad", "JxPj3GAYYZ0"),
    ("Break Stuff", "Limp Bizkit", "Nu Metal", "Angry", "ZpUYjpKg9KY"),
    ("Killing in the Name", "Rage Against the Machine", "Rock", "Angry", "bWXazVhlyxQ"),
    ("Bodies", "Drowning Pool", "Metal", "Angry", "04F4xlWSFh0"),
    ("Freak on a Leash", "Korn", "Nu Metal", "Angry", "jRGrNDV2mKc"),
    ("Chop Suey!", "System of a Down", "Metal", "Angry", "CSvFpBOe8eY"),
    ("Weightless", "Marconi Union", "Ambient", "Relaxed", "UfcAVejslrU"),
    ("Clair de Lune", "Claude Debussy", "Classical", "Relaxed", "CvFH_6DNRCY"),
    ("Sunset Lover", "Petit Biscuit", "Electronic", "Relaxed", "wuCK-oiE3rM"),
    ("River Flows in You", "Yiruma", "Classical", "Relaxed", "7maJOI3QMu0"),
    ("Breathe", "Telepopmusik", "Electronic", "Relaxed", "vyut3GyQtn0"),
];

pub fn seed_songs() -> Vec<NewSong> {
    SEED_SONGS
        .iter()
        .map(|(title, artist, genre, emotion, video_id)| {
            NewSong::new(*title, *artist, *emotion)
                .with_genre(*genre)
                .with_link(format!("https://www.youtube.com/watch?v={}", video_id))
        })
        .collect()
}

/// Inserts the sample songs if the store is empty. Returns how many were added.
pub fn seed_sample_songs(store: &dyn SongStore) -> Result<usize> {
    let existing = store.get_songs_count()?;
    if existing > 0 {
        info!("Songs table already has {} songs, skipping seed", existing);
        return Ok(0);
    }

    let songs = seed_songs();
    let count = songs.len();
    for song in songs {
        store.create_song(song)?;
    }
    info!("Seeded {} sample songs", count);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song_store::SqliteSongStore;

    #[test]
    fn seeds_twenty_songs_once() {
        let store = SqliteSongStore::in_memory().unwrap();
        assert_eq!(seed_sample_songs(&store).unwrap(), 20);
        assert_eq!(seed_sample_songs(&store).unwrap(), 0);
        assert_eq!(store.get_songs_count().unwrap(), 20);
    }

    #[test]
    fn seeded_moods_have_five_songs_each() {
        let store = SqliteSongStore::in_memory().unwrap();
        seed_sample_songs(&store).unwrap();
        assert_eq!(
            store.get_emotions().unwrap(),
            vec!["Happy", "Sad", "Angry", "Relaxed"]
        );
        for emotion in ["happy", "sad", "angry", "relaxed"] {
            assert_eq!(store.get_songs(Some(emotion)).unwrap().len(), 5);
        }
    }
}
