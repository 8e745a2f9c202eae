//! The built-in mood catalog used by the local song source.

use super::{Catalog, MediaRef, Mood, Song};

/// (id, title, artist, duration, youtube video id)
type SampleRow = (u64, &'static str, &'static str, &'static str, &'static str);

const HAPPY: &[SampleRow] = &[
    (1, "Happy", "Pharrell Williams", "3:53", "ZbZSe6N_BXs"),
    (2, "Good Vibrations", "The Beach Boys", "3:36", "Eab_beh07HU"),
    (3, "Walking on Sunshine", "Katrina and the Waves", "3:59", "iPUmE-tne5U"),
    (4, "Don't Stop Me Now", "Queen", "3:29", "HgzGwKwLmgM"),
    (5, "I Gotta Feeling", "The Black Eyed Peas", "4:49", "uSD4vsh1zDA"),
    (6, "Uptown Funk", "Mark Ronson ft. Bruno Mars", "4:30", "OPf0YbXqDm0"),
];

const SAD: &[SampleRow] = &[
    (7, "Someone Like You", "Adele", "4:45", "hLQl3WQQoQ0"),
    (8, "The Night We Met", "Lord Huron", "3:28", "KtlgYxa6BMU"),
    (9, "Hurt", "Johnny Cash", "3:38", "8AHCfZTRGiI"),
    (10, "Mad World", "Gary Jules", "3:08", "4N3N1MlvVc4"),
    (11, "Skinny Love", "Bon Iver", "3:58", "ssdgFoHLwnk"),
    (12, "Tears in Heaven", "Eric Clapton", "4:32", "JxPj3GAYYZ0"),
];

const ANGRY: &[SampleRow] = &[
    (13, "Break Stuff", "Limp Bizkit", "2:46", "ZpUYjpKg9KY"),
    (14, "Killing in the Name", "Rage Against the Machine", "5:13", "bWXazVhlyxQ"),
    (15, "Bodies", "Drowning Pool", "3:22", "04F4xlWSFh0"),
    (16, "Chop Suey!", "System of a Down", "3:30", "CSvFpBOe8eY"),
    (17, "Last Resort", "Papa Roach", "3:20", "j0lSpNtjPM8"),
    (18, "Down with the Sickness", "Disturbed", "4:38", "09LTT0xwdfw"),
];

const RELAXED: &[SampleRow] = &[
    (19, "Weightless", "Marconi Union", "8:09", "UfcAVejslrU"),
    (20, "Breathe Me", "Sia", "4:33", "SFGvmrJ5rjM"),
    (21, "Holocene", "Bon Iver", "5:36", "TWcyIpul8OE"),
    (22, "Clair de Lune", "Claude Debussy", "5:24", "CvFH_6DNRCY"),
    (23, "Sunset Lover", "Petit Biscuit", "3:34", "wuCK-oiE3rM"),
    (24, "Intro", "The xx", "2:11", "3gxNW2Ulpwk"),
];

fn shelf(tag: &str, rows: &[SampleRow]) -> (Mood, Vec<Song>) {
    let mood = Mood::new(tag);
    let songs = rows
        .iter()
        .map(|(id, title, artist, duration, video_id)| {
            Song::new(*id, *title, *artist, mood.clone())
                .with_duration(*duration)
                .with_media(MediaRef::YouTube {
                    video_id: video_id.to_string(),
                })
        })
        .collect();
    (mood, songs)
}

pub(super) fn build_sample_catalog() -> Catalog {
    let entries = vec![
        shelf("happy", HAPPY),
        shelf("sad", SAD),
        shelf("angry", ANGRY),
        shelf("relaxed", RELAXED),
    ];
    Catalog::build(entries).expect("sample catalog is well formed")
}
