use crate::songs::{filter, Mood, Song};
use crate::source::{FetchError, SongSource};
use anyhow::{bail, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const LOAD_ERROR_MESSAGE: &str = "Could not load songs. Please try again.";
pub const NO_SONGS_MESSAGE: &str = "No songs found for this mood.";

/// Hands a playback URL to whatever plays it.
pub trait UrlOpener {
    fn open(&self, url: &str) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrowseState {
    Idle,
    Loading,
    Loaded(Vec<Song>),
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultsBody {
    /// No mood picked yet.
    Idle,
    Loading,
    Error(&'static str),
    Empty(&'static str),
    Songs(Vec<Song>),
}

/// Everything needed to draw the results area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsView {
    pub mood: Option<Mood>,
    pub title: Option<String>,
    pub body: ResultsBody,
}

pub fn results_title(mood: &Mood, count: usize) -> String {
    format!("{} Songs ({} found)", mood.label(), count)
}

/// A load that was started but not applied yet.
pub struct PendingLoad {
    ticket: u64,
    mood: Mood,
    source: Arc<dyn SongSource>,
}

pub struct LoadOutcome {
    ticket: u64,
    mood: Mood,
    result: Result<Vec<Song>, FetchError>,
}

impl PendingLoad {
    pub fn mood(&self) -> &Mood {
        &self.mood
    }

    pub async fn run(self) -> LoadOutcome {
        let result = self.source.get_by_mood(&self.mood).await;
        LoadOutcome {
            ticket: self.ticket,
            mood: self.mood,
            result,
        }
    }
}

/// Owns what the browse screen shows: the selected mood, the search term and the
/// state of the last load.
pub struct BrowseController {
    source: Arc<dyn SongSource>,
    mood: Option<Mood>,
    term: String,
    state: BrowseState,
    latest_ticket: u64,
}

impl BrowseController {
    pub fn new(source: Arc<dyn SongSource>) -> Self {
        Self {
            source,
            mood: None,
            term: String::new(),
            state: BrowseState::Idle,
            latest_ticket: 0,
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub async fn available_moods(&self) -> Result<Vec<Mood>, FetchError> {
        self.source.available_moods().await
    }

    pub fn mood(&self) -> Option<&Mood> {
        self.mood.as_ref()
    }

    pub fn search_term(&self) -> &str {
        &self.term
    }

    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    /// Selects `mood` and switches to the loading state. Any load started earlier
    /// becomes stale.
    pub fn begin_load(&mut self, mood: Mood) -> PendingLoad {
        self.latest_ticket += 1;
        self.mood = Some(mood.clone());
        self.state = BrowseState::Loading;
        debug!("Load #{} started for {}", self.latest_ticket, mood);
        PendingLoad {
            ticket: self.latest_ticket,
            mood,
            source: Arc::clone(&self.source),
        }
    }

    /// Applies `outcome` if it belongs to the most recent load. Returns whether it was
    /// applied.
    pub fn finish_load(&mut self, outcome: LoadOutcome) -> bool {
        if outcome.ticket != self.latest_ticket {
            debug!(
                "Dropping stale load #{} for {}",
                outcome.ticket, outcome.mood
            );
            return false;
        }
        self.state = match outcome.result {
            Ok(songs) => {
                info!("Loaded {} {} songs", songs.len(), outcome.mood);
                BrowseState::Loaded(songs)
            }
            Err(err) => {
                warn!("Loading {} songs failed: {}", outcome.mood, err);
                BrowseState::Failed
            }
        };
        true
    }

    /// Starts a load and applies it once done.
    pub async fn select_mood(&mut self, mood: Mood) {
        let pending = self.begin_load(mood);
        let outcome = pending.run().await;
        self.finish_load(outcome);
    }

    /// Taken literally; an empty term shows every loaded song.
    pub fn set_search_term<T: Into<String>>(&mut self, term: T) {
        self.term = term.into();
    }

    /// Loaded songs matching the search term, in load order.
    pub fn visible_songs(&self) -> Vec<&Song> {
        match &self.state {
            BrowseState::Loaded(songs) => filter(songs, &self.term),
            _ => Vec::new(),
        }
    }

    pub fn view(&self) -> ResultsView {
        let mood = self.mood.clone();
        let (title, body) = match (&self.state, &mood) {
            (BrowseState::Idle, _) | (_, None) => (None, ResultsBody::Idle),
            (BrowseState::Loading, Some(_)) => (None, ResultsBody::Loading),
            (BrowseState::Failed, Some(_)) => (None, ResultsBody::Error(LOAD_ERROR_MESSAGE)),
            (BrowseState::Loaded(_), Some(mood)) => {
                let songs: Vec<Song> = self.visible_songs().into_iter().cloned().collect();
                let title = Some(results_title(mood, songs.len()));
                if songs.is_empty() {
                    (title, ResultsBody::Empty(NO_SONGS_MESSAGE))
                } else {
                    (title, ResultsBody::Songs(songs))
                }
            }
        };
        ResultsView { mood, title, body }
    }

    /// Opens the visible song at `index` (zero based) and returns the URL it was
    /// opened with.
    pub fn open_song(&self, index: usize, opener: &dyn UrlOpener) -> Result<String> {
        let songs = self.visible_songs();
        let Some(song) = songs.get(index) else {
            bail!("No song at position {}", index.saturating_add(1));
        };
        let Some(url) = song.playback_url() else {
            bail!("\"{}\" has no link to play", song.title);
        };
        opener.open(&url)?;
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::songs::MediaRef;
    use crate::source::LocalSongSource;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FailingSource;

    #[async_trait]
    impl SongSource for FailingSource {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn get_by_mood(&self, _mood: &Mood) -> Result<Vec<Song>, FetchError> {
            Err(FetchError::FetchFailed)
        }

        async fn available_moods(&self) -> Result<Vec<Mood>, FetchError> {
            Err(FetchError::FetchFailed)
        }
    }

    #[derive(Default)]
    struct RecordingOpener {
        opened: Mutex<Vec<String>>,
    }

    impl UrlOpener for RecordingOpener {
        fn open(&self, url: &str) -> Result<()> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    fn local_controller() -> BrowseController {
        BrowseController::new(Arc::new(LocalSongSource::sample()))
    }

    #[tokio::test]
    async fn starts_idle() {
        let controller = local_controller();
        let view = controller.view();
        assert_eq!(view.body, ResultsBody::Idle);
        assert!(view.title.is_none());
        assert_eq!(controller.source_name(), "local");
    }

    #[tokio::test]
    async fn loading_then_loaded() {
        let mut controller = local_controller();
        let pending = controller.begin_load(Mood::new("happy"));
        assert_eq!(controller.view().body, ResultsBody::Loading);

        let outcome = pending.run().await;
        assert!(controller.finish_load(outcome));

        let view = controller.view();
        assert_eq!(view.title.as_deref(), Some("Happy Songs (6 found)"));
        match view.body {
            ResultsBody::Songs(songs) => {
                assert!(songs
                    .iter()
                    .any(|s| s.title == "Happy" && s.artist == "Pharrell Williams"));
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[tokio::test]
    async fn last_started_load_wins() {
        let mut controller = local_controller();
        let first = controller.begin_load(Mood::new("sad"));
        let second = controller.begin_load(Mood::new("angry"));

        let second_outcome = second.run().await;
        let first_outcome = first.run().await;
        assert!(controller.finish_load(second_outcome));
        assert!(!controller.finish_load(first_outcome));

        assert_eq!(controller.mood(), Some(&Mood::new("angry")));
        let view = controller.view();
        assert_eq!(view.title.as_deref(), Some("Angry Songs (6 found)"));
    }

    #[tokio::test]
    async fn failed_load_shows_error_not_loading() {
        let mut controller = BrowseController::new(Arc::new(FailingSource));
        controller.select_mood(Mood::new("calm")).await;

        assert_eq!(controller.state(), &BrowseState::Failed);
        assert_eq!(
            controller.view().body,
            ResultsBody::Error(LOAD_ERROR_MESSAGE)
        );
    }

    #[tokio::test]
    async fn search_filters_loaded_songs() {
        let mut controller = local_controller();
        controller.select_mood(Mood::new("sad")).await;
        controller.set_search_term("adele");

        let titles: Vec<&str> = controller
            .visible_songs()
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Someone Like You"]);
        assert_eq!(
            controller.view().title.as_deref(),
            Some("Sad Songs (1 found)")
        );
    }

    #[tokio::test]
    async fn no_match_shows_empty_message() {
        let mut controller = local_controller();
        controller.select_mood(Mood::new("angry")).await;
        controller.set_search_term("xyz-no-match");

        let view = controller.view();
        assert_eq!(view.title.as_deref(), Some("Angry Songs (0 found)"));
        assert_eq!(view.body, ResultsBody::Empty(NO_SONGS_MESSAGE));
    }

    #[tokio::test]
    async fn open_song_passes_playback_url() {
        let mut controller = local_controller();
        controller.select_mood(Mood::new("happy")).await;
        let opener = RecordingOpener::default();

        let url = controller.open_song(0, &opener).unwrap();
        let expected = controller.visible_songs()[0]
            .media
            .as_ref()
            .map(MediaRef::playback_url)
            .unwrap();
        assert_eq!(url, expected);
        assert_eq!(opener.opened.lock().unwrap().as_slice(), &[expected]);

        assert!(controller.open_song(99, &opener).is_err());
    }

    #[tokio::test]
    async fn open_song_far_out_of_range_is_an_error() {
        let mut controller = local_controller();
        controller.select_mood(Mood::new("happy")).await;
        let opener = RecordingOpener::default();

        let err = controller.open_song(usize::MAX, &opener).unwrap_err();
        assert!(err.to_string().starts_with("No song at position"));
        assert!(opener.opened.lock().unwrap().is_empty());
    }
}
