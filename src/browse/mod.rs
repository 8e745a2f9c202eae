mod controller;
pub mod render;

pub use controller::{
    results_title, BrowseController, BrowseState, LoadOutcome, PendingLoad, ResultsBody,
    ResultsView, UrlOpener, LOAD_ERROR_MESSAGE, NO_SONGS_MESSAGE,
};
pub use render::{escape_html, render_results_html, render_results_text, render_song_card};
