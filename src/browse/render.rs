//! HTML and terminal rendering of the results area. Every piece of song text is
//! escaped before it ends up in markup.

use super::controller::{ResultsBody, ResultsView};
use crate::songs::Song;
use std::fmt::Write;

const IDLE_MESSAGE: &str = "Pick a mood to see songs.";
const LOADING_MESSAGE: &str = "Loading songs...";

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

pub fn render_song_card(song: &Song) -> String {
    let mut html = format!(
        "<div class=\"song-card {}\">\n  <h3 class=\"song-title\">{}</h3>\n  <p class=\"song-artist\">by {}</p>\n",
        escape_html(song.mood.as_str()),
        escape_html(&song.title),
        escape_html(&song.artist),
    );
    if let Some(genre) = &song.genre {
        let _ = writeln!(
            html,
            "  <span class=\"song-genre\">{}</span>",
            escape_html(genre)
        );
    }
    if let Some(url) = song.playback_url() {
        let _ = writeln!(
            html,
            "  <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"song-link\">🎵 Listen Now</a>",
            escape_html(&url)
        );
    }
    html.push_str("</div>\n");
    html
}

pub fn render_results_html(view: &ResultsView) -> String {
    let mut html = String::new();
    if let Some(title) = &view.title {
        let _ = writeln!(html, "<h2 id=\"results-title\">{}</h2>", escape_html(title));
    }
    match &view.body {
        ResultsBody::Idle => {
            let _ = writeln!(html, "<p class=\"hint\">{}</p>", IDLE_MESSAGE);
        }
        ResultsBody::Loading => {
            let _ = writeln!(html, "<div id=\"loading\" class=\"show\">{}</div>", LOADING_MESSAGE);
        }
        ResultsBody::Error(message) => {
            let _ = writeln!(
                html,
                "<div id=\"error\" class=\"show\">{}</div>",
                escape_html(message)
            );
        }
        ResultsBody::Empty(message) => {
            let _ = writeln!(
                html,
                "<div id=\"songs-grid\" class=\"show\">\n<p class=\"empty\">{}</p>\n</div>",
                escape_html(message)
            );
        }
        ResultsBody::Songs(songs) => {
            html.push_str("<div id=\"songs-grid\" class=\"show\">\n");
            for song in songs {
                html.push_str(&render_song_card(song));
            }
            html.push_str("</div>\n");
        }
    }
    html
}

fn song_line(position: usize, song: &Song) -> String {
    let mut line = format!("{:>3}. {} - {}", position, song.title, song.artist);
    if let Some(genre) = &song.genre {
        let _ = write!(line, " [{}]", genre);
    }
    if let Some(duration) = &song.duration {
        let _ = write!(line, " ({})", duration);
    }
    line
}

/// Plain text version of the results, numbered from 1.
pub fn render_results_text(view: &ResultsView) -> String {
    let mut text = String::new();
    if let Some(title) = &view.title {
        let _ = writeln!(text, "{}", title);
    }
    match &view.body {
        ResultsBody::Idle => {
            let _ = writeln!(text, "{}", IDLE_MESSAGE);
        }
        ResultsBody::Loading => {
            let _ = writeln!(text, "{}", LOADING_MESSAGE);
        }
        ResultsBody::Error(message) | ResultsBody::Empty(message) => {
            let _ = writeln!(text, "{}", message);
        }
        ResultsBody::Songs(songs) => {
            for (i, song) in songs.iter().enumerate() {
                let _ = writeln!(text, "{}", song_line(i + 1, song));
            }
        }
    }
    text
}
