mod catalog;
mod filter;
mod mood;
mod sample;
mod song;

pub use catalog::Catalog;
pub use filter::{filter, Query};
pub use mood::Mood;
pub use song::{MediaRef, Song, SongId};
