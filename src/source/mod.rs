mod local;
mod remote;
mod trait_def;
pub mod wire;

pub use local::LocalSongSource;
pub use remote::RemoteSongSource;
pub use trait_def::{FetchError, SongSource};
