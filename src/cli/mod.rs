//! # CLI Module
//!
//! Command implementations for setlistsync. The only real command is the
//! sync flow which runs three stages strictly one after another:
//!
//! ```text
//! setlist.fm            Subsonic server
//!   fetch setlist  ->     search3 (one call per title, first hit wins)
//!   flatten titles ->     createPlaylist (one call, ordered song ids)
//! ```
//!
//! Nothing is kept between runs. A failing search only drops that title;
//! failures of the setlist fetch or the playlist creation end the run.

mod sync;

pub use sync::DEFAULT_MAX_SONGS;
pub use sync::DEFAULT_SEARCH_LIMIT;
pub use sync::SyncOptions;
pub use sync::sync;
