//! Setlist to Subsonic playlist CLI Library
//!
//! This library recreates a concert setlist from setlist.fm as a playlist on a
//! Subsonic compatible media server such as Navidrome. Every song title of the
//! setlist is searched in the server's catalog, the first hit is taken and the
//! resulting track ids are submitted as a new playlist.
//!
//! # Modules
//!
//! - `cli` - Command implementations driving the sync flow
//! - `config` - Configuration management and environment variables
//! - `error` - Error type and process exit codes
//! - `setlistfm` - setlist.fm API client and setlist flattening
//! - `subsonic` - Subsonic API client (signed search and playlist creation)
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use setlistsync::{cli, config};
//!
//! #[tokio::main]
//! async fn main() -> setlistsync::Res<()> {
//!     let config = config::Config::load()?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod setlistfm;
pub mod subsonic;
pub mod types;
pub mod utils;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible operation of the crate reports an [`Error`], which knows
/// the process exit code it maps to.
pub type Res<T> = std::result::Result<T, Error>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Fetching setlist {}", id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Playlist {} created", name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark to standard error.
///
/// Unlike a panic this does not terminate the program; the caller decides
/// the exit code (see [`Error::exit_code`]).
///
/// # Example
///
/// ```
/// error!("NAV_BASE_URL must be set");
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, e.g. a single song whose catalog search
/// failed while the rest of the setlist is still processed.
///
/// # Example
///
/// ```
/// warning!("Search failed for '{}': {}", title, err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
