use reqwest::StatusCode;
use thiserror::Error;

/// Exit code for a run that finished without anything to publish.
pub const EXIT_EMPTY: u8 = 1;
/// Exit code for a run that could not start because input is missing.
pub const EXIT_USAGE: u8 = 2;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} must be set as environment variable")]
    MissingConfig(&'static str),

    #[error("no setlist given, pass --setlist-id or --setlist-url")]
    MissingSetlistReference,

    #[error("no songs found in setlist {0}")]
    NoSongsFound(String),

    #[error("nothing matched in the catalog, playlist not created")]
    NothingMatched,

    #[error("{service} responded with {status}: {body}")]
    RemoteService {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("subsonic error {code}: {message}")]
    Subsonic { code: u32, message: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid xml response: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("invalid setlist document: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Process exit code reported for this error when it ends a run.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::MissingConfig(_) | Error::MissingSetlistReference => EXIT_USAGE,
            _ => EXIT_EMPTY,
        }
    }
}
