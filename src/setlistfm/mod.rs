//! # setlist.fm Integration Module
//!
//! Read-only access to the setlist.fm REST API. A setlist is fetched by id
//! with the static `x-api-key` header (no per-request signing, unlike the
//! Subsonic side) and flattened into the ordered list of song titles.
//!
//! ## API Coverage
//!
//! - `GET /setlist/{setlistId}` - a single setlist with its sets and songs

use std::time::Duration;

use reqwest::{Client, header::ACCEPT};

use crate::{Error, Res, types::Setlist};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Fetches a setlist document by id.
///
/// # Errors
///
/// - [`Error::RemoteService`] for any non-success status, carrying the body
/// - [`Error::Http`] for transport failures and timeouts
/// - [`Error::Json`] if the body is not a setlist document
pub async fn fetch_setlist(
    client: &Client,
    api_url: &str,
    api_key: &str,
    setlist_id: &str,
) -> Res<Setlist> {
    let url = format!(
        "{uri}/setlist/{id}",
        uri = api_url.trim_end_matches('/'),
        id = setlist_id
    );

    let response = client
        .get(&url)
        .header("x-api-key", api_key)
        .header(ACCEPT, "application/json")
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(Error::RemoteService {
            service: "setlist.fm",
            status,
            body,
        });
    }

    parse_setlist(&body)
}

/// Parses a setlist document from a JSON body.
///
/// Missing or `null` keys fall back to empty values, so a document without
/// `sets` parses fine and simply has no songs.
///
/// # Errors
///
/// Returns [`Error::Json`] if the body is not valid JSON or a key has an
/// unexpected shape.
pub fn parse_setlist(body: &str) -> Res<Setlist> {
    Ok(serde_json::from_str(body)?)
}

/// Fetches a setlist and returns its song titles next to the document.
///
/// The document is handed back so callers can use its metadata, e.g. the
/// artist name as search hint.
pub async fn fetch_song_titles(
    client: &Client,
    api_url: &str,
    api_key: &str,
    setlist_id: &str,
) -> Res<(Vec<String>, Setlist)> {
    let setlist = fetch_setlist(client, api_url, api_key, setlist_id).await?;
    Ok((setlist.song_titles(), setlist))
}
