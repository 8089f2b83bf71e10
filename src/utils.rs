use md5::{Digest, Md5};
use rand::Rng;

use crate::types::Candidate;

const SALT_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
pub const SALT_LENGTH: usize = 8;

/// Generates a random salt for signing one Subsonic request.
///
/// The salt is `SALT_LENGTH` characters long and drawn from lowercase ASCII
/// letters and digits, so it can be sent as a query parameter unescaped.
///
/// # Example
///
/// ```
/// let salt = generate_salt(); // e.g. "k3j9x0qa"
/// assert_eq!(salt.len(), SALT_LENGTH);
/// ```
pub fn generate_salt() -> String {
    let mut rng = rand::rng();
    (0..SALT_LENGTH)
        .map(|_| SALT_CHARSET[rng.random_range(0..SALT_CHARSET.len())] as char)
        .collect()
}

/// Lowercase hex MD5 digest of `input`.
///
/// # Example
///
/// ```
/// assert_eq!(md5_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
/// ```
pub fn md5_hex(input: &str) -> String {
    let hash = Md5::digest(input.as_bytes());
    format!("{:x}", hash)
}

/// Subsonic token: `md5(password + salt)` as lowercase hex.
pub fn generate_token(password: &str, salt: &str) -> String {
    md5_hex(&format!("{}{}", password, salt))
}

/// Derives a setlist id from a setlist.fm URL.
///
/// The last path segment is used. Setlist pages are named
/// `<artist>-<date>-<venue>-<id>.html`, for those only the trailing id is
/// kept. Returns `None` when the URL has no usable segment.
pub fn setlist_id_from_url(url: &str) -> Option<String> {
    let url = url.split(['?', '#']).next().unwrap_or(url);
    let segment = url.trim_end_matches('/').rsplit('/').next()?.trim();

    let id = match segment.strip_suffix(".html") {
        Some(slug) => slug.rsplit('-').next().unwrap_or(slug),
        None => segment,
    };

    if id.is_empty() || id.contains(':') {
        return None;
    }
    Some(id.to_string())
}

/// Resolves the setlist id, `--setlist-id` wins over `--setlist-url`.
pub fn resolve_setlist_id(id: Option<&str>, url: Option<&str>) -> Option<String> {
    id.map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .or_else(|| url.and_then(setlist_id_from_url))
}

/// Builds the `search3` query for one setlist title.
///
/// # Arguments
///
/// * `artist` - Optional artist hint, blank values are ignored
/// * `title` - Song title from the setlist
///
/// # Returns
///
/// `"<artist> <title>"` when a hint is given, otherwise the title alone.
///
/// # Example
///
/// ```
/// assert_eq!(build_search_query(Some("The Band"), "Encore"), "The Band Encore");
/// assert_eq!(build_search_query(None, "Encore"), "Encore");
/// ```
pub fn build_search_query(artist: Option<&str>, title: &str) -> String {
    match artist.map(str::trim).filter(|a| !a.is_empty()) {
        Some(artist) => format!("{} {}", artist, title),
        None => title.to_string(),
    }
}

/// Keeps at most `max_songs` titles, dropping the tail of the setlist.
pub fn truncate_titles(titles: &mut Vec<String>, max_songs: usize) {
    titles.truncate(max_songs);
}

/// Picks the track for a title: the first search result, in server order.
pub fn select_candidate(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates.first()
}
