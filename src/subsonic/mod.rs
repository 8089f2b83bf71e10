//! # Subsonic Integration Module
//!
//! Client for the Subsonic REST API as implemented by Navidrome and friends.
//! Every call is signed with the token scheme of API version 1.13+:
//!
//! ```text
//! s = random salt (fresh for every request)
//! t = md5(password + s)
//! ```
//!
//! A salt is never reused, so two searches in the same run always carry
//! different `s`/`t` pairs.
//!
//! ## API Coverage
//!
//! - `GET /rest/search3.view` - catalog search, XML response
//! - `POST /rest/createPlaylist.view` - playlist creation from song ids

use std::{fmt, time::Duration};

use reqwest::Client;

use crate::config::REDACTED;

pub mod auth;
pub mod playlist;
pub mod search;

pub const API_VERSION: &str = "1.16.1";

const SEARCH_TIMEOUT: Duration = Duration::from_secs(20);
const PLAYLIST_TIMEOUT: Duration = Duration::from_secs(30);

/// Subsonic API client bound to one server account.
#[derive(Clone)]
pub struct SubsonicClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
    client_id: String,
}

impl SubsonicClient {
    pub fn new(http: Client, base_url: &str, username: &str, password: &str, client_id: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
            client_id: client_id.to_string(),
        }
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/rest/{}.view", self.base_url, name)
    }
}

impl fmt::Debug for SubsonicClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubsonicClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}
