//! Configuration management for setlistsync.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It covers the setlist.fm API key and the
//! credentials of the Subsonic server the playlist is created on.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, fmt, path::PathBuf};

use crate::{Error, Res};

pub const SETLISTFM_API_KEY: &str = "SETLISTFM_API_KEY";
pub const SETLISTFM_API_URL: &str = "SETLISTFM_API_URL";
pub const NAV_BASE_URL: &str = "NAV_BASE_URL";
pub const NAV_USERNAME: &str = "NAV_USERNAME";
pub const NAV_PASSWORD: &str = "NAV_PASSWORD";
pub const CLIENT_ID: &str = "CLIENT_ID";

pub const DEFAULT_SETLISTFM_API_URL: &str = "https://api.setlist.fm/rest/1.0";
pub const DEFAULT_CLIENT_ID: &str = "setlist-sync";

/// Placeholder printed instead of secrets in debug output.
pub const REDACTED: &str = "<redacted>";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file is looked up under `setlistsync/.env` in the platform-specific
/// local data directory:
/// - Linux: `~/.local/share/setlistsync/.env`
/// - macOS: `~/Library/Application Support/setlistsync/.env`
/// - Windows: `%LOCALAPPDATA%/setlistsync/.env`
///
/// A missing file is fine, plain environment variables are enough. Variables
/// already present in the environment are never overwritten.
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or the file
/// exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("setlistsync/.env");
    path
}

/// Everything a sync run needs to talk to both services.
///
/// The `Debug` output hides the API key and the account password.
#[derive(Clone)]
pub struct Config {
    pub setlistfm_api_key: String,
    pub setlistfm_api_url: String,
    pub nav_base_url: String,
    pub nav_username: String,
    pub nav_password: String,
    pub client_id: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] naming the first required variable
    /// that is unset or empty.
    pub fn load() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// The Subsonic settings are checked before the setlist.fm key.
    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| value(key).ok_or(Error::MissingConfig(key));

        let nav_base_url = required(NAV_BASE_URL)?;
        let nav_username = required(NAV_USERNAME)?;
        let nav_password = required(NAV_PASSWORD)?;
        let setlistfm_api_key = required(SETLISTFM_API_KEY)?;

        Ok(Self {
            setlistfm_api_key,
            setlistfm_api_url: value(SETLISTFM_API_URL)
                .unwrap_or_else(|| DEFAULT_SETLISTFM_API_URL.to_string()),
            nav_base_url,
            nav_username,
            nav_password,
            client_id: value(CLIENT_ID).unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string()),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("setlistfm_api_key", &REDACTED)
            .field("setlistfm_api_url", &self.setlistfm_api_url)
            .field("nav_base_url", &self.nav_base_url)
            .field("nav_username", &self.nav_username)
            .field("nav_password", &REDACTED)
            .field("client_id", &self.client_id)
            .finish()
    }
}
