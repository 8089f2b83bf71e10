use crate::utils;

use super::{API_VERSION, SubsonicClient};

/// Query parameters authenticating a single Subsonic request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthParams {
    pub username: String,
    pub token: String,
    pub salt: String,
    pub version: &'static str,
    pub client: String,
}

impl AuthParams {
    /// Signs with a freshly generated salt.
    pub fn generate(username: &str, password: &str, client: &str) -> Self {
        Self::with_salt(username, password, client, utils::generate_salt())
    }

    /// Signs with a caller supplied salt.
    ///
    /// # Arguments
    ///
    /// * `username` - Account name, sent as `u`
    /// * `password` - Plaintext password, only used to derive the token
    /// * `client` - Client identifier, sent as `c`
    /// * `salt` - Salt sent as `s`; the token is `md5(password + salt)`
    pub fn with_salt(username: &str, password: &str, client: &str, salt: String) -> Self {
        Self {
            username: username.to_string(),
            token: utils::generate_token(password, &salt),
            salt,
            version: API_VERSION,
            client: client.to_string(),
        }
    }

    /// Query pairs in the order `u`, `t`, `s`, `v`, `c`.
    pub fn into_query(self) -> Vec<(String, String)> {
        vec![
            ("u".to_string(), self.username),
            ("t".to_string(), self.token),
            ("s".to_string(), self.salt),
            ("v".to_string(), self.version.to_string()),
            ("c".to_string(), self.client),
        ]
    }
}

impl SubsonicClient {
    /// Authentication parameters for the next request, never reused.
    pub fn auth_params(&self) -> AuthParams {
        AuthParams::generate(&self.username, &self.password, &self.client_id)
    }
}
