use crate::{Error, Res};

use super::{PLAYLIST_TIMEOUT, SubsonicClient};

/// Playlist parameters: the name plus one `songId[i]` per track, in order.
pub fn playlist_query(name: &str, song_ids: &[String]) -> Vec<(String, String)> {
    let mut query = Vec::with_capacity(song_ids.len() + 1);
    query.push(("name".to_string(), name.to_string()));
    query.extend(
        song_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (format!("songId[{}]", i), id.clone())),
    );
    query
}

impl SubsonicClient {
    /// Creates a new playlist holding `song_ids` in the given order.
    ///
    /// The server either creates the playlist or it does not, there is
    /// nothing to roll back. Returns the raw response body.
    ///
    /// # Errors
    ///
    /// - [`Error::RemoteService`] for a non-success HTTP status
    /// - [`Error::Http`] for transport failures and timeouts
    pub async fn create_playlist(&self, name: &str, song_ids: &[String]) -> Res<String> {
        let mut query = self.auth_params().into_query();
        query.extend(playlist_query(name, song_ids));

        let response = self
            .http
            .post(self.endpoint("createPlaylist"))
            .query(&query)
            .timeout(PLAYLIST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::RemoteService {
                service: "subsonic createPlaylist",
                status,
                body,
            });
        }

        Ok(body)
    }
}
