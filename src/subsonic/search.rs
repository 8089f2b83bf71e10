use roxmltree::Document;

use crate::{Error, Res, types::Candidate, utils};

use super::{SEARCH_TIMEOUT, SubsonicClient};

impl SubsonicClient {
    /// Searches the catalog for one setlist title.
    ///
    /// The query is `"<artist> <title>"` when an artist hint is known,
    /// otherwise the bare title. Only songs are requested (`artistCount` and
    /// `albumCount` are zero). Candidates come back in server order.
    ///
    /// # Errors
    ///
    /// - [`Error::RemoteService`] for a non-success HTTP status
    /// - [`Error::Http`] for transport failures and timeouts
    /// - [`Error::Xml`] / [`Error::Subsonic`] for unusable responses
    pub async fn search(
        &self,
        artist: Option<&str>,
        title: &str,
        max_results: u32,
    ) -> Res<Vec<Candidate>> {
        let mut query = self.auth_params().into_query();
        query.push(("query".to_string(), utils::build_search_query(artist, title)));
        query.push(("songCount".to_string(), max_results.to_string()));
        query.push(("artistCount".to_string(), "0".to_string()));
        query.push(("albumCount".to_string(), "0".to_string()));

        let response = self
            .http
            .get(self.endpoint("search3"))
            .query(&query)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::RemoteService {
                service: "subsonic search3",
                status,
                body,
            });
        }

        parse_search_response(&body)
    }
}

/// Extracts song candidates from a `search3` XML response.
///
/// Works for both namespaced (`xmlns="http://subsonic.org/restapi"`) and
/// plain documents. Songs without an `id` are ignored; the display name is
/// the `title` attribute, falling back to `name`.
pub fn parse_search_response(xml: &str) -> Res<Vec<Candidate>> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();

    if root.attribute("status") == Some("failed") {
        let err = root
            .children()
            .find(|n| n.is_element() && n.tag_name().name() == "error");
        return Err(Error::Subsonic {
            code: err
                .and_then(|n| n.attribute("code"))
                .and_then(|c| c.parse().ok())
                .unwrap_or(0),
            message: err
                .and_then(|n| n.attribute("message"))
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    let candidates = doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "song")
        .filter_map(|n| {
            let id = n.attribute("id").filter(|id| !id.is_empty())?;
            Some(Candidate {
                id: id.to_string(),
                title: n
                    .attribute("title")
                    .or_else(|| n.attribute("name"))
                    .map(str::to_string),
            })
        })
        .collect();

    Ok(candidates)
}
