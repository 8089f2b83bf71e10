use serde::{Deserialize, Deserializer};
use tabled::Tabled;

/// A setlist document as returned by `GET /setlist/{id}`.
///
/// Only the fields the sync flow reads are modelled; everything is optional
/// because setlist.fm omits keys (or sends `null`) for unknown values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setlist {
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default)]
    pub artist: Option<SetlistArtist>,
    #[serde(default)]
    pub venue: Option<Venue>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sets: Sets,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetlistArtist {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Venue {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sets {
    #[serde(default, deserialize_with = "null_as_default")]
    pub set: Vec<Set>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Set {
    #[serde(default, deserialize_with = "null_as_default")]
    pub song: Vec<Song>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Song {
    #[serde(default)]
    pub name: Option<String>,
}

impl Setlist {
    /// Song titles across all sets in document order.
    ///
    /// Entries without a name (or with an empty one) are skipped. Duplicates
    /// are kept since a song can be played twice.
    pub fn song_titles(&self) -> Vec<String> {
        self.sets
            .set
            .iter()
            .flat_map(|set| set.song.iter())
            .filter_map(|song| song.name.as_deref())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Short human readable label, e.g. `The Band at Hollywood Bowl (23-08-1964)`.
    pub fn describe(&self) -> String {
        let mut label = self.artist_name().unwrap_or("Unknown artist").to_string();
        if let Some(venue) = self.venue.as_ref().and_then(|v| v.name.as_deref()) {
            label.push_str(&format!(" at {}", venue));
        }
        if let Some(date) = self.event_date.as_deref() {
            label.push_str(&format!(" ({})", date));
        }
        label
    }

    /// Artist name of the performance, `None` when absent or empty.
    pub fn artist_name(&self) -> Option<&str> {
        self.artist
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .filter(|n| !n.is_empty())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A track returned by a catalog search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub title: Option<String>,
}

/// What happened to one setlist title during matching.
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    Matched(Candidate),
    NotFound,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct TitleMatch {
    pub title: String,
    pub outcome: MatchOutcome,
}

impl TitleMatch {
    pub fn track_id(&self) -> Option<&str> {
        match &self.outcome {
            MatchOutcome::Matched(c) => Some(c.id.as_str()),
            _ => None,
        }
    }
}

#[derive(Tabled)]
pub struct MatchTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub title: String,
    #[tabled(rename = "match")]
    pub matched: String,
    pub id: String,
}

impl MatchTableRow {
    pub fn new(position: usize, entry: &TitleMatch) -> Self {
        let (matched, id) = match &entry.outcome {
            MatchOutcome::Matched(c) => (
                c.title.clone().unwrap_or_else(|| "?".to_string()),
                c.id.clone(),
            ),
            MatchOutcome::NotFound => ("-".to_string(), "-".to_string()),
            MatchOutcome::Failed(_) => ("error".to_string(), "-".to_string()),
        };

        Self {
            position,
            title: entry.title.clone(),
            matched,
            id,
        }
    }
}

/// Result of a complete sync run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub setlist_id: String,
    pub playlist_name: String,
    pub matches: Vec<TitleMatch>,
    /// Raw body of the playlist creation call, `None` for a dry run.
    pub server_response: Option<String>,
}

impl SyncReport {
    pub fn matched_ids(&self) -> Vec<String> {
        self.matches
            .iter()
            .filter_map(|m| m.track_id().map(str::to_string))
            .collect()
    }
}
