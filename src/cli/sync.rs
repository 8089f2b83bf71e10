use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tabled::Table;

use crate::{
    Error, Res,
    config::Config,
    info, setlistfm,
    subsonic::SubsonicClient,
    success,
    types::{MatchOutcome, MatchTableRow, SyncReport, TitleMatch},
    utils, warning,
};

pub const DEFAULT_MAX_SONGS: usize = 200;
pub const DEFAULT_SEARCH_LIMIT: u32 = 5;

/// Options of a single sync run, mirroring the command-line flags.
///
/// `setlist_id` takes priority over `setlist_url`; one of them must
/// resolve to an id.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub setlist_id: Option<String>,
    pub setlist_url: Option<String>,
    /// Name of the playlist created on the Subsonic server
    pub playlist_name: String,
    /// Search hint, the setlist's artist is used when `None`
    pub artist: Option<String>,
    /// Titles beyond this count are not matched
    pub max_songs: usize,
    /// `songCount` sent with every search
    pub search_limit: u32,
    /// Match only, skip playlist creation
    pub dry_run: bool,
}

impl SyncOptions {
    /// Options with default limits and no setlist reference yet.
    pub fn new(playlist_name: impl Into<String>) -> Self {
        Self {
            setlist_id: None,
            setlist_url: None,
            playlist_name: playlist_name.into(),
            artist: None,
            max_songs: DEFAULT_MAX_SONGS,
            search_limit: DEFAULT_SEARCH_LIMIT,
            dry_run: false,
        }
    }
}

/// Recreates a setlist as a playlist on the Subsonic server.
///
/// # Errors
///
/// - [`Error::MissingSetlistReference`] when neither id nor url resolve
/// - [`Error::NoSongsFound`] when the setlist has no named songs
/// - [`Error::NothingMatched`] when no title matched the catalog
/// - [`Error::RemoteService`] and transport errors from the setlist fetch
///   or the playlist creation
pub async fn sync(config: &Config, opts: &SyncOptions) -> Res<SyncReport> {
    let setlist_id = utils::resolve_setlist_id(opts.setlist_id.as_deref(), opts.setlist_url.as_deref())
        .ok_or(Error::MissingSetlistReference)?;

    let http = Client::new();

    let pb = spinner(format!("Fetching setlist {} from setlist.fm...", setlist_id));
    let fetched = setlistfm::fetch_song_titles(
        &http,
        &config.setlistfm_api_url,
        &config.setlistfm_api_key,
        &setlist_id,
    )
    .await;
    pb.finish_and_clear();
    let (mut titles, setlist) = fetched?;

    if titles.is_empty() {
        return Err(Error::NoSongsFound(setlist_id));
    }

    utils::truncate_titles(&mut titles, opts.max_songs);
    info!(
        "Found {} songs in setlist {} ({}). Matching against {}...",
        titles.len(),
        setlist_id,
        setlist.describe(),
        config.nav_base_url
    );

    let artist = opts
        .artist
        .as_deref()
        .or_else(|| setlist.artist_name())
        .map(str::to_string);

    let subsonic = SubsonicClient::new(
        http,
        &config.nav_base_url,
        &config.nav_username,
        &config.nav_password,
        &config.client_id,
    );

    let matches = match_titles(&subsonic, artist.as_deref(), &titles, opts.search_limit).await;

    let rows: Vec<MatchTableRow> = matches
        .iter()
        .enumerate()
        .map(|(i, m)| MatchTableRow::new(i + 1, m))
        .collect();
    println!("{}", Table::new(rows));

    let mut report = SyncReport {
        setlist_id,
        playlist_name: opts.playlist_name.clone(),
        matches,
        server_response: None,
    };

    let song_ids = report.matched_ids();
    if song_ids.is_empty() {
        return Err(Error::NothingMatched);
    }

    if opts.dry_run {
        info!(
            "Dry run: playlist '{}' with {} of {} tracks not created",
            report.playlist_name,
            song_ids.len(),
            report.matches.len()
        );
        return Ok(report);
    }

    info!(
        "Creating playlist '{}' with {} tracks...",
        report.playlist_name,
        song_ids.len()
    );
    let body = subsonic
        .create_playlist(&report.playlist_name, &song_ids)
        .await?;

    success!("Playlist '{}' created", report.playlist_name);
    info!("Server response:\n{}", body.trim_end());
    report.server_response = Some(body);

    Ok(report)
}

/// Searches every title in setlist order.
///
/// A failed search is logged and recorded, it never aborts the loop.
async fn match_titles(
    subsonic: &SubsonicClient,
    artist: Option<&str>,
    titles: &[String],
    search_limit: u32,
) -> Vec<TitleMatch> {
    let pb = ProgressBar::new(titles.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:30.blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut matches = Vec::with_capacity(titles.len());
    for title in titles {
        pb.set_message(title.clone());

        let outcome = match subsonic.search(artist, title, search_limit).await {
            Ok(candidates) => match utils::select_candidate(&candidates) {
                Some(chosen) => {
                    pb.suspend(|| {
                        success!(
                            "Matched: {} -> {} (id {})",
                            title,
                            chosen.title.as_deref().unwrap_or("?"),
                            chosen.id
                        )
                    });
                    MatchOutcome::Matched(chosen.clone())
                }
                None => {
                    pb.suspend(|| warning!("No match for: {}", title));
                    MatchOutcome::NotFound
                }
            },
            Err(e) => {
                pb.suspend(|| warning!("Search failed for '{}': {}", title, e));
                MatchOutcome::Failed(e.to_string())
            }
        };

        matches.push(TitleMatch {
            title: title.clone(),
            outcome,
        });
        pb.inc(1);
    }

    pb.finish_and_clear();
    matches
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
