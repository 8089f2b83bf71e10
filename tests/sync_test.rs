use std::{
    collections::{HashMap, HashSet},
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use setlistsync::{
    Error,
    cli::{self, SyncOptions},
    config::Config,
    types::MatchOutcome,
    utils,
};

const API_KEY: &str = "test-api-key";
const PASSWORD: &str = "sesame";

type Params = Vec<(String, String)>;

// In-process stand-in for setlist.fm and a Subsonic server
#[derive(Clone, Default)]
struct FakeServices {
    setlists: Arc<HashMap<String, String>>,
    catalog: Arc<HashMap<String, Vec<(String, String)>>>,
    broken_queries: Arc<HashSet<String>>,
    playlist_status: u16,
    searches: Arc<Mutex<Vec<Params>>>,
    playlists: Arc<Mutex<Vec<Params>>>,
}

impl FakeServices {
    fn new() -> Self {
        Self {
            playlist_status: 200,
            ..Default::default()
        }
    }

    fn setlist(mut self, id: &str, body: &str) -> Self {
        Arc::make_mut(&mut self.setlists).insert(id.to_string(), body.to_string());
        self
    }

    fn songs(mut self, query: &str, songs: &[(&str, &str)]) -> Self {
        Arc::make_mut(&mut self.catalog).insert(
            query.to_string(),
            songs
                .iter()
                .map(|(id, title)| (id.to_string(), title.to_string()))
                .collect(),
        );
        self
    }

    fn broken(mut self, query: &str) -> Self {
        Arc::make_mut(&mut self.broken_queries).insert(query.to_string());
        self
    }

    fn playlist_status(mut self, status: u16) -> Self {
        self.playlist_status = status;
        self
    }

    fn searches(&self) -> Vec<Params> {
        self.searches.lock().unwrap().clone()
    }

    fn playlists(&self) -> Vec<Params> {
        self.playlists.lock().unwrap().clone()
    }

    async fn start(&self) -> Config {
        let app = Router::new()
            .route("/rest/1.0/setlist/{id}", get(setlist))
            .route("/rest/search3.view", get(search3))
            .route("/rest/createPlaylist.view", post(create_playlist))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Config {
            setlistfm_api_key: API_KEY.to_string(),
            setlistfm_api_url: format!("http://{}/rest/1.0", addr),
            nav_base_url: format!("http://{}/", addr),
            nav_username: "admin".to_string(),
            nav_password: PASSWORD.to_string(),
            client_id: "setlist-sync-test".to_string(),
        }
    }
}

fn param<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

async fn setlist(
    State(services): State<FakeServices>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return (StatusCode::FORBIDDEN, "invalid api key".to_string());
    }

    match services.setlists.get(&id) {
        Some(body) => (StatusCode::OK, body.clone()),
        None => (
            StatusCode::NOT_FOUND,
            r#"{"code":404,"status":"Not Found","message":"not found"}"#.to_string(),
        ),
    }
}

async fn search3(
    State(services): State<FakeServices>,
    Query(params): Query<Params>,
) -> (StatusCode, String) {
    services.searches.lock().unwrap().push(params.clone());

    let query = param(&params, "query").unwrap_or_default();
    if services.broken_queries.contains(query) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "search index unavailable".to_string());
    }

    let songs: String = services
        .catalog
        .get(query)
        .map(|songs| {
            songs
                .iter()
                .map(|(id, title)| format!(r#"<song id="{}" title="{}" isDir="false"/>"#, id, title))
                .collect()
        })
        .unwrap_or_default();

    (
        StatusCode::OK,
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><subsonic-response xmlns="http://subsonic.org/restapi" status="ok" version="1.16.1"><searchResult3>{}</searchResult3></subsonic-response>"#,
            songs
        ),
    )
}

async fn create_playlist(
    State(services): State<FakeServices>,
    Query(params): Query<Params>,
) -> (StatusCode, String) {
    services.playlists.lock().unwrap().push(params);

    let status = StatusCode::from_u16(services.playlist_status).unwrap();
    if status.is_success() {
        (
            status,
            r#"<subsonic-response xmlns="http://subsonic.org/restapi" status="ok" version="1.16.1"/>"#
                .to_string(),
        )
    } else {
        (status, "internal error".to_string())
    }
}

const CONCERT: &str = r#"{
    "id": "63de4613",
    "eventDate": "23-08-1964",
    "artist": {"name": "The Band"},
    "venue": {"name": "Hollywood Bowl"},
    "sets": {"set": [
        {"song": [{"name": "Opener"}, {"name": "Broken"}, {"name": ""}]},
        {"song": [{"name": "Unknown"}, {"name": "Encore"}]}
    ]}
}"#;

fn concert_services() -> FakeServices {
    FakeServices::new()
        .setlist("63de4613", CONCERT)
        .songs("The Band Opener", &[("op1", "Opener")])
        .broken("The Band Broken")
        .songs("The Band Unknown", &[])
        .songs("The Band Encore", &[("id1", "Encore"), ("id2", "Encore (Live)")])
}

fn options() -> SyncOptions {
    let mut opts = SyncOptions::new("The Band - Hollywood Bowl");
    opts.setlist_id = Some("63de4613".to_string());
    opts
}

#[tokio::test]
async fn test_sync_creates_playlist_from_matched_songs() {
    let services = concert_services();
    let config = services.start().await;

    let report = cli::sync(&config, &options()).await.unwrap();

    assert_eq!(report.setlist_id, "63de4613");
    let titles: Vec<&str> = report.matches.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Opener", "Broken", "Unknown", "Encore"]);

    assert!(matches!(report.matches[0].outcome, MatchOutcome::Matched(_)));
    assert!(matches!(report.matches[1].outcome, MatchOutcome::Failed(_)));
    assert!(matches!(report.matches[2].outcome, MatchOutcome::NotFound));

    // first result wins, surviving titles keep setlist order
    assert_eq!(report.matched_ids(), vec!["op1", "id1"]);
    assert!(report.server_response.is_some());

    let playlists = services.playlists();
    assert_eq!(playlists.len(), 1);
    let created = &playlists[0];
    assert_eq!(param(created, "name"), Some("The Band - Hollywood Bowl"));
    assert_eq!(param(created, "songId[0]"), Some("op1"));
    assert_eq!(param(created, "songId[1]"), Some("id1"));
    assert_eq!(param(created, "songId[2]"), None);
}

#[tokio::test]
async fn test_every_request_is_signed_with_a_fresh_salt() {
    let services = concert_services();
    let config = services.start().await;

    cli::sync(&config, &options()).await.unwrap();

    let requests: Vec<Params> = services
        .searches()
        .into_iter()
        .chain(services.playlists())
        .collect();
    assert_eq!(requests.len(), 5);

    let mut salts = HashSet::new();
    let mut tokens = HashSet::new();
    for request in &requests {
        let salt = param(request, "s").unwrap();
        let token = param(request, "t").unwrap();
        assert_eq!(token, utils::generate_token(PASSWORD, salt));
        assert_eq!(param(request, "u"), Some("admin"));
        assert_eq!(param(request, "v"), Some("1.16.1"));
        assert_eq!(param(request, "c"), Some("setlist-sync-test"));
        salts.insert(salt.to_string());
        tokens.insert(token.to_string());
    }
    assert_eq!(salts.len(), requests.len());
    assert_eq!(tokens.len(), requests.len());
}

#[tokio::test]
async fn test_search_parameters() {
    let services = concert_services();
    let config = services.start().await;

    let mut opts = options();
    opts.search_limit = 3;
    cli::sync(&config, &opts).await.unwrap();

    for search in services.searches() {
        assert_eq!(param(&search, "songCount"), Some("3"));
        assert_eq!(param(&search, "artistCount"), Some("0"));
        assert_eq!(param(&search, "albumCount"), Some("0"));
    }
}

#[tokio::test]
async fn test_artist_option_overrides_setlist_artist() {
    let services = concert_services().songs("Someone Else Encore", &[("x9", "Encore")]);
    let config = services.start().await;

    let mut opts = options();
    opts.artist = Some("Someone Else".to_string());
    let report = cli::sync(&config, &opts).await.unwrap();

    let queries: Vec<String> = services
        .searches()
        .iter()
        .filter_map(|s| param(s, "query").map(str::to_string))
        .collect();
    assert!(queries.iter().all(|q| q.starts_with("Someone Else ")));
    assert_eq!(report.matched_ids(), vec!["x9"]);
}

#[tokio::test]
async fn test_title_only_query_without_artist() {
    let services = FakeServices::new()
        .setlist("noartist", r#"{"sets": {"set": [{"song": [{"name": "Encore"}]}]}}"#)
        .songs("Encore", &[("e1", "Encore")]);
    let config = services.start().await;

    let mut opts = options();
    opts.setlist_id = Some("noartist".to_string());
    let report = cli::sync(&config, &opts).await.unwrap();

    assert_eq!(param(&services.searches()[0], "query"), Some("Encore"));
    assert_eq!(report.matched_ids(), vec!["e1"]);
}

#[tokio::test]
async fn test_max_songs_truncates_before_matching() {
    let services = concert_services();
    let config = services.start().await;

    let mut opts = options();
    opts.max_songs = 2;
    let report = cli::sync(&config, &opts).await.unwrap();

    assert_eq!(services.searches().len(), 2);
    assert_eq!(report.matches.len(), 2);
    assert_eq!(report.matched_ids(), vec!["op1"]);
}

#[tokio::test]
async fn test_setlist_url_is_resolved() {
    let services = concert_services();
    let config = services.start().await;

    let mut opts = SyncOptions::new("From URL");
    opts.setlist_url = Some(
        "https://www.setlist.fm/setlist/the-band/1964/hollywood-bowl-los-angeles-ca-63de4613.html"
            .to_string(),
    );
    let report = cli::sync(&config, &opts).await.unwrap();

    assert_eq!(report.setlist_id, "63de4613");
}

#[tokio::test]
async fn test_missing_setlist_reference() {
    let services = concert_services();
    let config = services.start().await;

    let err = cli::sync(&config, &SyncOptions::new("Nothing"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MissingSetlistReference));
    assert_eq!(err.exit_code(), 2);
    assert!(services.searches().is_empty());
}

#[tokio::test]
async fn test_setlist_without_sets_has_no_songs() {
    let services = FakeServices::new().setlist("empty", r#"{"id": "empty", "artist": {"name": "X"}}"#);
    let config = services.start().await;

    let mut opts = options();
    opts.setlist_id = Some("empty".to_string());
    let err = cli::sync(&config, &opts).await.unwrap_err();

    assert!(matches!(err, Error::NoSongsFound(ref id) if id == "empty"));
    assert_eq!(err.exit_code(), 1);
    assert!(services.searches().is_empty());
    assert!(services.playlists().is_empty());
}

#[tokio::test]
async fn test_nothing_matched_creates_no_playlist() {
    let services = FakeServices::new().setlist("63de4613", CONCERT);
    let config = services.start().await;

    let err = cli::sync(&config, &options()).await.unwrap_err();

    assert!(matches!(err, Error::NothingMatched));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(services.searches().len(), 4);
    assert!(services.playlists().is_empty());
}

#[tokio::test]
async fn test_setlist_fetch_failure_is_fatal() {
    let services = concert_services();
    let config = services.start().await;

    let mut opts = options();
    opts.setlist_id = Some("does-not-exist".to_string());
    let err = cli::sync(&config, &opts).await.unwrap_err();

    match err {
        Error::RemoteService { status, ref body, .. } => {
            assert_eq!(status.as_u16(), 404);
            assert!(body.contains("not found"));
        }
        ref other => panic!("unexpected error: {:?}", other),
    }
    assert_ne!(err.exit_code(), 0);
    assert!(services.searches().is_empty());
}

#[tokio::test]
async fn test_wrong_api_key_is_fatal() {
    let services = concert_services();
    let mut config = services.start().await;
    config.setlistfm_api_key = "wrong".to_string();

    let err = cli::sync(&config, &options()).await.unwrap_err();

    assert!(matches!(err, Error::RemoteService { status, .. } if status.as_u16() == 403));
}

#[tokio::test]
async fn test_playlist_failure_is_fatal() {
    let services = concert_services().playlist_status(500);
    let config = services.start().await;

    let err = cli::sync(&config, &options()).await.unwrap_err();

    match err {
        Error::RemoteService { status, ref body, .. } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "internal error");
        }
        ref other => panic!("unexpected error: {:?}", other),
    }
    assert_ne!(err.exit_code(), 0);
    assert_eq!(services.playlists().len(), 1);
}

#[tokio::test]
async fn test_dry_run_skips_playlist_creation() {
    let services = concert_services();
    let config = services.start().await;

    let mut opts = options();
    opts.dry_run = true;
    let report = cli::sync(&config, &opts).await.unwrap();

    assert_eq!(report.matched_ids(), vec!["op1", "id1"]);
    assert!(report.server_response.is_none());
    assert!(services.playlists().is_empty());
}
