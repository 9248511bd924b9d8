//! Backend gateway and song search client

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use crate::auth::Session;
use crate::{log_api_request, log_api_result};

use super::envelope::{self, Action};
use super::error::GatewayError;
use super::types::{PlaylistEntry, Song};

pub const SEARCH_RAW_LIMIT: usize = 50;
pub const SEARCH_RESULT_LIMIT: usize = 10;

/// Everything the controller needs from the outside world
#[async_trait]
pub trait RequestsGateway: Send + Sync {
    async fn get_playlist_ids(&self, session: &Session) -> Result<Vec<String>, GatewayError>;

    async fn get_playlist(
        &self,
        session: &Session,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistEntry>, GatewayError>;

    async fn new_playlist(&self, session: &Session, playlist_id: &str) -> Result<(), GatewayError>;

    async fn add_song_request(
        &self,
        session: &Session,
        playlist_id: &str,
        artist: &str,
        title: &str,
    ) -> Result<(), GatewayError>;

    async fn search_songs(&self, term: &str) -> Result<Vec<Song>, GatewayError>;
}

/// One raw item of the search provider's `results` array
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchItem {
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    results: Vec<SearchItem>,
}

/// Drop unusable items, de-duplicate by artist/title and keep the first ten
pub fn collect_songs(items: Vec<SearchItem>) -> Vec<Song> {
    let mut seen = HashSet::new();

    items
        .into_iter()
        .filter_map(|item| {
            let title = item.track_name.filter(|t| !t.trim().is_empty())?;
            let artist = item.artist_name.filter(|a| !a.trim().is_empty())?;
            Some(Song { title, artist })
        })
        .filter(|song| seen.insert(song.dedup_key()))
        .take(SEARCH_RESULT_LIMIT)
        .collect()
}

/// Append `query` to `base`, keeping any query string `base` already has
fn with_query(base: &str, query: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{query}")
}

/// HTTP implementation of [`RequestsGateway`]
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    gateway_url: String,
    search_url: String,
}

impl GatewayClient {
    pub fn new(gateway_url: impl Into<String>, search_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            gateway_url: gateway_url.into(),
            search_url: search_url.into(),
        }
    }

    fn action_url(&self, query: &str) -> String {
        with_query(&self.gateway_url, &format!("q={query}"))
    }

    async fn call<T>(&self, session: &Session, action: Action<'_>) -> Result<T, GatewayError>
    where
        T: serde::de::DeserializeOwned,
    {
        let name = action.name();
        log_api_request!(name, gateway = %self.gateway_url);

        let url = self.action_url(&envelope::wrap(&action, session.access_token())?);

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(operation = name, %status, "Gateway answered with non-success status");
        }

        let result = envelope::unwrap_body(&body);
        log_api_result!(name, result);
        result
    }

    fn search_query(term: &str) -> String {
        let limit = SEARCH_RAW_LIMIT.to_string();
        [
            ("term", term),
            ("media", "music"),
            ("entity", "song"),
            ("limit", limit.as_str()),
        ]
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
    }

    async fn fetch_search(&self, term: &str) -> Result<Vec<Song>, GatewayError> {
        let url = with_query(&self.search_url, &Self::search_query(term));

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| GatewayError::SearchUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::SearchUnavailable(format!(
                "search provider answered {}",
                response.status()
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::SearchUnavailable(e.to_string()))?;

        Ok(collect_songs(parsed.results))
    }
}

#[async_trait]
impl RequestsGateway for GatewayClient {
    async fn get_playlist_ids(&self, session: &Session) -> Result<Vec<String>, GatewayError> {
        self.call(session, Action::GetPlaylistIds).await
    }

    async fn get_playlist(
        &self,
        session: &Session,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistEntry>, GatewayError> {
        self.call(session, Action::GetPlaylist { playlist_id }).await
    }

    async fn new_playlist(&self, session: &Session, playlist_id: &str) -> Result<(), GatewayError> {
        self.call::<serde_json::Value>(session, Action::NewPlaylist { playlist_id })
            .await
            .map(|_| ())
    }

    async fn add_song_request(
        &self,
        session: &Session,
        playlist_id: &str,
        artist: &str,
        title: &str,
    ) -> Result<(), GatewayError> {
        self.call::<serde_json::Value>(
            session,
            Action::AddSongRequest {
                playlist_id,
                artist,
                title,
            },
        )
        .await
        .map(|_| ())
    }

    async fn search_songs(&self, term: &str) -> Result<Vec<Song>, GatewayError> {
        if term.trim().is_empty() {
            return Ok(Vec::new());
        }

        log_api_request!("searchSongs", term);

        let result = self.fetch_search(term).await;

        if let Ok(songs) = &result {
            tracing::debug!(term, count = songs.len(), "Search results collected");
        }
        log_api_result!("searchSongs", result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn item(title: Option<&str>, artist: Option<&str>) -> SearchItem {
        SearchItem {
            track_name: title.map(str::to_string),
            artist_name: artist.map(str::to_string),
        }
    }

    /// Serve a single HTTP response and hand back the raw request that was received
    async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{addr}/exec"), handle)
    }

    fn session() -> Session {
        Session::new("test-token")
    }

    #[test]
    fn test_collect_songs_skips_unusable_items() {
        let songs = collect_songs(vec![
            item(Some("Love Story"), Some("Taylor Swift")),
            item(None, Some("Taylor Swift")),
            item(Some("Untitled"), None),
            item(Some("  "), Some("Someone")),
            item(Some("22"), Some("Taylor Swift")),
        ]);
        assert_eq!(
            songs,
            vec![
                Song::new("Love Story", "Taylor Swift"),
                Song::new("22", "Taylor Swift"),
            ]
        );
    }

    #[test]
    fn test_collect_songs_dedupes_case_insensitively_keeping_first() {
        let songs = collect_songs(vec![
            item(Some("Love Story"), Some("Taylor Swift")),
            item(Some("LOVE STORY"), Some("taylor swift")),
            item(Some("Love Story"), Some("Someone Else")),
        ]);
        assert_eq!(
            songs,
            vec![
                Song::new("Love Story", "Taylor Swift"),
                Song::new("Love Story", "Someone Else"),
            ]
        );
    }

    #[test]
    fn test_collect_songs_truncates_in_provider_order() {
        let items = (0..SEARCH_RAW_LIMIT)
            .map(|i| SearchItem {
                track_name: Some(format!("Song {}", i / 2)),
                artist_name: Some("Band".to_string()),
            })
            .collect();
        let songs = collect_songs(items);
        assert_eq!(songs.len(), SEARCH_RESULT_LIMIT);
        let titles: Vec<_> = songs.iter().map(|s| s.title.clone()).collect();
        let expected: Vec<_> = (0..SEARCH_RESULT_LIMIT).map(|i| format!("Song {i}")).collect();
        assert_eq!(titles, expected);
    }

    #[tokio::test]
    async fn test_blank_search_term_makes_no_network_call() {
        // Nothing listens on port 9; any request would fail with SearchUnavailable
        let client = GatewayClient::new("http://127.0.0.1:9/exec", "http://127.0.0.1:9/search");
        assert_eq!(client.search_songs("").await.unwrap(), Vec::<Song>::new());
        assert_eq!(client.search_songs("   \t").await.unwrap(), Vec::<Song>::new());
    }

    #[tokio::test]
    async fn test_unreachable_search_provider() {
        let client = GatewayClient::new("http://127.0.0.1:9/exec", "http://127.0.0.1:9/search");
        let result = client.search_songs("tay").await;
        assert!(matches!(result, Err(GatewayError::SearchUnavailable(_))));
    }

    #[tokio::test]
    async fn test_search_request_and_post_processing() {
        let body = r#"{"resultCount":3,"results":[
            {"trackName":"Love Story","artistName":"Taylor Swift","collectionName":"Fearless"},
            {"trackName":"love story","artistName":"TAYLOR SWIFT"},
            {"artistName":"No Title"}
        ]}"#;
        let (url, request) = serve_once("200 OK", body).await;
        let client = GatewayClient::new("http://127.0.0.1:9/exec", url);

        let songs = client.search_songs("taylor swift").await.unwrap();
        assert_eq!(songs, vec![Song::new("Love Story", "Taylor Swift")]);

        let request = request.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /exec?"));
        assert!(request_line.contains("media=music"));
        assert!(request_line.contains("entity=song"));
        assert!(request_line.contains("limit=50"));
        assert!(request_line.contains("term=taylor"));
    }

    #[test]
    fn test_with_query_respects_existing_query_string() {
        assert_eq!(with_query("https://host/search", "term=a"), "https://host/search?term=a");
        assert_eq!(
            with_query("https://host/search?country=us", "term=a"),
            "https://host/search?country=us&term=a"
        );
    }

    #[tokio::test]
    async fn test_search_url_with_own_query_string() {
        let (url, request) = serve_once("200 OK", r#"{"results":[]}"#).await;
        let client = GatewayClient::new("http://127.0.0.1:9/exec", format!("{url}?country=us"));

        assert!(client.search_songs("tay").await.unwrap().is_empty());

        let request = request.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /exec?country=us&term=tay"));
        assert!(!request_line.contains("??"));
    }

    #[tokio::test]
    async fn test_search_non_success_status() {
        let (url, _request) = serve_once("503 Service Unavailable", "{}").await;
        let client = GatewayClient::new("http://127.0.0.1:9/exec", url);
        let result = client.search_songs("tay").await;
        assert!(matches!(result, Err(GatewayError::SearchUnavailable(_))));
    }

    #[tokio::test]
    async fn test_backend_call_uses_post_with_wrapped_query() {
        let (url, request) = serve_once("200 OK", r#"{"ok":true,"content":["pop","rock"]}"#).await;
        let client = GatewayClient::new(url, "http://127.0.0.1:9/search");

        let ids = client.get_playlist_ids(&session()).await.unwrap();
        assert_eq!(ids, vec!["pop".to_string(), "rock".to_string()]);

        let request = request.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("POST /exec?q="));
        assert!(
            request
                .to_lowercase()
                .contains("content-type: application/x-www-form-urlencoded")
        );

        let encoded = request_line
            .trim_start_matches("POST /exec?q=")
            .split(' ')
            .next()
            .unwrap();
        let payload: serde_json::Value =
            serde_json::from_str(&urlencoding::decode(encoded).unwrap()).unwrap();
        assert_eq!(payload["action"], "getPlaylistIds");
        assert_eq!(payload["accessToken"], "test-token");
    }

    #[tokio::test]
    async fn test_backend_remote_error_is_propagated() {
        let (url, _request) =
            serve_once("200 OK", r#"{"ok":false,"error":"Playlist already exists"}"#).await;
        let client = GatewayClient::new(url, "http://127.0.0.1:9/search");

        let result = client.new_playlist(&session(), "pop").await;
        assert_eq!(
            result,
            Err(GatewayError::Remote("Playlist already exists".to_string()))
        );
    }

    #[tokio::test]
    async fn test_backend_playlist_entries_are_decoded() {
        let body = r#"{"ok":true,"content":[
            {"title":"Love Story","artist":"Taylor Swift","submittedOn":"2025-03-01T10:00:00.000Z",
             "submittedBy":"student@jamesirwin.org","status":"Approved","notes":""}
        ]}"#;
        let (url, _request) = serve_once("200 OK", body).await;
        let client = GatewayClient::new(url, "http://127.0.0.1:9/search");

        let entries = client.get_playlist(&session(), "pop").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].submitted_by, "student@jamesirwin.org");
        assert_eq!(entries[0].status, "Approved");
    }

    #[tokio::test]
    async fn test_backend_malformed_body() {
        let (url, _request) = serve_once("200 OK", r#"{"content":[]}"#).await;
        let client = GatewayClient::new(url, "http://127.0.0.1:9/search");
        let result = client.get_playlist(&session(), "pop").await;
        assert!(matches!(result, Err(GatewayError::MalformedResponse(_))));
    }
}
