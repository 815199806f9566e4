use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Method, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::model::{Folder, FolderId, Game, GameDraft, GameId, NewFolder, SearchResponse};

/// Errors surfaced by the catalog backend client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: HTTP {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Data format error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Expected JSON, got {content_type}")]
    NotJson { content_type: String },
}

impl ApiError {
    /// True for 4xx responses, which retrying would not fix.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if (400..500).contains(status))
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http(e) => format!("Network error: {}", e),
            ApiError::Status { status, message } => format!("Server error ({}): {}", status, message),
            ApiError::Decode(e) => format!("Unexpected response: {}", e),
            ApiError::InvalidUrl(msg) => format!("Bad address: {}", msg),
            ApiError::NotJson { content_type } if content_type.starts_with("text/html") => {
                "Login required: the backend answered with a web page".to_string()
            }
            ApiError::NotJson { content_type } => {
                format!("Unexpected response type: {}", content_type)
            }
        }
    }
}

/// Which set of listing endpoints the client talks to.
///
/// The admin panel reads folder contents and search results from the
/// authenticated routes; the public page uses the `/api/public/` ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Public,
    Admin,
}

impl Surface {
    fn folder_games_path(self, folder: FolderId) -> String {
        match self {
            Surface::Public => format!("api/public/folders/{}/games/", folder),
            Surface::Admin => format!("api/folders/{}/games/", folder),
        }
    }

    fn search_path(self) -> &'static str {
        match self {
            Surface::Public => "api/public/search/",
            Surface::Admin => "api/search/",
        }
    }
}

/// The backend contract. Everything the UI knows about persistence goes
/// through here.
pub trait CatalogApi: Send + Sync + 'static {
    fn list_folders(&self) -> impl Future<Output = Result<Vec<Folder>, ApiError>> + Send;

    fn create_folder(&self, name: &str) -> impl Future<Output = Result<Folder, ApiError>> + Send;

    fn get_game(&self, id: GameId) -> impl Future<Output = Result<Game, ApiError>> + Send;

    fn create_game(&self, draft: &GameDraft) -> impl Future<Output = Result<Game, ApiError>> + Send;

    fn update_game(
        &self,
        id: GameId,
        draft: &GameDraft,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn delete_game(&self, id: GameId) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn folder_games(
        &self,
        folder: FolderId,
    ) -> impl Future<Output = Result<Vec<Game>, ApiError>> + Send;

    fn search(&self, query: &str) -> impl Future<Output = Result<SearchResponse, ApiError>> + Send;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// `CatalogApi` over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: Client,
    base: Url,
    surface: Surface,
}

impl HttpCatalog {
    pub fn new(base_url: &str, surface: Surface, timeout: Duration) -> Result<Self, ApiError> {
        let base = parse_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("games-catalog/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base, surface })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<Response, ApiError> {
        debug!(%method, %url, "request");
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let bytes = response.bytes().await.unwrap_or_default();
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .map(|b| b.error)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown").to_string());
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<T, ApiError> {
        let response = self.send(method, url, body).await?;
        expect_json(
            response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        )?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl CatalogApi for HttpCatalog {
    async fn list_folders(&self) -> Result<Vec<Folder>, ApiError> {
        let url = self.url("api/folders/")?;
        self.json(Method::GET, url, None).await
    }

    async fn create_folder(&self, name: &str) -> Result<Folder, ApiError> {
        let url = self.url("api/folders/")?;
        let body = serde_json::to_value(NewFolder { name: name.to_string() })?;
        self.json(Method::POST, url, Some(body)).await
    }

    async fn get_game(&self, id: GameId) -> Result<Game, ApiError> {
        let url = self.url(&format!("api/games/{}/", id))?;
        self.json(Method::GET, url, None).await
    }

    async fn create_game(&self, draft: &GameDraft) -> Result<Game, ApiError> {
        let url = self.url("api/games/")?;
        let body = serde_json::to_value(draft)?;
        self.json(Method::POST, url, Some(body)).await
    }

    async fn update_game(&self, id: GameId, draft: &GameDraft) -> Result<(), ApiError> {
        let url = self.url(&format!("api/games/{}/", id))?;
        let body = serde_json::to_value(draft)?;
        self.send(Method::PUT, url, Some(body)).await?;
        Ok(())
    }

    async fn delete_game(&self, id: GameId) -> Result<(), ApiError> {
        let url = self.url(&format!("api/games/{}/", id))?;
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn folder_games(&self, folder: FolderId) -> Result<Vec<Game>, ApiError> {
        let url = self.url(&self.surface.folder_games_path(folder))?;
        self.json(Method::GET, url, None).await
    }

    async fn search(&self, query: &str) -> Result<SearchResponse, ApiError> {
        let mut url = self.url(self.surface.search_path())?;
        url.query_pairs_mut().append_pair("q", query);
        self.json(Method::GET, url, None).await
    }
}

/// Successful answers must be JSON. A missing header is let through to the
/// decoder.
fn expect_json(content_type: Option<&str>) -> Result<(), ApiError> {
    match content_type {
        Some(ct) if !ct.to_ascii_lowercase().contains("json") => Err(ApiError::NotJson {
            content_type: ct.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Public page for a single game.
pub fn game_page_url(base: &Url, id: GameId) -> Result<Url, ApiError> {
    base.join(&format!("game/{}/", id))
        .map_err(|e| ApiError::InvalidUrl(e.to_string()))
}

/// Parse and normalise a backend base URL so relative paths join under it.
pub fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut base = Url::parse(raw.trim()).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(ApiError::InvalidUrl(format!(
            "{}: scheme must be http or https",
            raw
        )));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let base = parse_base_url("http://localhost:8000/catalog").unwrap();
        assert_eq!(base.as_str(), "http://localhost:8000/catalog/");
        let joined = base.join("api/folders/").unwrap();
        assert_eq!(joined.as_str(), "http://localhost:8000/catalog/api/folders/");
    }

    #[test]
    fn test_base_url_rejects_other_schemes() {
        assert!(matches!(
            parse_base_url("ftp://example.com"),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_surface_paths() {
        assert_eq!(Surface::Public.folder_games_path(3), "api/public/folders/3/games/");
        assert_eq!(Surface::Admin.folder_games_path(3), "api/folders/3/games/");
        assert_eq!(Surface::Public.search_path(), "api/public/search/");
        assert_eq!(Surface::Admin.search_path(), "api/search/");
    }

    #[test]
    fn test_game_page_url() {
        let api = HttpCatalog::new("http://h:1", Surface::Public, Duration::from_secs(1)).unwrap();
        assert_eq!(game_page_url(api.base_url(), 7).unwrap().as_str(), "http://h:1/game/7/");
    }

    #[test]
    fn test_html_answer_reads_as_login_required() {
        let err = expect_json(Some("text/html; charset=utf-8")).unwrap_err();
        assert!(matches!(err, ApiError::NotJson { .. }));
        assert!(!err.is_client_error());
        assert!(err.user_message().starts_with("Login required"));

        let err = expect_json(Some("text/plain")).unwrap_err();
        assert_eq!(err.user_message(), "Unexpected response type: text/plain");
    }

    #[test]
    fn test_json_content_types_pass() {
        assert!(expect_json(Some("application/json")).is_ok());
        assert!(expect_json(Some("Application/JSON; charset=utf-8")).is_ok());
        assert!(expect_json(None).is_ok());
    }

    #[test]
    fn test_api_error_classification() {
        let err = ApiError::Status {
            status: 404,
            message: "Game not found".to_string(),
        };
        assert!(err.is_client_error());
        assert!(err.user_message().contains("Game not found"));

        let err = ApiError::Status {
            status: 502,
            message: "Bad Gateway".to_string(),
        };
        assert!(!err.is_client_error());
    }
}
