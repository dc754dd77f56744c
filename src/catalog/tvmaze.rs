/// TVMaze catalog implementation.
use super::tvmaze_types::TvMazeSearchResult;
use super::{CatalogError, ShowCatalog};
use crate::show::Show;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Public TVMaze API endpoint
pub const TVMAZE_BASE_URL: &str = "https://api.tvmaze.com";

const CLIENT_USER_AGENT: &str = concat!("show-dashboard/", env!("CARGO_PKG_VERSION"));

/// Show catalog backed by the TVMaze REST API.
///
/// This catalog reads from https://api.tvmaze.com unless another base URL is
/// configured. It performs exactly one request per call, without retries or
/// timeouts.
#[derive(Debug, Clone)]
pub struct TvMazeCatalog {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl TvMazeCatalog {
    /// Creates a catalog talking to the public TVMaze API.
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_base_url(TVMAZE_BASE_URL)
    }

    /// Creates a catalog talking to a different TVMaze-compatible endpoint.
    ///
    /// A trailing slash on `base_url` is ignored.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        // The blocking client aborts after 30 seconds unless told otherwise
        let client = reqwest::blocking::Client::builder()
            .timeout(None)
            .user_agent(CLIENT_USER_AGENT)
            .build()
            .map_err(|e| CatalogError::ClientSetup(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// The base URL all endpoint paths are appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs a GET request and decodes the JSON body.
    ///
    /// `failure_message` builds the human readable message for a non-success
    /// status, so each endpoint can word its own failures.
    fn get_json<T, F>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        failure_message: F,
    ) -> Result<T, CatalogError>
    where
        T: DeserializeOwned,
        F: FnOnce(StatusCode) -> String,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, ?query, "requesting catalog");

        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), "catalog request failed");
            return Err(CatalogError::Api {
                status_code: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
                message: failure_message(status),
            });
        }

        let body = response
            .text()
            .map_err(|e| CatalogError::Request(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

impl ShowCatalog for TvMazeCatalog {
    fn fetch_all_shows(&self) -> Result<Vec<Show>, CatalogError> {
        self.get_json("/shows", &[], |_| "Failed to fetch shows".to_string())
    }

    fn fetch_show_by_id(&self, id: u64) -> Result<Show, CatalogError> {
        self.get_json(&format!("/shows/{id}"), &[], |status| {
            if status == StatusCode::NOT_FOUND {
                format!("Show with ID {id} not found")
            } else {
                "Failed to fetch show".to_string()
            }
        })
    }

    fn search_shows(&self, query: &str) -> Result<Vec<Show>, CatalogError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let results: Vec<TvMazeSearchResult> =
            self.get_json("/search/shows", &[("q", query)], |_| {
                "Failed to search shows".to_string()
            })?;

        Ok(results.into_iter().map(|result| result.show).collect())
    }
}
