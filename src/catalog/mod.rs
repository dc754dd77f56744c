/// Remote show catalog access.
///
/// This module defines the read-only operations the store needs from a show
/// catalog, the error type those operations fail with, and the TVMaze
/// implementation used at runtime.
mod tvmaze;
mod tvmaze_types;

pub use tvmaze::{TVMAZE_BASE_URL, TvMazeCatalog};

use crate::show::Show;
use thiserror::Error;

/// Errors that can occur while talking to the show catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog answered with a non-success status
    #[error("{message} (HTTP {status_code} {status_text})")]
    Api {
        status_code: u16,
        status_text: String,
        message: String,
    },

    /// Failed to decode the catalog's JSON response into the expected shape
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// The request could not be completed (DNS, connection, TLS, ...)
    #[error("Request failed: {0}")]
    Request(String),

    /// The HTTP client could not be set up
    #[error("Failed to initialize HTTP client: {0}")]
    ClientSetup(String),
}

impl CatalogError {
    /// Returns true if the catalog reported the requested entity as missing.
    pub(crate) fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::Api { status_code: 404, .. })
    }
}

/// Read-only operations offered by a show catalog.
///
/// Every call is a single attempt: implementors must not retry, and a failed
/// call has no side effects.
pub trait ShowCatalog {
    /// Fetches the complete catalog, in the order the source returns it.
    fn fetch_all_shows(&self) -> Result<Vec<Show>, CatalogError>;

    /// Fetches a single show by its catalog identifier.
    ///
    /// A missing show is reported as [`CatalogError::Api`] with status 404
    /// and a message naming the identifier.
    fn fetch_show_by_id(&self, id: u64) -> Result<Show, CatalogError>;

    /// Searches the catalog by free text.
    ///
    /// A blank query yields an empty result without contacting the catalog.
    /// Results keep the catalog's relevance order; the relevance scores
    /// themselves are dropped.
    fn search_shows(&self, query: &str) -> Result<Vec<Show>, CatalogError>;
}

impl<C> ShowCatalog for &C
where
    C: ShowCatalog + ?Sized,
{
    fn fetch_all_shows(&self) -> Result<Vec<Show>, CatalogError> {
        (**self).fetch_all_shows()
    }

    fn fetch_show_by_id(&self, id: u64) -> Result<Show, CatalogError> {
        (**self).fetch_show_by_id(id)
    }

    fn search_shows(&self, query: &str) -> Result<Vec<Show>, CatalogError> {
        (**self).search_shows(query)
    }
}
