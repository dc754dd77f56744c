//! show_dashboard - Browse, search and filter TV shows
//!
//! This library provides the data layer of the show dashboard: a client for
//! the TVMaze catalog, a store holding the session state built from it, and
//! the pure transformations used to derive the dashboard's views.

mod catalog;
mod show;
mod store;
mod transform;

pub use catalog::{CatalogError, ShowCatalog, TVMAZE_BASE_URL, TvMazeCatalog};
pub use show::{
    Country, Externals, GenreGroup, Image, Link, Links, Network, Rating, Schedule, Show,
    WebChannel,
};
pub use store::{ErrorDetails, Operation, ShowStore, StoreEvent};
pub use transform::{
    filter_shows_by_genre, group_shows_by_genre, locale_cmp, sort_shows_by_rating, strip_html,
    unique_genres,
};

use thiserror::Error;

/// Top-level error type for dashboard front ends
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The catalog client could not be created
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A store operation ended with an error
    #[error("{0}")]
    Store(#[from] ErrorDetails),

    /// Error while interacting with the terminal
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Opens a dashboard session against the given catalog endpoint
///
/// # Examples
///
/// ```no_run
/// use show_dashboard::{open_session, TVMAZE_BASE_URL};
///
/// let mut store = open_session(TVMAZE_BASE_URL).unwrap();
/// store.load_all_shows();
///
/// for group in store.genre_groups() {
///     println!("{}: {} show(s)", group.genre, group.shows.len());
/// }
/// ```
pub fn open_session(api_url: &str) -> Result<ShowStore<TvMazeCatalog>, DashboardError> {
    Ok(ShowStore::new(TvMazeCatalog::with_base_url(api_url)?))
}

/// Returns the store's pending error, if any, as a [`DashboardError`]
///
/// Store operations never fail directly; front ends call this after an
/// operation to turn the error field into a `Result`.
pub fn check_store<C>(store: &ShowStore<C>) -> Result<(), DashboardError>
where
    C: ShowCatalog,
{
    match store.error() {
        Some(error) => Err(DashboardError::Store(error.clone())),
        None => Ok(()),
    }
}
