//! Show store
//!
//! The store is the single owner of the dashboard's session state: the loaded
//! catalog, the show currently viewed in detail, the last search and the
//! shared loading/error indicators. Front ends construct one store per
//! session, drive it through its operations and re-read its state afterwards.

use crate::catalog::{CatalogError, ShowCatalog};
use crate::show::{GenreGroup, Show};
use crate::transform::{
    filter_shows_by_genre, group_shows_by_genre, sort_shows_by_rating, unique_genres,
};
use std::fmt;
use thiserror::Error;

/// A failure as presented to the user
///
/// Transport failures keep the HTTP status code and text for diagnostics;
/// every other failure carries only a message.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ErrorDetails {
    pub message: String,
    pub status_code: Option<u16>,
    pub status_text: Option<String>,
}

impl ErrorDetails {
    /// Creates error details without any transport information
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
            status_text: None,
        }
    }

    /// Returns true if the catalog reported the requested show as missing
    pub fn is_not_found(&self) -> bool {
        self.status_code == Some(404)
    }
}

impl From<CatalogError> for ErrorDetails {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::Api {
                status_code,
                status_text,
                message,
            } => Self {
                message,
                status_code: Some(status_code),
                status_text: Some(status_text),
            },
            other => Self::new(other.to_string()),
        }
    }
}

/// Store operations that engage the loading indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadAllShows,
    LoadShowById(u64),
    Search,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::LoadAllShows => write!(f, "load all shows"),
            Operation::LoadShowById(id) => write!(f, "load show {id}"),
            Operation::Search => write!(f, "search"),
        }
    }
}

/// State change notification emitted by the store
///
/// These events allow front ends to react to progress (for example to show a
/// spinner) without polling the store.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The loading indicator was switched on
    LoadingStarted(Operation),

    /// The request was answered from already loaded data
    CacheHit(Operation),

    /// The operation failed and the error field was populated
    Failed(Operation, ErrorDetails),

    /// The loading indicator was switched off
    LoadingFinished(Operation),
}

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Session state of the dashboard
///
/// All fields are private; they change only through the operations below,
/// and every derived view is recomputed from them when asked for.
pub struct ShowStore<C> {
    catalog: C,
    shows: Vec<Show>,
    selected_show: Option<Show>,
    search_results: Vec<Show>,
    search_query: String,
    loading: bool,
    error: Option<ErrorDetails>,
    listener: Option<Listener>,
}

impl<C> ShowStore<C>
where
    C: ShowCatalog,
{
    /// Creates an empty store reading from the given catalog
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            shows: Vec::new(),
            selected_show: None,
            search_results: Vec::new(),
            search_query: String::new(),
            loading: false,
            error: None,
            listener: None,
        }
    }

    /// Creates an empty store that reports its state changes to `listener`
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use show_dashboard::{ShowStore, StoreEvent, TvMazeCatalog};
    ///
    /// let mut store = ShowStore::with_listener(TvMazeCatalog::new().unwrap(), |event| {
    ///     if let StoreEvent::LoadingStarted(operation) = event {
    ///         println!("Working on: {operation}");
    ///     }
    /// });
    /// store.load_all_shows();
    /// ```
    pub fn with_listener<F>(catalog: C, listener: F) -> Self
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        let mut store = Self::new(catalog);
        store.listener = Some(Box::new(listener));
        store
    }

    /// Loads the complete catalog, once per session
    ///
    /// If shows are already loaded this returns immediately without touching
    /// the catalog or any state. There is no forced refresh.
    pub fn load_all_shows(&mut self) {
        if self.has_shows() {
            tracing::debug!(count = self.shows.len(), "catalog already loaded");
            return;
        }

        let operation = Operation::LoadAllShows;
        self.begin(operation);

        match self.catalog.fetch_all_shows() {
            Ok(shows) => {
                tracing::info!(count = shows.len(), "catalog loaded");
                self.shows = shows;
            }
            Err(e) => self.fail(operation, e),
        }

        self.finish(operation);
    }

    /// Selects a show for the detail view
    ///
    /// A show that is already part of the loaded catalog is selected directly;
    /// only unknown identifiers are fetched from the catalog.
    pub fn load_show_by_id(&mut self, id: u64) {
        let operation = Operation::LoadShowById(id);
        self.selected_show = None;
        self.begin(operation);

        let cached = self.shows.iter().find(|show| show.id == id).cloned();
        match cached {
            Some(show) => {
                self.emit(StoreEvent::CacheHit(operation));
                self.selected_show = Some(show);
            }
            None => match self.catalog.fetch_show_by_id(id) {
                Ok(show) => self.selected_show = Some(show),
                Err(e) => self.fail(operation, e),
            },
        }

        self.finish(operation);
    }

    /// Searches the catalog and stores the results, best rated first
    ///
    /// The query is always recorded. A blank query only resets the results:
    /// it neither engages the loading indicator nor clears a pending error.
    /// A failed search leaves the previous results in place.
    pub fn search(&mut self, query: &str) {
        self.search_query = query.to_string();

        if query.trim().is_empty() {
            self.search_results.clear();
            return;
        }

        let operation = Operation::Search;
        self.begin(operation);

        match self.catalog.search_shows(query) {
            Ok(results) => {
                tracing::debug!(query, count = results.len(), "search finished");
                self.search_results = sort_shows_by_rating(&results);
            }
            Err(e) => self.fail(operation, e),
        }

        self.finish(operation);
    }

    /// Leaves search mode
    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.search_results.clear();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn clear_selected_show(&mut self) {
        self.selected_show = None;
    }

    /// The loaded catalog, in source order
    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    pub fn selected_show(&self) -> Option<&Show> {
        self.selected_show.as_ref()
    }

    /// Results of the most recent search, best rated first
    pub fn search_results(&self) -> &[Show] {
        &self.search_results
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// True while an operation is waiting on the catalog
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&ErrorDetails> {
        self.error.as_ref()
    }

    /// The loaded catalog grouped by genre
    pub fn genre_groups(&self) -> Vec<GenreGroup> {
        if self.shows.is_empty() {
            return Vec::new();
        }
        group_shows_by_genre(&self.shows)
    }

    pub fn has_shows(&self) -> bool {
        !self.shows.is_empty()
    }

    pub fn has_search_results(&self) -> bool {
        !self.search_results.is_empty()
    }

    pub fn is_searching(&self) -> bool {
        !self.search_query.is_empty()
    }

    /// Every genre present in the loaded catalog
    pub fn unique_genres(&self) -> Vec<String> {
        unique_genres(&self.shows)
    }

    /// Loaded shows tagged with `genre`, best rated first
    pub fn shows_in_genre(&self, genre: &str) -> Vec<Show> {
        sort_shows_by_rating(&filter_shows_by_genre(&self.shows, genre))
    }

    fn begin(&mut self, operation: Operation) {
        self.error = None;
        self.loading = true;
        self.emit(StoreEvent::LoadingStarted(operation));
    }

    fn fail(&mut self, operation: Operation, error: CatalogError) {
        if error.is_not_found() {
            tracing::warn!(%operation, %error, "not found in catalog");
        } else {
            tracing::error!(%operation, %error, "catalog operation failed");
        }
        let details = ErrorDetails::from(error);
        self.error = Some(details.clone());
        self.emit(StoreEvent::Failed(operation, details));
    }

    fn finish(&mut self, operation: Operation) {
        self.loading = false;
        self.emit(StoreEvent::LoadingFinished(operation));
    }

    fn emit(&mut self, event: StoreEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::show::Rating;
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// In-memory catalog counting every call it receives
    #[derive(Default)]
    struct FakeCatalog {
        shows: Vec<Show>,
        fail_status: Cell<Option<u16>>,
        fail_parse: bool,
        calls: Cell<usize>,
    }

    impl FakeCatalog {
        fn with_shows(shows: Vec<Show>) -> Self {
            Self {
                shows,
                ..Default::default()
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                fail_status: Cell::new(Some(status)),
                ..Default::default()
            }
        }

        fn check_failure(&self, message: &str) -> Result<(), CatalogError> {
            self.calls.set(self.calls.get() + 1);
            if let Some(status_code) = self.fail_status.get() {
                return Err(CatalogError::Api {
                    status_code,
                    status_text: "Service Unavailable".to_string(),
                    message: message.to_string(),
                });
            }
            if self.fail_parse {
                return Err(CatalogError::Parse("missing field `genres`".to_string()));
            }
            Ok(())
        }
    }

    impl ShowCatalog for FakeCatalog {
        fn fetch_all_shows(&self) -> Result<Vec<Show>, CatalogError> {
            self.check_failure("Failed to fetch shows")?;
            Ok(self.shows.clone())
        }

        fn fetch_show_by_id(&self, id: u64) -> Result<Show, CatalogError> {
            self.check_failure("Failed to fetch show")?;
            self.shows
                .iter()
                .find(|show| show.id == id)
                .cloned()
                .ok_or_else(|| CatalogError::Api {
                    status_code: 404,
                    status_text: "Not Found".to_string(),
                    message: format!("Show with ID {id} not found"),
                })
        }

        fn search_shows(&self, query: &str) -> Result<Vec<Show>, CatalogError> {
            self.check_failure("Failed to search shows")?;
            let query = query.to_lowercase();
            Ok(self
                .shows
                .iter()
                .filter(|show| show.name.to_lowercase().contains(&query))
                .cloned()
                .collect())
        }
    }

    fn show(id: u64, name: &str, genres: &[&str], rating: Option<f64>) -> Show {
        Show {
            id,
            name: name.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
            rating: Rating { average: rating },
            ..Default::default()
        }
    }

    fn catalog() -> Vec<Show> {
        vec![
            show(1, "Breaking Bad", &["Drama", "Crime"], Some(9.5)),
            show(2, "The Office", &["Comedy"], None),
            show(3, "Better Call Saul", &["Drama", "Crime"], Some(8.6)),
            show(42, "Lost", &["Drama", "Adventure"], Some(7.9)),
        ]
    }

    fn recording_store(
        catalog: &FakeCatalog,
    ) -> (ShowStore<&FakeCatalog>, Rc<RefCell<Vec<StoreEvent>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let store = ShowStore::with_listener(catalog, move |event: &StoreEvent| {
            sink.borrow_mut().push(event.clone())
        });
        (store, events)
    }

    #[test]
    fn test_new_store_is_empty() {
        let fake = FakeCatalog::default();
        let store = ShowStore::new(&fake);

        assert!(!store.has_shows());
        assert!(!store.has_search_results());
        assert!(!store.is_searching());
        assert!(!store.is_loading());
        assert!(store.error().is_none());
        assert!(store.selected_show().is_none());
        assert!(store.genre_groups().is_empty());
    }

    #[test]
    fn test_load_all_shows() {
        let fake = FakeCatalog::with_shows(catalog());
        let (mut store, events) = recording_store(&fake);

        store.load_all_shows();

        assert_eq!(store.shows(), catalog().as_slice());
        assert!(store.has_shows());
        assert!(!store.is_loading());
        assert!(store.error().is_none());
        assert_eq!(
            *events.borrow(),
            vec![
                StoreEvent::LoadingStarted(Operation::LoadAllShows),
                StoreEvent::LoadingFinished(Operation::LoadAllShows),
            ]
        );
    }

    #[test]
    fn test_load_all_shows_only_fetches_once() {
        let fake = FakeCatalog::with_shows(catalog());
        let (mut store, events) = recording_store(&fake);

        store.load_all_shows();
        let events_after_first = events.borrow().len();

        store.load_all_shows();

        assert_eq!(fake.calls.get(), 1);
        assert_eq!(store.shows().len(), 4);
        assert_eq!(events.borrow().len(), events_after_first);
    }

    #[test]
    fn test_load_all_shows_failure_keeps_status() {
        let fake = FakeCatalog::failing(503);
        let (mut store, events) = recording_store(&fake);

        store.load_all_shows();

        let expected = ErrorDetails {
            message: "Failed to fetch shows".to_string(),
            status_code: Some(503),
            status_text: Some("Service Unavailable".to_string()),
        };
        assert_eq!(store.error(), Some(&expected));
        assert!(!store.is_loading());
        assert!(!store.has_shows());
        assert_eq!(
            *events.borrow(),
            vec![
                StoreEvent::LoadingStarted(Operation::LoadAllShows),
                StoreEvent::Failed(Operation::LoadAllShows, expected),
                StoreEvent::LoadingFinished(Operation::LoadAllShows),
            ]
        );
    }

    #[test]
    fn test_parse_failure_has_message_only() {
        let fake = FakeCatalog {
            fail_parse: true,
            ..Default::default()
        };
        let mut store = ShowStore::new(&fake);

        store.load_all_shows();

        let error = store.error().unwrap();
        assert_eq!(
            error.message,
            "Failed to parse API response: missing field `genres`"
        );
        assert_eq!(error.status_code, None);
        assert_eq!(error.status_text, None);
        assert!(!store.is_loading());
    }

    #[test]
    fn test_load_all_shows_retries_after_failure() {
        let fake = FakeCatalog::with_shows(catalog());
        fake.fail_status.set(Some(500));
        let mut store = ShowStore::new(&fake);
        store.load_all_shows();
        assert!(store.error().is_some());
        assert!(!store.has_shows());

        fake.fail_status.set(None);
        store.load_all_shows();

        assert_eq!(fake.calls.get(), 2);
        assert!(store.error().is_none());
        assert!(store.has_shows());
    }

    #[test]
    fn test_load_show_by_id_uses_loaded_catalog() {
        let fake = FakeCatalog::with_shows(catalog());
        let (mut store, events) = recording_store(&fake);
        store.load_all_shows();
        events.borrow_mut().clear();
        let calls_before = fake.calls.get();

        store.load_show_by_id(42);

        assert_eq!(fake.calls.get(), calls_before);
        assert_eq!(store.selected_show().map(|s| s.name.as_str()), Some("Lost"));
        assert!(!store.is_loading());
        assert_eq!(
            *events.borrow(),
            vec![
                StoreEvent::LoadingStarted(Operation::LoadShowById(42)),
                StoreEvent::CacheHit(Operation::LoadShowById(42)),
                StoreEvent::LoadingFinished(Operation::LoadShowById(42)),
            ]
        );
    }

    #[test]
    fn test_load_show_by_id_fetches_unknown_show() {
        let fake = FakeCatalog::with_shows(catalog());
        let mut store = ShowStore::new(&fake);

        store.load_show_by_id(3);

        assert_eq!(fake.calls.get(), 1);
        assert_eq!(store.selected_show().map(|s| s.id), Some(3));
        assert!(!store.has_shows());
        assert!(!store.is_loading());
    }

    #[test]
    fn test_load_show_by_id_not_found_clears_previous_selection() {
        let fake = FakeCatalog::with_shows(catalog());
        let mut store = ShowStore::new(&fake);
        store.load_show_by_id(1);
        assert!(store.selected_show().is_some());

        store.load_show_by_id(999);

        assert!(store.selected_show().is_none());
        let error = store.error().unwrap();
        assert_eq!(error.message, "Show with ID 999 not found");
        assert_eq!(error.status_code, Some(404));
        assert_eq!(error.status_text.as_deref(), Some("Not Found"));
        assert!(error.is_not_found());
        assert!(!store.is_loading());
    }

    #[test]
    fn test_new_operation_clears_previous_error() {
        let fake = FakeCatalog::with_shows(catalog());
        let mut store = ShowStore::new(&fake);
        store.load_show_by_id(999);
        assert!(store.error().is_some());

        store.load_show_by_id(1);

        assert!(store.error().is_none());
    }

    #[test]
    fn test_search_sorts_by_rating() {
        let fake = FakeCatalog::with_shows(vec![
            show(2, "The Office", &["Comedy"], None),
            show(7, "The Office (UK)", &["Comedy"], Some(8.1)),
            show(1, "Breaking Bad", &["Drama"], Some(9.5)),
        ]);
        let mut store = ShowStore::new(&fake);

        store.search("office");

        let names: Vec<&str> = store
            .search_results()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["The Office (UK)", "The Office"]);
        assert_eq!(store.search_query(), "office");
        assert!(store.is_searching());
        assert!(store.has_search_results());
        assert!(!store.is_loading());
    }

    #[test]
    fn test_blank_search_makes_no_request() {
        let fake = FakeCatalog::with_shows(catalog());
        let (mut store, events) = recording_store(&fake);
        store.search("breaking");
        assert!(store.has_search_results());
        events.borrow_mut().clear();

        store.search("");

        assert_eq!(fake.calls.get(), 1);
        assert!(store.search_results().is_empty());
        assert!(!store.is_searching());
        assert!(!store.is_loading());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_whitespace_search_is_recorded_but_not_sent() {
        let fake = FakeCatalog::failing(500);
        let mut store = ShowStore::new(&fake);
        store.load_all_shows();
        assert!(store.error().is_some());

        store.search("   ");

        assert_eq!(fake.calls.get(), 1);
        assert_eq!(store.search_query(), "   ");
        assert!(store.is_searching());
        assert!(!store.has_search_results());
        // A blank search does not clear a pending error
        assert!(store.error().is_some());
    }

    #[test]
    fn test_search_failure_keeps_previous_results() {
        let fake = FakeCatalog::with_shows(catalog());
        let mut store = ShowStore::new(&fake);
        store.search("bad");
        assert_eq!(store.search_results().len(), 1);

        fake.fail_status.set(Some(502));
        store.search("saul");

        assert_eq!(store.search_query(), "saul");
        assert_eq!(store.search_results()[0].name, "Breaking Bad");
        assert_eq!(store.error().and_then(|e| e.status_code), Some(502));
        assert_eq!(
            store.error().map(|e| e.message.as_str()),
            Some("Failed to search shows")
        );
        assert!(!store.is_loading());
    }

    #[test]
    fn test_clear_search() {
        let fake = FakeCatalog::with_shows(catalog());
        let mut store = ShowStore::new(&fake);
        store.search("lost");
        assert!(store.has_search_results());

        store.clear_search();

        assert_eq!(store.search_query(), "");
        assert!(!store.is_searching());
        assert!(!store.has_search_results());
    }

    #[test]
    fn test_clear_error_and_selection() {
        let fake = FakeCatalog::with_shows(catalog());
        let mut store = ShowStore::new(&fake);
        store.load_show_by_id(1);
        store.clear_selected_show();
        assert!(store.selected_show().is_none());

        store.load_show_by_id(999);
        store.clear_error();
        assert!(store.error().is_none());
    }

    #[test]
    fn test_genre_views_follow_loaded_catalog() {
        let fake = FakeCatalog::with_shows(catalog());
        let mut store = ShowStore::new(&fake);
        assert!(store.genre_groups().is_empty());

        store.load_all_shows();

        let genres: Vec<String> = store.genre_groups().into_iter().map(|g| g.genre).collect();
        assert_eq!(genres, vec!["Adventure", "Comedy", "Crime", "Drama"]);
        assert_eq!(
            store.unique_genres(),
            vec!["Adventure", "Comedy", "Crime", "Drama"]
        );

        let drama: Vec<u64> = store.shows_in_genre("Drama").iter().map(|s| s.id).collect();
        assert_eq!(drama, vec![1, 3, 42]);
        assert!(store.shows_in_genre("drama").is_empty());
    }

    #[test]
    fn test_error_details_from_catalog_error() {
        let details = ErrorDetails::from(CatalogError::Request("connection refused".to_string()));
        assert_eq!(details, ErrorDetails::new("Request failed: connection refused"));
        assert_eq!(details.to_string(), "Request failed: connection refused");
        assert!(!details.is_not_found());
    }
}
