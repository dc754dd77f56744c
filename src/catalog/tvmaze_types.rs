/// TVMaze API response types for deserialization.
///
/// Only wrappers live here; the show payload itself is [`crate::show::Show`].
use crate::show::Show;
use serde::Deserialize;

/// A single hit from the TVMaze `/search/shows` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeSearchResult {
    /// Relevance of the hit, unused by the dashboard
    #[allow(dead_code)]
    pub score: f64,
    /// The matching show
    pub show: Show,
}
