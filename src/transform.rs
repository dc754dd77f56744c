//! Pure transformations over show collections
//!
//! Nothing in here owns state or mutates its input. The store applies these
//! to derive read-only views (genre rows, sorted search results, genre lists).

use crate::show::{GenreGroup, Show};
use deunicode::deunicode;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

/// Matches a single HTML tag, from `<` up to the next `>`
static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("HTML tag pattern is valid"));

/// Groups shows by genre
///
/// A show with several genres is placed into every one of its genre groups;
/// shows without any genre do not appear at all. Within a group the shows are
/// ordered by [`sort_shows_by_rating`], and the groups themselves are ordered
/// by genre label using [`locale_cmp`].
pub fn group_shows_by_genre(shows: &[Show]) -> Vec<GenreGroup> {
    let mut genre_map: HashMap<&str, Vec<Show>> = HashMap::new();

    for show in shows {
        for genre in &show.genres {
            genre_map
                .entry(genre.as_str())
                .or_insert_with(Vec::new)
                .push(show.clone());
        }
    }

    let mut groups: Vec<GenreGroup> = genre_map
        .into_iter()
        .map(|(genre, shows)| GenreGroup {
            genre: genre.to_string(),
            shows: sort_shows_by_rating(&shows),
        })
        .collect();

    groups.sort_by(|a, b| locale_cmp(&a.genre, &b.genre));

    groups
}

/// Returns a copy of the shows ordered by rating, best first
///
/// An absent rating counts as zero. The sort is stable, so shows with equal
/// ratings keep their relative input order.
pub fn sort_shows_by_rating(shows: &[Show]) -> Vec<Show> {
    let mut sorted = shows.to_vec();
    sorted.sort_by(|a, b| b.rating_value().total_cmp(&a.rating_value()));
    sorted
}

/// Returns the shows tagged with exactly `genre` (case-sensitive)
pub fn filter_shows_by_genre(shows: &[Show], genre: &str) -> Vec<Show> {
    shows
        .iter()
        .filter(|show| show.genres.iter().any(|g| g == genre))
        .cloned()
        .collect()
}

/// Collects every distinct genre label, in plain string order
pub fn unique_genres(shows: &[Show]) -> Vec<String> {
    shows
        .iter()
        .flat_map(|show| show.genres.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Removes all HTML tags from a synopsis
///
/// Entities such as `&amp;` are left untouched. An absent input yields an
/// empty string.
pub fn strip_html(html: Option<&str>) -> String {
    match html {
        Some(html) if !html.is_empty() => HTML_TAG.replace_all(html, "").into_owned(),
        _ => String::new(),
    }
}

/// Compares two labels the way a human-facing list would order them
///
/// Labels are first compared with accents folded to their base letters and
/// letter case ignored, so "Émission" sorts among the "E"s. Remaining ties
/// are broken by accents (unaccented first) and then by case (lowercase
/// first), matching the root collation of ICU.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

fn collation_key(label: &str) -> String {
    deunicode(label).to_lowercase()
}
