//! Show data model
//!
//! These structures mirror the show payload of the TVMaze API. Deserializing
//! into them is the only structural validation a response body goes through:
//! required fields must be present with the right shape, nullable fields map
//! to `Option`.

use crate::transform::strip_html;
use serde::{Deserialize, Serialize};

/// A single catalog entry.
///
/// Shows are value objects. Once stored they are only ever replaced, never
/// modified in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    /// Catalog identifier, stable across requests
    pub id: u64,
    /// Canonical TVMaze page of the show
    pub url: String,
    /// Display name
    pub name: String,
    /// Show type such as "Scripted" or "Reality"
    #[serde(rename = "type")]
    pub kind: String,
    pub language: Option<String>,
    /// Genre labels in the order the catalog returned them
    pub genres: Vec<String>,
    /// Running state such as "Running" or "Ended"
    pub status: String,
    pub runtime: Option<u32>,
    pub average_runtime: Option<u32>,
    /// Premiere date (ISO 8601)
    pub premiered: Option<String>,
    /// End date (ISO 8601), absent while the show is running
    pub ended: Option<String>,
    pub official_site: Option<String>,
    pub schedule: Schedule,
    pub rating: Rating,
    /// Popularity weight assigned by the catalog
    pub weight: u32,
    pub network: Option<Network>,
    pub web_channel: Option<WebChannel>,
    pub externals: Externals,
    pub image: Option<Image>,
    /// Synopsis in HTML format
    pub summary: Option<String>,
    /// Unix timestamp of the last catalog update
    pub updated: i64,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl Show {
    /// Average rating, with an absent rating counting as zero.
    pub fn rating_value(&self) -> f64 {
        self.rating.average.unwrap_or(0.0)
    }

    /// Year part of the premiere date, if one is known.
    pub fn premiere_year(&self) -> Option<i32> {
        self.premiered
            .as_deref()
            .and_then(|date| date.split('-').next())
            .and_then(|year| year.parse().ok())
    }

    /// Synopsis with all HTML tags removed.
    pub fn plain_summary(&self) -> String {
        strip_html(self.summary.as_deref())
    }

    /// Name of the broadcasting network, or of the web channel for
    /// streaming-only shows.
    pub fn broadcaster(&self) -> Option<&str> {
        self.network
            .as_ref()
            .map(|network| network.name.as_str())
            .or_else(|| self.web_channel.as_ref().map(|channel| channel.name.as_str()))
    }
}

/// Weekly airing schedule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schedule {
    /// Airing time as "HH:MM", empty when unknown
    pub time: String,
    pub days: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Average user rating on a 0-10 scale
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub code: String,
    pub timezone: String,
}

/// A traditional broadcasting network.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub id: u64,
    pub name: String,
    pub country: Country,
    pub official_site: Option<String>,
}

/// A streaming service. Unlike networks these may have no country.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebChannel {
    pub id: u64,
    pub name: String,
    pub country: Option<Country>,
    pub official_site: Option<String>,
}

/// Cross references into other show databases.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Externals {
    pub tvrage: Option<u64>,
    pub thetvdb: Option<u64>,
    pub imdb: Option<String>,
}

/// Poster image in two resolutions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Image {
    pub medium: String,
    pub original: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: Link,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previousepisode: Option<Link>,
}

/// Shows sharing a genre label, best rated first.
///
/// Groups are derived from the current show collection on every read and are
/// never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreGroup {
    pub genre: String,
    pub shows: Vec<Show>,
}
