//! Catalog records as they arrive from the streaming service.
//!
//! Every field is optional: the catalog omits keys freely, and whether a
//! missing key is acceptable is decided when the tag set is resolved.
use serde::{Deserialize, Serialize};

/// Anything the catalog nests as `{ "name": ... }` (artists, genres, performers).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Named {
    #[serde(default)]
    pub name: Option<String>,
}

impl Named {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub artist: Option<Named>,
    #[serde(default)]
    pub genre: Option<Named>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub release_date_original: Option<String>,
    #[serde(default)]
    pub tracks_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    ///prefix used by classical releases, e.g. the opus a movement belongs to
    #[serde(default)]
    pub work: Option<String>,
    #[serde(default)]
    pub track_number: Option<u32>,
    ///disc index within the release
    #[serde(default)]
    pub media_number: Option<u32>,
    #[serde(default)]
    pub performer: Option<Named>,
    ///present when the track was fetched on its own rather than with its album
    #[serde(default)]
    pub album: Option<Album>,
}

/// Which record the album-level fields come from.
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::Display)]
pub enum Context {
    ///a standalone track; album fields come from `track.album`
    #[default]
    #[display(fmt = "track")]
    Track,
    ///a track tagged as part of an album; album fields come from the album record
    #[display(fmt = "album")]
    Album,
}
