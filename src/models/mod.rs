use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;

pub mod discover;
pub mod pagination;
pub mod recommendation;

pub use discover::{ContentType, DiscoverFilters, Mood, RuntimeBracket};
pub use pagination::{paginate, PageParams, PageRequest, PaginatedResult, POOL_CAP};
pub use recommendation::{AggregatedRecommendation, Selection};

/// The two media kinds the upstream API keys its endpoints by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }

    /// Parses the exact path/query vocabulary (`movie` or `tv`)
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(MediaKind::Movie),
            "tv" => Some(MediaKind::Tv),
            _ => None,
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a list entry. Movie and TV ids live in separate namespaces upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaKey {
    pub kind: MediaKind,
    pub id: u64,
}

impl Display for MediaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.kind, self.id)
    }
}

/// A list entry as returned by discovery, search and recommendation endpoints
///
/// Only the fields the service reasons about are typed; everything else the
/// upstream sent is kept in `extra` and written back out unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaItem {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Movie-only field; TV entries carry `name` instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MediaItem {
    /// Resolves the media kind, falling back to the movie-only `title` field
    /// when the upstream omitted `media_type`. Returns `None` for non-media
    /// entries such as people in multi-search results.
    pub fn kind(&self) -> Option<MediaKind> {
        match self.media_type.as_deref() {
            Some(media_type) => MediaKind::from_param(media_type),
            None if self.title.is_some() => Some(MediaKind::Movie),
            None => Some(MediaKind::Tv),
        }
    }

    pub fn key(&self) -> Option<MediaKey> {
        self.kind().map(|kind| MediaKey { kind, id: self.id })
    }

    /// Upstream rating; 0 when absent or null
    pub fn vote_average(&self) -> f64 {
        self.number("vote_average")
    }

    pub fn popularity(&self) -> f64 {
        self.number("popularity")
    }

    fn number(&self, field: &str) -> f64 {
        self.extra.get(field).and_then(Value::as_f64).unwrap_or(0.0)
    }
}

// ============================================================================
// Metadata passthrough types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Language {
    pub iso_639_1: String,
    #[serde(default)]
    pub english_name: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Country {
    pub iso_3166_1: String,
    #[serde(default)]
    pub english_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_name: Option<String>,
}

// ============================================================================
// Detail payloads
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrewMember {
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductionCountry {
    pub iso_3166_1: String,
}

/// Raw API response from GET /movie/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub origin_country: Vec<String>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub credits: Option<Credits>,
}

/// Raw API response from GET /tv/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct TvDetails {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub origin_country: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub credits: Option<Credits>,
}

/// Detail record keyed by the kind that was requested, with the untouched
/// upstream payload kept alongside.
#[derive(Debug, Clone)]
pub enum MediaDetails {
    Movie { details: MovieDetails, raw: Value },
    Tv { details: TvDetails, raw: Value },
}

/// Stable detail shape returned to the client for both movies and TV
#[derive(Debug, Clone, Serialize)]
pub struct MediaDetail {
    pub id: u64,
    pub media_type: MediaKind,
    pub title: String,
    pub original_title: Option<String>,
    pub synopsis: Option<String>,
    pub poster_path: Option<String>,
    pub poster_url: Option<String>,
    pub rating: Option<f64>,
    pub vote_count: Option<u64>,
    pub release_date: Option<String>,
    pub genres: Vec<Genre>,
    pub runtime: Option<u32>,
    pub original_language: Option<String>,
    pub origin_country: Vec<String>,
    pub status: Option<String>,
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
    pub raw: Value,
}
