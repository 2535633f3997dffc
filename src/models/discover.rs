use serde::Deserialize;

use super::MediaKind;

/// Upstream genre ids referenced by the filter vocabulary
pub mod genre_ids {
    pub const ACTION: u32 = 28;
    pub const ADVENTURE: u32 = 12;
    pub const ANIMATION: u32 = 16;
    pub const COMEDY: u32 = 35;
    pub const CRIME: u32 = 80;
    pub const DOCUMENTARY: u32 = 99;
    pub const DRAMA: u32 = 18;
    pub const FAMILY: u32 = 10751;
    pub const HISTORY: u32 = 36;
    pub const HORROR: u32 = 27;
    pub const ROMANCE: u32 = 10749;
    pub const THRILLER: u32 = 53;
}

/// Content type accepted by the suggestions endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Movie,
    Tv,
    Anime,
    Documentary,
}

impl ContentType {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(ContentType::Movie),
            "tv" => Some(ContentType::Tv),
            "anime" => Some(ContentType::Anime),
            "documentary" => Some(ContentType::Documentary),
            _ => None,
        }
    }

    /// Which discovery endpoint serves this content type
    pub fn endpoint(&self) -> MediaKind {
        match self {
            ContentType::Movie | ContentType::Documentary => MediaKind::Movie,
            ContentType::Tv | ContentType::Anime => MediaKind::Tv,
        }
    }

    /// Genre the content type implies regardless of other filters
    pub fn forced_genre(&self) -> Option<u32> {
        match self {
            ContentType::Anime => Some(genre_ids::ANIMATION),
            ContentType::Documentary => Some(genre_ids::DOCUMENTARY),
            ContentType::Movie | ContentType::Tv => None,
        }
    }

    /// Original language applied when the caller did not choose one
    pub fn default_language(&self) -> Option<&'static str> {
        match self {
            ContentType::Anime => Some("ja"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Happy,
    Dark,
    Relaxing,
    Exciting,
    Thoughtful,
}

impl Mood {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "happy" => Some(Mood::Happy),
            "dark" => Some(Mood::Dark),
            "relaxing" => Some(Mood::Relaxing),
            "exciting" => Some(Mood::Exciting),
            "thoughtful" => Some(Mood::Thoughtful),
            _ => None,
        }
    }

    pub fn genres(&self) -> &'static [u32] {
        use genre_ids::*;
        match self {
            Mood::Happy => &[COMEDY, FAMILY],
            Mood::Dark => &[THRILLER, HORROR, CRIME],
            Mood::Relaxing => &[ROMANCE],
            Mood::Exciting => &[ACTION, ADVENTURE],
            Mood::Thoughtful => &[DRAMA, HISTORY],
        }
    }
}

/// Runtime filter in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeBracket {
    Short,
    Medium,
    Long,
}

impl RuntimeBracket {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "short" => Some(RuntimeBracket::Short),
            "medium" => Some(RuntimeBracket::Medium),
            "long" => Some(RuntimeBracket::Long),
            _ => None,
        }
    }

    /// Inclusive `(min, max)` runtime bounds; `None` means unbounded
    pub fn bounds(&self) -> (Option<u32>, Option<u32>) {
        match self {
            RuntimeBracket::Short => (None, Some(90)),
            RuntimeBracket::Medium => (Some(90), Some(120)),
            RuntimeBracket::Long => (Some(120), None),
        }
    }
}

/// Query string of `GET /api/suggestions`. Every field is optional and kept
/// raw; interpretation happens when the discovery plan is built.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoverFilters {
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<String>,
    pub mood: Option<String>,
    pub duration: Option<String>,
    pub country: Option<String>,
    pub language: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Treats `?genre=` the same as an absent parameter
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
