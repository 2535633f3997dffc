use serde::Serialize;

use super::{MediaItem, MediaKind};

/// Maximum number of titles a caller may seed recommendations with
pub const MAX_SELECTIONS: usize = 5;

/// One title the caller picked as a recommendation seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub id: u64,
    pub kind: MediaKind,
}

/// A recommended title with the number of seeds that recommended it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AggregatedRecommendation {
    #[serde(flatten)]
    pub item: MediaItem,
    pub score: u32,
}
