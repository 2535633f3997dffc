use futures::future::join_all;
use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::{
        discover::non_empty, paginate, ContentType, DiscoverFilters, MediaItem, MediaKind, Mood,
        PageRequest, PaginatedResult, RuntimeBracket, POOL_CAP,
    },
    services::providers::{MetadataProvider, ProviderError},
};

/// Upstream pages requested in parallel to fill the candidate pool.
/// At ~20 results per page this comfortably covers `POOL_CAP`.
pub const DISCOVER_PAGE_FANOUT: u32 = 3;

pub const DEFAULT_SORT: &str = "vote_average.desc";

/// Minimum vote count applied whenever results are ranked by rating
pub const MIN_VOTE_COUNT: u32 = 50;

const FETCH_FAILED: &str = "Failed to fetch suggestions from TMDB";

/// Upstream endpoint and query parameters resolved from the caller's filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverPlan {
    pub content_type: ContentType,
    pub endpoint: MediaKind,
    pub params: Vec<(String, String)>,
}

impl DiscoverPlan {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Translates the user-facing filter vocabulary into discovery parameters.
///
/// Fails only on an unknown content type; unknown moods and durations are
/// ignored.
pub fn build_plan(filters: &DiscoverFilters) -> AppResult<DiscoverPlan> {
    let requested = non_empty(&filters.content_type).unwrap_or("movie");
    let content_type = ContentType::from_param(requested).ok_or_else(|| {
        AppError::InvalidInput(
            "Invalid 'type' parameter. Must be one of: movie, tv, anime, documentary.".to_string(),
        )
    })?;

    let mut params: Vec<(String, String)> = Vec::new();
    let mut push = |key: &str, value: String| params.push((key.to_string(), value));

    let sort_by = non_empty(&filters.sort_by).unwrap_or(DEFAULT_SORT);
    push("sort_by", sort_by.to_string());
    if sort_by.starts_with("vote_average") {
        push("vote_count.gte", MIN_VOTE_COUNT.to_string());
    }

    let genres = merge_genres(
        non_empty(&filters.genre),
        non_empty(&filters.mood).and_then(Mood::from_param),
        content_type.forced_genre(),
    );
    if !genres.is_empty() {
        push("with_genres", genres);
    }

    if let Some(rating) = non_empty(&filters.rating) {
        push("vote_average.gte", rating.to_string());
    }

    if let Some(bracket) = non_empty(&filters.duration).and_then(RuntimeBracket::from_param) {
        let (min, max) = bracket.bounds();
        if let Some(min) = min {
            push("with_runtime.gte", min.to_string());
        }
        if let Some(max) = max {
            push("with_runtime.lte", max.to_string());
        }
    }

    if let Some(country) = non_empty(&filters.country) {
        push("with_origin_country", country.to_string());
    }

    let language = non_empty(&filters.language).or(content_type.default_language());
    if let Some(language) = language {
        push("with_original_language", language.to_string());
    }

    Ok(DiscoverPlan {
        content_type,
        endpoint: content_type.endpoint(),
        params,
    })
}

/// Comma-joins explicit, mood and type-forced genre ids, first occurrence wins
fn merge_genres(explicit: Option<&str>, mood: Option<Mood>, forced: Option<u32>) -> String {
    let explicit = explicit
        .into_iter()
        .flat_map(|list| list.split(','))
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);
    let from_mood = mood
        .into_iter()
        .flat_map(|mood| mood.genres().iter())
        .map(u32::to_string);
    let forced = forced.into_iter().map(|id| id.to_string());

    let mut seen = HashSet::new();
    explicit
        .chain(from_mood)
        .chain(forced)
        .filter(|id| seen.insert(id.clone()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Runs a filtered discovery and returns one page of the capped candidate pool.
///
/// Pages 1..=`DISCOVER_PAGE_FANOUT` are fetched in parallel. A failed page
/// contributes nothing; only when every page fails is the request failed.
pub async fn discover(
    provider: &dyn MetadataProvider,
    filters: &DiscoverFilters,
) -> AppResult<PaginatedResult<MediaItem>> {
    let plan = build_plan(filters)?;
    let window = PageRequest::from_params(filters.page.as_deref(), filters.limit.as_deref());

    tracing::info!(
        content_type = ?plan.content_type,
        endpoint = %plan.endpoint,
        params = ?plan.params,
        "Starting discovery"
    );

    let fetches = (1..=DISCOVER_PAGE_FANOUT)
        .map(|page| provider.discover(plan.endpoint, &plan.params, page));
    let pages = join_all(fetches).await;

    let mut candidates = Vec::new();
    let mut last_error: Option<ProviderError> = None;
    let mut failed = 0;

    for (index, page) in pages.into_iter().enumerate() {
        match page {
            Ok(page) => candidates.extend(page.results),
            Err(e) => {
                tracing::warn!(page = index + 1, error = %e, "Discovery page fetch failed");
                failed += 1;
                last_error = Some(e);
            }
        }
    }

    if failed == DISCOVER_PAGE_FANOUT {
        if let Some(e) = last_error {
            return Err(AppError::upstream(FETCH_FAILED)(e));
        }
    }

    let pool = build_pool(candidates);

    tracing::info!(
        pool = pool.len(),
        failed_pages = failed,
        "Discovery pool built"
    );

    Ok(paginate(pool, window))
}

/// Dedups by id (first occurrence kept), ranks by rating then popularity and
/// applies the pool cap
pub fn build_pool(candidates: Vec<MediaItem>) -> Vec<MediaItem> {
    let mut seen = HashSet::new();
    let mut pool: Vec<MediaItem> = candidates
        .into_iter()
        .filter(|item| seen.insert(item.id))
        .collect();

    pool.sort_by(|a, b| {
        b.vote_average()
            .total_cmp(&a.vote_average())
            .then_with(|| b.popularity().total_cmp(&a.popularity()))
    });
    pool.truncate(POOL_CAP);
    pool
}
