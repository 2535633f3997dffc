use crate::{
    error::{AppError, AppResult},
    models::{MediaItem, PaginatedResult},
    services::providers::MetadataProvider,
};

/// Multi-type search restricted to movies and TV shows.
///
/// The upstream page envelope is passed through; only `results` is filtered,
/// so `total_results` still reflects the unfiltered upstream count.
pub async fn search_media(
    provider: &dyn MetadataProvider,
    query: Option<&str>,
    page: u32,
) -> AppResult<PaginatedResult<MediaItem>> {
    let query = query.map(str::trim).filter(|q| !q.is_empty()).ok_or_else(|| {
        AppError::InvalidInput("Query parameter 'query' is required.".to_string())
    })?;

    let mut result = provider
        .search_multi(query, page)
        .await
        .map_err(AppError::upstream("Failed to perform search"))?;

    result.results.retain(|item| item.kind().is_some());

    Ok(result)
}
