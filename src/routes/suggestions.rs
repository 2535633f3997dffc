use axum::{
    extract::{Query, State},
    Extension,
};

use crate::{
    api::{ApiResponse, AppState},
    error::AppResult,
    middleware::RequestId,
    models::{DiscoverFilters, MediaItem, PaginatedResult},
    services::discovery,
};

/// Handler for filtered discovery
pub async fn get_suggestions(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(filters): Query<DiscoverFilters>,
) -> AppResult<ApiResponse<PaginatedResult<MediaItem>>> {
    tracing::info!(
        request_id = %request_id,
        content_type = ?filters.content_type,
        mood = ?filters.mood,
        duration = ?filters.duration,
        "Processing suggestions request"
    );

    let suggestions = discovery::discover(state.provider.as_ref(), &filters).await?;

    tracing::info!(
        request_id = %request_id,
        page = suggestions.page,
        total_results = suggestions.total_results,
        "Suggestions completed"
    );

    Ok(ApiResponse::ok(suggestions))
}
