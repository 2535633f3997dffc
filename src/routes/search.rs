use axum::extract::{Query, State};
use serde::Deserialize;

use crate::{
    api::{ApiResponse, AppState},
    error::AppResult,
    models::{MediaItem, PageRequest, PaginatedResult},
    services::search,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    query: Option<String>,
    page: Option<String>,
}

/// Handler for media search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<ApiResponse<PaginatedResult<MediaItem>>> {
    let page = PageRequest::from_params(params.page.as_deref(), None).page;
    let results =
        search::search_media(state.provider.as_ref(), params.query.as_deref(), page).await?;
    Ok(ApiResponse::ok(results))
}
