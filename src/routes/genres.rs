use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    api::{ApiResponse, AppState},
    error::AppResult,
    services::metadata,
};

#[derive(Debug, Deserialize)]
pub struct GenreQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Handler for genre list passthrough (`?type=movie|tv`)
pub async fn get_genres(
    State(state): State<AppState>,
    Query(params): Query<GenreQuery>,
) -> AppResult<ApiResponse<Value>> {
    let genres = metadata::fetch_genres(state.provider.as_ref(), params.kind.as_deref()).await?;
    Ok(ApiResponse::ok(genres))
}
