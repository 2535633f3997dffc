use axum::extract::{Path, State};

use crate::{
    api::{ApiResponse, AppState},
    error::{AppError, AppResult},
    models::{MediaDetail, MediaKind},
    services::details,
};

/// Handler for `GET /api/details/:type/:id`
pub async fn get_details(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> AppResult<ApiResponse<MediaDetail>> {
    let kind = MediaKind::from_param(&kind).ok_or_else(|| {
        AppError::InvalidInput("Invalid 'type' parameter. Must be 'movie' or 'tv'.".to_string())
    })?;
    let id = id
        .parse::<u64>()
        .map_err(|_| AppError::InvalidInput("A valid numeric 'id' is required.".to_string()))?;

    let detail =
        details::fetch_details(state.provider.as_ref(), kind, id, &state.image_base_url).await?;
    Ok(ApiResponse::ok(detail))
}
