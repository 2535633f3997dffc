use axum::extract::State;
use serde_json::Value;

use crate::{
    api::{ApiResponse, AppState},
    error::AppResult,
    services::metadata,
};

/// Handler for upstream configuration passthrough
pub async fn get_config(State(state): State<AppState>) -> AppResult<ApiResponse<Value>> {
    let config = metadata::fetch_configuration(state.provider.as_ref()).await?;
    Ok(ApiResponse::ok(config))
}
