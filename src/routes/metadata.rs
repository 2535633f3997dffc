use axum::extract::State;

use crate::{
    api::{ApiResponse, AppState},
    error::AppResult,
    models::{Country, Language},
    services::metadata,
};

/// Handler for the alphabetized language list
pub async fn get_languages(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<Language>>> {
    let languages = metadata::fetch_languages(state.provider.as_ref()).await?;
    Ok(ApiResponse::ok(languages))
}

/// Handler for the alphabetized country list
pub async fn get_countries(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<Country>>> {
    let countries = metadata::fetch_countries(state.provider.as_ref()).await?;
    Ok(ApiResponse::ok(countries))
}
