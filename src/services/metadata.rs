use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{Country, Language, MediaKind},
    services::providers::MetadataProvider,
};

pub async fn fetch_configuration(provider: &dyn MetadataProvider) -> AppResult<Value> {
    provider
        .configuration()
        .await
        .map_err(AppError::upstream("Failed to fetch configuration from TMDB"))
}

/// Genre list; `tv` selects TV genres and anything else falls back to movies
pub async fn fetch_genres(provider: &dyn MetadataProvider, kind: Option<&str>) -> AppResult<Value> {
    let kind = kind
        .and_then(MediaKind::from_param)
        .unwrap_or(MediaKind::Movie);

    provider
        .genres(kind)
        .await
        .map_err(AppError::upstream("Failed to fetch genres from TMDB"))
}

pub async fn fetch_languages(provider: &dyn MetadataProvider) -> AppResult<Vec<Language>> {
    let mut languages = provider
        .languages()
        .await
        .map_err(AppError::upstream("Failed to fetch languages"))?;

    languages.sort_by_cached_key(|l| l.english_name.to_lowercase());
    Ok(languages)
}

pub async fn fetch_countries(provider: &dyn MetadataProvider) -> AppResult<Vec<Country>> {
    let mut countries = provider
        .countries()
        .await
        .map_err(AppError::upstream("Failed to fetch countries"))?;

    countries.sort_by_cached_key(|c| c.english_name.to_lowercase());
    Ok(countries)
}
