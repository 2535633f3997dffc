use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{
    api::{ApiResponse, AppState},
    middleware::{make_span_with_request_id, request_id_middleware},
};

pub mod config;
pub mod details;
pub mod genres;
pub mod metadata;
pub mod recommendations;
pub mod search;
pub mod suggestions;

/// Creates the application router: `/api` endpoints, health check and the
/// static frontend for every other path
pub fn create_router(state: AppState) -> Router {
    let index = state.static_dir.join("index.html");
    let frontend = ServeDir::new(&state.static_dir).fallback(ServeFile::new(index));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .fallback_service(frontend)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/config", get(config::get_config))
        .route("/genres", get(genres::get_genres))
        .route("/metadata/languages", get(metadata::get_languages))
        .route("/metadata/countries", get(metadata::get_countries))
        .route("/suggestions", get(suggestions::get_suggestions))
        .route("/search", get(search::search))
        .route("/recommendations", post(recommendations::recommend))
        .route("/details/:type/:id", get(details::get_details))
        .fallback(api_not_found)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

async fn api_not_found() -> (StatusCode, ApiResponse<()>) {
    (
        StatusCode::NOT_FOUND,
        ApiResponse::failure("API endpoint not found"),
    )
}
