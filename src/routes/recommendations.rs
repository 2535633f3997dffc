use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Extension, Json,
};
use serde_json::Value;

use crate::{
    api::{ApiResponse, AppState},
    error::AppResult,
    middleware::RequestId,
    models::{AggregatedRecommendation, PageParams, PaginatedResult},
    services::recommendations,
};

/// Handler for aggregated recommendations
///
/// The body is taken as raw JSON so that shape problems are reported through
/// the envelope rather than as framework rejections.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<PageParams>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<ApiResponse<PaginatedResult<AggregatedRecommendation>>> {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(request_id = %request_id, error = %rejection, "Unreadable recommendation body");
            Value::Null
        }
    };

    let selections = recommendations::parse_selections(&body)?;

    tracing::info!(
        request_id = %request_id,
        selections = selections.len(),
        "Processing recommendation request"
    );

    let result = recommendations::aggregate_recommendations(
        state.provider.as_ref(),
        &selections,
        params.to_request(),
    )
    .await;

    tracing::info!(
        request_id = %request_id,
        total_results = result.total_results,
        "Recommendations completed"
    );

    Ok(ApiResponse::ok(result))
}
