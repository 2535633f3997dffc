use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{api::ApiResponse, services::providers::ProviderError};

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream failure; `context` is what the caller sees, `source` is only logged.
    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: ProviderError,
    },
}

impl AppError {
    /// Wraps a provider error with the caller-facing message for the endpoint.
    ///
    /// Meant for `map_err`: `.map_err(AppError::upstream("Failed to fetch genres from TMDB"))`
    pub fn upstream(context: &'static str) -> impl FnOnce(ProviderError) -> AppError {
        move |source| AppError::Upstream { context, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the envelope's `error` field
    pub fn public_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Upstream { context, .. } => context.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Upstream { context, source } = &self {
            tracing::error!(error = %source, "{}", context);
        }

        let status = self.status_code();
        let body = ApiResponse::<()>::failure(self.public_message());

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
