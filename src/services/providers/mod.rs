/// Upstream metadata provider abstraction
///
/// Handlers and services only talk to the movie database through this trait,
/// so the HTTP client can be swapped for a mock in tests.
use serde_json::Value;

use crate::models::{Country, Language, MediaDetails, MediaItem, MediaKind, PaginatedResult};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Errors raised while talking to the upstream API
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Upstream rejected the API key (401)")]
    Unauthorized,

    #[error("Upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Trait for movie metadata providers
///
/// Every method is a single upstream call. Fan-out, merging and reshaping
/// belong to the services built on top of it.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Provider configuration (image base URLs, sizes)
    async fn configuration(&self) -> ProviderResult<Value>;

    /// Genre list for one media kind
    async fn genres(&self, kind: MediaKind) -> ProviderResult<Value>;

    async fn languages(&self) -> ProviderResult<Vec<Language>>;

    async fn countries(&self) -> ProviderResult<Vec<Country>>;

    /// One page of filtered discovery results
    async fn discover(
        &self,
        kind: MediaKind,
        params: &[(String, String)],
        page: u32,
    ) -> ProviderResult<PaginatedResult<MediaItem>>;

    /// One page of multi-type search results (may include people)
    async fn search_multi(&self, query: &str, page: u32)
        -> ProviderResult<PaginatedResult<MediaItem>>;

    /// One page of titles the upstream recommends for the given title
    async fn recommendations(
        &self,
        kind: MediaKind,
        id: u64,
        page: u32,
    ) -> ProviderResult<PaginatedResult<MediaItem>>;

    /// Full detail record, credits included
    async fn details(&self, kind: MediaKind, id: u64) -> ProviderResult<MediaDetails>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
