use std::path::PathBuf;
use std::sync::Arc;

use crate::services::providers::MetadataProvider;

/// Shared application state
///
/// Built once at startup and never mutated; every handler gets a cheap clone.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn MetadataProvider>,
    /// Prefix for `poster_url`, e.g. `https://image.tmdb.org/t/p/w500`
    pub image_base_url: Arc<str>,
    /// Directory served for every non-API path
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        image_base_url: impl Into<String>,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        let image_base_url: String = image_base_url.into();
        Self {
            provider,
            image_base_url: Arc::from(image_base_url.trim_end_matches('/')),
            static_dir: static_dir.into(),
        }
    }
}
