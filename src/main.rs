use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use whatsnext_api::{
    api::AppState,
    config::Config,
    routes::create_router,
    services::providers::{MetadataProvider, TmdbProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("whatsnext_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let provider: Arc<dyn MetadataProvider> = Arc::new(TmdbProvider::new(
        config.api_key().map(str::to_string),
        config.tmdb_api_url.clone(),
    ));

    let state = AppState::new(
        provider,
        config.tmdb_image_base_url.clone(),
        config.static_dir.clone(),
    );
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server running");
    tracing::info!(static_dir = %config.static_dir, "Frontend served from static directory");

    axum::serve(listener, app).await?;
    Ok(())
}
