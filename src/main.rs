use std::sync::Arc;

use movies_api::{config::Config, create_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movies_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        catalog = %config.catalog_path,
        features = ?config.feature_strategy,
        index = ?config.index_strategy,
        "Starting movies-api"
    );

    // Build everything before accepting connections; a broken catalog aborts startup
    let state = AppState::build(&config)?;
    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
