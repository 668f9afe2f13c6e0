use edu_recommender::{
    api::{create_router, AppState},
    config::Config,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("edu_recommender=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Builds the scoring backend through the fallback chain
    let state = AppState::new(&config);
    let info = state.engine.describe_backend();
    tracing::info!(
        variant = info.variant_name.name(),
        degraded = info.degraded,
        categories = info.n_classes,
        "Recommendation engine initialized"
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
