use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use kindred_api::config::Config;
use kindred_api::db::{create_redis_client, Cache};
use kindred_api::routes::{create_router, AppState};
use kindred_api::services::catalog::tmdb::TmdbProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    let redis_client = create_redis_client(&config.redis_url)?;
    let (cache, writer_handle) = Cache::new(redis_client).await;

    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .build()?;
    let provider = Arc::new(TmdbProvider::new(
        http_client,
        config.tmdb_api_key.clone(),
        config.tmdb_base_url.clone(),
    ));

    let state = Arc::new(AppState {
        cache,
        provider,
        strategy: config.candidate_strategy,
    });
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, strategy = ?config.candidate_strategy, "Server listening");

    axum::serve(listener, app).await?;

    writer_handle.shutdown().await;
    Ok(())
}
