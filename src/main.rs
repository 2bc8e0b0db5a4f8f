use std::sync::Arc;

use filmswipe_api::{
    config::Config,
    db::{create_pool, create_redis_client, Cache, CacheWriterHandle, MovieStore, PgStore},
    routes::{create_router, AppState},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("filmswipe_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url, config.max_connections).await?;
    let mut store = PgStore::new(pool);

    let mut cache_writer: Option<CacheWriterHandle> = None;
    if let Some(redis_url) = &config.redis_url {
        let (cache, handle) = Cache::new(create_redis_client(redis_url)?).await;
        store = store.with_cache(cache, config.movie_cache_ttl);
        cache_writer = Some(handle);
        tracing::info!(ttl = config.movie_cache_ttl, "Movie cache enabled");
    }

    let store: Arc<dyn MovieStore> = Arc::new(store);
    let app = create_router(Arc::new(AppState::new(store)));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "FilmSwipe API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
