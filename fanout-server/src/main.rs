use std::{env, str::FromStr, time::Duration};

use anyhow::Result;
use fanout::{
    cache::MemoryCache,
    store::{MemoryStore, Store},
    ConfigBuilder, Prober, Registry, DEFAULT_PROBE_TIMEOUT,
};
use fanout_axum::{router, AppState};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{
    prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = match env::var("RUST_LOG") {
        Ok(filter) => EnvFilter::from_str(&filter)?,
        Err(_) => EnvFilter::from_str("error,fanout=info,fanout_axum=info")?,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();

    let probe_timeout = match env::var("FANOUT_PROBE_TIMEOUT") {
        Ok(secs) => Duration::from_secs(secs.parse()?),
        Err(_) => DEFAULT_PROBE_TIMEOUT,
    };

    let config = ConfigBuilder::new().probe_timeout(probe_timeout).build();
    let store = store().await?;
    let registry = with_cache(store).await?.config(config);
    let prober = Prober::from_config(registry.settings())?;

    let app = router(AppState { registry, prober });

    let addr = env::var("FANOUT_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_owned());
    let listener = TcpListener::bind(&addr).await?;

    info!("fanout listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown())
        .await?;

    Ok(())
}

#[cfg(feature = "pg")]
async fn store() -> Result<Store> {
    let Ok(dsn) = env::var("DATABASE_URL") else {
        info!("DATABASE_URL not set, using the memory store");
        return Ok(MemoryStore::new());
    };

    let pool = sqlx::PgPool::connect(&dsn).await?;
    let pg = fanout::store::PgStore::new(&pool);
    pg.migrate().await?;

    info!("using the postgres store");

    Ok(Store::new(pg))
}

#[cfg(not(feature = "pg"))]
async fn store() -> Result<Store> {
    Ok(MemoryStore::new())
}

#[cfg(feature = "redis")]
async fn with_cache(store: Store) -> Result<Registry> {
    let Ok(url) = env::var("REDIS_URL") else {
        return Ok(memory(store));
    };

    let cache = fanout::cache::RedisCache::connect(&url).await?;

    Ok(Registry::new(store, cache))
}

#[cfg(not(feature = "redis"))]
async fn with_cache(store: Store) -> Result<Registry> {
    Ok(memory(store))
}

fn memory(store: Store) -> Registry {
    info!("using the memory cache, change notifications stay in process");

    Registry::new(store, MemoryCache::new())
}

async fn shutdown() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
    }

    info!("shutting down");
}
