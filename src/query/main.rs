//! Query server for proximity searches.
//!
//! Serves entity and listing search plus the create endpoints that feed
//! the in-memory store.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use padosi::config::Config;
use padosi::server::{router, AppState};
use padosi::store::{load_seed, MemoryStore};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Local-commerce proximity search server")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// JSON seed file with entities and listings (overrides config)
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Radius used when a search gives a center but no radius (overrides config)
    #[arg(long)]
    default_radius_km: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Loading config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(seed) = args.seed {
        config.server.seed_file = Some(seed);
    }
    if let Some(radius) = args.default_radius_km {
        config.search.default_radius_km = radius;
    }
    config.validate()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Padosi Query Server");

    let store = MemoryStore::new();
    if let Some(seed) = &config.server.seed_file {
        load_seed(&store, seed)?;
    }

    let (entities, listings) = store.stats();
    info!(
        "Store ready with {} entities and {} listings, default radius {}km",
        entities, listings, config.search.default_radius_km
    );

    let state = Arc::new(AppState::new(store, config.search.default_radius_km));
    let app = router(state);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
