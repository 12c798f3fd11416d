//! Landsat ingester.
//!
//! Reads a scene catalog, computes the destination layer metadata and runs
//! every scene through the ingestion pipeline, reading band files from the
//! public Landsat bucket with the HTTP mirror as fallback.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use config::{IngesterConfig, Overrides};
use ingestion::{collect_metadata, ingest, ExecutionContext, FallbackFetcher, SceneBatch};
use storage::BandCache;

#[derive(Parser, Debug)]
#[command(name = "ingester")]
#[command(about = "Ingest Landsat 8 scenes into reprojected 256x256 tiles")]
struct Args {
    /// Scene catalog (JSON or YAML list of scene descriptors)
    #[arg(env = "LANDSAT_SCENES")]
    scenes: PathBuf,

    /// Comma separated band numbers, e.g. 4,3,2
    #[arg(long)]
    bands: Option<String>,

    /// Zoom level of the destination layout
    #[arg(long)]
    max_zoom: Option<u32>,

    /// Destination CRS, e.g. EPSG:3857
    #[arg(long)]
    crs: Option<String>,

    /// Resampling method (nearest, bilinear)
    #[arg(long)]
    resample: Option<String>,

    /// Scenes processed at once
    #[arg(long, env = "INGEST_PARALLELISM")]
    parallelism: Option<usize>,

    /// Band files kept in memory (0 disables the cache)
    #[arg(long, env = "BAND_CACHE_CAPACITY")]
    cache_capacity: Option<usize>,

    /// Write the per-scene report as JSON to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .init();

    info!("Starting Landsat ingester");

    let config = IngesterConfig::from_env().apply(Overrides {
        bands: args.bands,
        max_zoom: args.max_zoom,
        crs: args.crs,
        resample: args.resample,
        parallelism: args.parallelism,
        cache_capacity: args.cache_capacity,
    })?;
    config.validate()?;
    info!(options = ?config.job, prefix = %config.source.prefix, "Loaded configuration");

    let scenes = SceneBatch::load(&args.scenes)
        .with_context(|| format!("reading scene catalog {}", args.scenes.display()))?;
    info!(scenes = scenes.len(), "Loaded scene catalog");

    if scenes.is_empty() {
        warn!("Scene catalog is empty, nothing to ingest");
        return Ok(());
    }

    let (zoom, metadata) = collect_metadata(&scenes, config.job.max_zoom, config.job.crs)?;
    info!(
        zoom,
        crs = %metadata.crs,
        extent = ?metadata.extent,
        tiles = metadata.tile_count(),
        "Computed layer metadata"
    );

    let mut ctx = ExecutionContext::current()?;
    if let Some(parallelism) = config.parallelism {
        ctx = ctx.with_parallelism(parallelism);
    }

    let mut options = config.job.clone();
    let cache = (config.cache_capacity > 0).then(|| Arc::new(BandCache::new(config.cache_capacity)));
    if let Some(cache) = &cache {
        options = options.with_cache_hook(cache.clone());
    }

    let fetcher = Arc::new(FallbackFetcher::from_config(&config.source)?);
    let output = ingest(&ctx, &options, &scenes, fetcher).await?;

    let outside = output
        .tiles
        .iter()
        .filter(|(tpe, _)| !metadata.contains_key(&tpe.key_in(&metadata.layout)))
        .count();
    if outside > 0 {
        warn!(count = outside, "Chunks fall outside the layer key bounds");
    }

    if let Some(cache) = &cache {
        let stats = cache.stats().await;
        info!(
            entries = cache.len().await,
            inserts = stats.inserts,
            evictions = stats.evictions,
            bytes = stats.bytes_cached,
            "Band cache"
        );
    }

    info!(
        ingested = output.report.ingested_count(),
        dropped = output.report.dropped_count(),
        chunks = output.tiles.len(),
        partitions = output.tiles.num_partitions(),
        "Ingestion finished"
    );

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&output.report)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report {}", path.display()))?;
        info!(path = %path.display(), "Wrote ingestion report");
    }

    Ok(())
}
