//! Landsat scene ingestion.
//!
//! Turns a batch of Landsat 8 scene descriptors into reprojected, tagged
//! 256x256 multiband chunks spread over evenly sized partitions, and
//! computes the layer metadata those chunks belong to.
//!
//! # Architecture
//!
//! ```text
//! SceneBatch ──► ingest(ctx, options, scenes, fetcher)
//!                  │  one task per scene, ctx.parallelism() in flight
//!                  ▼
//!                SceneFetcher::fetch_outcome      primary ─► secondary
//!                  │  ProjectedRaster (native CRS) or no data
//!                  ▼
//!                chunk_scene                      reproject, split 256, tag
//!                  │
//!                  ▼
//!                Partitioned<(TemporalProjectedExtent, MultibandTile)>
//!                  + IngestionReport
//! ```
//!
//! [`collect_metadata`] runs over the same batch to produce the zoom level
//! and [`LayerMetadata`](etl_common::LayerMetadata) the chunks are keyed in.

pub mod config;
pub mod context;
pub mod error;
pub mod fetch;
pub mod metadata;
pub mod partition;
pub mod pipeline;
pub mod report;

pub use config::{parse_bands, JobOptions, SceneBatch, SourceConfig, DEFAULT_BANDS, DEFAULT_MAX_ZOOM};
pub use context::ExecutionContext;
pub use error::{FetchError, IngestionError, Result};
pub use fetch::{
    read_scene, BandSource, FallbackFetcher, FetchOutcome, FnFetcher, HttpBandSource,
    ObjectStoreBandSource, SceneFetcher, SourceFetcher,
};
pub use metadata::collect_metadata;
pub use partition::Partitioned;
pub use pipeline::{chunk_scene, ingest, IngestOutput, OutputTile, PARTITIONS_PER_SCENE};
pub use report::{IngestionReport, SceneOutcome, SceneReport};
