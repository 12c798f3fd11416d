//! The scene-to-tile ingestion pipeline.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use etl_common::{CrsCode, SceneDescriptor, TemporalProjectedExtent, DEFAULT_TILE_SIZE};
use raster::{reproject, split, MultibandTile, ProjectedRaster, ResampleMethod};

use crate::config::{JobOptions, SceneBatch};
use crate::context::ExecutionContext;
use crate::error::Result;
use crate::fetch::{FetchOutcome, SceneFetcher};
use crate::partition::Partitioned;
use crate::report::{IngestionReport, SceneOutcome, SceneReport};

/// Output partitions per input scene.
pub const PARTITIONS_PER_SCENE: usize = 16;

/// One output record: where and when a chunk sits, and its pixels.
pub type OutputTile = (TemporalProjectedExtent, MultibandTile);

/// The ingested chunks plus what happened to each scene.
#[derive(Debug, Clone)]
pub struct IngestOutput {
    pub tiles: Partitioned<OutputTile>,
    pub report: IngestionReport,
}

/// Ingest a batch of scenes into reprojected, tagged 256x256 chunks.
///
/// Each scene is fetched and chunked in its own task, at most
/// `ctx.parallelism()` at once. Scenes with no data contribute nothing and
/// are listed in the report. The records are redistributed into
/// `16 * scenes.len()` partitions.
#[instrument(skip_all, fields(scenes = scenes.len(), crs = %options.crs))]
pub async fn ingest(
    ctx: &ExecutionContext,
    options: &JobOptions,
    scenes: &SceneBatch,
    fetcher: Arc<dyn SceneFetcher>,
) -> Result<IngestOutput> {
    options.validate()?;

    let results: Vec<(SceneReport, Vec<OutputTile>)> = stream::iter(scenes.iter().cloned())
        .map(|scene| {
            let task = ctx
                .handle()
                .spawn(ingest_scene(scene.clone(), options.clone(), fetcher.clone()));
            async move {
                match task.await {
                    Ok(result) => result,
                    Err(e) => (dropped(&scene, vec![format!("scene task failed: {}", e)]), Vec::new()),
                }
            }
        })
        .buffered(ctx.parallelism())
        .collect()
        .await;

    let mut reports = Vec::with_capacity(results.len());
    let mut records = Vec::new();
    for (report, tiles) in results {
        if let SceneOutcome::Dropped { reasons } = &report.outcome {
            warn!(scene = %report.scene_id, reasons = ?reasons, "Scene dropped");
        }
        reports.push(report);
        records.extend(tiles);
    }

    let report = IngestionReport::new(reports);
    let tiles = Partitioned::repartition(records, PARTITIONS_PER_SCENE * scenes.len());

    info!(
        ingested = report.ingested_count(),
        dropped = report.dropped_count(),
        chunks = tiles.len(),
        partitions = tiles.num_partitions(),
        "Ingestion complete"
    );

    Ok(IngestOutput { tiles, report })
}

async fn ingest_scene(
    scene: SceneDescriptor,
    options: JobOptions,
    fetcher: Arc<dyn SceneFetcher>,
) -> (SceneReport, Vec<OutputTile>) {
    let (raster, source) = match fetcher.fetch_outcome(&scene, &options).await {
        FetchOutcome::Fetched { raster, source } => (raster, source),
        FetchOutcome::NoData { reasons } => return (dropped(&scene, reasons), Vec::new()),
    };

    let (crs, method, instant) = (options.crs, options.resample, scene.instant());
    let chunked = tokio::task::spawn_blocking(move || chunk_scene(&raster, crs, method, instant)).await;

    match chunked {
        Ok(Ok(tiles)) => {
            let report = SceneReport {
                scene_id: scene.scene_id.clone(),
                outcome: SceneOutcome::Ingested {
                    chunks: tiles.len(),
                    source,
                },
            };
            (report, tiles)
        }
        Ok(Err(e)) => (dropped(&scene, vec![format!("chunking failed: {}", e)]), Vec::new()),
        Err(e) => (dropped(&scene, vec![format!("chunking task failed: {}", e)]), Vec::new()),
    }
}

fn dropped(scene: &SceneDescriptor, reasons: Vec<String>) -> SceneReport {
    SceneReport {
        scene_id: scene.scene_id.clone(),
        outcome: SceneOutcome::Dropped { reasons },
    }
}

/// Reproject one scene raster, split it into 256x256 chunks and tag each
/// with its extent, CRS and the scene's acquisition instant.
pub fn chunk_scene(
    raster: &ProjectedRaster,
    crs: CrsCode,
    method: ResampleMethod,
    instant: i64,
) -> raster::Result<Vec<OutputTile>> {
    let reprojected = reproject(raster, crs, method)?;
    let size = DEFAULT_TILE_SIZE as usize;

    Ok(split(&reprojected.raster, size, size)?
        .into_iter()
        .map(|chunk| {
            (
                TemporalProjectedExtent::new(chunk.extent, crs, instant),
                chunk.tile,
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster::{ArrayTile, Raster};
    use etl_common::BoundingBox;

    #[test]
    fn test_chunk_scene_tags_every_chunk() {
        let band = ArrayTile::from_u16(300, 270, vec![7; 300 * 270]).unwrap();
        let raster = ProjectedRaster::new(
            Raster::new(
                MultibandTile::new(vec![band]).unwrap(),
                BoundingBox::new(0.0, 0.0, 3000.0, 2700.0),
            ),
            CrsCode::Epsg3857,
        );

        let tiles = chunk_scene(&raster, CrsCode::Epsg3857, ResampleMethod::Nearest, 1_504_350_000_000).unwrap();
        assert_eq!(tiles.len(), 4);
        assert!(tiles.iter().all(|(tpe, _)| tpe.crs == CrsCode::Epsg3857 && tpe.instant == 1_504_350_000_000));
        assert_eq!(tiles[0].0.extent, BoundingBox::new(0.0, 140.0, 2560.0, 2700.0));
        assert_eq!(tiles[3].1.dimensions(), (44, 14));
    }
}
