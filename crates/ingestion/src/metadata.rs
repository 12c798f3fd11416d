//! Layer metadata for an ingestion batch, computed from scene descriptors
//! alone.

use tracing::{debug, instrument};

use etl_common::{
    BoundingBox, CellType, CrsCode, Footprint, KeyBounds, LayerMetadata, SceneDescriptor,
    SpaceTimeKey, ZoomedLayoutScheme, DEFAULT_TILE_SIZE,
};

use crate::error::{IngestionError, Result};

/// Derive the destination layer for a batch of scenes.
///
/// Returns the zoom level the layout was built for together with the
/// metadata. No pixel data is read. The result only describes tiles produced
/// from this same scene set.
#[instrument(skip(scenes), fields(scenes = scenes.len()))]
pub fn collect_metadata(
    scenes: &[SceneDescriptor],
    max_zoom: u32,
    crs: CrsCode,
) -> Result<(u32, LayerMetadata)> {
    if crs.world_extent().is_none() {
        return Err(IngestionError::UnsupportedCrs(crs));
    }

    let layout = ZoomedLayoutScheme::new(crs, DEFAULT_TILE_SIZE)?.level_for_zoom(max_zoom)?;

    let union = Footprint::union_all(scenes.iter().map(|s| &s.footprint))
        .ok_or(IngestionError::EmptySceneSet)?;
    let extent = BoundingBox::from_points(
        union
            .vertices()
            .map(|(lon, lat)| projection::from_geographic(crs, lon, lat)),
    )
    .ok_or(IngestionError::EmptySceneSet)?;

    let (min_instant, max_instant) = scenes
        .iter()
        .map(SceneDescriptor::instant)
        .fold((i64::MAX, i64::MIN), |(lo, hi), t| (lo.min(t), hi.max(t)));

    let grid = layout.extent_to_bounds(&extent);
    let bounds = KeyBounds::new(
        SpaceTimeKey::new(grid.col_min, grid.row_min, min_instant),
        SpaceTimeKey::new(grid.col_max, grid.row_max, max_instant),
    );

    debug!(
        zoom = max_zoom,
        crs = %crs,
        cols = grid.width(),
        rows = grid.height(),
        "Computed layer metadata"
    );

    Ok((
        max_zoom,
        LayerMetadata {
            cell_type: CellType::Uint16,
            layout,
            extent,
            crs,
            bounds,
        },
    ))
}
