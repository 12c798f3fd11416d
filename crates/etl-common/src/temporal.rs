//! Extents tagged with a CRS and an acquisition instant.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{BoundingBox, CrsCode, LayoutDefinition, SpaceTimeKey};

/// Where and when a chunk of imagery sits: extent, CRS and instant.
///
/// `instant` is epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemporalProjectedExtent {
    pub extent: BoundingBox,
    pub crs: CrsCode,
    pub instant: i64,
}

impl TemporalProjectedExtent {
    pub fn new(extent: BoundingBox, crs: CrsCode, instant: i64) -> Self {
        Self {
            extent,
            crs,
            instant,
        }
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.instant).single()
    }

    /// Key of the layout tile containing this extent's center.
    pub fn key_in(&self, layout: &LayoutDefinition) -> SpaceTimeKey {
        let (x, y) = self.extent.center();
        layout.key_for(x, y).with_instant(self.instant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SpatialKey, TileLayout};

    #[test]
    fn test_key_in_layout() {
        let layout = LayoutDefinition::new(
            BoundingBox::new(0.0, 0.0, 400.0, 400.0),
            TileLayout::new(4, 4, 256, 256),
        );
        let tpe = TemporalProjectedExtent::new(
            BoundingBox::new(110.0, 310.0, 190.0, 390.0),
            CrsCode::Epsg3857,
            1_504_366_200_000,
        );
        assert_eq!(tpe.key_in(&layout), SpatialKey::new(1, 0).with_instant(1_504_366_200_000));
        assert_eq!(tpe.time().unwrap().timestamp_millis(), 1_504_366_200_000);
    }
}
