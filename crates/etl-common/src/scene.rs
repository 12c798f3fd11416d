//! Landsat scene descriptors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EtlError, EtlResult, Footprint};

/// One Landsat acquisition to ingest, as returned by a catalog query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescriptor {
    /// Pre-collection scene id, e.g. `LC80140322017245LGN00`
    pub scene_id: String,
    /// Collection-1 product id, e.g. `LC08_L1TP_014032_20170902_20170915_01_T1`
    #[serde(default)]
    pub product_id: Option<String>,
    /// Geographic footprint of the scene
    pub footprint: Footprint,
    /// Acquisition timestamp
    pub acquired: DateTime<Utc>,
}

impl SceneDescriptor {
    pub fn new(scene_id: impl Into<String>, footprint: Footprint, acquired: DateTime<Utc>) -> Self {
        Self {
            scene_id: scene_id.into(),
            product_id: None,
            footprint,
            acquired,
        }
    }

    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// WRS-2 path, characters 3..6 of the scene id.
    pub fn wrs_path(&self) -> EtlResult<u16> {
        self.scene_id_field(3..6)
    }

    /// WRS-2 row, characters 6..9 of the scene id.
    pub fn wrs_row(&self) -> EtlResult<u16> {
        self.scene_id_field(6..9)
    }

    /// Acquisition time as epoch milliseconds.
    pub fn instant(&self) -> i64 {
        self.acquired.timestamp_millis()
    }

    fn scene_id_field(&self, range: std::ops::Range<usize>) -> EtlResult<u16> {
        self.scene_id
            .get(range)
            .and_then(|digits| digits.parse().ok())
            .ok_or_else(|| EtlError::InvalidSceneId(self.scene_id.clone()))
    }
}
