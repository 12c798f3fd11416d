//! Coordinate Reference System types and utilities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::BoundingBox;

/// Half the equatorial circumference of the Web Mercator sphere, in meters.
pub const WEB_MERCATOR_MAX_EXTENT: f64 = 20037508.342789244;

/// Well-known CRS codes handled by the ETL.
///
/// Serialized as its `EPSG:nnnn` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CrsCode {
    /// WGS84 Geographic (lon/lat in degrees)
    Epsg4326,
    /// Web Mercator (meters)
    Epsg3857,
    /// WGS84 / UTM zone (EPSG:326zz north, EPSG:327zz south)
    Utm { zone: u8, north: bool },
}

impl CrsCode {
    /// Resolve a numeric EPSG code.
    pub fn from_epsg(code: u32) -> Result<Self, CrsParseError> {
        match code {
            4326 => Ok(CrsCode::Epsg4326),
            3857 | 900913 => Ok(CrsCode::Epsg3857),
            32601..=32660 => Ok(CrsCode::Utm {
                zone: (code - 32600) as u8,
                north: true,
            }),
            32701..=32760 => Ok(CrsCode::Utm {
                zone: (code - 32700) as u8,
                north: false,
            }),
            _ => Err(CrsParseError::UnsupportedCrs(format!("EPSG:{}", code))),
        }
    }

    /// Numeric EPSG code.
    pub fn epsg(&self) -> u32 {
        match self {
            CrsCode::Epsg4326 => 4326,
            CrsCode::Epsg3857 => 3857,
            CrsCode::Utm { zone, north: true } => 32600 + *zone as u32,
            CrsCode::Utm { zone, north: false } => 32700 + *zone as u32,
        }
    }

    /// Check if this is a geographic (lat/lon) CRS.
    pub fn is_geographic(&self) -> bool {
        matches!(self, CrsCode::Epsg4326)
    }

    /// Extent of the whole world in this CRS, for CRSs that tile the globe.
    ///
    /// UTM zones are regional and have no world extent.
    pub fn world_extent(&self) -> Option<BoundingBox> {
        match self {
            CrsCode::Epsg4326 => Some(BoundingBox::new(-180.0, -90.0, 180.0, 90.0)),
            CrsCode::Epsg3857 => Some(BoundingBox::new(
                -WEB_MERCATOR_MAX_EXTENT,
                -WEB_MERCATOR_MAX_EXTENT,
                WEB_MERCATOR_MAX_EXTENT,
                WEB_MERCATOR_MAX_EXTENT,
            )),
            CrsCode::Utm { .. } => None,
        }
    }
}

impl Default for CrsCode {
    fn default() -> Self {
        CrsCode::Epsg3857
    }
}

impl FromStr for CrsCode {
    type Err = CrsParseError;

    /// Accepts "EPSG:3857", "epsg:32633", "CRS:84" or a bare number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        if normalized == "CRS:84" {
            return Ok(CrsCode::Epsg4326);
        }

        let digits = normalized.strip_prefix("EPSG:").unwrap_or(&normalized);
        let code: u32 = digits
            .parse()
            .map_err(|_| CrsParseError::UnsupportedCrs(s.to_string()))?;
        Self::from_epsg(code)
    }
}

impl TryFrom<String> for CrsCode {
    type Error = CrsParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CrsCode> for String {
    fn from(code: CrsCode) -> Self {
        code.to_string()
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
}
