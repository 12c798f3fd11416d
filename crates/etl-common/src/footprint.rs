//! Scene footprint polygons in geographic coordinates.

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, EtlError, EtlResult};

/// A scene footprint: one polygon ring of `(lon, lat)` vertices in EPSG:4326.
///
/// The ring is stored open (the first vertex is not repeated at the end).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(f64, f64)>", into = "Vec<(f64, f64)>")]
pub struct Footprint {
    ring: Vec<(f64, f64)>,
}

impl Footprint {
    /// Build a footprint from ring vertices, dropping a closing vertex if present.
    pub fn new(mut ring: Vec<(f64, f64)>) -> EtlResult<Self> {
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(EtlError::InvalidFootprint(format!(
                "a polygon needs at least 3 vertices, got {}",
                ring.len()
            )));
        }
        if let Some((lon, lat)) = ring
            .iter()
            .find(|(lon, lat)| !lon.is_finite() || !lat.is_finite() || lat.abs() > 90.0)
        {
            return Err(EtlError::InvalidFootprint(format!(
                "vertex ({}, {}) is not a valid lon/lat",
                lon, lat
            )));
        }
        Ok(Self { ring })
    }

    /// Axis-aligned rectangle footprint.
    pub fn from_bbox(bbox: &BoundingBox) -> Self {
        Self {
            ring: vec![
                (bbox.min_x, bbox.min_y),
                (bbox.max_x, bbox.min_y),
                (bbox.max_x, bbox.max_y),
                (bbox.min_x, bbox.max_y),
            ],
        }
    }

    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.ring
    }

    /// Geographic envelope of the ring.
    pub fn envelope(&self) -> BoundingBox {
        // The ring is non-empty by construction.
        BoundingBox::from_points(self.ring.iter().copied())
            .unwrap_or_else(|| BoundingBox::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Combine two footprints into one multi-polygon geometry.
    pub fn union(&self, other: &Footprint) -> MultiFootprint {
        MultiFootprint {
            polygons: vec![self.clone(), other.clone()],
        }
    }

    /// Combine every footprint; `None` when there is nothing to combine.
    pub fn union_all<'a, I>(footprints: I) -> Option<MultiFootprint>
    where
        I: IntoIterator<Item = &'a Footprint>,
    {
        footprints
            .into_iter()
            .map(|f| MultiFootprint::from(f.clone()))
            .reduce(|acc, next| acc.union(&next))
    }
}

impl TryFrom<Vec<(f64, f64)>> for Footprint {
    type Error = EtlError;

    fn try_from(ring: Vec<(f64, f64)>) -> Result<Self, Self::Error> {
        Self::new(ring)
    }
}

impl From<Footprint> for Vec<(f64, f64)> {
    fn from(footprint: Footprint) -> Self {
        footprint.ring
    }
}

/// The geometric combination of several footprints.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiFootprint {
    polygons: Vec<Footprint>,
}

impl MultiFootprint {
    pub fn polygons(&self) -> &[Footprint] {
        &self.polygons
    }

    /// Merge another multi-polygon into this one.
    pub fn union(mut self, other: &MultiFootprint) -> MultiFootprint {
        self.polygons.extend(other.polygons.iter().cloned());
        self
    }

    /// Every vertex of every member polygon.
    pub fn vertices(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.polygons.iter().flat_map(|p| p.ring.iter().copied())
    }

    /// Geographic envelope of all member polygons.
    pub fn envelope(&self) -> BoundingBox {
        BoundingBox::from_points(self.vertices())
            .unwrap_or_else(|| BoundingBox::new(0.0, 0.0, 0.0, 0.0))
    }
}

impl From<Footprint> for MultiFootprint {
    fn from(footprint: Footprint) -> Self {
        MultiFootprint {
            polygons: vec![footprint],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_ring_is_opened() {
        let fp = Footprint::new(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]).unwrap();
        assert_eq!(fp.vertices().len(), 3);
    }

    #[test]
    fn test_invalid_footprints() {
        assert!(Footprint::new(vec![(0.0, 0.0), (1.0, 1.0)]).is_err());
        assert!(Footprint::new(vec![(0.0, 0.0), (1.0, 95.0), (2.0, 0.0)]).is_err());
        assert!(Footprint::new(vec![(f64::NAN, 0.0), (1.0, 1.0), (2.0, 0.0)]).is_err());
    }

    #[test]
    fn test_union_envelope() {
        let a = Footprint::from_bbox(&BoundingBox::new(-75.0, 40.0, -73.0, 42.0));
        let b = Footprint::new(vec![(-72.0, 39.0), (-70.5, 39.5), (-71.0, 41.0)]).unwrap();
        let c = Footprint::from_bbox(&BoundingBox::new(-74.0, 38.0, -73.5, 38.5));

        let union = Footprint::union_all([&a, &b, &c]).unwrap();
        assert_eq!(union.polygons().len(), 3);
        assert_eq!(union.envelope(), BoundingBox::new(-75.0, 38.0, -70.5, 42.0));
        assert_eq!(a.union(&b).polygons().len(), 2);
    }

    #[test]
    fn test_union_of_nothing() {
        assert!(Footprint::union_all(Vec::<&Footprint>::new()).is_none());
    }

    #[test]
    fn test_serde_as_vertex_list() {
        let json = "[[10.0, 50.0], [11.0, 50.0], [11.0, 51.0], [10.0, 51.0]]";
        let fp: Footprint = serde_json::from_str(json).unwrap();
        assert_eq!(fp.envelope(), BoundingBox::new(10.0, 50.0, 11.0, 51.0));

        assert!(serde_json::from_str::<Footprint>("[[0.0, 0.0]]").is_err());
    }
}
