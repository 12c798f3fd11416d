//! Transforms between any pair of supported CRSs.
//!
//! Every transform pivots through geographic WGS84 coordinates.

use etl_common::{BoundingBox, CrsCode};

use crate::error::{ProjectionError, Result};
use crate::mercator::WebMercator;
use crate::utm::TransverseMercator;

/// Convert a coordinate in `crs` to lon/lat degrees.
pub fn to_geographic(crs: CrsCode, x: f64, y: f64) -> (f64, f64) {
    match crs {
        CrsCode::Epsg4326 => (x, y),
        CrsCode::Epsg3857 => WebMercator.inverse(x, y),
        CrsCode::Utm { zone, north } => TransverseMercator::utm(zone, north).inverse(x, y),
    }
}

/// Convert lon/lat degrees to a coordinate in `crs`.
pub fn from_geographic(crs: CrsCode, lon: f64, lat: f64) -> (f64, f64) {
    match crs {
        CrsCode::Epsg4326 => (lon, lat),
        CrsCode::Epsg3857 => WebMercator.forward(lon, lat),
        CrsCode::Utm { zone, north } => TransverseMercator::utm(zone, north).forward(lon, lat),
    }
}

enum Projector {
    Geographic,
    Mercator(WebMercator),
    Utm(TransverseMercator),
}

impl Projector {
    fn for_crs(crs: CrsCode) -> Self {
        match crs {
            CrsCode::Epsg4326 => Projector::Geographic,
            CrsCode::Epsg3857 => Projector::Mercator(WebMercator),
            CrsCode::Utm { zone, north } => Projector::Utm(TransverseMercator::utm(zone, north)),
        }
    }

    fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Projector::Geographic => (x, y),
            Projector::Mercator(p) => p.inverse(x, y),
            Projector::Utm(p) => p.inverse(x, y),
        }
    }

    fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        match self {
            Projector::Geographic => (lon, lat),
            Projector::Mercator(p) => p.forward(lon, lat),
            Projector::Utm(p) => p.forward(lon, lat),
        }
    }
}

/// A reusable point transform from one CRS to another.
///
/// Projection constants are computed once, so a `Transform` is the thing to
/// hold on to when transforming every pixel of a raster.
pub struct Transform {
    src: CrsCode,
    dst: CrsCode,
    from: Projector,
    to: Projector,
}

impl Transform {
    pub fn new(src: CrsCode, dst: CrsCode) -> Self {
        Self {
            src,
            dst,
            from: Projector::for_crs(src),
            to: Projector::for_crs(dst),
        }
    }

    pub fn src(&self) -> CrsCode {
        self.src
    }

    pub fn dst(&self) -> CrsCode {
        self.dst
    }

    /// The transform going the other way.
    pub fn inverse(&self) -> Transform {
        Transform::new(self.dst, self.src)
    }

    /// Transform one point, failing when the result is not finite.
    pub fn apply(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        if self.src == self.dst {
            return Ok((x, y));
        }
        let (lon, lat) = self.from.inverse(x, y);
        let (tx, ty) = self.to.forward(lon, lat);
        if tx.is_finite() && ty.is_finite() {
            Ok((tx, ty))
        } else {
            Err(ProjectionError::OutOfDomain {
                x,
                y,
                crs: self.dst.to_string(),
            })
        }
    }

    /// Envelope of a box after transformation.
    ///
    /// Each edge is sampled at `samples_per_edge` points since straight
    /// edges generally curve under reprojection.
    pub fn apply_bbox(&self, bbox: &BoundingBox, samples_per_edge: usize) -> Result<BoundingBox> {
        if self.src == self.dst {
            return Ok(*bbox);
        }
        let steps = samples_per_edge.max(2) - 1;
        let mut points = Vec::with_capacity(4 * (steps + 1));

        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = bbox.min_x + t * bbox.width();
            let y = bbox.min_y + t * bbox.height();
            points.push(self.apply(x, bbox.min_y)?);
            points.push(self.apply(x, bbox.max_y)?);
            points.push(self.apply(bbox.min_x, y)?);
            points.push(self.apply(bbox.max_x, y)?);
        }

        BoundingBox::from_points(points).ok_or_else(|| {
            ProjectionError::InvalidParameters("no sample points for bbox".to_string())
        })
    }
}
