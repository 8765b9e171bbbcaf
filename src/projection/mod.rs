//! Local azimuthal equidistant projection.
//!
//! Geographic positions are mapped onto a plane tangent to the earth at an
//! origin chosen from the polygon being processed. Distances and azimuths
//! from the origin are preserved exactly on a sphere whose radius is the
//! Gaussian mean radius of the WGS84 ellipsoid at the origin latitude, which
//! keeps metric error negligible over field-sized extents.
//!
//! `x` points east, `y` points north, both in meters.

use geo::{coord, LineString, MultiLineString, Polygon};
use tracing::debug;

use crate::geometry::{Coord, GeoMultiPath, GeoPath, GeoPolygon, LatLon, MultiPath, Path};
use crate::math::TOLERANCE;

const WGS84_A: f64 = 6_378_137.0;
const WGS84_E2: f64 = 0.006_694_379_990_14;

/// A projection centered on one origin, reusable for forward and inverse
/// transforms of everything derived from the same input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalProjection {
    origin: LatLon,
    lat0: f64,
    lon0: f64,
    sin_lat0: f64,
    cos_lat0: f64,
    radius: f64,
}

impl LocalProjection {
    /// Creates a projection tangent at `origin`.
    #[must_use]
    pub fn new(origin: LatLon) -> Self {
        let lat0 = origin.latitude.to_radians();
        let lon0 = origin.longitude.to_radians();
        let (sin_lat0, cos_lat0) = lat0.sin_cos();
        Self {
            origin,
            lat0,
            lon0,
            sin_lat0,
            cos_lat0,
            radius: gaussian_radius(sin_lat0),
        }
    }

    /// Creates a projection whose origin is the center of the polygon's
    /// bounding envelope.
    #[must_use]
    pub fn for_polygon(polygon: &GeoPolygon) -> Self {
        let (sw, ne) = polygon.envelope();
        let origin = LatLon::new(
            0.5 * (sw.latitude + ne.latitude),
            0.5 * (sw.longitude + ne.longitude),
        );
        debug!(
            latitude = origin.latitude,
            longitude = origin.longitude,
            "local projection origin"
        );
        Self::new(origin)
    }

    /// The tangent point.
    #[must_use]
    pub fn origin(&self) -> LatLon {
        self.origin
    }

    /// Sphere radius used for the projection, in meters.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Projects a geographic position onto the plane.
    #[must_use]
    pub fn forward(&self, p: LatLon) -> Coord {
        let lat = p.latitude.to_radians();
        let dlon = p.longitude.to_radians() - self.lon0;
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_dlon, cos_dlon) = dlon.sin_cos();

        let east = cos_lat * sin_dlon;
        let north = self.cos_lat0 * sin_lat - self.sin_lat0 * cos_lat * cos_dlon;
        let sin_c = east.hypot(north);
        let cos_c = self.sin_lat0 * sin_lat + self.cos_lat0 * cos_lat * cos_dlon;
        if sin_c < TOLERANCE && cos_c > 0.0 {
            return coord! { x: 0.0, y: 0.0 };
        }
        let c = sin_c.atan2(cos_c);
        let k = self.radius * c / sin_c;
        coord! { x: k * east, y: k * north }
    }

    /// Maps a planar coordinate back to a geographic position.
    #[must_use]
    pub fn inverse(&self, c: Coord) -> LatLon {
        let rho = c.x.hypot(c.y);
        if rho < TOLERANCE {
            return self.origin;
        }
        let angle = rho / self.radius;
        let (sin_c, cos_c) = angle.sin_cos();
        let lat = (cos_c * self.sin_lat0 + c.y * sin_c * self.cos_lat0 / rho)
            .clamp(-1.0, 1.0)
            .asin();
        let lon = self.lon0
            + (c.x * sin_c).atan2(rho * self.cos_lat0 * cos_c - c.y * self.sin_lat0 * sin_c);
        LatLon::new(lat.to_degrees(), wrap_degrees(lon.to_degrees()))
    }

    /// Projects a geographic ring.
    #[must_use]
    pub fn forward_ring(&self, ring: &[LatLon]) -> LineString<f64> {
        ring.iter().map(|&p| self.forward(p)).collect()
    }

    /// Projects a polygon, preserving ring and point counts and order.
    #[must_use]
    pub fn forward_polygon(&self, polygon: &GeoPolygon) -> Polygon<f64> {
        Polygon::new(
            self.forward_ring(polygon.outer()),
            polygon.holes().iter().map(|h| self.forward_ring(h)).collect(),
        )
    }

    /// Maps a planar path back to geographic positions.
    #[must_use]
    pub fn inverse_path(&self, path: &Path) -> GeoPath {
        path.coords().map(|&c| self.inverse(c)).collect()
    }

    /// Maps every path of a multi-path back to geographic positions.
    #[must_use]
    pub fn inverse_multi_path(&self, paths: &MultiPath) -> GeoMultiPath {
        paths.iter().map(|p| self.inverse_path(p)).collect()
    }

    /// Projects a geographic multi-path.
    #[must_use]
    pub fn forward_multi_path(&self, paths: &[GeoPath]) -> MultiPath {
        MultiLineString::new(
            paths
                .iter()
                .map(|p| p.iter().map(|&q| self.forward(q)).collect())
                .collect(),
        )
    }
}

/// Gaussian mean radius `sqrt(M * N)` of the WGS84 ellipsoid.
fn gaussian_radius(sin_lat: f64) -> f64 {
    let w2 = 1.0 - WGS84_E2 * sin_lat * sin_lat;
    WGS84_A * (1.0 - WGS84_E2).sqrt() / w2
}

fn wrap_degrees(lon: f64) -> f64 {
    let mut lon = lon;
    while lon > 180.0 {
        lon -= 360.0;
    }
    while lon <= -180.0 {
        lon += 360.0;
    }
    lon
}
