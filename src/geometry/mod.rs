//! Planar and geographic value types.
//!
//! Planar geometry is `geo` geometry in meters. Rings follow `geo`'s
//! orientation convention: exteriors counter-clockwise, holes clockwise, so
//! the polygon interior is always on the left of travel.

pub mod latlon;

pub use latlon::{GeoMultiPath, GeoPath, GeoPolygon, LatLon};

/// Planar coordinate in meters.
pub type Coord = geo::Coord<f64>;

/// Closed ring; the first coordinate is repeated at the end.
pub type Ring = geo::LineString<f64>;

/// Planar polygon with optional holes.
pub type Polygon = geo::Polygon<f64>;

/// Set of disjoint planar polygons.
pub type MultiPolygon = geo::MultiPolygon<f64>;

/// One open swath.
pub type Path = geo::LineString<f64>;

/// Swaths of one ring, in ring-traversal order.
pub type MultiPath = geo::MultiLineString<f64>;

/// Which boundary of a polygon a ring is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingRole {
    Exterior,
    Interior,
}

impl RingRole {
    /// Sign of the signed area a correctly wound ring of this role has.
    #[must_use]
    pub fn expected_winding(self) -> f64 {
        match self {
            Self::Exterior => 1.0,
            Self::Interior => -1.0,
        }
    }
}
