//! Validity checks for planar rings, polygons and paths.
//!
//! Polygon topology comes from [`geo::Validation`]; this module adds the
//! shape checks it does not make (closure, spikes, zero area) and the
//! orientation check, and maps every defect onto a [`ValidityFailure`].
//! Checks run in a fixed order and report the first defect found: per-ring
//! shape, then topology, then orientation. Orientation is therefore only
//! reported for geometry that is otherwise valid.

use geo::orient::{Direction, Orient};
use geo::validation::{
    GeometryIndex, InvalidLineString, InvalidMultiPolygon, InvalidPolygon,
    RingRole as TopologyRing,
};
use geo::winding_order::WindingOrder;
use geo::{Intersects, Validation, Winding};
use thiserror::Error;

use crate::geometry::{Coord, MultiPath, MultiPolygon, Polygon, Ring, RingRole};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::{vector, TOLERANCE};

/// The kind of defect that makes a geometry invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidityFailure {
    #[error("geometry has too few points")]
    TooFewPoints,

    #[error("geometry has a non-finite coordinate")]
    InvalidCoordinate,

    #[error("ring is not closed")]
    NotClosed,

    #[error("ring has spikes")]
    Spikes,

    #[error("ring has zero area")]
    WrongTopologicalDimension,

    #[error("geometry has self-intersections")]
    SelfIntersections,

    #[error("geometry has wrong orientation")]
    WrongOrientation,

    #[error("interior ring lies outside its exterior ring")]
    InteriorRingsOutside,

    #[error("interior ring lies inside another interior ring")]
    NestedInteriorRings,

    #[error("polygon interiors intersect")]
    IntersectingInteriors,
}

impl ValidityFailure {
    /// Defects a coarser simplification can introduce and a finer one can
    /// undo.
    #[must_use]
    pub fn is_recoverable(self) -> bool {
        matches!(self, Self::SelfIntersections | Self::TooFewPoints)
    }

    /// Defects fixed by re-orienting rings without moving any point.
    #[must_use]
    pub fn is_cosmetic(self) -> bool {
        self == Self::WrongOrientation
    }
}

/// Geometry that can be checked for validity.
pub trait Validate {
    /// Returns the first defect found, if any.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidityFailure`] describing the defect.
    fn validity(&self) -> Result<(), ValidityFailure>;

    /// Returns `true` if the geometry has no defect.
    fn is_valid(&self) -> bool {
        self.validity().is_ok()
    }
}

/// A `LineString` is validated as a closed exterior ring.
impl Validate for Ring {
    fn validity(&self) -> Result<(), ValidityFailure> {
        check_ring(&self.0)?;
        let polygon = Polygon::new(self.clone(), vec![]);
        polygon
            .check_validation()
            .map_err(|invalid| polygon_failure(&polygon, &invalid))?;
        check_orientation(self, RingRole::Exterior)
    }
}

impl Validate for Polygon {
    fn validity(&self) -> Result<(), ValidityFailure> {
        check_rings(self)?;
        self.check_validation()
            .map_err(|invalid| polygon_failure(self, &invalid))?;
        check_orientations(self)
    }
}

impl Validate for MultiPolygon {
    fn validity(&self) -> Result<(), ValidityFailure> {
        for polygon in self {
            check_rings(polygon)?;
        }
        self.check_validation()
            .map_err(|invalid| multi_polygon_failure(self, &invalid))?;
        self.iter().try_for_each(check_orientations)
    }
}

/// Open paths: each needs two distinct finite points.
impl Validate for MultiPath {
    fn validity(&self) -> Result<(), ValidityFailure> {
        for path in self {
            if path.0.is_empty() {
                return Err(ValidityFailure::TooFewPoints);
            }
            path.check_validation().map_err(|invalid| match invalid {
                InvalidLineString::TooFewPoints => ValidityFailure::TooFewPoints,
                InvalidLineString::NonFiniteCoord(_) => ValidityFailure::InvalidCoordinate,
            })?;
        }
        Ok(())
    }
}

/// Re-orients a polygon so its exterior is counter-clockwise and its holes
/// clockwise.
#[must_use]
pub fn correct_polygon(polygon: &Polygon) -> Polygon {
    polygon.orient(Direction::Default)
}

/// Re-orients every polygon of a multi-polygon.
#[must_use]
pub fn correct_multi_polygon(polygons: &MultiPolygon) -> MultiPolygon {
    polygons.orient(Direction::Default)
}

/// `geo` reports a hole crossing the exterior as not contained, and two
/// crossing holes as overlapping. Both are split off as self-intersections
/// here, so only genuinely misplaced rings keep their own kind.
fn polygon_failure(polygon: &Polygon, invalid: &InvalidPolygon) -> ValidityFailure {
    match invalid {
        InvalidPolygon::TooFewPointsInRing(_) => ValidityFailure::TooFewPoints,
        InvalidPolygon::NonFiniteCoord(..) => ValidityFailure::InvalidCoordinate,
        InvalidPolygon::SelfIntersection(_) | InvalidPolygon::IntersectingRingsOnALine(..) => {
            ValidityFailure::SelfIntersections
        }
        InvalidPolygon::InteriorRingNotContainedInExteriorRing(hole) => {
            if ring_of(polygon, *hole).intersects(polygon.exterior()) {
                ValidityFailure::SelfIntersections
            } else {
                ValidityFailure::InteriorRingsOutside
            }
        }
        InvalidPolygon::IntersectingRingsOnAnArea(a, b) => {
            if ring_of(polygon, *a).intersects(ring_of(polygon, *b)) {
                ValidityFailure::SelfIntersections
            } else {
                ValidityFailure::NestedInteriorRings
            }
        }
    }
}

fn multi_polygon_failure(polygons: &MultiPolygon, invalid: &InvalidMultiPolygon) -> ValidityFailure {
    match invalid {
        InvalidMultiPolygon::InvalidPolygon(GeometryIndex(i), inner) => match polygons.0.get(*i) {
            Some(polygon) => polygon_failure(polygon, inner),
            None => ValidityFailure::SelfIntersections,
        },
        InvalidMultiPolygon::ElementsOverlaps(GeometryIndex(i), GeometryIndex(j)) => {
            match (polygons.0.get(*i), polygons.0.get(*j)) {
                (Some(a), Some(b)) if !a.exterior().intersects(b.exterior()) => {
                    ValidityFailure::IntersectingInteriors
                }
                _ => ValidityFailure::SelfIntersections,
            }
        }
        InvalidMultiPolygon::ElementsTouchOnALine(..) => ValidityFailure::SelfIntersections,
    }
}

fn ring_of(polygon: &Polygon, role: TopologyRing) -> &Ring {
    match role {
        TopologyRing::Exterior => polygon.exterior(),
        TopologyRing::Interior(i) => polygon.interiors().get(i).unwrap_or(polygon.exterior()),
    }
}

fn check_rings(polygon: &Polygon) -> Result<(), ValidityFailure> {
    check_ring(&polygon.exterior().0)?;
    for hole in polygon.interiors() {
        check_ring(&hole.0)?;
    }
    Ok(())
}

/// Shape checks on one ring, before any topology.
fn check_ring(coords: &[Coord]) -> Result<(), ValidityFailure> {
    if coords.iter().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(ValidityFailure::InvalidCoordinate);
    }
    if coords.len() < 4 {
        return Err(ValidityFailure::TooFewPoints);
    }
    if coords.first() != coords.last() {
        return Err(ValidityFailure::NotClosed);
    }
    let distinct = distinct_vertices(coords);
    if distinct.len() < 3 {
        return Err(ValidityFailure::TooFewPoints);
    }
    if has_spike(&distinct) {
        return Err(ValidityFailure::Spikes);
    }
    if signed_area_2d(&distinct).abs() <= TOLERANCE {
        return Err(ValidityFailure::WrongTopologicalDimension);
    }
    Ok(())
}

fn check_orientations(polygon: &Polygon) -> Result<(), ValidityFailure> {
    check_orientation(polygon.exterior(), RingRole::Exterior)?;
    for hole in polygon.interiors() {
        check_orientation(hole, RingRole::Interior)?;
    }
    Ok(())
}

fn check_orientation(ring: &Ring, role: RingRole) -> Result<(), ValidityFailure> {
    let expected = match role {
        RingRole::Exterior => WindingOrder::CounterClockwise,
        RingRole::Interior => WindingOrder::Clockwise,
    };
    if ring.winding_order() == Some(expected) {
        Ok(())
    } else {
        Err(ValidityFailure::WrongOrientation)
    }
}

fn distinct_vertices(coords: &[Coord]) -> Vec<Coord> {
    let mut out = coords[..coords.len() - 1].to_vec();
    out.dedup();
    while out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    out
}

/// A spike is a vertex where the ring doubles back along itself.
fn has_spike(ring: &[Coord]) -> bool {
    let n = ring.len();
    (0..n).any(|i| {
        let prev = ring[(i + n - 1) % n];
        let cur = ring[i];
        let next = ring[(i + 1) % n];
        let back = vector(cur, prev);
        let ahead = vector(cur, next);
        let cross = back.x * ahead.y - back.y * ahead.x;
        cross.abs() <= TOLERANCE * back.norm() * ahead.norm() && back.dot(&ahead) > 0.0
    })
}
