use std::f64::consts::TAU;

use geo::{Area, LineString};
use i_overlay::float::filter::ContourFilter;
use i_overlay::mesh::outline::offset::OutlineOffset;
use i_overlay::mesh::style::{LineJoin, OutlineStyle};
use tracing::debug;

use crate::config::{Tuning, MIN_INSET_DISTANCE};
use crate::error::{GeometryError, InternalError, Result};
use crate::geometry::{Coord, MultiPolygon, Polygon, Ring};
use crate::operations::validity::{correct_multi_polygon, Validate};

/// Result polygons smaller than this (m²) are numerical slivers.
const MIN_RESULT_AREA: f64 = 1e-6;

/// Contour points in the outline engine's convention.
type Contour = Vec<[f64; 2]>;

/// Shrinks a polygon's boundary inward by a fixed distance.
///
/// # Algorithm
///
/// 1. Hand the rings to the outline engine with exteriors clockwise and
///    holes counter-clockwise, the engine's outer/inner convention.
/// 2. Offset every ring by `-distance` with round joins. Each join arc is
///    split into steps of `2π / circle_points`; reflex vertices get an arc,
///    convex vertices stay sharp. Self-overlaps of the offset curves are
///    resolved by the engine's positive fill rule.
/// 3. Drop collinear points and slivers, flip back to the crate's
///    orientation and validate.
///
/// The result may hold several polygons, or none, and may have fewer holes
/// than the input: holes grow under an inset and merge with the exterior.
#[derive(Debug)]
pub struct Inset<'a> {
    polygon: &'a Polygon,
    distance: f64,
    circle_points: u32,
}

impl<'a> Inset<'a> {
    /// Creates a new inset of `polygon` by `distance` meters.
    #[must_use]
    pub fn new(polygon: &'a Polygon, distance: f64) -> Self {
        Self {
            polygon,
            distance,
            circle_points: Tuning::default().circle_points(),
        }
    }

    /// Uses the round-join resolution from `tuning`.
    #[must_use]
    pub fn with_tuning(mut self, tuning: &Tuning) -> Self {
        self.circle_points = tuning.circle_points();
        self
    }

    /// Executes the inset.
    ///
    /// # Errors
    ///
    /// - `InternalError::Precondition` if the distance is below
    ///   [`MIN_INSET_DISTANCE`]
    /// - `GeometryError::Invalid` if the input or the result is not valid
    pub fn execute(&self) -> Result<MultiPolygon> {
        if self.distance.is_nan() || self.distance < MIN_INSET_DISTANCE {
            return Err(InternalError::Precondition(format!(
                "inset distance {} below {MIN_INSET_DISTANCE}",
                self.distance
            ))
            .into());
        }
        ensure_valid(self.polygon, "inset input")?;

        let shape: Vec<Contour> = std::iter::once(self.polygon.exterior())
            .chain(self.polygon.interiors())
            .map(to_contour)
            .collect();
        let style = OutlineStyle::new(-self.distance)
            .line_join(LineJoin::Round(TAU / f64::from(self.circle_points)));
        let filter = ContourFilter {
            min_area: MIN_RESULT_AREA,
            simplify: true,
        };
        let shapes: Vec<Vec<Contour>> = shape.outline_with_filter(style, filter);

        let inset = correct_multi_polygon(&MultiPolygon::new(
            shapes
                .into_iter()
                .map(to_polygon)
                .filter(|p| p.unsigned_area() > MIN_RESULT_AREA)
                .collect(),
        ));
        ensure_valid(&inset, "inset result")?;

        debug!(
            distance = self.distance,
            circle_points = self.circle_points,
            polygons = inset.0.len(),
            holes = inset.0.iter().map(|p| p.interiors().len()).sum::<usize>(),
            "inset computed"
        );
        Ok(inset)
    }
}

fn ensure_valid<G: Validate>(geometry: &G, context: &'static str) -> Result<()> {
    geometry
        .validity()
        .map_err(|failure| GeometryError::Invalid { context, failure }.into())
}

/// Open, reversed copy of a closed ring. Counter-clockwise exteriors become
/// the engine's clockwise outer contours, clockwise holes its inner ones.
fn to_contour(ring: &Ring) -> Contour {
    let open = ring.0.split_last().map_or(&[][..], |(_, rest)| rest);
    open.iter().rev().map(|c| [c.x, c.y]).collect()
}

/// Closed ring from an engine contour, reversed back to the crate's winding.
fn to_ring(contour: Contour) -> Ring {
    let mut coords: Vec<Coord> = contour
        .into_iter()
        .rev()
        .map(|[x, y]| Coord { x, y })
        .collect();
    if let Some(&first) = coords.first() {
        coords.push(first);
    }
    LineString::new(coords)
}

/// First contour is the exterior, the rest are holes.
fn to_polygon(shape: Vec<Contour>) -> Polygon {
    let mut rings = shape.into_iter().map(to_ring);
    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Polygon::new(exterior, rings.collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use geo::{coord, line_string, BoundingRect};

    use super::*;
    use crate::math::polygon_2d::signed_area_2d;
    use crate::operations::validity::ValidityFailure;

    fn square(x0: f64, y0: f64, side: f64) -> LineString<f64> {
        line_string![
            (x: x0, y: y0),
            (x: x0 + side, y: y0),
            (x: x0 + side, y: y0 + side),
            (x: x0, y: y0 + side),
            (x: x0, y: y0),
        ]
    }

    fn cw(ring: LineString<f64>) -> LineString<f64> {
        let mut r = ring;
        r.0.reverse();
        r
    }

    /// Counter-clockwise rectangle with `n` evenly spaced points per side.
    fn densified_rect(width: f64, height: f64, n: u32) -> LineString<f64> {
        let corners = [(0.0, 0.0), (width, 0.0), (width, height), (0.0, height)];
        let mut coords = Vec::new();
        for k in 0..4 {
            let (x0, y0) = corners[k];
            let (x1, y1) = corners[(k + 1) % 4];
            for i in 0..n {
                let t = f64::from(i) / f64::from(n);
                coords.push(coord! { x: x0 + t * (x1 - x0), y: y0 + t * (y1 - y0) });
            }
        }
        coords.push(coords[0]);
        LineString::new(coords)
    }

    #[test]
    fn square_insets_to_smaller_square() {
        let poly = Polygon::new(square(0.0, 0.0, 100.0), vec![]);
        let out = Inset::new(&poly, 10.0).execute().unwrap();
        assert_eq!(out.0.len(), 1);
        let rect = out.0[0].bounding_rect().unwrap();
        assert!((rect.min().x - 10.0).abs() < 1e-4);
        assert!((rect.min().y - 10.0).abs() < 1e-4);
        assert!((rect.max().x - 90.0).abs() < 1e-4);
        assert!((rect.max().y - 90.0).abs() < 1e-4);
        assert!((out.0[0].unsigned_area() - 6400.0).abs() < 1e-2);
    }

    #[test]
    fn result_is_corrected() {
        let poly = Polygon::new(square(0.0, 0.0, 50.0), vec![cw(square(20.0, 20.0, 10.0))]);
        let out = Inset::new(&poly, 2.0).execute().unwrap();
        assert_eq!(out.0.len(), 1);
        assert_eq!(out.0[0].interiors().len(), 1);
        assert!(signed_area_2d(&out.0[0].exterior().0) > 0.0);
        assert!(signed_area_2d(&out.0[0].interiors()[0].0) < 0.0);
    }

    #[test]
    fn hole_grows_with_rounded_corners() {
        let poly = Polygon::new(square(0.0, 0.0, 100.0), vec![cw(square(40.0, 40.0, 20.0))]);
        let out = Inset::new(&poly, 5.0).execute().unwrap();
        let hole = &out.0[0].interiors()[0];
        // Rounded corners add vertices beyond the hole's four.
        assert!(hole.0.len() > 5);
        let rect = hole.bounding_rect().unwrap();
        assert!((rect.min().x - 35.0).abs() < 1e-3);
        assert!((rect.max().y - 65.0).abs() < 1e-3);
    }

    #[test]
    fn densified_sides_inset_cleanly() {
        for n in [1, 3, 10, 50] {
            let poly = Polygon::new(densified_rect(800.0, 890.0, n), vec![]);
            for distance in [8.0, 10.0, 30.0] {
                let out = Inset::new(&poly, distance).execute().unwrap();
                assert_eq!(out.0.len(), 1, "n = {n}, distance = {distance}");
                let rect = out.0[0].bounding_rect().unwrap();
                assert!((rect.min().x - distance).abs() < 1e-3);
                assert!((rect.max().y - (890.0 - distance)).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn bowed_sides_do_not_leave_cracks() {
        // Side points alternate a hair in and out of the straight line, so
        // every other vertex is a nearly flat reflex turn.
        let mut coords = Vec::new();
        for i in 0..50 {
            let bow = if i % 2 == 0 { 0.0 } else { 1e-6 };
            coords.push(coord! { x: 400.0 - bow, y: f64::from(i) * 18.0 });
        }
        coords.push(coord! { x: 400.0, y: 900.0 });
        coords.push(coord! { x: 0.0, y: 900.0 });
        coords.push(coord! { x: 0.0, y: 0.0 });
        coords.push(coords[0]);
        let poly = Polygon::new(LineString::new(coords), vec![]);

        let out = Inset::new(&poly, 10.0).execute().unwrap();
        assert_eq!(out.0.len(), 1);
        assert!(out.is_valid());
        let rect = out.0[0].bounding_rect().unwrap();
        assert!(rect.max().x < 390.0 + 1e-3);
    }

    #[test]
    fn dumbbell_splits_in_two() {
        // Two 40 m squares joined by a 6 m wide neck.
        let exterior = line_string![
            (x: 0.0, y: 0.0),
            (x: 40.0, y: 0.0),
            (x: 40.0, y: 17.0),
            (x: 80.0, y: 17.0),
            (x: 80.0, y: 0.0),
            (x: 120.0, y: 0.0),
            (x: 120.0, y: 40.0),
            (x: 80.0, y: 40.0),
            (x: 80.0, y: 23.0),
            (x: 40.0, y: 23.0),
            (x: 40.0, y: 40.0),
            (x: 0.0, y: 40.0),
            (x: 0.0, y: 0.0),
        ];
        let poly = Polygon::new(exterior, vec![]);
        let out = Inset::new(&poly, 5.0).execute().unwrap();
        assert_eq!(out.0.len(), 2);
    }

    #[test]
    fn narrow_strip_vanishes() {
        let poly = Polygon::new(
            line_string![
                (x: 0.0, y: 0.0),
                (x: 100.0, y: 0.0),
                (x: 100.0, y: 8.0),
                (x: 0.0, y: 8.0),
                (x: 0.0, y: 0.0),
            ],
            vec![],
        );
        let out = Inset::new(&poly, 5.0).execute().unwrap();
        assert!(out.0.is_empty());
    }

    #[test]
    fn hole_near_edge_merges_into_exterior() {
        let poly = Polygon::new(square(0.0, 0.0, 100.0), vec![cw(square(5.0, 40.0, 10.0))]);
        let out = Inset::new(&poly, 10.0).execute().unwrap();
        assert_eq!(out.0.len(), 1);
        assert!(out.0[0].interiors().is_empty());
    }

    #[test]
    fn invalid_input_fails() {
        let bowtie = Polygon::new(
            line_string![
                (x: 0.0, y: 0.0),
                (x: 10.0, y: 10.0),
                (x: 10.0, y: 0.0),
                (x: 0.0, y: 4.0),
                (x: 0.0, y: 0.0),
            ],
            vec![],
        );
        let err = Inset::new(&bowtie, 1.0).execute().unwrap_err();
        assert_eq!(err.validity_failure(), Some(ValidityFailure::SelfIntersections));
    }

    #[test]
    fn distance_below_minimum_is_a_precondition_error() {
        let poly = Polygon::new(square(0.0, 0.0, 100.0), vec![]);
        let err = Inset::new(&poly, 0.001).execute().unwrap_err();
        assert!(matches!(
            err,
            crate::error::SwathError::Internal(InternalError::Precondition(_))
        ));
    }

    #[test]
    fn contours_flip_winding_both_ways() {
        let ring = square(0.0, 0.0, 4.0);
        let contour = to_contour(&ring);
        assert_eq!(contour.len(), 4);
        assert_eq!(contour[0], [0.0, 4.0]);
        assert_eq!(to_ring(contour), ring);
    }
}
