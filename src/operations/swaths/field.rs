use geo::Area;
use tracing::{debug, warn};

use crate::config::{Tuning, DEFAULT_SIMPLIFY_TOLERANCE};
use crate::error::Result;
use crate::geometry::{GeoMultiPath, GeoPolygon};
use crate::projection::LocalProjection;

use super::GeoBoundarySwaths;

/// Outcome for one boundary part of a field.
#[derive(Debug)]
pub struct PartSwaths {
    /// Index of the part in the caller's input.
    pub part: usize,
    /// The part's ring groups, or the error that aborted it.
    pub result: Result<Vec<GeoMultiPath>>,
}

/// Runs [`GeoBoundarySwaths`] over every boundary part of one field.
///
/// Parts are processed largest first, by area in their own local
/// projection. Each part succeeds or fails on its own.
#[derive(Debug)]
pub struct FieldSwaths<'a> {
    parts: &'a [GeoPolygon],
    offset: f64,
    simplify_tolerance: f64,
    tuning: Tuning,
}

impl<'a> FieldSwaths<'a> {
    /// Creates a new run over `parts`, each inset by `offset` meters.
    #[must_use]
    pub fn new(parts: &'a [GeoPolygon], offset: f64) -> Self {
        Self {
            parts,
            offset,
            simplify_tolerance: DEFAULT_SIMPLIFY_TOLERANCE,
            tuning: Tuning::default(),
        }
    }

    /// Simplifies every inset at `tolerance` meters instead of the default.
    #[must_use]
    pub fn with_simplify_tolerance(mut self, tolerance: f64) -> Self {
        self.simplify_tolerance = tolerance;
        self
    }

    /// Uses `tuning` for every part.
    #[must_use]
    pub fn with_tuning(mut self, tuning: &Tuning) -> Self {
        self.tuning = *tuning;
        self
    }

    /// Executes the run. Returns one entry per part, largest part first.
    #[must_use]
    pub fn execute(&self) -> Vec<PartSwaths> {
        let mut order: Vec<(usize, f64)> = self
            .parts
            .iter()
            .enumerate()
            .map(|(i, part)| (i, projected_area(part)))
            .collect();
        order.sort_by(|a, b| b.1.total_cmp(&a.1));

        order
            .into_iter()
            .map(|(part, area)| {
                debug!(part, area, "processing field part");
                let result = GeoBoundarySwaths::new(&self.parts[part], self.offset)
                    .with_simplify_tolerance(self.simplify_tolerance)
                    .with_tuning(&self.tuning)
                    .execute();
                if let Err(err) = &result {
                    warn!(part, %err, "field part failed");
                }
                PartSwaths { part, result }
            })
            .collect()
    }
}

fn projected_area(part: &GeoPolygon) -> f64 {
    LocalProjection::for_polygon(part)
        .forward_polygon(part)
        .unsigned_area()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::LatLon;

    fn block(lat: f64, lon: f64, size_deg: f64) -> GeoPolygon {
        GeoPolygon::new(
            vec![
                LatLon::new(lat, lon),
                LatLon::new(lat, lon + size_deg),
                LatLon::new(lat + size_deg, lon + size_deg),
                LatLon::new(lat + size_deg, lon),
            ],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn parts_run_largest_first() {
        let parts = vec![
            block(10.0, 10.0, 0.001),
            block(10.01, 10.0, 0.003),
            block(10.02, 10.0, 0.002),
        ];
        let out = FieldSwaths::new(&parts, 5.0).execute();
        let order: Vec<usize> = out.iter().map(|p| p.part).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert!(out.iter().all(|p| p.result.is_ok()));
    }

    #[test]
    fn failing_part_does_not_hide_others() {
        let bowtie = GeoPolygon::new(
            vec![
                LatLon::new(10.0, 10.0),
                LatLon::new(10.001, 10.001),
                LatLon::new(10.0, 10.001),
                LatLon::new(10.0004, 10.0),
            ],
            vec![],
        )
        .unwrap();
        let parts = vec![bowtie, block(10.01, 10.0, 0.001)];
        let out = FieldSwaths::new(&parts, 5.0).execute();
        assert_eq!(out.len(), 2);
        let bad = out.iter().find(|p| p.part == 0).unwrap();
        let good = out.iter().find(|p| p.part == 1).unwrap();
        assert!(bad.result.is_err());
        assert_eq!(good.result.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn parameters_fail_every_part() {
        let parts = vec![block(10.0, 10.0, 0.002), block(10.01, 10.0, 0.001)];
        let out = FieldSwaths::new(&parts, 0.05).execute();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|p| p.result.is_err()));
    }

    #[test]
    fn empty_field_has_no_parts() {
        assert!(FieldSwaths::new(&[], 5.0).execute().is_empty());
    }
}
