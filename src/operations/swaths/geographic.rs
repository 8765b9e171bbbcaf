use tracing::debug;

use crate::config::{Tuning, DEFAULT_SIMPLIFY_TOLERANCE};
use crate::error::Result;
use crate::geometry::{GeoMultiPath, GeoPolygon};
use crate::projection::LocalProjection;

use super::boundary::check_parameters;
use super::BoundarySwaths;

/// [`BoundarySwaths`] for a polygon in latitude and longitude.
///
/// The polygon is projected onto a plane tangent at the center of its
/// bounding envelope, processed in meters, and the swaths are mapped back
/// through the same projection.
#[derive(Debug)]
pub struct GeoBoundarySwaths<'a> {
    polygon: &'a GeoPolygon,
    offset: f64,
    simplify_tolerance: f64,
    tuning: Tuning,
}

impl<'a> GeoBoundarySwaths<'a> {
    /// Creates a new swath extraction of `polygon` inset by `offset` meters.
    #[must_use]
    pub fn new(polygon: &'a GeoPolygon, offset: f64) -> Self {
        Self {
            polygon,
            offset,
            simplify_tolerance: DEFAULT_SIMPLIFY_TOLERANCE,
            tuning: Tuning::default(),
        }
    }

    /// Simplifies the inset at `tolerance` meters instead of the default.
    #[must_use]
    pub fn with_simplify_tolerance(mut self, tolerance: f64) -> Self {
        self.simplify_tolerance = tolerance;
        self
    }

    /// Uses `tuning` for the offset engine and the corner detector.
    #[must_use]
    pub fn with_tuning(mut self, tuning: &Tuning) -> Self {
        self.tuning = *tuning;
        self
    }

    /// Executes the pipeline.
    ///
    /// # Errors
    ///
    /// Same as [`BoundarySwaths::execute`]. Parameters are checked before
    /// the projection is built.
    pub fn execute(&self) -> Result<Vec<GeoMultiPath>> {
        check_parameters(self.offset, self.simplify_tolerance)?;

        let projection = LocalProjection::for_polygon(self.polygon);
        let planar = projection.forward_polygon(self.polygon);
        let groups = BoundarySwaths::new(&planar, self.offset)
            .with_simplify_tolerance(self.simplify_tolerance)
            .with_tuning(&self.tuning)
            .execute()?;
        debug!(groups = groups.len(), "mapping swaths back to geographic");
        Ok(groups
            .iter()
            .map(|group| projection.inverse_multi_path(group))
            .collect())
    }
}
