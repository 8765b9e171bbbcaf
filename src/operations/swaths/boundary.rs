use tracing::debug;

use crate::config::{Tuning, DEFAULT_SIMPLIFY_TOLERANCE, MIN_OFFSET, SIMPLIFY_FLOOR};
use crate::error::{InputError, InternalError, Result};
use crate::geometry::{MultiPath, Polygon, Ring, RingRole};
use crate::operations::corners::{Canonicalize, FindCorners};
use crate::operations::offset::Inset;
use crate::operations::simplify::Simplify;
use crate::operations::validity::{correct_multi_polygon, correct_polygon};

use super::ExtractSwaths;

/// Insets a planar polygon and splits each ring of the result into swaths.
///
/// Returns one [`MultiPath`] per surviving ring: for each polygon of the
/// inset, its exterior first and then its holes in stored order. An inset
/// that swallows the whole polygon, or some of its holes, is not an error;
/// those rings simply produce no group.
#[derive(Debug)]
pub struct BoundarySwaths<'a> {
    polygon: &'a Polygon,
    offset: f64,
    simplify_tolerance: f64,
    tuning: Tuning,
}

impl<'a> BoundarySwaths<'a> {
    /// Creates a new swath extraction of `polygon` inset by `offset` meters.
    #[must_use]
    pub fn new(polygon: &'a Polygon, offset: f64) -> Self {
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
    /// - `InputError::OffsetTooSmall` if the offset is below [`MIN_OFFSET`]
    /// - `InputError::ParameterOutOfRange` if the tolerance is below
    ///   [`SIMPLIFY_FLOOR`]
    /// - `GeometryError::Invalid` if the polygon or its inset is invalid in a
    ///   way the pipeline cannot repair
    /// - `InternalError` if a stage breaks its own guarantees
    pub fn execute(&self) -> Result<Vec<MultiPath>> {
        check_parameters(self.offset, self.simplify_tolerance)?;

        let polygon = correct_polygon(self.polygon);
        let inset = Inset::new(&polygon, self.offset)
            .with_tuning(&self.tuning)
            .execute()?;
        let simplified = Simplify::new(&inset, self.simplify_tolerance).execute()?;
        let simplified = correct_multi_polygon(&simplified);
        debug!(
            offset = self.offset,
            tolerance = self.simplify_tolerance,
            polygons = simplified.0.len(),
            "inset simplified"
        );

        let mut groups = Vec::new();
        for polygon in &simplified {
            groups.extend(self.polygon_swaths(polygon)?);
        }
        debug!(groups = groups.len(), "boundary swaths extracted");
        Ok(groups)
    }

    fn polygon_swaths(&self, polygon: &Polygon) -> Result<Vec<MultiPath>> {
        let rings = std::iter::once((polygon.exterior(), RingRole::Exterior))
            .chain(polygon.interiors().iter().map(|r| (r, RingRole::Interior)));
        let groups = rings
            .map(|(ring, role)| self.ring_swaths(ring, role))
            .collect::<Result<Vec<_>>>()?;

        let expected = 1 + polygon.interiors().len();
        if groups.len() != expected {
            return Err(InternalError::RingGroupMismatch {
                expected,
                actual: groups.len(),
            }
            .into());
        }
        Ok(groups)
    }

    fn ring_swaths(&self, ring: &Ring, role: RingRole) -> Result<MultiPath> {
        let corners = FindCorners::new(ring, role)
            .with_tuning(&self.tuning)
            .execute();
        let found = corners.len();
        let canonical = Canonicalize::new(ring.clone(), corners).execute()?;
        debug!(
            ?role,
            points = canonical.ring().0.len(),
            corners_found = found,
            corners = canonical.corners().len(),
            "ring canonicalized"
        );
        ExtractSwaths::new(canonical.ring(), canonical.corners()).execute()
    }
}

/// Rejects caller parameters before any geometry work. The offset is
/// checked first.
pub(super) fn check_parameters(offset: f64, simplify_tolerance: f64) -> Result<()> {
    if offset.is_nan() || offset < MIN_OFFSET {
        return Err(InputError::OffsetTooSmall {
            offset,
            min: MIN_OFFSET,
        }
        .into());
    }
    if simplify_tolerance.is_nan() || simplify_tolerance < SIMPLIFY_FLOOR {
        return Err(InputError::ParameterOutOfRange {
            parameter: "simplify_tolerance",
            value: simplify_tolerance,
            min: SIMPLIFY_FLOOR,
            max: f64::INFINITY,
        }
        .into());
    }
    Ok(())
}
