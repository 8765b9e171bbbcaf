use tracing::{trace, warn};

use crate::config::Tuning;
use crate::geometry::{Coord, Ring, RingRole};
use crate::math::angle_2d::turn_angle;
use crate::math::polygon_2d::signed_area_2d;
use crate::math::{dist2, vector};
use crate::operations::simplify::Simplify;

/// Finds the dominant corners of a closed ring.
///
/// Returns sorted, duplicate-free indices into the ring as given (not into
/// any simplified copy). The closing point is never returned.
///
/// # Winding
///
/// A corner is a vertex where the boundary turns sharply toward the region
/// it encloses, i.e. a convex corner of the field. With the region on the
/// left of travel (exterior counter-clockwise, holes clockwise) that is a
/// left turn of at least the corner angle. A ring wound against its `role`
/// is handled by flipping the turn sign, so both windings select the same
/// vertices.
#[derive(Debug)]
pub struct FindCorners<'a> {
    ring: &'a Ring,
    role: RingRole,
    tuning: Tuning,
}

impl<'a> FindCorners<'a> {
    /// Creates a corner search over `ring`, which bounds a polygon as `role`.
    #[must_use]
    pub fn new(ring: &'a Ring, role: RingRole) -> Self {
        Self {
            ring,
            role,
            tuning: Tuning::default(),
        }
    }

    /// Uses the corner tolerance and angle from `tuning`.
    #[must_use]
    pub fn with_tuning(mut self, tuning: &Tuning) -> Self {
        self.tuning = *tuning;
        self
    }

    /// Executes the search. Degenerate rings yield no corners.
    #[must_use]
    pub fn execute(&self) -> Vec<usize> {
        let coords = &self.ring.0;
        if coords.len() < 4 || coords.first() != coords.last() {
            return Vec::new();
        }
        let area = signed_area_2d(coords);
        if area == 0.0 {
            return Vec::new();
        }
        let winding = area.signum() * self.role.expected_winding();

        let simplified = match Simplify::new(self.ring, self.tuning.corner_tolerance()).execute() {
            Ok(simplified) => simplified,
            Err(err) => {
                warn!(%err, "corner simplification failed, scanning the ring as-is");
                self.ring.clone()
            }
        };

        let simplified_corners = sharp_turns(&simplified.0, winding, self.tuning.corner_angle());
        let corners = map_to_original(coords, &simplified.0, &simplified_corners);
        trace!(
            ring_points = coords.len(),
            simplified_points = simplified.0.len(),
            corners = corners.len(),
            "corners found"
        );
        corners
    }
}

/// Indices of vertices of a closed ring whose turn, signed by `winding`, is
/// at least `threshold` radians.
fn sharp_turns(ring: &[Coord], winding: f64, threshold: f64) -> Vec<usize> {
    if ring.len() < 4 {
        return Vec::new();
    }
    let n = ring.len() - 1;
    (0..n)
        .filter(|&i| {
            let incoming = vector(ring[(i + n - 1) % n], ring[i]);
            let outgoing = vector(ring[i], ring[i + 1]);
            turn_angle(&incoming, &outgoing) * winding >= threshold
        })
        .collect()
}

/// Maps corners found on `simplified` to the nearest vertices of `original`.
///
/// Each search starts just past the previous match and walks the ring once,
/// wrapping at the end.
fn map_to_original(original: &[Coord], simplified: &[Coord], corners: &[usize]) -> Vec<usize> {
    let n = original.len().saturating_sub(1);
    if n == 0 || corners.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(corners.len());
    let mut start = 0;
    for &corner in corners {
        let target = simplified[corner];
        let mut best = start;
        let mut best_d2 = dist2(original[start], target);
        for k in 1..n {
            let i = (start + k) % n;
            let d2 = dist2(original[i], target);
            if d2 < best_d2 {
                best = i;
                best_d2 = d2;
            }
        }
        out.push(best);
        start = (best + 1) % n;
    }
    out.sort_unstable();
    out.dedup();
    out
}
