use tracing::trace;

use crate::error::{InternalError, Result};
use crate::geometry::{Coord, Ring};
use crate::math::dist2;

/// A ring whose point order starts at a corner, paired with its corners.
///
/// Always holds at least two corners, the first of them 0, sorted and
/// duplicate-free, each below the index of the closing point.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRing {
    ring: Ring,
    corners: Vec<usize>,
}

impl CanonicalRing {
    /// Returns the closed, rotated ring.
    #[must_use]
    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    /// Returns the corner indices into [`Self::ring`].
    #[must_use]
    pub fn corners(&self) -> &[usize] {
        &self.corners
    }
}

/// Rotates a ring so it starts at a corner, keeping the corner indices
/// consistent with the new order.
///
/// # Algorithm
///
/// 1. Drop the closing point.
/// 2. With no corners, seed corner 0.
/// 3. If the first corner is not 0, rotate by the shorter of two shifts:
///    forward so the first corner leads, or backward so the last one does.
///    On a tie the ring rotates backward.
/// 4. With a single corner, add the point farthest from the new start. The
///    first of several equally far points wins.
/// 5. Re-close the ring.
#[derive(Debug)]
pub struct Canonicalize {
    ring: Ring,
    corners: Vec<usize>,
}

impl Canonicalize {
    /// Creates a new canonicalization of `ring` with its `corners`.
    #[must_use]
    pub fn new(ring: Ring, corners: Vec<usize>) -> Self {
        Self { ring, corners }
    }

    /// Executes the canonicalization.
    ///
    /// # Errors
    ///
    /// `InternalError::Precondition` if the ring is not closed with at least
    /// four points, or a corner index is out of range, unsorted or repeated.
    pub fn execute(self) -> Result<CanonicalRing> {
        let Self { ring, mut corners } = self;
        let mut points = ring.into_inner();
        if points.len() < 4 || points.first() != points.last() {
            return Err(InternalError::Precondition(format!(
                "canonicalize needs a closed ring of at least 4 points, got {}",
                points.len()
            ))
            .into());
        }
        points.pop();
        let m = points.len();
        check_corners(&corners, m)?;

        if corners.is_empty() {
            corners.push(0);
        }

        let first = corners[0];
        if first != 0 {
            let last = corners[corners.len() - 1];
            let backward = m - last;
            if first < backward {
                points.rotate_left(first);
                for c in &mut corners {
                    *c -= first;
                }
                trace!(shift = first, "ring rotated forward");
            } else {
                points.rotate_right(backward);
                corners.pop();
                for c in &mut corners {
                    *c += backward;
                }
                corners.insert(0, 0);
                trace!(shift = backward, "ring rotated backward");
            }
        }

        if corners.len() < 2 {
            corners.push(farthest_from_start(&points));
        }

        points.push(points[0]);
        Ok(CanonicalRing {
            ring: Ring::new(points),
            corners,
        })
    }
}

fn check_corners(corners: &[usize], m: usize) -> Result<()> {
    if let Some(&c) = corners.iter().find(|&&c| c >= m) {
        return Err(InternalError::Precondition(format!(
            "corner index {c} out of range for {m} distinct points"
        ))
        .into());
    }
    if corners.windows(2).any(|w| w[0] >= w[1]) {
        return Err(
            InternalError::Precondition("corner indices not strictly ascending".into()).into(),
        );
    }
    Ok(())
}

/// Index in `1..len` of the point farthest from `points[0]`.
fn farthest_from_start(points: &[Coord]) -> usize {
    let origin = points[0];
    let mut best = 1;
    let mut best_d2 = dist2(origin, points[1]);
    for (i, &p) in points.iter().enumerate().skip(2) {
        let d2 = dist2(origin, p);
        if d2 > best_d2 {
            best = i;
            best_d2 = d2;
        }
    }
    best
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use geo::{coord, line_string, LineString};

    use super::*;
    use crate::error::SwathError;

    /// Closed ring of `n` distinct points, point `i` at x = i.
    fn labeled(n: usize) -> Ring {
        let mut coords: Vec<Coord> = (0..n)
            .map(|i| coord! { x: i as f64, y: (i * i) as f64 })
            .collect();
        coords.push(coords[0]);
        LineString::new(coords)
    }

    fn labels(ring: &Ring) -> Vec<usize> {
        ring.0.iter().map(|c| c.x as usize).collect()
    }

    fn square() -> Ring {
        line_string![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
            (x: 0.0, y: 0.0),
        ]
    }

    #[test]
    fn canonical_input_is_unchanged() {
        let out = Canonicalize::new(square(), vec![0, 1, 2, 3]).execute().unwrap();
        assert_eq!(out.ring(), &square());
        assert_eq!(out.corners(), &[0, 1, 2, 3]);
    }

    #[test]
    fn rotates_forward_when_first_corner_is_near_start() {
        let out = Canonicalize::new(labeled(6), vec![1, 4]).execute().unwrap();
        assert_eq!(labels(out.ring()), vec![1, 2, 3, 4, 5, 0, 1]);
        assert_eq!(out.corners(), &[0, 3]);
    }

    #[test]
    fn rotates_backward_when_last_corner_is_near_end() {
        let out = Canonicalize::new(labeled(6), vec![3, 5]).execute().unwrap();
        assert_eq!(labels(out.ring()), vec![5, 0, 1, 2, 3, 4, 5]);
        assert_eq!(out.corners(), &[0, 4]);
    }

    #[test]
    fn ties_rotate_backward() {
        let out = Canonicalize::new(labeled(6), vec![2, 4]).execute().unwrap();
        assert_eq!(labels(out.ring()), vec![4, 5, 0, 1, 2, 3, 4]);
        assert_eq!(out.corners(), &[0, 4]);
    }

    #[test]
    fn rotation_keeps_corners_on_the_same_points() {
        let ring = labeled(9);
        let before = vec![2, 3, 7];
        let out = Canonicalize::new(ring, before.clone()).execute().unwrap();
        let mut after: Vec<usize> = out
            .corners()
            .iter()
            .map(|&c| out.ring().0[c].x as usize)
            .collect();
        after.sort_unstable();
        assert_eq!(after, before);
        assert_eq!(out.ring().0.first(), out.ring().0.last());
    }

    #[test]
    fn no_corners_seeds_start_and_farthest_point() {
        let out = Canonicalize::new(square(), vec![]).execute().unwrap();
        assert_eq!(out.corners(), &[0, 2]);
        assert_eq!(out.ring(), &square());
    }

    #[test]
    fn single_corner_gets_a_partner() {
        let out = Canonicalize::new(square(), vec![2]).execute().unwrap();
        assert_eq!(out.ring().0[0], coord! { x: 10.0, y: 10.0 });
        assert_eq!(out.corners(), &[0, 2]);
        assert_eq!(out.ring().0[2], coord! { x: 0.0, y: 0.0 });
    }

    #[test]
    fn farthest_point_prefers_first_of_equals() {
        let pts = vec![
            coord! { x: 0.0, y: 0.0 },
            coord! { x: 5.0, y: 0.0 },
            coord! { x: 0.0, y: 5.0 },
        ];
        assert_eq!(farthest_from_start(&pts), 1);
    }

    #[test]
    fn bad_corners_are_rejected() {
        for corners in [vec![4], vec![1, 1], vec![2, 1]] {
            let err = Canonicalize::new(square(), corners).execute().unwrap_err();
            assert!(matches!(err, SwathError::Internal(InternalError::Precondition(_))));
        }
    }

    #[test]
    fn open_ring_is_rejected() {
        let open = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 1.0)];
        assert!(Canonicalize::new(open, vec![0]).execute().is_err());
    }
}
