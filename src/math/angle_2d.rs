use super::Vector2;

/// 2D cross product (z-component of the 3D cross product).
#[must_use]
pub fn cross_2d(u: &Vector2, v: &Vector2) -> f64 {
    u.x * v.y - u.y * v.x
}

/// Signed angle in radians that rotates `from` onto `to`.
///
/// Positive is a left (counter-clockwise) turn, negative a right turn.
/// The result lies in `(-π, π]`. Built from the cross and dot products so it
/// stays well conditioned near 0 and π; a zero-length input yields 0.
#[must_use]
pub fn turn_angle(from: &Vector2, to: &Vector2) -> f64 {
    cross_2d(from, to).atan2(from.dot(to))
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    use super::*;
    use crate::math::TOLERANCE;

    #[test]
    fn left_turn_is_positive() {
        let east = Vector2::new(1.0, 0.0);
        let north = Vector2::new(0.0, 1.0);
        assert!((turn_angle(&east, &north) - FRAC_PI_2).abs() < TOLERANCE);
    }

    #[test]
    fn right_turn_is_negative() {
        let east = Vector2::new(1.0, 0.0);
        let south = Vector2::new(0.0, -2.0);
        assert!((turn_angle(&east, &south) + FRAC_PI_2).abs() < TOLERANCE);
    }

    #[test]
    fn straight_and_reversal() {
        let east = Vector2::new(1.0, 0.0);
        assert!(turn_angle(&east, &Vector2::new(5.0, 0.0)).abs() < TOLERANCE);
        assert!((turn_angle(&east, &Vector2::new(-1.0, 0.0)) - PI).abs() < TOLERANCE);
    }

    #[test]
    fn diagonal() {
        let east = Vector2::new(1.0, 0.0);
        let ne = Vector2::new(1.0, 1.0);
        assert!((turn_angle(&east, &ne) - FRAC_PI_4).abs() < TOLERANCE);
    }

    #[test]
    fn zero_vector_gives_zero() {
        let zero = Vector2::new(0.0, 0.0);
        assert!(turn_angle(&zero, &Vector2::new(1.0, 0.0)).abs() < TOLERANCE);
    }
}
