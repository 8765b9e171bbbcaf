pub mod angle_2d;
pub mod polygon_2d;

use geo::Coord;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Converts a planar coordinate to an nalgebra point.
#[must_use]
pub fn point(c: Coord<f64>) -> Point2 {
    Point2::new(c.x, c.y)
}

/// Vector from `a` to `b`.
#[must_use]
pub fn vector(a: Coord<f64>, b: Coord<f64>) -> Vector2 {
    point(b) - point(a)
}

/// Squared Euclidean distance between two coordinates.
#[must_use]
pub fn dist2(a: Coord<f64>, b: Coord<f64>) -> f64 {
    vector(a, b).norm_squared()
}

/// Euclidean distance between two coordinates.
#[must_use]
pub fn dist(a: Coord<f64>, b: Coord<f64>) -> f64 {
    vector(a, b).norm()
}

/// Total length of an open sequence of coordinates.
#[must_use]
pub fn polyline_length(points: &[Coord<f64>]) -> f64 {
    points.windows(2).map(|w| dist(w[0], w[1])).sum()
}
