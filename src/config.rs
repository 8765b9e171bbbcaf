//! Tuning constants shared by every stage of the pipeline.
//!
//! All values are lengths in meters unless stated otherwise. They are
//! immutable for the lifetime of the process; per-call overrides go through
//! [`Tuning`].

use crate::error::{InputError, Result};

/// Smallest inset a caller may request.
pub const MIN_OFFSET: f64 = 0.10;

/// Simplification tolerance used when the caller has no preference.
pub const DEFAULT_SIMPLIFY_TOLERANCE: f64 = 0.10;

/// The simplifier gives up and returns its input below this tolerance.
pub const SIMPLIFY_FLOOR: f64 = 0.01;

/// Smallest distance the offset engine accepts.
pub const MIN_INSET_DISTANCE: f64 = 0.01;

const DEFAULT_CIRCLE_POINTS: u32 = 32;
const MIN_CIRCLE_POINTS: u32 = 8;
const DEFAULT_CORNER_TOLERANCE: f64 = 10.0;
const DEFAULT_CORNER_ANGLE_DEG: f64 = 45.0;

/// Tunable knobs of the offset engine and corner detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    circle_points: u32,
    corner_tolerance: f64,
    corner_angle_deg: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            circle_points: DEFAULT_CIRCLE_POINTS,
            corner_tolerance: DEFAULT_CORNER_TOLERANCE,
            corner_angle_deg: DEFAULT_CORNER_ANGLE_DEG,
        }
    }
}

impl Tuning {
    /// Sets the number of points used to approximate a full circle in round
    /// joins.
    ///
    /// # Errors
    ///
    /// Returns `InputError::ParameterOutOfRange` if `points` is below 8.
    pub fn with_circle_points(mut self, points: u32) -> Result<Self> {
        if points < MIN_CIRCLE_POINTS {
            return Err(InputError::ParameterOutOfRange {
                parameter: "circle_points",
                value: f64::from(points),
                min: f64::from(MIN_CIRCLE_POINTS),
                max: f64::from(u32::MAX),
            }
            .into());
        }
        self.circle_points = points;
        Ok(self)
    }

    /// Sets the noise-suppression tolerance used before corner detection.
    ///
    /// # Errors
    ///
    /// Returns `InputError::ParameterOutOfRange` if `tolerance` is below
    /// [`SIMPLIFY_FLOOR`] or not finite.
    pub fn with_corner_tolerance(mut self, tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < SIMPLIFY_FLOOR {
            return Err(InputError::ParameterOutOfRange {
                parameter: "corner_tolerance",
                value: tolerance,
                min: SIMPLIFY_FLOOR,
                max: f64::INFINITY,
            }
            .into());
        }
        self.corner_tolerance = tolerance;
        Ok(self)
    }

    /// Sets the minimum turn, in degrees, that makes a vertex a corner.
    ///
    /// # Errors
    ///
    /// Returns `InputError::ParameterOutOfRange` unless `0 < degrees < 180`.
    pub fn with_corner_angle_deg(mut self, degrees: f64) -> Result<Self> {
        if degrees.is_nan() || degrees <= 0.0 || degrees >= 180.0 {
            return Err(InputError::ParameterOutOfRange {
                parameter: "corner_angle_deg",
                value: degrees,
                min: 0.0,
                max: 180.0,
            }
            .into());
        }
        self.corner_angle_deg = degrees;
        Ok(self)
    }

    /// Points per full circle for round joins.
    #[must_use]
    pub fn circle_points(&self) -> u32 {
        self.circle_points
    }

    /// Douglas–Peucker tolerance applied before corner detection.
    #[must_use]
    pub fn corner_tolerance(&self) -> f64 {
        self.corner_tolerance
    }

    /// Corner threshold in degrees.
    #[must_use]
    pub fn corner_angle_deg(&self) -> f64 {
        self.corner_angle_deg
    }

    /// Corner threshold in radians.
    #[must_use]
    pub fn corner_angle(&self) -> f64 {
        self.corner_angle_deg.to_radians()
    }
}
