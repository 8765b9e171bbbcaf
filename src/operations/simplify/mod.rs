use geo::Simplify as _;
use tracing::{debug, warn};

use crate::config::SIMPLIFY_FLOOR;
use crate::error::{GeometryError, InputError, Result};
use crate::geometry::{MultiPath, MultiPolygon, Polygon, Ring};
use crate::operations::validity::{Validate, ValidityFailure};

/// Geometry that can be reduced with Douglas–Peucker at a tolerance.
pub trait Reduce: Validate + Clone {
    /// Returns a reduced copy of `self`.
    #[must_use]
    fn reduce(&self, tolerance: f64) -> Self;
}

impl Reduce for Ring {
    fn reduce(&self, tolerance: f64) -> Self {
        self.simplify(&tolerance)
    }
}

impl Reduce for Polygon {
    fn reduce(&self, tolerance: f64) -> Self {
        self.simplify(&tolerance)
    }
}

impl Reduce for MultiPolygon {
    fn reduce(&self, tolerance: f64) -> Self {
        self.simplify(&tolerance)
    }
}

impl Reduce for MultiPath {
    fn reduce(&self, tolerance: f64) -> Self {
        self.simplify(&tolerance)
    }
}

/// Douglas–Peucker simplification that never returns invalid geometry.
///
/// # Algorithm
///
/// The retry loop is a small state machine:
///
/// - **Attempt(t)**: reduce at tolerance `t` and check validity.
/// - **Tolerable**: result is valid, or only wrongly oriented. Terminal.
/// - **`BackOff(t)`**: the defect is one a finer tolerance can undo
///   (self-intersection, too few points); retry at `t / 2`.
/// - **Fatal**: any other defect. Terminal, reported as an error.
/// - **Exhausted**: the tolerance fell below [`SIMPLIFY_FLOOR`]. Terminal,
///   the input is returned unchanged.
#[derive(Debug)]
pub struct Simplify<'a, G> {
    geometry: &'a G,
    tolerance: f64,
}

enum State<G> {
    Attempt(f64),
    Tolerable(G),
    BackOff(f64),
    Fatal(ValidityFailure),
    Exhausted,
}

impl<'a, G: Reduce> Simplify<'a, G> {
    /// Creates a new simplification of `geometry` at `tolerance` meters.
    #[must_use]
    pub fn new(geometry: &'a G, tolerance: f64) -> Self {
        Self {
            geometry,
            tolerance,
        }
    }

    /// Executes the simplification.
    ///
    /// # Errors
    ///
    /// - `InputError::ParameterOutOfRange` if the tolerance is below
    ///   [`SIMPLIFY_FLOOR`]
    /// - `GeometryError::Invalid` if a reduction produced a defect outside the
    ///   recoverable set
    pub fn execute(&self) -> Result<G> {
        if self.tolerance.is_nan() || self.tolerance < SIMPLIFY_FLOOR {
            return Err(InputError::ParameterOutOfRange {
                parameter: "simplify_tolerance",
                value: self.tolerance,
                min: SIMPLIFY_FLOOR,
                max: f64::INFINITY,
            }
            .into());
        }

        let mut state = State::Attempt(self.tolerance);
        loop {
            state = match state {
                State::Attempt(tolerance) => self.attempt(tolerance),
                State::BackOff(tolerance) if tolerance < SIMPLIFY_FLOOR => State::Exhausted,
                State::BackOff(tolerance) => State::Attempt(tolerance),
                State::Tolerable(result) => return Ok(result),
                State::Fatal(failure) => {
                    return Err(GeometryError::Invalid {
                        context: "simplify",
                        failure,
                    }
                    .into())
                }
                State::Exhausted => {
                    warn!(
                        tolerance = self.tolerance,
                        "no valid simplification above floor, keeping input"
                    );
                    return Ok(self.geometry.clone());
                }
            };
        }
    }

    fn attempt(&self, tolerance: f64) -> State<G> {
        let reduced = self.geometry.reduce(tolerance);
        match reduced.validity() {
            Ok(()) => State::Tolerable(reduced),
            Err(failure) if failure.is_cosmetic() => State::Tolerable(reduced),
            Err(failure) if failure.is_recoverable() => {
                debug!(tolerance, %failure, "simplification backing off");
                State::BackOff(tolerance * 0.5)
            }
            Err(failure) => State::Fatal(failure),
        }
    }
}
