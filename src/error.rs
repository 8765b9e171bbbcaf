use thiserror::Error;

use crate::operations::validity::ValidityFailure;

/// Top-level error type for the swath pipeline.
#[derive(Debug, Error)]
pub enum SwathError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Internal(#[from] InternalError),
}

/// Errors caused by caller-supplied values. Raised before any geometry work.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("offset must be >= {min} m, got {offset} m")]
    OffsetTooSmall { offset: f64, min: f64 },

    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("malformed polygon: {0}")]
    MalformedPolygon(String),
}

/// Geometry that failed a validity check for a defect the pipeline cannot
/// recover from.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("{context}: invalid geometry: {failure}")]
    Invalid {
        context: &'static str,
        failure: ValidityFailure,
    },
}

/// Consistency violations inside the pipeline itself.
#[derive(Debug, Error)]
pub enum InternalError {
    #[error("expected {expected} ring groups, produced {actual}")]
    RingGroupMismatch { expected: usize, actual: usize },

    #[error("precondition violated: {0}")]
    Precondition(String),
}

impl SwathError {
    /// Returns the validity defect carried by this error, if any.
    #[must_use]
    pub fn validity_failure(&self) -> Option<ValidityFailure> {
        match self {
            Self::Geometry(GeometryError::Invalid { failure, .. }) => Some(*failure),
            _ => None,
        }
    }
}

/// Convenience type alias for results using [`SwathError`].
pub type Result<T> = std::result::Result<T, SwathError>;
