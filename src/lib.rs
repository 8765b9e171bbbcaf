//! Field boundary swaths.
//!
//! Insets a field boundary polygon and splits every ring of the inset at its
//! corners into open swaths a machine can drive one at a time.
//!
//! Planar input goes through [`BoundarySwaths`]; geographic input through
//! [`GeoBoundarySwaths`], which works in a local projection centered on the
//! polygon. [`FieldSwaths`] runs a field made of several boundary parts.

pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod projection;

pub use config::{Tuning, DEFAULT_SIMPLIFY_TOLERANCE, MIN_OFFSET};
pub use error::{Result, SwathError};
pub use operations::swaths::{BoundarySwaths, FieldSwaths, GeoBoundarySwaths, PartSwaths};
