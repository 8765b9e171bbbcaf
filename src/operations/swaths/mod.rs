mod boundary;
mod extract;
mod field;
mod geographic;

pub use boundary::BoundarySwaths;
pub use extract::ExtractSwaths;
pub use field::{FieldSwaths, PartSwaths};
pub use geographic::GeoBoundarySwaths;
