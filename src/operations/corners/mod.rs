mod canonicalize;
mod detect;

pub use canonicalize::{CanonicalRing, Canonicalize};
pub use detect::FindCorners;
