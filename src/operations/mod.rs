pub mod corners;
pub mod offset;
pub mod simplify;
pub mod swaths;
pub mod validity;
