mod inset;

pub use inset::Inset;
