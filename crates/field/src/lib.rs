pub mod config;
pub mod distortion;
pub mod field;
pub mod grid;
pub mod interpolate;
pub mod mask;
pub mod synthetic;

pub use config::*;
pub use distortion::*;
pub use field::*;
pub use grid::*;
pub use interpolate::*;
pub use mask::*;
