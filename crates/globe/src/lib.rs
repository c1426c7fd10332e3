pub mod globe;
pub mod orientation;
pub mod projection;
pub mod registry;
pub mod variants;

pub use globe::*;
pub use orientation::*;
pub use projection::{Projection, RawProjection};
pub use registry::*;
