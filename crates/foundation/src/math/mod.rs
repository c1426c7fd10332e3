pub mod polygon;
pub mod spherical;
pub mod vec;

pub use polygon::*;
pub use spherical::*;
pub use vec::*;
