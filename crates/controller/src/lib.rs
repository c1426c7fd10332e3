pub mod config;
pub mod events;
pub mod gesture;
pub mod store;

pub use config::*;
pub use events::*;
pub use gesture::*;
pub use store::*;
