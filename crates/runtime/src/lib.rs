pub mod budget;
pub mod event_bus;
pub mod scheduler;
pub mod task;

pub use budget::*;
pub use event_bus::*;
pub use scheduler::*;
pub use task::*;
