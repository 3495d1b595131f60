pub mod logger;
pub mod mission;
pub mod mission_execution;
pub mod route_optimization;

pub use logger::*;
pub use mission::*;
pub use mission_execution::*;
pub use route_optimization::*;
