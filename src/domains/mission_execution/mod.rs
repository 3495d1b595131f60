pub mod actors;
pub mod events;
pub mod executor;
pub mod ports;
pub mod projections;
pub mod state;

pub use actors::*;
pub use events::*;
pub use executor::*;
pub use ports::*;
pub use projections::*;
pub use state::*;
