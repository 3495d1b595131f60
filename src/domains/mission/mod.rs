pub mod aggregate;
pub mod events;
pub mod file_format;
pub mod ports;

pub use aggregate::*;
pub use events::*;
pub use file_format::*;
pub use ports::*;
