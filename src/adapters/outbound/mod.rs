pub mod buffered_logger;
pub mod console_logger;
pub mod file_logger;
pub mod geojson_export;
pub mod memory_logger;
pub mod mission_file_store;
pub mod multi_logger;
pub mod simulated_vehicle;
pub mod tracing_logger;

pub use buffered_logger::*;
pub use console_logger::*;
pub use file_logger::*;
pub use geojson_export::*;
pub use memory_logger::*;
pub use mission_file_store::*;
pub use multi_logger::*;
pub use simulated_vehicle::*;
pub use tracing_logger::*;
