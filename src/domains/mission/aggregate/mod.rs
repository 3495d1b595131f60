pub mod constraints;
pub mod mission;
pub mod types;

// Re-export all public types for convenience
pub use constraints::*;
pub use mission::Mission;
pub use types::*;
