pub mod constraints;
pub mod cost;
pub mod geo_cost;
pub mod optimizer;

pub use constraints::*;
pub use cost::*;
pub use geo_cost::*;
pub use optimizer::*;
