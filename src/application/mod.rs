pub mod mission_planning_service;

pub use mission_planning_service::*;
