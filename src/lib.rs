//! Mission route planning and execution for a drone ground station:
//! a waypoint mission model, a 2-opt route optimizer with pluggable
//! geo costs, and an asynchronous mission executor driving a vehicle link.

pub mod adapters;
pub mod application;
pub mod common;
pub mod config;
pub mod domains;

pub use application::{MissionPlanningService, PlannedRoute};
pub use common::*;
pub use config::Config;
pub use domains::*;
