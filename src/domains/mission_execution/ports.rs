use crate::domains::mission::{GeoPosition, Waypoint};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VehicleLinkError {
    #[error("vehicle link disconnected")]
    Disconnected,

    #[error("navigation command rejected: {0}")]
    CommandRejected(String),

    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
}

/// Port to the vehicle command/telemetry link. Both calls are expected to be
/// fast; any error is treated as a navigation fault by the executor.
#[async_trait]
pub trait VehicleLink: Send + Sync {
    async fn send_navigation_command(&self, waypoint: &Waypoint) -> Result<(), VehicleLinkError>;
    async fn current_position(&self) -> Result<GeoPosition, VehicleLinkError>;
}
