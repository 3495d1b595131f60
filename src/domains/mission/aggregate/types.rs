use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandKind {
    Waypoint,
    Takeoff,
    Land,
    Rtl,
    Loiter,
    Roi,
}

impl Default for CommandKind {
    fn default() -> Self {
        CommandKind::Waypoint
    }
}

/// How `altitude` is referenced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AltitudeFrame {
    /// Relative to the home/launch altitude
    Relative,
    /// Above mean sea level
    Absolute,
}

impl Default for AltitudeFrame {
    fn default() -> Self {
        AltitudeFrame::Relative
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl GeoPosition {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self { latitude, longitude, altitude }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Waypoint {
    pub seq: usize,
    pub command: CommandKind,
    pub params: [f64; 4],
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    #[serde(default)]
    pub frame: AltitudeFrame,
    #[serde(default)]
    pub hold_time: Option<f64>,
}

impl Waypoint {
    /// Plain navigation waypoint; `seq` is assigned when added to a mission.
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            seq: 0,
            command: CommandKind::Waypoint,
            params: [0.0; 4],
            latitude,
            longitude,
            altitude,
            frame: AltitudeFrame::Relative,
            hold_time: None,
        }
    }

    pub fn with_command(mut self, command: CommandKind) -> Self {
        self.command = command;
        self
    }

    pub fn with_params(mut self, params: [f64; 4]) -> Self {
        self.params = params;
        self
    }

    pub fn with_frame(mut self, frame: AltitudeFrame) -> Self {
        self.frame = frame;
        self
    }

    pub fn with_hold_time(mut self, seconds: f64) -> Self {
        self.hold_time = Some(seconds);
        self
    }

    /// Hold time in seconds, zero when none is declared.
    pub fn hold_seconds(&self) -> f64 {
        self.hold_time.unwrap_or(0.0)
    }

    pub fn position(&self) -> GeoPosition {
        GeoPosition::new(self.latitude, self.longitude, self.altitude)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(invalid(format!("latitude {} outside [-90, 90]", self.latitude)));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(invalid(format!("longitude {} outside [-180, 180]", self.longitude)));
        }
        if !self.altitude.is_finite() {
            return Err(invalid(format!("altitude {} is not finite", self.altitude)));
        }
        if self.params.iter().any(|p| !p.is_finite()) {
            return Err(invalid("command parameters must be finite".to_string()));
        }
        if let Some(hold) = self.hold_time {
            if !hold.is_finite() || hold < 0.0 {
                return Err(invalid(format!("hold time {} must be >= 0", hold)));
            }
        }
        Ok(())
    }
}

fn invalid(reason: String) -> DomainError {
    DomainError::InvalidInput { reason }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Objective {
    MinDistance,
    MinTime,
    MinEnergy,
    MaxCoverage,
}

impl Default for Objective {
    fn default() -> Self {
        Objective::MinDistance
    }
}
