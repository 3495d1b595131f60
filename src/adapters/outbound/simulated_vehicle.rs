use crate::domains::mission::{GeoPosition, Waypoint};
use crate::domains::mission_execution::{VehicleLink, VehicleLinkError};
use crate::domains::route_optimization::{horizontal_distance, METERS_PER_DEGREE};
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Instant;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub horizontal_speed: f64,
    pub vertical_speed: f64,
    /// Multiplier on wall-clock time, e.g. 10.0 flies ten times faster.
    pub time_scale: f64,
    /// Uniform GPS jitter in meters applied to reported positions.
    pub position_noise_m: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizontal_speed: 15.0,
            vertical_speed: 5.0,
            time_scale: 10.0,
            position_noise_m: 0.0,
        }
    }
}

struct SimState {
    position: GeoPosition,
    target: Option<GeoPosition>,
    last_update: Instant,
    commands_sent: usize,
    fail_after: Option<usize>,
    disconnected: bool,
}

/// Vehicle stand-in that flies straight toward the last commanded waypoint.
///
/// Position is integrated lazily from elapsed time whenever it is queried.
pub struct SimulatedVehicleLink {
    config: SimulationConfig,
    state: Mutex<SimState>,
}

impl SimulatedVehicleLink {
    pub fn new(start: GeoPosition, config: SimulationConfig) -> Self {
        Self {
            config,
            state: Mutex::new(SimState {
                position: start,
                target: None,
                last_update: Instant::now(),
                commands_sent: 0,
                fail_after: None,
                disconnected: false,
            }),
        }
    }

    pub fn commands_sent(&self) -> usize {
        self.lock().commands_sent
    }

    /// Reject every navigation command after `count` accepted ones.
    pub fn fail_after(&self, count: usize) {
        self.lock().fail_after = Some(count);
    }

    pub fn set_disconnected(&self, disconnected: bool) {
        self.lock().disconnected = disconnected;
    }

    /// Noise-free simulated position.
    pub fn true_position(&self) -> GeoPosition {
        let mut state = self.lock();
        self.advance(&mut state);
        state.position
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn advance(&self, state: &mut SimState) {
        let now = Instant::now();
        let dt = now.duration_since(state.last_update).as_secs_f64() * self.config.time_scale;
        state.last_update = now;

        let Some(target) = state.target else {
            return;
        };

        let remaining = horizontal_distance(&state.position, &target);
        let step = self.config.horizontal_speed * dt;
        if remaining <= step || remaining == 0.0 {
            state.position.latitude = target.latitude;
            state.position.longitude = target.longitude;
        } else {
            let fraction = step / remaining;
            state.position.latitude += (target.latitude - state.position.latitude) * fraction;
            state.position.longitude += (target.longitude - state.position.longitude) * fraction;
        }

        let climb = target.altitude - state.position.altitude;
        let vertical_step = self.config.vertical_speed * dt;
        if climb.abs() <= vertical_step {
            state.position.altitude = target.altitude;
        } else {
            state.position.altitude += vertical_step * climb.signum();
        }
    }

    fn jitter(&self, position: GeoPosition) -> GeoPosition {
        let noise = self.config.position_noise_m;
        if !noise.is_finite() || noise <= 0.0 {
            return position;
        }
        let mut rng = rand::thread_rng();
        let north = rng.gen_range(-noise..noise);
        let east = rng.gen_range(-noise..noise);
        let lon_scale = position.latitude.to_radians().cos().abs().max(1e-6);
        GeoPosition {
            latitude: position.latitude + north / METERS_PER_DEGREE,
            longitude: position.longitude + east / (METERS_PER_DEGREE * lon_scale),
            altitude: position.altitude + rng.gen_range(-noise..noise) * 0.5,
        }
    }
}

#[async_trait]
impl VehicleLink for SimulatedVehicleLink {
    async fn send_navigation_command(&self, waypoint: &Waypoint) -> Result<(), VehicleLinkError> {
        let mut state = self.lock();
        if state.disconnected {
            return Err(VehicleLinkError::Disconnected);
        }
        if let Some(limit) = state.fail_after {
            if state.commands_sent >= limit {
                return Err(VehicleLinkError::CommandRejected(format!(
                    "simulated rejection of waypoint {}",
                    waypoint.seq
                )));
            }
        }

        self.advance(&mut state);
        state.target = Some(waypoint.position());
        state.commands_sent += 1;
        Ok(())
    }

    async fn current_position(&self) -> Result<GeoPosition, VehicleLinkError> {
        let position = {
            let mut state = self.lock();
            if state.disconnected {
                return Err(VehicleLinkError::Disconnected);
            }
            self.advance(&mut state);
            state.position
        };
        Ok(self.jitter(position))
    }
}
