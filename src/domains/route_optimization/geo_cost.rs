//! Stateless geodesy and cost helpers shared by the optimizer and the executor.

use crate::domains::mission::{GeoPosition, Waypoint};
use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Meters per degree of latitude used for grid rasterization.
pub const METERS_PER_DEGREE: f64 = 111_111.0;

const CLIMB_POWER_FACTOR: f64 = 1.5;
const DESCENT_POWER_FACTOR: f64 = 0.8;

/// Nominal vehicle performance used by the time and energy costs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VehicleProfile {
    /// m/s
    pub horizontal_speed: f64,
    /// m/s
    pub vertical_speed: f64,
    /// W, hover power
    pub base_power: f64,
}

impl Default for VehicleProfile {
    fn default() -> Self {
        Self {
            horizontal_speed: 15.0,
            vertical_speed: 5.0,
            base_power: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoverageParams {
    /// Cell size in meters
    pub grid_spacing: f64,
    /// Sensor footprint radius in meters
    pub radius: f64,
    /// Upper bound on rasterized cells; the spacing grows until the grid fits.
    pub max_cells: usize,
}

impl Default for CoverageParams {
    fn default() -> Self {
        Self {
            grid_spacing: 5.0,
            radius: 20.0,
            max_cells: 250_000,
        }
    }
}

/// Great-circle surface distance in meters.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push `a` marginally past 1 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

pub fn horizontal_distance(a: &GeoPosition, b: &GeoPosition) -> f64 {
    haversine_distance(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Horizontal and vertical legs combined as orthogonal components.
pub fn distance_3d(a: &GeoPosition, b: &GeoPosition) -> f64 {
    let horizontal = horizontal_distance(a, b);
    let vertical = b.altitude - a.altitude;
    (horizontal * horizontal + vertical * vertical).sqrt()
}

/// Seconds to fly `a -> b`, including the hold declared at `a`.
pub fn travel_time(a: &Waypoint, b: &Waypoint, profile: &VehicleProfile) -> f64 {
    let horizontal = horizontal_distance(&a.position(), &b.position());
    let vertical = (b.altitude - a.altitude).abs();
    horizontal / profile.horizontal_speed + vertical / profile.vertical_speed + a.hold_seconds()
}

/// Joules to fly `a -> b`, including the hover energy of the hold at `a`.
pub fn travel_energy(a: &Waypoint, b: &Waypoint, profile: &VehicleProfile) -> f64 {
    let horizontal = horizontal_distance(&a.position(), &b.position());
    let climb = b.altitude - a.altitude;
    let vertical_power = if climb > 0.0 {
        profile.base_power * CLIMB_POWER_FACTOR
    } else {
        profile.base_power * DESCENT_POWER_FACTOR
    };

    profile.base_power * (horizontal / profile.horizontal_speed)
        + vertical_power * (climb.abs() / profile.vertical_speed)
        + profile.base_power * a.hold_seconds()
}

pub fn route_distance(route: &[Waypoint]) -> f64 {
    route
        .windows(2)
        .map(|leg| horizontal_distance(&leg[0].position(), &leg[1].position()))
        .sum()
}

/// Total flight time; every waypoint's hold counts exactly once.
pub fn route_time(route: &[Waypoint], profile: &VehicleProfile) -> f64 {
    let legs: f64 = route.windows(2).map(|leg| travel_time(&leg[0], &leg[1], profile)).sum();
    legs + route.last().map(Waypoint::hold_seconds).unwrap_or(0.0)
}

pub fn route_energy(route: &[Waypoint], profile: &VehicleProfile) -> f64 {
    let legs: f64 = route.windows(2).map(|leg| travel_energy(&leg[0], &leg[1], profile)).sum();
    let final_hold = route.last().map(Waypoint::hold_seconds).unwrap_or(0.0);
    legs + profile.base_power * final_hold
}

/// Number of grid cells in the route's bounding box that lie within
/// `params.radius` of at least one route point.
pub fn coverage_score(route: &[Waypoint], params: &CoverageParams) -> usize {
    if route.is_empty() || params.grid_spacing <= 0.0 {
        return 0;
    }

    let (mut min_lat, mut max_lat) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_lon, mut max_lon) = (f64::INFINITY, f64::NEG_INFINITY);
    for wp in route {
        min_lat = min_lat.min(wp.latitude);
        max_lat = max_lat.max(wp.latitude);
        min_lon = min_lon.min(wp.longitude);
        max_lon = max_lon.max(wp.longitude);
    }

    let lon_scale = min_lat.to_radians().cos().abs().max(1e-6);
    let mut spacing = params.grid_spacing;
    let (rows, cols) = loop {
        let d_lat = spacing / METERS_PER_DEGREE;
        let d_lon = spacing / (METERS_PER_DEGREE * lon_scale);
        let rows = (((max_lat - min_lat) / d_lat).ceil() as usize).max(1);
        let cols = (((max_lon - min_lon) / d_lon).ceil() as usize).max(1);
        if rows.saturating_mul(cols) <= params.max_cells.max(1) {
            break (rows, cols);
        }
        spacing *= 2.0;
    };

    let d_lat = spacing / METERS_PER_DEGREE;
    let d_lon = spacing / (METERS_PER_DEGREE * lon_scale);
    let mut covered = 0;
    for row in 0..rows {
        let lat = min_lat + (row as f64 + 0.5) * d_lat;
        for col in 0..cols {
            let lon = min_lon + (col as f64 + 0.5) * d_lon;
            if route
                .iter()
                .any(|wp| haversine_distance(lat, lon, wp.latitude, wp.longitude) <= params.radius)
            {
                covered += 1;
            }
        }
    }
    covered
}
