use super::types::GeoPosition;
use crate::common::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// Inequality constraints checked against a planned route.
///
/// They are properties of the point set (plus consecutive spacing), so the
/// optimizer reports them rather than searching around them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConstraintSet {
    pub max_altitude: f64,
    pub min_inter_waypoint_distance: f64,
    #[serde(default)]
    pub max_radius: Option<f64>,
    /// Center for `max_radius`; the first waypoint is used when unset.
    #[serde(default)]
    pub reference: Option<GeoPosition>,
}

impl ConstraintSet {
    pub fn new(max_altitude: f64, min_inter_waypoint_distance: f64) -> Self {
        Self {
            max_altitude,
            min_inter_waypoint_distance,
            max_radius: None,
            reference: None,
        }
    }

    pub fn with_max_radius(mut self, radius: f64, reference: Option<GeoPosition>) -> Self {
        self.max_radius = Some(radius);
        self.reference = reference;
        self
    }

    /// Every bound must be a finite number so the set survives a JSON round trip.
    pub fn validate(&self) -> DomainResult<()> {
        if !self.max_altitude.is_finite() {
            return Err(invalid(format!("max altitude {} is not finite", self.max_altitude)));
        }
        let spacing = self.min_inter_waypoint_distance;
        if !spacing.is_finite() || spacing < 0.0 {
            return Err(invalid(format!("minimum waypoint spacing {} must be >= 0", spacing)));
        }
        if let Some(radius) = self.max_radius {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(invalid(format!("max radius {} must be > 0", radius)));
            }
        }
        if let Some(reference) = &self.reference {
            let lat_ok = (-90.0..=90.0).contains(&reference.latitude);
            let lon_ok = (-180.0..=180.0).contains(&reference.longitude);
            if !lat_ok || !lon_ok || !reference.altitude.is_finite() {
                return Err(invalid(format!("reference position {:?} is not valid", reference)));
            }
        }
        Ok(())
    }
}

fn invalid(reason: String) -> DomainError {
    DomainError::InvalidInput { reason }
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self::new(120.0, 5.0)
    }
}
