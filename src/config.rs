use crate::adapters::outbound::SimulationConfig;
use crate::domains::mission_execution::ExecutorConfig;
use crate::domains::route_optimization::{CoverageParams, OptimizerConfig, VehicleProfile};
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub optimizer: OptimizerSection,
    pub vehicle: VehicleProfile,
    pub coverage: CoverageParams,
    pub executor: ExecutorSection,
    pub simulation: SimulationConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OptimizerSection {
    pub max_passes: usize,
    pub max_duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExecutorSection {
    pub tick_interval_ms: u64,
    pub reach_threshold_m: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Falls back to `MISSION_DATA_DIR`, then `./missions`.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// fast_log output file; domain logs go to tracing only when unset.
    pub file: Option<String>,
    pub level: String,
}

impl Default for OptimizerSection {
    fn default() -> Self {
        Self {
            max_passes: 1000,
            max_duration_ms: 5000,
        }
    }
}

impl Default for ExecutorSection {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            reach_threshold_m: 10.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.executor.tick_interval_ms > 0, "executor.tick_interval_ms must be positive");
        positive("executor.reach_threshold_m", self.executor.reach_threshold_m)?;
        positive("vehicle.horizontal_speed", self.vehicle.horizontal_speed)?;
        positive("vehicle.vertical_speed", self.vehicle.vertical_speed)?;
        non_negative("vehicle.base_power", self.vehicle.base_power)?;
        positive("coverage.grid_spacing", self.coverage.grid_spacing)?;
        non_negative("coverage.radius", self.coverage.radius)?;
        ensure!(self.coverage.max_cells > 0, "coverage.max_cells must be positive");
        positive("simulation.horizontal_speed", self.simulation.horizontal_speed)?;
        positive("simulation.vertical_speed", self.simulation.vertical_speed)?;
        positive("simulation.time_scale", self.simulation.time_scale)?;
        non_negative("simulation.position_noise_m", self.simulation.position_noise_m)?;
        Ok(())
    }

    pub fn optimizer_config(&self) -> OptimizerConfig {
        OptimizerConfig {
            max_passes: self.optimizer.max_passes,
            max_duration: Duration::from_millis(self.optimizer.max_duration_ms),
            vehicle: self.vehicle,
            coverage: self.coverage,
        }
    }

    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            tick_interval: Duration::from_millis(self.executor.tick_interval_ms),
            reach_threshold_m: self.executor.reach_threshold_m,
        }
    }
}

fn positive(key: &str, value: f64) -> Result<()> {
    ensure!(value.is_finite() && value > 0.0, "{} must be > 0, got {}", key, value);
    Ok(())
}

fn non_negative(key: &str, value: f64) -> Result<()> {
    ensure!(value.is_finite() && value >= 0.0, "{} must be >= 0, got {}", key, value);
    Ok(())
}
