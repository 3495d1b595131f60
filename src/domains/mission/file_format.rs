//! On-disk mission document.
//!
//! A mission file is a pretty-printed JSON object holding the metadata and the
//! ordered waypoint records. Floats are written with enough precision to read
//! back bit-identical, so `load(save(m)) == m`.

use crate::common::{DomainError, DomainResult};
use super::aggregate::{ConstraintSet, Mission, Objective, Waypoint};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MISSION_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissionFile {
    pub format_version: u32,
    pub id: String,
    pub name: String,
    pub objective: Objective,
    pub constraints: ConstraintSet,
    pub waypoints: Vec<Waypoint>,
}

impl From<&Mission> for MissionFile {
    fn from(mission: &Mission) -> Self {
        Self {
            format_version: MISSION_FORMAT_VERSION,
            id: mission.id.clone(),
            name: mission.name.clone(),
            objective: mission.objective(),
            constraints: mission.constraints().clone(),
            waypoints: mission.waypoints().to_vec(),
        }
    }
}

impl MissionFile {
    pub fn into_mission(self) -> DomainResult<Mission> {
        if self.format_version != MISSION_FORMAT_VERSION {
            return Err(DomainError::InvalidInput {
                reason: format!("unsupported mission format version {}", self.format_version),
            });
        }
        Mission::from_parts(self.id, self.name, self.waypoints, self.objective, self.constraints)
    }
}

impl Mission {
    pub fn to_json(&self) -> DomainResult<String> {
        Ok(serde_json::to_string_pretty(&MissionFile::from(self))?)
    }

    pub fn from_json(json: &str) -> DomainResult<Self> {
        let file: MissionFile = serde_json::from_str(json)?;
        file.into_mission()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> DomainResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| DomainError::InfrastructureError(format!("{}", e)))?;
            }
        }
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| {
            DomainError::InfrastructureError(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> DomainResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            DomainError::InfrastructureError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }
}
