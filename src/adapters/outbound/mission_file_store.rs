use crate::common::{DomainError, DomainResult};
use crate::domains::mission::{Mission, MissionStore};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const MISSION_FILE_EXTENSION: &str = "mission.json";

/// Stores each mission as `<base>/<name>.mission.json`.
pub struct FilesystemMissionStore {
    base: PathBuf,
}

impl FilesystemMissionStore {
    /// Uses `base` when given, then `MISSION_DATA_DIR`, then `./missions`.
    pub fn new(base: Option<PathBuf>) -> Self {
        let base = base.unwrap_or_else(|| match env::var("MISSION_DATA_DIR") {
            Ok(v) if !v.is_empty() => PathBuf::from(v),
            _ => PathBuf::from("missions"),
        });
        Self { base }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path_for(&self, name: &str) -> DomainResult<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(DomainError::InvalidInput {
                reason: format!("invalid mission name '{}'", name),
            });
        }
        Ok(self.base.join(format!("{}.{}", name, MISSION_FILE_EXTENSION)))
    }
}

impl MissionStore for FilesystemMissionStore {
    fn save_mission(&self, name: &str, mission: &Mission) -> DomainResult<()> {
        mission.save(self.path_for(name)?)
    }

    fn load_mission(&self, name: &str) -> DomainResult<Mission> {
        Mission::load(self.path_for(name)?)
    }

    fn list_missions(&self) -> DomainResult<Vec<String>> {
        if !self.base.exists() {
            return Ok(Vec::new());
        }
        let suffix = format!(".{}", MISSION_FILE_EXTENSION);
        let entries = fs::read_dir(&self.base)
            .map_err(|e| DomainError::InfrastructureError(format!("{}", e)))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DomainError::InfrastructureError(format!("{}", e)))?;
            let file_name = entry.file_name();
            if let Some(name) = file_name.to_str().and_then(|n| n.strip_suffix(&suffix)) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_mission(&self, name: &str) -> DomainResult<()> {
        let path = self.path_for(name)?;
        fs::remove_file(&path).map_err(|e| {
            DomainError::InfrastructureError(format!("Failed to delete {}: {}", path.display(), e))
        })
    }
}
