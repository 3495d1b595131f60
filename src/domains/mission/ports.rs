use crate::common::DomainResult;
use super::aggregate::Mission;

/// Port for persisting missions by name (filesystem, database, vehicle download...).
pub trait MissionStore: Send + Sync {
    fn save_mission(&self, name: &str, mission: &Mission) -> DomainResult<()>;
    fn load_mission(&self, name: &str) -> DomainResult<Mission>;
    /// Names of the stored missions, sorted.
    fn list_missions(&self) -> DomainResult<Vec<String>>;
    fn delete_mission(&self, name: &str) -> DomainResult<()>;
}
