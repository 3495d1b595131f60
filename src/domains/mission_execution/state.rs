use serde::{Deserialize, Serialize};

/// Executor lifecycle state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionState {
    #[default]
    Idle,
    Running,
    Paused,
    Completed,
    Error,
}

impl ExecutionState {
    /// A loop is attached to the run (it may be paused).
    pub fn is_active(&self) -> bool {
        matches!(self, ExecutionState::Running | ExecutionState::Paused)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionState::Completed | ExecutionState::Error)
    }
}

impl std::fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ExecutionState::Idle => "IDLE",
            ExecutionState::Running => "RUNNING",
            ExecutionState::Paused => "PAUSED",
            ExecutionState::Completed => "COMPLETED",
            ExecutionState::Error => "ERROR",
        };
        f.write_str(name)
    }
}
