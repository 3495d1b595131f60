use crate::common::{DomainEvent, EventEnvelope};
use super::events::ExecutionEvent;
use super::projections::MissionProgress;
use tokio::sync::{mpsc, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Consumes execution events (see `MissionExecutor::set_event_sink`) and keeps
/// per-run progress projections for UI queries.
pub struct ExecutionEventActor {
    projection_store: Arc<RwLock<MissionProgressStore>>,
    event_receiver: mpsc::Receiver<ExecutionEvent>,
}

impl ExecutionEventActor {
    pub fn new(event_receiver: mpsc::Receiver<ExecutionEvent>) -> Self {
        Self {
            projection_store: Arc::new(RwLock::new(MissionProgressStore::new())),
            event_receiver,
        }
    }

    /// Shared handle to the projections, usable after `run` has been spawned.
    pub fn store(&self) -> Arc<RwLock<MissionProgressStore>> {
        self.projection_store.clone()
    }

    pub async fn run(&mut self) {
        while let Some(event) = self.event_receiver.recv().await {
            if let Err(e) = self.handle_event(event).await {
                tracing::error!("Failed to handle execution event: {}", e);
            }
        }
    }

    async fn handle_event(&self, event: ExecutionEvent) -> Result<(), String> {
        let envelope = EventEnvelope::new(&event, "MissionRun", "ExecutionEventActor")
            .map_err(|e| format!("Failed to create event envelope: {}", e))?;

        self.projection_store.write().await.apply_event(&event);

        tracing::debug!(
            event_id = %envelope.event_id,
            payload = %envelope.event_data,
            "execution event"
        );
        tracing::info!("Handled execution event: {:?}", event.event_type());
        Ok(())
    }

    pub async fn get_progress(&self, run_id: &str) -> Option<MissionProgress> {
        let store = self.projection_store.read().await;
        store.progress.get(run_id).cloned()
    }
}

#[derive(Debug, Default)]
pub struct MissionProgressStore {
    pub progress: HashMap<String, MissionProgress>,
}

impl MissionProgressStore {
    pub fn new() -> Self {
        Self {
            progress: HashMap::new(),
        }
    }

    pub fn apply_event(&mut self, event: &ExecutionEvent) {
        let run_id = event.aggregate_id().to_string();
        self.progress
            .entry(run_id.clone())
            .or_insert_with(|| MissionProgress::new(run_id, event.occurred_at()))
            .apply_event(event);
    }
}
