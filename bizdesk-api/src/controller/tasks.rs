use chrono::Utc;
use shared_types::TaskStatusChange;
use tracing::{error, info};

use super::Controller;
use crate::entities::{Entity, Tasks};
use crate::error::{ControllerError, GatewayError};

impl Controller<Tasks> {
    /// Flips a loaded task between pending and completed, then reloads.
    pub async fn toggle_status(&self, id: &str) -> Result<TaskStatusChange, ControllerError> {
        let generation = self.generation();
        let change = self
            .with_state(|state| {
                state
                    .collection
                    .iter()
                    .find(|task| task.id == id)
                    .map(|task| task.toggle(Utc::now()))
            })
            .ok_or_else(|| ControllerError::NotFound {
                noun: Tasks::NOUN,
                id: id.to_string(),
            })?;

        let patch = serde_json::to_value(&change).map_err(GatewayError::from)?;
        if let Err(e) = self.session.gateway().update(Tasks::TABLE, id, patch).await {
            error!("Failed to update task {} status: {}", id, e);
            return Err(e.into());
        }
        info!("Task {} is now {}", id, change.status.as_str());

        self.reload_after_write(generation).await;
        Ok(change)
    }
}
