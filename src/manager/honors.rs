//! Honors-specific action: recording another win for a tournament.

use chrono::NaiveDate;
use serde_json::{json, Value};

use super::ResourceManager;
use crate::errors::AppError;
use crate::models::Honors;
use crate::resource::{fields_from_value, RecordId, Resource};
use crate::transport::{RequestBody, Transport};

impl<T: Transport> ResourceManager<Honors, T> {
    /// Increment the win count of honor `id` and set its last win date to `on`.
    ///
    /// Sent as a regular update, so the draft being edited is left alone.
    pub async fn record_win(&mut self, id: &RecordId, on: NaiveDate) -> Result<(), AppError> {
        let honor = self
            .store
            .get(id)
            .ok_or_else(|| AppError::Validation(format!("No honor with id {}", id)))?;

        let win_count = honor.win_count.checked_add(1).ok_or_else(|| {
            AppError::Validation(format!("Win count of honor {} cannot be increased", id))
        })?;

        let mut fields = fields_from_value(Honors::fields(), &serde_json::to_value(honor)?);
        fields.insert("winCount".to_string(), json!(win_count));
        fields.insert(
            "lastWinDate".to_string(),
            Value::String(on.format("%Y-%m-%d").to_string()),
        );

        match self
            .client
            .update(id, RequestBody::Json(Value::Object(fields)))
            .await
        {
            Ok(updated) => {
                tracing::info!("Recorded a win for honor {}", id);
                self.store.sync_updated(&self.client, id, updated).await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to record win for honor {}: {}", id, e);
                self.store.set_error(e.user_message("Failed to record win"));
                Err(e)
            }
        }
    }
}
