//! Confirmation gate guarding deletes.
//!
//! `Idle -> AwaitingConfirmation { target } -> Idle`. Only `confirm` reaches
//! the network.

use super::store::Store;
use crate::errors::AppError;
use crate::resource::{RecordId, Resource, ResourceClient};
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Idle,
    AwaitingConfirmation {
        target: RecordId,
    },
}

/// Two-step delete confirmation for one manager screen.
#[derive(Debug, Default)]
pub struct ConfirmationGate {
    state: GateState,
    error: Option<String>,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Record waiting for confirmation, if any.
    pub fn pending(&self) -> Option<&RecordId> {
        match &self.state {
            GateState::AwaitingConfirmation { target } => Some(target),
            GateState::Idle => None,
        }
    }

    pub fn is_awaiting(&self) -> bool {
        self.pending().is_some()
    }

    /// Message from the last failed delete.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Open the confirmation for `id`. A pending target is replaced.
    pub fn request_delete(&mut self, id: RecordId) {
        self.error = None;
        self.state = GateState::AwaitingConfirmation { target: id };
    }

    /// Dismiss the confirmation without deleting anything.
    pub fn cancel(&mut self) {
        self.state = GateState::Idle;
    }

    /// Delete the pending record and sync `store`.
    ///
    /// Returns the deleted id, or `None` when nothing was pending. On failure
    /// the gate returns to idle and the list is untouched.
    pub async fn confirm<R: Resource, T: Transport>(
        &mut self,
        client: &ResourceClient<R, T>,
        store: &mut Store<R>,
    ) -> Result<Option<RecordId>, AppError> {
        let target = match std::mem::take(&mut self.state) {
            GateState::AwaitingConfirmation { target } => target,
            GateState::Idle => return Ok(None),
        };

        match client.delete(&target).await {
            Ok(()) => {
                tracing::info!("Deleted {} {}", R::SINGULAR, target);
                self.error = None;
                store.sync_deleted(client, &target).await;
                Ok(Some(target))
            }
            Err(e) => {
                tracing::warn!("Failed to delete {} {}: {}", R::SINGULAR, target, e);
                self.error = Some(e.user_message(&format!("Failed to delete {}", R::SINGULAR)));
                Err(e)
            }
        }
    }
}
