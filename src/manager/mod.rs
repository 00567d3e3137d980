//! Generic resource manager behind every admin screen.
//!
//! A [`ResourceManager`] composes the collection [`Store`], the [`Draft`]
//! form controller and the delete [`ConfirmationGate`] for one resource.

mod draft;
mod gate;
mod honors;
mod store;

pub use draft::{Draft, Submission};
pub use gate::{ConfirmationGate, GateState};
pub use store::Store;

use std::sync::Arc;

use crate::attachment::LocalFile;
use crate::config::Config;
use crate::errors::AppError;
use crate::resource::{RecordId, Resource, ResourceClient};
use crate::transport::Transport;

/// State and operations of one admin management screen.
pub struct ResourceManager<R: Resource, T: Transport> {
    client: ResourceClient<R, T>,
    store: Store<R>,
    draft: Draft<R>,
    gate: ConfirmationGate,
}

impl<R: Resource, T: Transport> ResourceManager<R, T> {
    pub fn new(transport: T, config: Arc<Config>) -> Self {
        Self {
            client: ResourceClient::new(transport),
            store: Store::new(),
            draft: Draft::new(config),
            gate: ConfirmationGate::new(),
        }
    }

    pub fn client(&self) -> &ResourceClient<R, T> {
        &self.client
    }

    pub fn store(&self) -> &Store<R> {
        &self.store
    }

    pub fn draft(&self) -> &Draft<R> {
        &self.draft
    }

    pub fn gate(&self) -> &ConfirmationGate {
        &self.gate
    }

    /// Initial load when the screen opens.
    pub async fn mount(&mut self) -> Result<(), AppError> {
        self.store.load(&self.client).await
    }

    /// Manual retry after a failed load.
    pub async fn reload(&mut self) -> Result<(), AppError> {
        self.store.load(&self.client).await
    }

    pub fn start_create(&mut self) {
        self.draft.start_create();
    }

    /// Edit the stored record with `id`.
    pub fn start_edit(&mut self, id: &RecordId) -> Result<(), AppError> {
        let record = self.store.get(id).ok_or_else(|| {
            AppError::Validation(format!("No {} with id {}", R::SINGULAR, id))
        })?;
        self.draft.start_edit(record)
    }

    /// Edit an arbitrary record, e.g. one fetched on a detail page.
    pub fn start_edit_record(&mut self, record: &R::Record) -> Result<(), AppError> {
        self.draft.start_edit(record)
    }

    /// For single-record resources: edit the first record, or create one.
    pub fn edit_singleton(&mut self) -> Result<(), AppError> {
        match self.store.first() {
            Some(record) => self.draft.start_edit(record),
            None => {
                self.draft.start_create();
                Ok(())
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.draft.cancel_edit();
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), AppError> {
        self.draft.set_field(name, value)
    }

    pub fn set_file(&mut self, file: LocalFile) -> Result<(), AppError> {
        self.draft.set_file(file)
    }

    pub async fn submit(&mut self) -> Result<(), AppError> {
        self.draft.submit(&self.client, &mut self.store).await
    }

    pub fn request_delete(&mut self, id: RecordId) {
        self.gate.request_delete(id);
    }

    pub async fn confirm_delete(&mut self) -> Result<Option<RecordId>, AppError> {
        self.gate.confirm(&self.client, &mut self.store).await
    }

    pub fn cancel_delete(&mut self) {
        self.gate.cancel();
    }
}
