//! Per-resource REST adapter.
//!
//! Knows a resource's routes and envelope so callers deal in typed records
//! instead of response shapes.

use std::marker::PhantomData;

use serde_json::Value;

use super::{RecordId, Resource, Routes};
use crate::errors::AppError;
use crate::transport::{ApiRequest, ApiResponse, RequestBody, Transport};

/// Issues the four collection calls for resource `R`.
pub struct ResourceClient<R: Resource, T: Transport> {
    transport: T,
    routes: Routes,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource, T: Transport> ResourceClient<R, T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            routes: R::routes(),
            _resource: PhantomData,
        }
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a request and fail on any non-2xx status.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        self.transport.send(request).await?.error_for_status()
    }

    /// GET the whole collection.
    pub async fn list(&self) -> Result<Vec<R::Record>, AppError> {
        let response = self.send(ApiRequest::get(self.routes.list.clone())).await?;

        let items = R::envelope()
            .collection_items(&response.body)
            .ok_or_else(|| {
                AppError::Decode(format!("Unexpected {} response shape", R::PLURAL))
            })?;

        items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(AppError::from))
            .collect()
    }

    /// POST a new record; returns the created record when the server echoes it.
    pub async fn create(&self, body: RequestBody) -> Result<Option<R::Record>, AppError> {
        let response = self
            .send(ApiRequest::post(self.routes.create.clone(), body))
            .await?;
        Ok(self.decode_record(&response.body))
    }

    /// PUT an update; returns the updated record when the server echoes it.
    pub async fn update(
        &self,
        id: &RecordId,
        body: RequestBody,
    ) -> Result<Option<R::Record>, AppError> {
        let response = self
            .send(ApiRequest::put(self.routes.update_path(id), body))
            .await?;
        Ok(self.decode_record(&response.body))
    }

    /// DELETE a record. The response body is ignored.
    pub async fn delete(&self, id: &RecordId) -> Result<(), AppError> {
        self.send(ApiRequest::delete(self.routes.delete_path(id)))
            .await?;
        Ok(())
    }

    fn decode_record(&self, body: &Value) -> Option<R::Record> {
        let item = R::envelope().record_item(body)?;
        match serde_json::from_value(item.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Ignoring malformed {} in response: {}", R::SINGULAR, e);
                None
            }
        }
    }
}
