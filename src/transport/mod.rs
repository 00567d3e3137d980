//! Transport abstraction between the resource managers and the REST backend.
//!
//! Managers only see [`ApiRequest`] and [`ApiResponse`]; [`HttpTransport`]
//! is the production implementation.

mod http;

pub use http::HttpTransport;

use std::future::Future;

use serde_json::Value;

use crate::attachment::LocalFile;
use crate::errors::{AppError, ErrorBody};

/// HTTP methods used by the backend contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Multipart payload: text fields plus at most one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    pub fields: Vec<(String, String)>,
    pub file: Option<(String, LocalFile)>,
}

impl FormPayload {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(FormPayload),
}

/// A request relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, e.g. `members/update/42`
    pub path: String,
    pub body: RequestBody,
    /// Overrides the transport's own bearer token for this request
    pub bearer_token: Option<String>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: RequestBody::Empty,
            bearer_token: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: RequestBody::Empty,
            bearer_token: None,
        }
    }

    pub fn post(path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body,
            bearer_token: None,
        }
    }

    pub fn put(path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            body,
            bearer_token: None,
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

/// A response with its body parsed as JSON (`Null` when empty or not JSON).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into the error the server described.
    pub fn error_for_status(self) -> Result<Self, AppError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ErrorBody::from_value(&self.body).into_error(self.status))
        }
    }
}

/// Sends requests to the backend.
///
/// Implementations return `Ok` for every response the server produced,
/// whatever its status; `Err` means the request never completed.
pub trait Transport {
    fn send(&self, request: ApiRequest)
        -> impl Future<Output = Result<ApiResponse, AppError>> + Send;
}

impl<T: Transport + Sync> Transport for &T {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, AppError>> + Send {
        (**self).send(request)
    }
}
