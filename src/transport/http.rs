//! reqwest-backed transport.

use std::future::Future;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;

use super::{ApiRequest, ApiResponse, Method, RequestBody, Transport};
use crate::config::Config;
use crate::errors::AppError;

/// Transport talking to the backend over HTTP.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Config(format!("Could not build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            bearer_token: None,
        })
    }

    /// A transport sending `Authorization: Bearer <token>` with every request.
    pub fn with_bearer_token(&self, token: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            bearer_token: Some(token.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    fn auth_headers(&self, request_token: Option<&str>) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = request_token.or(self.bearer_token.as_deref()) {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| AppError::Config(format!("Invalid auth header: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let url = self.url(&request.path);
        tracing::debug!("{} {}", request.method.as_str(), url);

        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        }
        .headers(self.auth_headers(request.bearer_token.as_deref())?);

        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(payload) => {
                let mut form = Form::new();
                for (name, value) in payload.fields {
                    form = form.text(name, value);
                }
                if let Some((field, file)) = payload.file {
                    let part = Part::bytes(file.bytes)
                        .file_name(file.file_name)
                        .mime_str(&file.mime_type)
                        .map_err(|e| AppError::Validation(format!("Invalid MIME type: {}", e)))?;
                    form = form.part(field, part);
                }
                builder.multipart(form)
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        tracing::debug!("{} {} -> {}", request.method.as_str(), url, status);
        Ok(ApiResponse { status, body })
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, AppError>> + Send {
        self.execute(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let transport = HttpTransport::new(&Config::default()).unwrap();
        assert_eq!(
            transport.url("members/update/7"),
            "http://127.0.0.1:5000/api/members/update/7"
        );
        assert_eq!(
            transport.url("/players/get"),
            "http://127.0.0.1:5000/api/players/get"
        );
    }

    #[test]
    fn test_bearer_header() {
        let transport = HttpTransport::new(&Config::default())
            .unwrap()
            .with_bearer_token("abc");
        let headers = transport.auth_headers(None).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");

        let headers = transport.auth_headers(Some("xyz")).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer xyz");
    }
}
