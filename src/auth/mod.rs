//! Admin session handling.
//!
//! The dashboard is gated by a bearer token issued by `admin/login` and
//! checked with `admin/verify`; holding a [`Session`] proves nothing until
//! the server has verified it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::AppError;
use crate::resource::RecordId;
use crate::transport::{ApiRequest, RequestBody, Transport};

pub const LOGIN_PATH: &str = "admin/login";
pub const VERIFY_PATH: &str = "admin/verify";
pub const LOGOUT_PATH: &str = "admin/logout";

/// Username and password typed into the login form.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The administrator the token was issued to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminProfile {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(default)]
    pub username: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
    #[serde(default)]
    data: Option<AdminProfile>,
}

/// A logged-in admin session.
#[derive(Clone)]
pub struct Session {
    token: String,
    admin: Option<AdminProfile>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("admin", &self.admin)
            .finish()
    }
}

impl Session {
    /// Exchange credentials for a token.
    pub async fn login<T: Transport>(
        transport: &T,
        credentials: &Credentials,
    ) -> Result<Self, AppError> {
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            return Err(AppError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let body = RequestBody::Json(json!({
            "username": credentials.username.trim(),
            "password": credentials.password,
        }));
        let response = transport
            .send(ApiRequest::post(LOGIN_PATH, body))
            .await?
            .error_for_status()
            .map_err(|e| match e {
                AppError::Unauthorized(msg) | AppError::Server { message: msg, .. }
                    if msg.is_empty() =>
                {
                    AppError::Unauthorized("Invalid credentials".to_string())
                }
                other => other,
            })?;

        let login: LoginResponse = serde_json::from_value(response.body)?;
        let token = login
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Decode("Login response carried no token".to_string()))?;

        tracing::info!("Logged in as {}", credentials.username.trim());
        Ok(Self {
            token,
            admin: login.data,
        })
    }

    /// Resume a session from a stored token. Call [`Session::verify`] before trusting it.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            admin: None,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn admin(&self) -> Option<&AdminProfile> {
        self.admin.as_ref()
    }

    /// Ask the server whether the token is still valid.
    pub async fn verify<T: Transport>(&self, transport: &T) -> Result<bool, AppError> {
        let response = transport
            .send(ApiRequest::get(VERIFY_PATH).with_bearer_token(&self.token))
            .await?;

        match response.status {
            401 | 403 => Ok(false),
            _ => response.error_for_status().map(|_| true),
        }
    }

    /// End the session. The server call is best effort; the token is dropped either way.
    pub async fn logout<T: Transport>(self, transport: &T) {
        let request = ApiRequest::post(LOGOUT_PATH, RequestBody::Empty)
            .with_bearer_token(&self.token);
        match transport.send(request).await {
            Ok(response) if response.is_success() => tracing::info!("Logged out"),
            Ok(response) => tracing::warn!("Logout returned status {}", response.status),
            Err(e) => tracing::warn!("Logout failed: {}", e),
        }
    }
}
