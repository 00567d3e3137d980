//! Configuration module for the club admin client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::time::Duration;

use crate::errors::AppError;

/// Default ceiling for image uploads (2 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 2 * 1024 * 1024;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST backend, always ending with `/`
    pub api_url: String,
    /// Base URL that relative image paths are resolved against
    pub upload_url: String,
    /// Largest accepted image attachment in bytes
    pub max_upload_bytes: u64,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Admin credentials used by the console
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let api_url = "http://127.0.0.1:5000/api/".to_string();
        Self {
            upload_url: derive_upload_url(&api_url),
            api_url,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            request_timeout: None,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            admin_username: None,
            admin_password: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let api_url = env::var("CLUB_API_URL")
            .map(|url| with_trailing_slash(&url))
            .unwrap_or(defaults.api_url);

        let upload_url = env::var("CLUB_UPLOAD_URL")
            .map(|url| with_trailing_slash(&url))
            .unwrap_or_else(|_| derive_upload_url(&api_url));

        let max_upload_bytes = match env::var("CLUB_MAX_UPLOAD_BYTES") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                AppError::Config(format!("Invalid CLUB_MAX_UPLOAD_BYTES: {}", raw))
            })?,
            Err(_) => defaults.max_upload_bytes,
        };

        let request_timeout = match env::var("CLUB_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AppError::Config(format!("Invalid CLUB_REQUEST_TIMEOUT_SECS: {}", raw))
                })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        let log_level = env::var("CLUB_LOG_LEVEL").unwrap_or(defaults.log_level);

        let log_format = match env::var("CLUB_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("pretty") | Err(_) => LogFormat::Pretty,
            Ok(other) => {
                return Err(AppError::Config(format!("Invalid CLUB_LOG_FORMAT: {}", other)))
            }
        };

        Ok(Self {
            api_url,
            upload_url,
            max_upload_bytes,
            request_timeout,
            log_level,
            log_format,
            admin_username: env::var("CLUB_ADMIN_USERNAME").ok(),
            admin_password: env::var("CLUB_ADMIN_PASSWORD").ok(),
        })
    }

    /// Resolve an image path stored on a record into a displayable URL.
    ///
    /// Absolute and `data:` URLs pass through. Relative paths are normalized to
    /// forward slashes and placed under `uploads/` on the upload host.
    pub fn resolve_image_url(&self, path: &str) -> String {
        let path = path.trim();
        if path.starts_with("http://") || path.starts_with("https://") || path.starts_with("data:")
        {
            return path.to_string();
        }

        let normalized = path.replace('\\', "/");
        let relative = normalized.trim_start_matches('/');
        if relative.starts_with("uploads/") {
            format!("{}{}", self.upload_url, relative)
        } else {
            format!("{}uploads/{}", self.upload_url, relative)
        }
    }
}

fn with_trailing_slash(url: &str) -> String {
    let url = url.trim();
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

fn derive_upload_url(api_url: &str) -> String {
    match api_url.strip_suffix("api/") {
        Some(base) => base.to_string(),
        None => api_url.to_string(),
    }
}
