//! Image attachments picked from the local machine.
//!
//! A draft holds at most one pending [`LocalFile`]; the record it edits may
//! already carry a remote image path. [`Preview`] tells the two apart.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::errors::AppError;

/// A file waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, detecting its MIME type from its content and
    /// falling back to its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let mime_type = sniff_image_mime(&bytes)
            .or_else(|| mime_from_extension(&file_name))
            .unwrap_or("application/octet-stream")
            .to_string();

        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Encode the file as a `data:` URL suitable for an `<img>` preview.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// What the form shows next to the file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Image already stored on the server
    Remote(String),
    /// Image picked locally, not yet uploaded
    Local(String),
}

impl Preview {
    pub fn url(&self) -> &str {
        match self {
            Preview::Remote(url) | Preview::Local(url) => url,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Preview::Local(_))
    }
}

/// Check an attachment against the accepted type and size ceiling.
pub fn validate_image(file: &LocalFile, max_bytes: u64) -> Result<(), AppError> {
    if !file.is_image() {
        return Err(AppError::Validation(format!(
            "{} is not an image file",
            file.file_name
        )));
    }
    if file.bytes.is_empty() {
        return Err(AppError::Validation(format!("{} is empty", file.file_name)));
    }
    if file.size() > max_bytes {
        return Err(AppError::Validation(format!(
            "Image must be smaller than {}",
            human_size(max_bytes)
        )));
    }
    Ok(())
}

fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        _ => None,
    }
}

fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "pdf" => Some("application/pdf"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

fn human_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 && bytes % (1024 * 1024) == 0 {
        format!("{}MB", bytes / (1024 * 1024))
    } else if bytes >= 1024 {
        format!("{}KB", bytes / 1024)
    } else {
        format!("{}B", bytes)
    }
}
