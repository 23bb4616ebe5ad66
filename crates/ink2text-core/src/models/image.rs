//! Encoded image handed to the extraction client.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Ink2TextError, Result};

/// An encoded image together with its MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// Encoded image bytes (JPEG, PNG, ...).
    pub bytes: Vec<u8>,
    /// MIME type, e.g. `image/jpeg`.
    pub mime_type: String,
    /// Original file name, if the image came from a file.
    pub file_name: Option<String>,
}

impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("len", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

impl ImagePayload {
    /// Build a payload from bytes, sniffing the MIME type when none is given.
    pub fn new(bytes: Vec<u8>, mime_type: Option<&str>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Ink2TextError::UnsupportedImage("file is empty".to_string()));
        }

        let mime_type = match mime_type.map(str::trim).filter(|m| !m.is_empty()) {
            Some(mime) if mime.starts_with("image/") => mime.to_string(),
            Some(other) => {
                return Err(Ink2TextError::UnsupportedImage(format!("not an image type: {other}")));
            }
            None => sniff_mime_type(&bytes)
                .ok_or_else(|| Ink2TextError::UnsupportedImage("unrecognised image data".to_string()))?
                .to_string(),
        };

        Ok(Self {
            bytes,
            mime_type,
            file_name: None,
        })
    }

    /// Read an image file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let by_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime_for_extension);
        let mime = sniff_mime_type(&bytes).or(by_extension);

        let mut payload = Self::new(bytes, mime)?;
        payload.file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        Ok(payload)
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Base64 form used for inline request data.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// Detect common image formats from their magic bytes.
pub fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [b'B', b'M', ..] => Some("image/bmp"),
        [b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => Some("image/tiff"),
        _ => None,
    }
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}
