//! Error types for the ink2text-core library.

use thiserror::Error;

/// Main error type for the ink2text library.
#[derive(Error, Debug)]
pub enum Ink2TextError {
    /// No credential was stored or supplied for the AI service.
    #[error("API Key is missing. Please set it in the settings.")]
    MissingCredential,

    /// Convert was requested before any image was selected.
    #[error("Please upload an image first.")]
    NoImage,

    /// Network or service-side failure.
    #[error("service error: {0}")]
    Service(String),

    /// The service answered without any text.
    #[error("The API did not return any data. The handwriting might be illegible.")]
    EmptyResponse,

    /// The service answered with text that is not a JSON object.
    #[error(
        "Failed to process the AI's response. The handwriting might be illegible or in an unexpected format. ({0})"
    )]
    MalformedResponse(String),

    /// Camera permission denied or no camera device.
    #[error(
        "Could not access camera. Please ensure permissions are granted and you have a camera available. ({0})"
    )]
    CameraUnavailable(String),

    /// Native share failed for a reason other than the user cancelling.
    #[error("Could not share the file. ({0})")]
    ShareFailed(String),

    /// PDF generation failed.
    #[error("Failed to generate PDF. Please try again. ({0})")]
    ExportFailed(String),

    /// The selected file is not a recognised image.
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    /// Reading or writing the persisted settings failed.
    #[error("settings error: {0}")]
    Settings(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lopdf::Error> for Ink2TextError {
    fn from(err: lopdf::Error) -> Self {
        Self::ExportFailed(err.to_string())
    }
}

/// Result type for the ink2text library.
pub type Result<T> = std::result::Result<T, Ink2TextError>;
