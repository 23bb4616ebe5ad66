//! Core library for converting photographed handwritten rate lists.
//!
//! This crate provides:
//! - Extraction of header text, an item/rate list and footer text through a
//!   hosted vision model (Google Gemini)
//! - Application state for one conversion cycle
//! - Rendering to plain text, HTML and paginated PDF
//! - Persisted credential settings and the camera capture lifecycle

pub mod app;
pub mod capture;
pub mod error;
pub mod extract;
pub mod models;
pub mod render;
pub mod settings;
pub mod share;

pub use app::{App, ConversionTicket, Status};
pub use capture::{CameraDevice, CameraStream, CaptureState, CaptureView, CloseHandle, FacingMode};
pub use error::{Ink2TextError, Result};
pub use extract::{GeminiClient, VisionService, extract_content, parse_extraction};
pub use models::config::{AppConfig, ExportConfig, ServiceConfig};
pub use models::extraction::{ExtractionResult, Item};
pub use models::formatting::{FontFamily, FormattingPreferences, Rgb};
pub use models::image::ImagePayload;
pub use render::{PdfExporter, ViewState, render_html};
pub use settings::{FileStore, KeyValueStore, MemoryStore, Settings};
pub use share::{ShareOutcome, ShareTarget, SharedFile};
