//! Rendering and export of extracted content.

pub mod fonts;
mod html;
mod pdf;

pub use html::render_html;
pub use pdf::{PdfExporter, TABLE_HEAD};

use crate::models::extraction::ExtractionResult;

pub const LOADING_MESSAGE: &str = "Analyzing your handwriting...";
pub const EMPTY_MESSAGE: &str = "Your converted content will appear here.";

/// What the output panel currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState<'a> {
    /// A conversion is in flight.
    Loading,
    /// The last action failed with this message.
    Failed(&'a str),
    /// Nothing has been extracted yet.
    Empty,
    /// Extracted content to display.
    Content(&'a ExtractionResult),
}
