//! Application state and orchestration.
//!
//! One conversion cycle runs `Idle -> Loading -> {Success, Failed}`. Every
//! error is caught here and turned into a single user-visible message.

use tracing::{debug, error, info, warn};

use crate::error::{Ink2TextError, Result};
use crate::extract::{VisionService, extract_content};
use crate::models::config::AppConfig;
use crate::models::extraction::ExtractionResult;
use crate::models::formatting::{FontFamily, FormattingPreferences, Rgb};
use crate::models::image::ImagePayload;
use crate::render::{PdfExporter, ViewState};
use crate::settings::Settings;
use crate::share::{ShareOutcome, ShareTarget, SharedFile};

/// Conversion cycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Success,
    Failed,
}

/// Everything needed to run one extraction outside of the state borrow.
#[derive(Debug, Clone)]
pub struct ConversionTicket {
    image: ImagePayload,
    credential: Option<String>,
    generation: u64,
}

impl ConversionTicket {
    /// Run the extraction call.
    pub async fn run<S: VisionService>(&self, service: &S) -> Result<ExtractionResult> {
        extract_content(service, &self.image, self.credential.as_deref()).await
    }
}

/// State of the converter.
pub struct App {
    config: AppConfig,
    settings: Settings,
    credential_override: Option<String>,
    image: Option<ImagePayload>,
    result: ExtractionResult,
    status: Status,
    error: Option<String>,
    preferences: FormattingPreferences,
    exporting: bool,
    /// Bumped on every image selection; outcomes for older images are dropped.
    generation: u64,
}

impl App {
    /// Create the state from the startup configuration and loaded settings.
    pub fn new(config: AppConfig, settings: Settings) -> Self {
        let preferences = config.formatting;
        Self {
            config,
            settings,
            credential_override: None,
            image: None,
            result: ExtractionResult::default(),
            status: Status::Idle,
            error: None,
            preferences,
            exporting: false,
            generation: 0,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Edit the credential; the change is persisted immediately.
    pub fn set_credential(&mut self, value: &str) -> Result<()> {
        self.settings.set_credential(value)
    }

    /// Use this credential instead of the stored one for later conversions.
    pub fn set_credential_override(&mut self, credential: Option<String>) {
        self.credential_override = credential;
    }

    pub fn image(&self) -> Option<&ImagePayload> {
        self.image.as_ref()
    }

    pub fn result(&self) -> &ExtractionResult {
        &self.result
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn preferences(&self) -> &FormattingPreferences {
        &self.preferences
    }

    /// True while a conversion, export or share is in flight.
    pub fn is_busy(&self) -> bool {
        self.status == Status::Loading || self.exporting
    }

    pub fn has_content(&self) -> bool {
        self.result.has_content()
    }

    /// What the output panel shows right now.
    pub fn view(&self) -> ViewState<'_> {
        if self.status == Status::Loading {
            ViewState::Loading
        } else if let Some(message) = &self.error {
            ViewState::Failed(message)
        } else if self.result.has_content() {
            ViewState::Content(&self.result)
        } else {
            ViewState::Empty
        }
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        self.preferences.text_color = color;
    }

    pub fn set_font_family(&mut self, family: FontFamily) {
        self.preferences.font_family = family;
    }

    pub fn toggle_bold(&mut self) {
        self.preferences.bold = !self.preferences.bold;
    }

    pub fn toggle_italic(&mut self) {
        self.preferences.italic = !self.preferences.italic;
    }

    pub fn set_preferences(&mut self, preferences: FormattingPreferences) {
        self.preferences = preferences;
    }

    /// Select a new image. Resets the cycle and clears all derived state.
    ///
    /// A conversion still in flight keeps the state `Loading` until it
    /// finishes, and its outcome is then discarded.
    pub fn select_image(&mut self, image: ImagePayload) {
        debug!("Selected image {:?}", image);
        self.generation += 1;
        self.image = Some(image);
        self.result = ExtractionResult::default();
        self.error = None;
        if self.status != Status::Loading {
            self.status = Status::Idle;
        }
    }

    /// Enter `Loading` and hand out what the extraction call needs.
    ///
    /// Returns `None` when no image is selected (the cycle fails with a
    /// message) or when another operation is still in flight.
    pub fn begin_conversion(&mut self) -> Option<ConversionTicket> {
        if self.is_busy() {
            warn!("Conversion requested while busy, ignoring");
            return None;
        }

        let Some(image) = self.image.clone() else {
            self.fail(Ink2TextError::NoImage);
            return None;
        };

        self.status = Status::Loading;
        self.error = None;
        self.result = ExtractionResult::default();

        let credential = self
            .settings
            .resolve_credential(self.credential_override.as_deref())
            .ok()
            .map(str::to_string);

        Some(ConversionTicket {
            image,
            credential,
            generation: self.generation,
        })
    }

    /// Leave `Loading` with the outcome of the extraction call.
    ///
    /// An outcome for an image that has since been replaced only ends the
    /// loading state.
    pub fn finish_conversion(&mut self, ticket: &ConversionTicket, outcome: Result<ExtractionResult>) {
        if ticket.generation != self.generation {
            info!("Discarding result for a replaced image");
            if self.status == Status::Loading {
                self.status = Status::Idle;
            }
            return;
        }

        match outcome {
            Ok(result) => {
                info!("Conversion succeeded with {} items", result.items.len());
                self.result = result;
                self.error = None;
                self.status = Status::Success;
            }
            Err(e) => {
                self.result = ExtractionResult::default();
                self.fail(e);
            }
        }
    }

    /// Run one full conversion cycle. Returns whether it succeeded.
    pub async fn convert<S: VisionService>(&mut self, service: &S) -> bool {
        let Some(ticket) = self.begin_conversion() else {
            return false;
        };
        let outcome = ticket.run(service).await;
        self.finish_conversion(&ticket, outcome);
        self.status == Status::Success
    }

    /// Show a previously saved result without calling the service.
    pub fn restore_result(&mut self, result: ExtractionResult) {
        self.result = result;
        self.error = None;
        self.status = Status::Success;
    }

    /// Plain-text form of the result, or `None` when there is nothing to copy.
    pub fn copy_text(&self) -> Option<String> {
        self.result.to_copy_text()
    }

    /// Render the PDF. Returns `None` when there is no content or rendering
    /// failed (the failure message is kept in [`Self::error`]).
    pub fn export_pdf(&mut self) -> Option<Vec<u8>> {
        if !self.has_content() || self.is_busy() {
            return None;
        }

        self.exporting = true;
        let rendered = self.render_pdf();
        self.exporting = false;

        match rendered {
            Ok(bytes) => {
                self.clear_stale_error();
                bytes
            }
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    /// Whether the target can share the exported document type.
    pub fn can_share<T: ShareTarget>(&self, target: &T) -> bool {
        target.can_share(&SharedFile::pdf(Vec::new(), &self.config.export))
    }

    /// Render the PDF and mark the share as in flight.
    ///
    /// Returns `None` (a no-op) without content, while busy, or when the
    /// target cannot share PDFs. Pair with [`Self::finish_share`].
    pub fn begin_share<T: ShareTarget>(&mut self, target: &T) -> Option<SharedFile> {
        if !self.has_content() || self.is_busy() || !self.can_share(target) {
            return None;
        }

        match self.render_pdf() {
            Ok(Some(bytes)) => {
                self.exporting = true;
                Some(SharedFile::pdf(bytes, &self.config.export))
            }
            Ok(None) => None,
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    /// Record how the platform share ended. A cancelled share is a normal
    /// outcome; other failures are kept in [`Self::error`].
    pub fn finish_share(&mut self, outcome: Result<ShareOutcome>) -> Option<ShareOutcome> {
        self.exporting = false;
        match outcome {
            Ok(outcome) => {
                if outcome == ShareOutcome::Cancelled {
                    info!("Share cancelled by user");
                }
                self.clear_stale_error();
                Some(outcome)
            }
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    /// Share the PDF through the platform.
    pub async fn share<T: ShareTarget>(&mut self, target: &T) -> Option<ShareOutcome> {
        let file = self.begin_share(target)?;
        let outcome = target.share(file).await;
        self.finish_share(outcome)
    }

    fn render_pdf(&self) -> Result<Option<Vec<u8>>> {
        PdfExporter::new(&self.config.export, self.preferences).export(&self.result)
    }

    /// An export or share failure leaves the content in place; the next
    /// successful one brings it back into view.
    fn clear_stale_error(&mut self) {
        if self.status == Status::Failed && self.has_content() {
            self.error = None;
            self.status = Status::Success;
        }
    }

    fn fail(&mut self, err: Ink2TextError) {
        error!("{}", err);
        self.error = Some(err.to_string());
        self.status = Status::Failed;
    }
}
