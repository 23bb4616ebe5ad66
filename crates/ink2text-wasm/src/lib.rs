//! WASM bindings for handwritten rate-list conversion.
//!
//! This crate provides the browser host: an [`InkApp`] holding the
//! conversion state and a [`CameraCapture`] for taking photos.

mod camera;
mod storage;
mod web_share;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use ink2text_core::{
    App, AppConfig, FontFamily, GeminiClient, ImagePayload, Ink2TextError, MemoryStore, Rgb, Settings, ShareOutcome,
    ShareTarget, Status, render_html,
};

pub use camera::CameraCapture;
pub use storage::LocalStorageStore;
pub use web_share::{WebShare, is_abort};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn to_js(err: Ink2TextError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Readable text for a thrown JS value.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        let name = String::from(err.name());
        let message = String::from(err.message());
        return if message.is_empty() { name } else { format!("{}: {}", name, message) };
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    status: &'a str,
    busy: bool,
    error: Option<&'a str>,
    has_content: bool,
    result: &'a ink2text_core::ExtractionResult,
    preferences: &'a ink2text_core::FormattingPreferences,
}

/// Ink to Text converter for browser use.
#[wasm_bindgen]
pub struct InkApp {
    state: Rc<RefCell<App>>,
    client: Rc<GeminiClient>,
    share: Rc<WebShare>,
}

#[wasm_bindgen]
impl InkApp {
    /// Create the converter. The API key is read once from `localStorage`.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<InkApp, JsValue> {
        let config = AppConfig::default();
        let settings = match LocalStorageStore::from_window() {
            Some(store) => Settings::load(store),
            None => Settings::load(MemoryStore::new()),
        };
        let client = GeminiClient::new(&config.service).map_err(to_js)?;

        Ok(Self {
            state: Rc::new(RefCell::new(App::new(config, settings))),
            client: Rc::new(client),
            share: Rc::new(WebShare::new()),
        })
    }

    /// Select an uploaded image. Resets any previous result or error.
    #[wasm_bindgen(js_name = selectImage)]
    pub fn select_image(&self, bytes: Vec<u8>, mime_type: Option<String>, file_name: Option<String>) -> Result<(), JsValue> {
        let mut payload = ImagePayload::new(bytes, mime_type.as_deref()).map_err(to_js)?;
        if let Some(name) = file_name {
            payload = payload.with_file_name(name);
        }
        self.select_payload(payload);
        Ok(())
    }

    /// Run the extraction. Resolves to `true` on success; failures are
    /// reported through `error()` and `renderHtml()`.
    #[wasm_bindgen]
    pub fn convert(&self) -> Promise {
        let state = self.state.clone();
        let client = self.client.clone();
        future_to_promise(async move {
            let ticket = state.borrow_mut().begin_conversion();
            let Some(ticket) = ticket else {
                return Ok(JsValue::FALSE);
            };
            let outcome = ticket.run(client.as_ref()).await;
            let mut app = state.borrow_mut();
            app.finish_conversion(&ticket, outcome);
            Ok(JsValue::from_bool(app.status() == Status::Success))
        })
    }

    /// The output panel as an HTML fragment.
    #[wasm_bindgen(js_name = renderHtml)]
    pub fn render_html(&self) -> String {
        let app = self.state.borrow();
        render_html(&app.view(), app.preferences())
    }

    /// Plain text of the result, or `undefined` when there is none.
    #[wasm_bindgen(js_name = copyText)]
    pub fn copy_text(&self) -> Option<String> {
        self.state.borrow().copy_text()
    }

    /// Copy the plain text to the clipboard. Resolves to whether anything
    /// was copied.
    #[wasm_bindgen(js_name = copyToClipboard)]
    pub fn copy_to_clipboard(&self) -> Promise {
        let text = self.copy_text();
        future_to_promise(async move {
            match text {
                Some(text) => {
                    web_share::write_clipboard(&text).await?;
                    Ok(JsValue::TRUE)
                }
                None => Ok(JsValue::FALSE),
            }
        })
    }

    /// The PDF document bytes, or `undefined` when there is no content.
    #[wasm_bindgen(js_name = exportPdf)]
    pub fn export_pdf(&self) -> Option<Vec<u8>> {
        self.state.borrow_mut().export_pdf()
    }

    /// Export the PDF and start a browser download.
    #[wasm_bindgen(js_name = downloadPdf)]
    pub fn download_pdf(&self) -> Result<bool, JsValue> {
        let Some(bytes) = self.export_pdf() else {
            return Ok(false);
        };
        let file_name = self.state.borrow().config().export.file_name.clone();
        web_share::download(&bytes, &file_name, "application/pdf")?;
        Ok(true)
    }

    /// Whether the browser can share the PDF as a file.
    #[wasm_bindgen(js_name = canShare)]
    pub fn can_share(&self) -> bool {
        self.state.borrow().can_share(self.share.as_ref())
    }

    /// Share the PDF. Resolves to `"shared"`, `"cancelled"` or `null` when
    /// nothing was shared.
    #[wasm_bindgen]
    pub fn share(&self) -> Promise {
        let state = self.state.clone();
        let share = self.share.clone();
        future_to_promise(async move {
            let file = state.borrow_mut().begin_share(share.as_ref());
            let Some(file) = file else {
                return Ok(JsValue::NULL);
            };
            let outcome = share.share(file).await;
            Ok(match state.borrow_mut().finish_share(outcome) {
                Some(ShareOutcome::Shared) => JsValue::from_str("shared"),
                Some(ShareOutcome::Cancelled) => JsValue::from_str("cancelled"),
                None => JsValue::NULL,
            })
        })
    }

    /// Set the text color from `#RRGGBB`.
    #[wasm_bindgen(js_name = setTextColor)]
    pub fn set_text_color(&self, hex: &str) -> Result<(), JsValue> {
        let color: Rgb = hex.parse().map_err(to_js)?;
        self.state.borrow_mut().set_text_color(color);
        Ok(())
    }

    /// Set the font family: `sans`, `serif` or `mono`.
    #[wasm_bindgen(js_name = setFontFamily)]
    pub fn set_font_family(&self, family: &str) -> Result<(), JsValue> {
        let family: FontFamily = family.parse().map_err(to_js)?;
        self.state.borrow_mut().set_font_family(family);
        Ok(())
    }

    #[wasm_bindgen(js_name = toggleBold)]
    pub fn toggle_bold(&self) {
        self.state.borrow_mut().toggle_bold();
    }

    #[wasm_bindgen(js_name = toggleItalic)]
    pub fn toggle_italic(&self) {
        self.state.borrow_mut().toggle_italic();
    }

    /// Store the API key. Written to `localStorage` immediately.
    #[wasm_bindgen(js_name = setApiKey)]
    pub fn set_api_key(&self, key: &str) -> Result<(), JsValue> {
        self.state.borrow_mut().set_credential(key).map_err(to_js)
    }

    #[wasm_bindgen(js_name = apiKey)]
    pub fn api_key(&self) -> Option<String> {
        self.state.borrow().settings().credential().map(str::to_string)
    }

    /// The last error message, if any.
    #[wasm_bindgen]
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error().map(str::to_string)
    }

    #[wasm_bindgen(js_name = isBusy)]
    pub fn is_busy(&self) -> bool {
        self.state.borrow().is_busy()
    }

    #[wasm_bindgen(js_name = hasContent)]
    pub fn has_content(&self) -> bool {
        self.state.borrow().has_content()
    }

    /// Full state for hosts that render on their own.
    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let app = self.state.borrow();
        let snapshot = Snapshot {
            status: match app.status() {
                Status::Idle => "idle",
                Status::Loading => "loading",
                Status::Success => "success",
                Status::Failed => "failed",
            },
            busy: app.is_busy(),
            error: app.error(),
            has_content: app.has_content(),
            result: app.result(),
            preferences: app.preferences(),
        };

        serde_wasm_bindgen::to_value(&snapshot).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl InkApp {
    pub(crate) fn select_payload(&self, payload: ImagePayload) {
        self.state.borrow_mut().select_image(payload);
    }
}
