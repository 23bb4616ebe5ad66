//! Browser-host tests that need no network or camera.

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

use ink2text_wasm::{CameraCapture, InkApp, is_abort};

#[wasm_bindgen_test]
fn test_initial_state_is_empty() {
    let app = InkApp::new().unwrap();
    assert!(app.render_html().contains("Your converted content will appear here."));
    assert!(app.copy_text().is_none());
    assert!(app.export_pdf().is_none());
    assert!(!app.has_content());
}

#[wasm_bindgen_test]
async fn test_convert_without_image() {
    let app = InkApp::new().unwrap();
    let converted = JsFuture::from(app.convert()).await.unwrap();
    assert_eq!(converted, JsValue::FALSE);
    assert_eq!(app.error().as_deref(), Some("Please upload an image first."));
    assert!(app.render_html().contains("Error: Please upload an image first."));
}

#[wasm_bindgen_test]
fn test_select_image_rejects_non_image() {
    let app = InkApp::new().unwrap();
    assert!(app.select_image(Vec::new(), None, None).is_err());
    assert!(app.select_image(vec![1, 2, 3], Some("text/plain".to_string()), None).is_err());
    assert!(
        app.select_image(vec![0xFF, 0xD8, 0xFF, 0xE0], None, Some("note.jpg".to_string()))
            .is_ok()
    );
}

#[wasm_bindgen_test]
fn test_preference_setters() {
    let app = InkApp::new().unwrap();
    assert!(app.set_text_color("#EC4899").is_ok());
    assert!(app.set_text_color("pink").is_err());
    assert!(app.set_font_family("serif").is_ok());
    assert!(app.set_font_family("comic").is_err());
    app.toggle_bold();
    assert!(app.snapshot().is_ok());
}

#[wasm_bindgen_test]
fn test_abort_error_is_cancel() {
    let abort = js_sys::Error::new("Share canceled");
    abort.set_name("AbortError");
    assert!(is_abort(&abort.into()));

    let denied = js_sys::Error::new("Permission denied");
    denied.set_name("NotAllowedError");
    assert!(!is_abort(&denied.into()));
    assert!(!is_abort(&JsValue::from_str("AbortError")));
}

#[wasm_bindgen_test]
fn test_camera_close_before_open() {
    let camera = CameraCapture::new();
    camera.close();
    camera.close();
    assert_eq!(camera.state(), "closed");
    assert!(camera.capture().is_err());
}
