//! Browser camera via `getUserMedia`.

use std::cell::RefCell;
use std::rc::Rc;

use image::{DynamicImage, RgbImage, RgbaImage};
use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise, spawn_local};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream, MediaStreamConstraints, MediaStreamTrack};

use ink2text_core::{
    CameraDevice, CameraStream, CaptureState, CaptureView, CloseHandle, FacingMode, Ink2TextError, Result,
};

use crate::{InkApp, describe, to_js};

/// Camera attached to a `<video>` element for preview.
pub struct WebCamera {
    video: HtmlVideoElement,
}

impl CameraDevice for WebCamera {
    type Stream = WebStream;

    async fn open(&self, facing: FacingMode) -> Result<WebStream> {
        let unavailable = |e: JsValue| Ink2TextError::CameraUnavailable(describe(&e));

        let media = web_sys::window()
            .ok_or_else(|| Ink2TextError::CameraUnavailable("no window".to_string()))?
            .navigator()
            .media_devices()
            .map_err(unavailable)?;

        let video = Object::new();
        Reflect::set(&video, &"facingMode".into(), &JsValue::from_str(facing.as_str())).map_err(unavailable)?;
        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&video);

        let request = media.get_user_media_with_constraints(&constraints).map_err(unavailable)?;
        let stream: MediaStream = JsFuture::from(request)
            .await
            .and_then(|s| s.dyn_into())
            .map_err(unavailable)?;

        self.video.set_src_object(Some(&stream));
        start_playback(&self.video);

        Ok(WebStream {
            stream,
            video: self.video.clone(),
        })
    }
}

/// Live stream shown in the preview element.
pub struct WebStream {
    stream: MediaStream,
    video: HtmlVideoElement,
}

impl CameraStream for WebStream {
    fn grab_frame(&mut self) -> Result<RgbImage> {
        let failed = |e: JsValue| Ink2TextError::CameraUnavailable(describe(&e));

        let (width, height) = (self.video.video_width(), self.video.video_height());
        if width == 0 || height == 0 {
            return Err(Ink2TextError::CameraUnavailable("video is not ready".to_string()));
        }

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| Ink2TextError::CameraUnavailable("no document".to_string()))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .and_then(|c| c.dyn_into().map_err(JsValue::from))
            .map_err(failed)?;
        canvas.set_width(width);
        canvas.set_height(height);

        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(failed)?
            .ok_or_else(|| Ink2TextError::CameraUnavailable("no 2d context".to_string()))?
            .dyn_into()
            .map_err(|o| failed(o.into()))?;

        context
            .draw_image_with_html_video_element(&self.video, 0.0, 0.0)
            .map_err(failed)?;
        let pixels = context
            .get_image_data(0.0, 0.0, f64::from(width), f64::from(height))
            .map_err(failed)?
            .data();

        let rgba = RgbaImage::from_raw(width, height, pixels.0)
            .ok_or_else(|| Ink2TextError::CameraUnavailable("frame size mismatch".to_string()))?;
        Ok(DynamicImage::ImageRgba8(rgba).to_rgb8())
    }

    fn stop(&mut self) {
        for track in self.stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                track.stop();
            }
        }
        self.video.set_src_object(None);
    }

    fn pause(&mut self) {
        let _ = self.video.pause();
    }

    fn resume(&mut self) {
        start_playback(&self.video);
    }
}

/// Start the preview. A refused autoplay leaves a blank preview, so the
/// rejection is reported on the console.
fn start_playback(video: &HtmlVideoElement) {
    match video.play() {
        Ok(playing) => spawn_local(async move {
            if let Err(e) = JsFuture::from(playing).await {
                web_sys::console::warn_1(&format!("Camera preview did not start: {}", describe(&e)).into());
            }
        }),
        Err(e) => web_sys::console::warn_1(&format!("Camera preview did not start: {}", describe(&e)).into()),
    }
}

/// Camera modal. Create one per opening; closing is final.
#[wasm_bindgen]
pub struct CameraCapture {
    view: Rc<RefCell<Option<CaptureView<WebStream>>>>,
    close: CloseHandle,
}

#[wasm_bindgen]
impl CameraCapture {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            view: Rc::new(RefCell::new(None)),
            close: CloseHandle::new(),
        }
    }

    /// Start the rear camera preview in `video`.
    ///
    /// Rejects with the user-facing message when the camera is unavailable.
    #[wasm_bindgen]
    pub fn open(&self, video: HtmlVideoElement) -> js_sys::Promise {
        let slot = self.view.clone();
        let close = self.close.clone();
        future_to_promise(async move {
            let view = CaptureView::open(&WebCamera { video }, close).await;
            let error = view.error().map(|e| e.to_string());
            *slot.borrow_mut() = Some(view);
            match error {
                Some(message) => Err(JsValue::from_str(&message)),
                None => Ok(JsValue::UNDEFINED),
            }
        })
    }

    /// `live`, `frozen`, `failed` or `closed`.
    #[wasm_bindgen]
    pub fn state(&self) -> String {
        let state = self
            .view
            .borrow()
            .as_ref()
            .map_or(CaptureState::Closed, |v| v.state());
        match state {
            CaptureState::Live => "live",
            CaptureState::Frozen => "frozen",
            CaptureState::Failed => "failed",
            CaptureState::Closed => "closed",
        }
        .to_string()
    }

    /// Freeze the current frame.
    #[wasm_bindgen]
    pub fn capture(&self) -> std::result::Result<(), JsValue> {
        let mut slot = self.view.borrow_mut();
        let view = slot.as_mut().ok_or_else(|| JsValue::from_str("camera is not open"))?;
        view.capture().map(|_| ()).map_err(to_js)
    }

    /// Return to the live preview.
    #[wasm_bindgen]
    pub fn retake(&self) {
        if let Some(view) = self.view.borrow_mut().as_mut() {
            view.retake();
        }
    }

    /// Hand the frozen frame to `app` as the selected image and close.
    #[wasm_bindgen(js_name = usePhoto)]
    pub fn use_photo(&self, app: &InkApp) -> std::result::Result<(), JsValue> {
        let payload = {
            let mut slot = self.view.borrow_mut();
            let view = slot.as_mut().ok_or_else(|| JsValue::from_str("camera is not open"))?;
            view.use_photo().map_err(to_js)?
        };
        app.select_payload(payload);
        Ok(())
    }

    /// Release the camera, also when the permission prompt is still open.
    #[wasm_bindgen]
    pub fn close(&self) {
        self.close.close();
        if let Some(mut view) = self.view.borrow_mut().take() {
            view.close();
        }
    }
}

impl Default for CameraCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_playback_without_source_does_not_throw() {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let video: HtmlVideoElement = document.create_element("video").unwrap().dyn_into().unwrap();
        start_playback(&video);
        start_playback(&video);
        assert!(video.src_object().is_none());
    }
}
