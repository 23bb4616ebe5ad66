//! Camera capture lifecycle.
//!
//! A [`CaptureView`] exclusively owns the live camera stream. The stream is
//! stopped when the view is closed or dropped, and also when the view was
//! closed while the permission request was still pending.

use std::cell::Cell;
use std::rc::Rc;

use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use tracing::{debug, info, warn};

use crate::error::{Ink2TextError, Result};
use crate::models::image::ImagePayload;

/// JPEG quality of confirmed captures.
pub const JPEG_QUALITY: u8 = 95;

/// Which camera to ask for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FacingMode {
    /// Rear-facing camera.
    #[default]
    Environment,
    /// Front-facing camera.
    User,
}

impl FacingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FacingMode::Environment => "environment",
            FacingMode::User => "user",
        }
    }
}

/// A live video stream.
pub trait CameraStream {
    /// Grab the frame currently shown.
    fn grab_frame(&mut self) -> Result<RgbImage>;

    /// Stop every track of the stream. Called at most once per stream.
    fn stop(&mut self);

    /// Pause the preview while a still is shown.
    fn pause(&mut self) {}

    /// Resume the preview after a retake.
    fn resume(&mut self) {}
}

/// Source of camera streams.
#[allow(async_fn_in_trait)]
pub trait CameraDevice {
    type Stream: CameraStream;

    /// Request a stream. Permission denial or a missing device is an error.
    async fn open(&self, facing: FacingMode) -> Result<Self::Stream>;
}

/// Shared flag set when the capture view is dismissed.
#[derive(Debug, Clone, Default)]
pub struct CloseHandle(Rc<Cell<bool>>);

impl CloseHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close(&self) {
        self.0.set(true);
    }

    pub fn is_closed(&self) -> bool {
        self.0.get()
    }
}

/// What the capture view currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Live preview.
    Live,
    /// A frozen still awaiting retake or confirmation.
    Frozen,
    /// The camera could not be opened; an inline error is shown.
    Failed,
    /// The view was closed and holds no stream.
    Closed,
}

/// Camera view owning the stream until it is closed.
pub struct CaptureView<S: CameraStream> {
    stream: Option<S>,
    frozen: Option<RgbImage>,
    error: Option<Ink2TextError>,
    close: CloseHandle,
}

impl<S: CameraStream> CaptureView<S> {
    /// Ask the device for a rear-facing stream.
    ///
    /// Failure never panics or propagates: the view ends up in
    /// [`CaptureState::Failed`] with the error available from [`Self::error`].
    pub async fn open<D>(device: &D, close: CloseHandle) -> Self
    where
        D: CameraDevice<Stream = S>,
    {
        let mut view = Self {
            stream: None,
            frozen: None,
            error: None,
            close,
        };

        match device.open(FacingMode::Environment).await {
            Ok(mut stream) => {
                if view.close.is_closed() {
                    info!("Capture view closed during camera request, stopping stream");
                    stream.stop();
                } else {
                    debug!("Camera stream started");
                    view.stream = Some(stream);
                }
            }
            Err(e) if view.close.is_closed() => {
                debug!("Camera request failed after close: {}", e);
            }
            Err(e) => {
                warn!("Error accessing camera: {}", e);
                view.error = Some(match e {
                    Ink2TextError::CameraUnavailable(msg) => Ink2TextError::CameraUnavailable(msg),
                    other => Ink2TextError::CameraUnavailable(other.to_string()),
                });
            }
        }

        view
    }

    pub fn state(&self) -> CaptureState {
        if self.error.is_some() {
            CaptureState::Failed
        } else if self.stream.is_none() {
            CaptureState::Closed
        } else if self.frozen.is_some() {
            CaptureState::Frozen
        } else {
            CaptureState::Live
        }
    }

    /// The inline error shown instead of the preview.
    pub fn error(&self) -> Option<&Ink2TextError> {
        self.error.as_ref()
    }

    /// Freeze the current frame. The stream stays open for a retake.
    pub fn capture(&mut self) -> Result<&RgbImage> {
        let stream = self.live_stream()?;
        let frame = stream.grab_frame()?;
        stream.pause();
        debug!("Captured {}x{} frame", frame.width(), frame.height());
        Ok(self.frozen.insert(frame))
    }

    /// Discard the frozen frame and return to the live preview.
    pub fn retake(&mut self) {
        if self.frozen.take().is_some() {
            if let Some(stream) = self.stream.as_mut() {
                stream.resume();
            }
        }
    }

    /// Encode the frozen frame as JPEG and close the view.
    pub fn use_photo(&mut self) -> Result<ImagePayload> {
        let frame = self
            .frozen
            .as_ref()
            .ok_or_else(|| Ink2TextError::CameraUnavailable("no frame captured".to_string()))?;

        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY).encode_image(frame)?;

        let name = format!("capture-{}.jpg", chrono::Utc::now().timestamp_millis());
        let payload = ImagePayload::new(bytes, Some("image/jpeg"))?.with_file_name(name);
        self.close();
        Ok(payload)
    }

    /// Release the camera. Safe to call more than once.
    pub fn close(&mut self) {
        self.close.close();
        self.frozen = None;
        if let Some(mut stream) = self.stream.take() {
            debug!("Stopping camera stream");
            stream.stop();
        }
    }

    fn live_stream(&mut self) -> Result<&mut S> {
        if let Some(error) = &self.error {
            return Err(Ink2TextError::CameraUnavailable(error.to_string()));
        }
        self.stream
            .as_mut()
            .ok_or_else(|| Ink2TextError::CameraUnavailable("camera is closed".to_string()))
    }
}

impl<S: CameraStream> Drop for CaptureView<S> {
    fn drop(&mut self) {
        self.close();
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    fn granted() -> (FakeDevice, Rc<Cell<bool>>, Rc<Cell<bool>>) {
        let stopped = Rc::new(Cell::new(false));
        let paused = Rc::new(Cell::new(false));
        let device = FakeDevice::Granted {
            stopped: stopped.clone(),
            paused: paused.clone(),
        };
        (device, stopped, paused)
    }

    #[tokio::test]
    async fn test_capture_retake_confirm() {
        let (device, stopped, paused) = granted();
        let mut view = CaptureView::open(&device, CloseHandle::new()).await;
        assert_eq!(view.state(), CaptureState::Live);

        view.capture().unwrap();
        assert_eq!(view.state(), CaptureState::Frozen);
        assert!(paused.get());

        view.retake();
        assert_eq!(view.state(), CaptureState::Live);
        assert!(!paused.get());

        view.capture().unwrap();
        let payload = view.use_photo().unwrap();

        assert_eq!(payload.mime_type, "image/jpeg");
        assert_eq!(&payload.bytes[..3], &[0xFF, 0xD8, 0xFF]);
        let name = payload.file_name.unwrap();
        assert!(name.starts_with("capture-") && name.ends_with(".jpg"));
        assert!(stopped.get());
        assert_eq!(view.state(), CaptureState::Closed);
    }

    #[tokio::test]
    async fn test_drop_stops_stream() {
        let (device, stopped, _) = granted();
        {
            let view = CaptureView::open(&device, CloseHandle::new()).await;
            assert_eq!(view.state(), CaptureState::Live);
        }
        assert!(stopped.get());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (device, stopped, _) = granted();
        let mut view = CaptureView::open(&device, CloseHandle::new()).await;
        view.close();
        view.close();
        drop(view);
        assert!(stopped.get());
    }

    #[tokio::test]
    async fn test_closed_while_pending_stops_stream() {
        let stopped = Rc::new(Cell::new(false));
        let close = CloseHandle::new();
        let device = FakeDevice::ClosedWhilePending {
            stopped: stopped.clone(),
            close: close.clone(),
        };

        let view = CaptureView::open(&device, close).await;
        assert!(stopped.get());
        assert_eq!(view.state(), CaptureState::Closed);
        assert!(view.error().is_none());
    }

    #[tokio::test]
    async fn test_permission_denied_is_inline_error() {
        let mut view = CaptureView::open(&FakeDevice::Denied, CloseHandle::new()).await;
        assert_eq!(view.state(), CaptureState::Failed);
        assert!(matches!(view.error(), Some(Ink2TextError::CameraUnavailable(_))));
        assert!(view.capture().is_err());
        assert!(view.use_photo().is_err());
    }

    #[tokio::test]
    async fn test_use_photo_without_capture_fails() {
        let (device, stopped, _) = granted();
        let mut view = CaptureView::open(&device, CloseHandle::new()).await;
        assert!(view.use_photo().is_err());
        assert!(!stopped.get());
    }
}
