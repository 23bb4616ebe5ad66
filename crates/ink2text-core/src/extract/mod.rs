//! Extraction client: image in, header/items/footer out.
//!
//! One request-response call per extraction. There is no retry, streaming or
//! cancellation; a failed call is reported and may be re-invoked by the user.

mod gemini;
pub mod prompt;
mod response;

pub use gemini::GeminiClient;
pub use prompt::{EXTRACTION_PROMPT, response_schema};
pub use response::parse_extraction;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Ink2TextError, Result};
use crate::models::extraction::ExtractionResult;
use crate::models::image::ImagePayload;

/// A single generation request sent to a vision service.
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    /// Image to analyse.
    pub image: &'a ImagePayload,
    /// Natural-language instruction.
    pub prompt: &'a str,
    /// Strict JSON schema the answer must follow.
    pub response_schema: &'a Value,
}

/// Transport to a hosted vision model.
#[allow(async_fn_in_trait)]
pub trait VisionService {
    /// Send one request and return the answer text, or `None` when the
    /// service answered without any text.
    async fn generate(&self, credential: &str, request: &GenerateRequest<'_>) -> Result<Option<String>>;
}

/// Extract the header, item/rate list and footer from an image.
///
/// Fails with [`Ink2TextError::MissingCredential`] before touching the
/// service when `credential` is absent or blank.
pub async fn extract_content<S: VisionService>(
    service: &S,
    image: &ImagePayload,
    credential: Option<&str>,
) -> Result<ExtractionResult> {
    let credential = credential
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(Ink2TextError::MissingCredential)?;

    let schema = response_schema();
    let request = GenerateRequest {
        image,
        prompt: EXTRACTION_PROMPT,
        response_schema: &schema,
    };

    debug!("Extracting content from {:?}", image);
    let text = service
        .generate(credential, &request)
        .await?
        .ok_or(Ink2TextError::EmptyResponse)?;

    let result = parse_extraction(&text)?;
    info!(
        "Extracted {} items (header: {} chars, footer: {} chars)",
        result.items.len(),
        result.header_text.len(),
        result.footer_text.len()
    );

    Ok(result)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::{Cell, RefCell};

    use super::*;

    /// Scripted service that records how often it was called.
    pub struct FakeService {
        reply: RefCell<Option<Result<Option<String>>>>,
        pub calls: Cell<usize>,
        pub last_credential: RefCell<Option<String>>,
    }

    impl FakeService {
        pub fn replying(text: &str) -> Self {
            Self::with(Ok(Some(text.to_string())))
        }

        pub fn with(reply: Result<Option<String>>) -> Self {
            Self {
                reply: RefCell::new(Some(reply)),
                calls: Cell::new(0),
                last_credential: RefCell::new(None),
            }
        }
    }

    impl VisionService for FakeService {
        async fn generate(&self, credential: &str, request: &GenerateRequest<'_>) -> Result<Option<String>> {
            assert_eq!(request.prompt, EXTRACTION_PROMPT);
            self.calls.set(self.calls.get() + 1);
            *self.last_credential.borrow_mut() = Some(credential.to_string());
            self.reply
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Err(Ink2TextError::Service("no scripted reply".to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeService;
    use super::*;
    use crate::models::extraction::Item;

    fn image() -> ImagePayload {
        ImagePayload::new(vec![0xFF, 0xD8, 0xFF, 0xE0], None).unwrap()
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_network() {
        let service = FakeService::replying("{}");

        let err = extract_content(&service, &image(), None).await.unwrap_err();
        assert!(matches!(err, Ink2TextError::MissingCredential));

        let err = extract_content(&service, &image(), Some("  ")).await.unwrap_err();
        assert!(matches!(err, Ink2TextError::MissingCredential));

        assert_eq!(service.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_successful_extraction() {
        let service = FakeService::replying(
            r#"{"headerText":"Crown Rates","items":[{"item":"Pen","rate":"10"}],"footerText":""}"#,
        );

        let result = extract_content(&service, &image(), Some(" key ")).await.unwrap();
        assert_eq!(result.items, vec![Item::new("Pen", "10")]);
        assert_eq!(service.last_credential.borrow().as_deref(), Some("key"));
    }

    #[tokio::test]
    async fn test_no_text_is_empty_response() {
        let service = FakeService::with(Ok(None));
        let err = extract_content(&service, &image(), Some("key")).await.unwrap_err();
        assert!(matches!(err, Ink2TextError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_service_error_passes_through() {
        let service = FakeService::with(Err(Ink2TextError::Service("HTTP 500".to_string())));
        let err = extract_content(&service, &image(), Some("key")).await.unwrap_err();
        assert!(matches!(err, Ink2TextError::Service(_)));
    }
}
