//! Google Gemini `generateContent` client.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{GenerateRequest, VisionService};
use crate::error::{Ink2TextError, Result};
use crate::models::config::ServiceConfig;

/// `reqwest`-backed Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl GeminiClient {
    /// Create a client for the configured endpoint and model.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        #[allow(unused_mut)]
        let mut builder = reqwest::Client::builder();

        #[cfg(not(target_arch = "wasm32"))]
        {
            builder = builder.timeout(std::time::Duration::from_secs(config.timeout_secs));
        }

        let http = builder
            .build()
            .map_err(|e| Ink2TextError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl VisionService for GeminiClient {
    async fn generate(&self, credential: &str, request: &GenerateRequest<'_>) -> Result<Option<String>> {
        info!("Sending {} image to {}", request.image.mime_type, self.model);

        let body = GenerateContentRequest::from_request(request);
        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", credential)
            .json(&body)
            .send()
            .await
            .map_err(|e| Ink2TextError::Service(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Ink2TextError::Service(e.to_string()))?;

        if !status.is_success() {
            return Err(Ink2TextError::Service(error_message(status.as_u16(), &text)));
        }

        if text.trim().is_empty() {
            return Ok(None);
        }

        let envelope: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| Ink2TextError::Service(format!("unexpected response envelope: {e}")))?;

        Ok(envelope.text())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum RequestPart<'a> {
    InlineData(InlineData),
    Text(&'a str),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_request(request: &GenerateRequest<'a>) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::InlineData(InlineData {
                        mime_type: request.image.mime_type.clone(),
                        data: request.image.to_base64(),
                    }),
                    RequestPart::Text(request.prompt),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: request.response_schema,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        if let Some(reason) = self.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_deref()) {
            warn!("Request was blocked: {}", reason);
        }

        let candidate = self.candidates.first()?;
        if let Some(reason) = &candidate.finish_reason {
            debug!("Finish reason: {}", reason);
        }

        let text: String = candidate
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => format!(
            "HTTP {} {}: {}",
            status,
            envelope.error.status.unwrap_or_default(),
            envelope.error.message.unwrap_or_default()
        ),
        Err(_) if body.trim().is_empty() => format!("HTTP {status}"),
        Err(_) => format!("HTTP {}: {}", status, body.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::prompt::{EXTRACTION_PROMPT, response_schema};
    use crate::models::image::ImagePayload;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_request_body_shape() {
        let image = ImagePayload::new(b"abc".to_vec(), Some("image/png")).unwrap();
        let schema = response_schema();
        let request = GenerateRequest {
            image: &image,
            prompt: EXTRACTION_PROMPT,
            response_schema: &schema,
        };

        let body = serde_json::to_value(GenerateContentRequest::from_request(&request)).unwrap();
        let parts = &body["contents"][0]["parts"];

        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "YWJj");
        assert_eq!(parts[1]["text"], EXTRACTION_PROMPT);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_response_text_joins_parts() {
        let envelope: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"headerText\":"},{"text":"\"A\"}"}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(envelope.text().as_deref(), Some(r#"{"headerText":"A"}"#));
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let envelope: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert_eq!(envelope.text(), None);

        let envelope: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert_eq!(envelope.text(), None);
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(400, body), "HTTP 400 INVALID_ARGUMENT: API key not valid.");
        assert_eq!(error_message(503, ""), "HTTP 503");
        assert_eq!(error_message(502, "Bad gateway"), "HTTP 502: Bad gateway");
    }

    #[test]
    fn test_url() {
        let config = ServiceConfig {
            endpoint: "https://example.test/v1beta/".to_string(),
            ..ServiceConfig::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
