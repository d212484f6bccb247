// =============================================================================
// GEMINI CLIENT - Google AI Studio API Integration
// =============================================================================
//
// Implementation of the `AnalysisProvider` trait against Google's Gemini API
// (https://ai.google.dev/gemini-api/docs).
//
// Notes on the API shape:
// - Authentication: API key is passed as a query parameter (`?key=API_KEY`),
//   not a Bearer token.
// - Request format: `contents[]` with nested `parts`; an image is sent as an
//   `inlineData` part with base64-encoded bytes next to the instruction text.
// - Response format: Content is at `candidates[0].content.parts[*].text`.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::rename::{AnalysisProvider, RenameError};

// =============================================================================
// GEMINI API DATA STRUCTURES
// =============================================================================
//
// See: https://ai.google.dev/api/generate-content

/// A single part of content. Gemini uses a "parts" array so text and image
/// payloads can travel in the same message.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

/// Raw media embedded directly in the request.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    /// Base64-encoded bytes.
    data: String,
}

/// One message in the exchange. We only ever send a single "user" turn.
#[derive(Debug, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

/// Generation parameters. OCR extraction wants the least creative output the
/// model will give us.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// The request body for the generateContent endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// A candidate response from the model. Usually just one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Content,

    #[allow(dead_code)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
    #[allow(dead_code)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorDetail,
}

// =============================================================================
// GEMINI CLIENT IMPLEMENTATION
// =============================================================================

/// Client for the Gemini generateContent endpoint.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }

    /// Builds the single-turn multimodal request: instruction text first,
    /// then the image as inline data.
    fn build_request(image: &[u8], mime_type: &str, instruction: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part {
                        text: Some(instruction.to_string()),
                        inline_data: None,
                    },
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: mime_type.to_string(),
                            data: BASE64.encode(image),
                        }),
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(0.0),
            }),
        }
    }

    /// Pulls the text out of the first candidate, joining multiple text
    /// parts if the model split its answer.
    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        let candidate = response.candidates.as_ref()?.first()?;
        let text: Vec<&str> = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text.join("\n"))
        }
    }
}

#[async_trait]
impl AnalysisProvider for GeminiClient {
    async fn analyze_image(
        &self,
        image: &[u8],
        mime_type: &str,
        instruction: &str,
    ) -> Result<String, RenameError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let request = Self::build_request(image, mime_type, instruction);

        // Log request for debugging (be careful not to log the API key!)
        tracing::debug!(
            "Gemini request to model {}: {} image bytes ({})",
            self.model,
            image.len(),
            mime_type
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| RenameError::AnalysisService(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .map_err(|e| RenameError::AnalysisService(e.to_string()))?;

            // Prefer the structured error message when the body parses.
            if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(&error_text) {
                return Err(RenameError::AnalysisService(format!(
                    "Gemini API error ({}): {}",
                    status, error_response.error.message
                )));
            }

            return Err(RenameError::AnalysisService(format!(
                "Gemini API error: {} - {}",
                status, error_text
            )));
        }

        let response_json: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RenameError::AnalysisService(e.to_string()))?;

        let text = Self::extract_text(&response_json).ok_or_else(|| {
            RenameError::AnalysisService(
                "No content in Gemini response - the model may have been blocked by safety filters"
                    .to_string(),
            )
        })?;

        tracing::debug!("Gemini response received: {} chars", text.len());

        Ok(text)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization_camel_case() {
        let request = GeminiClient::build_request(b"\x01\x02", "image/png", "read this");
        let json = serde_json::to_string(&request).unwrap();

        assert!(json.contains("\"inlineData\""));
        assert!(json.contains("\"mimeType\":\"image/png\""));
        assert!(json.contains("\"generationConfig\""));
        // Base64 of [1, 2]
        assert!(json.contains("\"data\":\"AQI=\""));
        assert!(json.contains("\"text\":\"read this\""));
    }

    #[test]
    fn test_extract_text_from_response() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "12-01-2024_Email_short_note"}]
                },
                "finishReason": "STOP"
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            GeminiClient::extract_text(&response),
            Some("12-01-2024_Email_short_note".to_string())
        );
    }

    #[test]
    fn test_extract_text_joins_multiple_parts() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "12-01-2024"}, {"text": "_Email_note"}]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            GeminiClient::extract_text(&response),
            Some("12-01-2024\n_Email_note".to_string())
        );
    }

    #[test]
    fn test_empty_candidates_yield_none() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(GeminiClient::extract_text(&response), None);
    }

    #[test]
    fn test_error_body_parsing() {
        let body = r#"{"error": {"message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        let parsed: GeminiErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "API key not valid");
    }
}
