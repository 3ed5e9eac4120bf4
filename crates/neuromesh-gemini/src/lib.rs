//! [`GenerativeService`] over the Google Gemini REST API.

use async_trait::async_trait;
use neuromesh_core::{Credential, GenerativeService, ServiceError, ServiceRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

// --- Request bodies for generateContent ---
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 2],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    InlineData(Blob<'a>),
    Text(&'a str),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

// --- Response bodies ---
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ContentResponse>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize, Debug)]
struct PartResponse {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GoogleApiErrorResponse {
    error: GoogleApiError,
}

#[derive(Deserialize, Debug)]
struct GoogleApiError {
    message: String,
}
// ---

/// Calls `{endpoint}/v1beta/models/{model}:generateContent`.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeminiClient {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Points the client at another host, e.g. a proxy or a test server.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        GeminiClient { http: reqwest::Client::new(), endpoint: endpoint.into() }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint.trim_end_matches('/'), model)
    }
}

#[async_trait]
impl GenerativeService for GeminiClient {
    async fn generate_content(
        &self,
        request: &ServiceRequest<'_>,
        credential: &Credential,
    ) -> Result<Option<String>, ServiceError> {
        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [
                    Part::InlineData(Blob { mime_type: &request.image.mime_type, data: &request.image.data }),
                    Part::Text(request.instruction),
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: request.response_mime_type,
                response_schema: request.response_schema,
            },
        };

        let response = self
            .http
            .post(self.url(request.model))
            .header("x-goog-api-key", credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(Box::new(e)))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ServiceError::Transport(Box::new(e)))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<GoogleApiErrorResponse>(&text) {
                Ok(parsed) => parsed.error.message,
                Err(_) if text.trim().is_empty() => status.canonical_reason().unwrap_or("unknown error").to_string(),
                Err(_) => text.trim().to_string(),
            };
            return Err(ServiceError::Status { code: status.as_u16(), message });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&text).map_err(|e| ServiceError::InvalidEnvelope(e.to_string()))?;

        if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ServiceError::Blocked(reason));
        }

        let Some(candidate) = parsed.candidates.into_iter().next() else {
            return Ok(None);
        };
        tracing::debug!(finish_reason = ?candidate.finish_reason, "received candidate");

        let reply: String = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text)
            .collect();

        Ok(if reply.is_empty() { None } else { Some(reply) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuromesh_core::EncodedPayload;
    use serde_json::json;

    #[test]
    fn test_url_joins_endpoint_and_model() {
        let client = GeminiClient::with_endpoint("http://localhost:8080/");
        assert_eq!(
            client.url("gemini-3-pro-preview"),
            "http://localhost:8080/v1beta/models/gemini-3-pro-preview:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let image = EncodedPayload { data: "aGVsbG8=".to_string(), mime_type: "image/png".to_string() };
        let schema = json!({ "type": "OBJECT" });
        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [
                    Part::InlineData(Blob { mime_type: &image.mime_type, data: &image.data }),
                    Part::Text("build it"),
                ],
            }],
            generation_config: GenerationConfig { response_mime_type: "application/json", response_schema: &schema },
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        { "inlineData": { "mimeType": "image/png", "data": "aGVsbG8=" } },
                        { "text": "build it" }
                    ]
                }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": { "type": "OBJECT" }
                }
            })
        );
    }
}
