//! Turns one image into one validated [`GenerationResult`].

use crate::asset::{self, ImageAsset};
use crate::error::GenerateError;
use crate::models::GenerationResult;
use crate::prompt::BLOCKOUT_INSTRUCTION;
use crate::schema::{self, RESPONSE_MIME_TYPE};
use crate::traits::{Credential, GenerativeService, ServiceRequest};

pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub credential: Credential,
    pub model: String,
}

impl OrchestratorConfig {
    pub fn new(credential: impl Into<Credential>) -> Self {
        OrchestratorConfig { credential: credential.into(), model: DEFAULT_MODEL.to_string() }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Issues generation requests against a [`GenerativeService`] with an
/// injected credential.
pub struct Orchestrator<S> {
    service: S,
    config: OrchestratorConfig,
}

impl<S: GenerativeService> Orchestrator<S> {
    pub fn new(service: S, config: OrchestratorConfig) -> Self {
        Orchestrator { service, config }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub async fn generate(&self, image: &ImageAsset) -> Result<GenerationResult, GenerateError> {
        generate(&self.service, image, &self.config.credential, &self.config.model).await
    }
}

/// Encodes `image`, makes exactly one call to `service`, and validates the reply.
///
/// An empty credential fails before anything is read or sent. There is no
/// retry; callers re-invoke after a failure.
pub async fn generate<S: GenerativeService + ?Sized>(
    service: &S,
    image: &ImageAsset,
    credential: &Credential,
    model: &str,
) -> Result<GenerationResult, GenerateError> {
    if credential.is_empty() {
        return Err(GenerateError::MissingCredential);
    }

    let payload = asset::encode(image).await?;
    let response_schema = schema::response_schema();
    let request = ServiceRequest {
        model,
        image: &payload,
        instruction: BLOCKOUT_INSTRUCTION,
        response_mime_type: RESPONSE_MIME_TYPE,
        response_schema: &response_schema,
    };

    tracing::debug!(
        model,
        mime_type = %payload.mime_type,
        encoded_len = payload.data.len(),
        "sending generation request"
    );

    let text = service.generate_content(&request, credential).await?;
    drop(payload);

    let text = match text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(GenerateError::EmptyResponse),
    };

    let result = schema::parse_result(&text)?;
    tracing::info!(
        character = %result.analysis.character_name,
        parts = result.analysis.parts.len(),
        materials = result.analysis.materials.len(),
        "generation succeeded"
    );
    Ok(result)
}
