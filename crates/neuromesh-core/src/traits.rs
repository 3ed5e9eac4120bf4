use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

use crate::asset::EncodedPayload;
use crate::error::ServiceError;

/// An opaque API key. Never printed in full.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Credential(key.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("Credential(<empty>)")
        } else {
            f.write_str("Credential(****)")
        }
    }
}

impl From<String> for Credential {
    fn from(key: String) -> Self {
        Credential(key)
    }
}

impl From<&str> for Credential {
    fn from(key: &str) -> Self {
        Credential(key.to_string())
    }
}

/// One structured-output request: an image, an instruction, and the schema
/// the reply must follow.
#[derive(Debug, Clone)]
pub struct ServiceRequest<'a> {
    pub model: &'a str,
    pub image: &'a EncodedPayload,
    pub instruction: &'a str,
    pub response_mime_type: &'a str,
    pub response_schema: &'a Value,
}

/// A hosted generative model.
///
/// Returns the reply text, or `None` when the call succeeded without any.
#[async_trait]
pub trait GenerativeService: Send + Sync {
    async fn generate_content(
        &self,
        request: &ServiceRequest<'_>,
        credential: &Credential,
    ) -> Result<Option<String>, ServiceError>;
}
