//! Error taxonomy for a generation request.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can end a call to [`crate::orchestrator::generate`].
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("API key is missing")]
    MissingCredential,

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("No response from AI")]
    EmptyResponse,

    #[error(transparent)]
    SchemaViolation(#[from] SchemaViolation),

    #[error("generation was cancelled")]
    Cancelled,
}

/// The image asset could not be turned into a transport payload.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("failed to read image '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("image asset is empty")]
    Empty,

    #[error("unsupported media type '{0}', expected an image")]
    UnsupportedMediaType(String),
}

/// The outbound call to the generative service failed.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request to generative service failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("generative service returned {code}: {message}")]
    Status { code: u16, message: String },

    #[error("prompt was blocked by the generative service: {0}")]
    Blocked(String),

    #[error("could not read generative service response: {0}")]
    InvalidEnvelope(String),
}

/// The returned payload does not satisfy the schema contract.
#[derive(Debug, Error)]
pub enum SchemaViolation {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("response does not match the schema: {0}")]
    Structure(#[source] serde_json::Error),

    #[error("response does not match the schema: {path} {reason}")]
    Constraint { path: String, reason: String },
}

/// Misuse of the session state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a generation request is already in progress")]
    Busy,

    #[error("no image selected")]
    NoAsset,

    #[error("cannot {action} while {state}")]
    InvalidTransition { action: &'static str, state: &'static str },
}
