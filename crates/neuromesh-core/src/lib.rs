//! Character concept art in, block-out analysis and build script out.
//!
//! [`orchestrator::generate`] sends one image to a [`traits::GenerativeService`]
//! under the [`schema`] contract and returns a validated
//! [`models::GenerationResult`]; [`export`] turns that result into files.

pub mod asset;
pub mod clipboard;
pub mod error;
pub mod export;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod schema;
pub mod session;
pub mod traits;

#[cfg(test)]
mod testing;

pub use asset::{AssetSource, EncodedPayload, ImageAsset};
pub use error::{EncodingError, GenerateError, SchemaViolation, ServiceError, SessionError};
pub use models::{CharacterAnalysis, Complexity, GenerationResult, MaterialSpec, MeshPart, PrimitiveType};
pub use orchestrator::{generate, Orchestrator, OrchestratorConfig, DEFAULT_MODEL};
pub use traits::{Credential, GenerativeService, ServiceRequest};
