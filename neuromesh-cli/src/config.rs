//! Runtime configuration resolved once from flags and the environment.

use clap::{Args, ValueEnum};
use neuromesh_core::{Credential, OrchestratorConfig, DEFAULT_MODEL};
use neuromesh_gemini::DEFAULT_ENDPOINT;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ServiceArgs {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, default_value = "")]
    pub api_key: String,
    /// The model used for analysis
    #[arg(long, env = "NEUROMESH_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,
    /// Base URL of the generative service
    #[arg(long, env = "NEUROMESH_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Directory the exported files are written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
    /// Which artifacts to write
    #[arg(long, value_enum, default_value_t = ExportSelection::All)]
    pub export: ExportSelection,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportSelection {
    All,
    Script,
    Analysis,
    None,
}

impl ExportSelection {
    pub fn script(self) -> bool {
        matches!(self, ExportSelection::All | ExportSelection::Script)
    }

    pub fn analysis(self) -> bool {
        matches!(self, ExportSelection::All | ExportSelection::Analysis)
    }
}

/// Everything needed to talk to the generative service.
#[derive(Debug, Clone)]
pub struct Config {
    pub orchestrator: OrchestratorConfig,
    pub endpoint: String,
}

impl Config {
    /// The credential is passed through as given; an empty key is reported
    /// by the orchestrator.
    pub fn from_args(args: &ServiceArgs) -> Self {
        Config {
            orchestrator: OrchestratorConfig::new(Credential::new(args.api_key.clone())).with_model(args.model.clone()),
            endpoint: args.endpoint.clone(),
        }
    }
}
