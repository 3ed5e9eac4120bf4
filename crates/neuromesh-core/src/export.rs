//! Downloadable artifacts derived from a [`GenerationResult`].

use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::models::GenerationResult;

pub const SCRIPT_SUFFIX: &str = "_builder.py";
pub const SCRIPT_MIME_TYPE: &str = "text/x-python";
pub const ANALYSIS_SUFFIX: &str = "_analysis.json";
pub const ANALYSIS_MIME_TYPE: &str = "application/json";

/// Used when a character name slugs to nothing.
const FALLBACK_SLUG: &str = "character";

/// A named file ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

impl Artifact {
    /// Writes the artifact into `dir`, replacing any file of the same name.
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.contents)?;
        tracing::info!(path = %path.display(), mime_type = self.mime_type, "wrote artifact");
        Ok(path)
    }
}

/// Lowercases `name` and collapses every whitespace run into one underscore.
///
/// Nothing else is escaped.
pub fn slugify(name: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
    whitespace.replace_all(&name.to_lowercase(), "_").into_owned()
}

fn file_stem(result: &GenerationResult) -> String {
    let slug = slugify(&result.analysis.character_name);
    if slug.is_empty() || slug == "_" {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// The build script as `<slug>_builder.py`.
pub fn script_artifact(result: &GenerationResult) -> Artifact {
    Artifact {
        file_name: format!("{}{}", file_stem(result), SCRIPT_SUFFIX),
        mime_type: SCRIPT_MIME_TYPE,
        contents: result.script.clone(),
    }
}

/// The whole result, pretty-printed, as `<slug>_analysis.json`.
pub fn analysis_artifact(result: &GenerationResult) -> Result<Artifact, serde_json::Error> {
    Ok(Artifact {
        file_name: format!("{}{}", file_stem(result), ANALYSIS_SUFFIX),
        mime_type: ANALYSIS_MIME_TYPE,
        contents: serde_json::to_string_pretty(result)?,
    })
}
