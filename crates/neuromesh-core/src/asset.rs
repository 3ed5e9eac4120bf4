//! Image assets and their transport encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::{Path, PathBuf};

use crate::error::EncodingError;

/// Where the bytes of an asset live until it is encoded.
#[derive(Debug, Clone)]
pub enum AssetSource {
    /// Raw bytes already held in memory.
    Bytes(Vec<u8>),
    /// A file on the local filesystem, read when the asset is encoded.
    LocalPath(PathBuf),
}

/// A user-supplied image, owned by the caller for the duration of one request.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub source: AssetSource,
    pub mime_type: String,
    pub file_name: Option<String>,
}

/// Base64 text plus the original MIME type, ready to embed in a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    pub data: String,
    pub mime_type: String,
}

impl ImageAsset {
    pub fn from_bytes(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        ImageAsset { source: AssetSource::Bytes(bytes), mime_type: mime_type.into(), file_name: None }
    }

    /// References an image on disk, inferring its MIME type from the extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, EncodingError> {
        let path = path.into();
        let mime_type = mime_type_for(&path).ok_or_else(|| {
            let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
            EncodingError::UnsupportedMediaType(format!(".{}", ext))
        })?;
        let file_name = path.file_name().map(|s| s.to_string_lossy().to_string());
        Ok(ImageAsset {
            source: AssetSource::LocalPath(path),
            mime_type: mime_type.to_string(),
            file_name,
        })
    }

    /// Size in bytes, when it can be known without reading the file.
    pub fn size_bytes(&self) -> Option<u64> {
        match &self.source {
            AssetSource::Bytes(bytes) => Some(bytes.len() as u64),
            AssetSource::LocalPath(path) => std::fs::metadata(path).ok().map(|m| m.len()),
        }
    }
}

/// Reads the full asset and encodes it for transport.
pub async fn encode(asset: &ImageAsset) -> Result<EncodedPayload, EncodingError> {
    if !asset.mime_type.starts_with("image/") {
        return Err(EncodingError::UnsupportedMediaType(asset.mime_type.clone()));
    }

    let data = match &asset.source {
        AssetSource::Bytes(bytes) => STANDARD.encode(bytes),
        AssetSource::LocalPath(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|source| EncodingError::Read { path: path.clone(), source })?;
            STANDARD.encode(bytes)
        }
    };

    if data.is_empty() {
        return Err(EncodingError::Empty);
    }

    Ok(EncodedPayload { data, mime_type: asset.mime_type.clone() })
}

fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}
