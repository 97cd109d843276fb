use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::file_utils::FileManager;

// @module: Media payloads and data URI encoding

/// Where a video's bytes come from
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSource {
    /// A file on disk; mime type is detected from the extension
    File(PathBuf),
    /// Bytes already in memory
    Inline {
        bytes: Vec<u8>,
        mime: String,
    },
}

impl MediaSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn inline(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self::Inline {
            bytes,
            mime: mime.into(),
        }
    }

    /// Human-readable label for logs and errors
    pub fn label(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Inline { mime, bytes } => format!("<inline {} ({} bytes)>", mime, bytes.len()),
        }
    }

    /// File stem usable as a default title
    pub fn stem(&self) -> Option<String> {
        match self {
            Self::File(path) => path.file_stem().map(|s| s.to_string_lossy().to_string()),
            Self::Inline { .. } => None,
        }
    }

    /// Read the payload. This is the only suspension point of assembly.
    pub async fn load(&self) -> Result<MediaAsset> {
        match self {
            Self::File(path) => MediaAsset::read(path).await,
            Self::Inline { bytes, mime } => Ok(MediaAsset {
                mime: mime.clone(),
                bytes: bytes.clone(),
            }),
        }
    }
}

/// Binary payload plus mime type
#[derive(Debug, Clone, PartialEq)]
pub struct MediaAsset {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl MediaAsset {
    /// Read a file asynchronously
    pub async fn read(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read media file: {:?}", path))?;
        Ok(Self {
            mime: FileManager::detect_mime(path).to_string(),
            bytes,
        })
    }

    /// Read a file synchronously, as the in-artifact admin console does
    pub fn read_blocking(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read media file: {:?}", path))?;
        Ok(Self {
            mime: FileManager::detect_mime(path).to_string(),
            bytes,
        })
    }

    /// Encode as `data:<mime>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Decode a base64 data URI
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| anyhow!("Not a data URI"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| anyhow!("Data URI has no payload separator"))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| anyhow!("Only base64 data URIs are supported"))?;
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| anyhow!("Data URI base64 decode failed: {}", e))?;
        Ok(Self {
            mime: mime.to_string(),
            bytes,
        })
    }
}
