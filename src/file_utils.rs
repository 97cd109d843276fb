use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @const: Extension to mime type table for embedded payloads
const MIME_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/mp4"),
    ("webm", "video/webm"),
    ("ogv", "video/ogg"),
    ("mov", "video/quicktime"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("wav", "audio/wav"),
    ("ogg", "audio/ogg"),
    ("flac", "audio/flac"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("vtt", "text/vtt"),
    ("html", "text/html"),
];

// @const: Fallback for unknown extensions
const DEFAULT_MIME: &str = "application/octet-stream";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path).with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @returns: Mime type guessed from the extension
    pub fn detect_mime<P: AsRef<Path>>(path: P) -> &'static str {
        let Some(ext) = path.as_ref().extension() else {
            return DEFAULT_MIME;
        };
        let ext = ext.to_string_lossy().to_lowercase();
        MIME_TYPES
            .iter()
            .find(|(known, _)| *known == ext)
            .map_or(DEFAULT_MIME, |(_, mime)| mime)
    }

    /// Classify a file by extension
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(anyhow!("File does not exist: {:?}", path));
        }

        let mime = Self::detect_mime(path);
        let file_type = if mime.starts_with("video/") {
            FileType::Video
        } else if mime.starts_with("audio/") {
            FileType::Audio
        } else if mime.starts_with("image/") {
            FileType::Image
        } else if mime == "text/vtt" {
            FileType::Subtitle
        } else if mime == "text/html" {
            FileType::Artifact
        } else {
            FileType::Unknown
        };
        Ok(file_type)
    }

    /// Find video and audio files under `dir`, sorted by path
    pub fn find_media_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !Self::dir_exists(dir) {
            return Err(anyhow!("Directory does not exist: {:?}", dir));
        }

        let mut result = Vec::new();
        for entry in WalkDir::new(dir).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if matches!(Self::detect_file_type(path)?, FileType::Video | FileType::Audio) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path).with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating parent directories
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content).with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Read a file and encode it as a data URI
    pub fn read_data_uri<P: AsRef<Path>>(path: P) -> Result<String> {
        let asset = crate::model::MediaAsset::read_blocking(path.as_ref())?;
        Ok(asset.to_data_uri())
    }
}

/// Enum representing different file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    Video,
    Audio,
    Image,
    /// WEBVTT cue file
    Subtitle,
    /// Previously generated artifact
    Artifact,
    Unknown,
}
