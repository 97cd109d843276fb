/*!
 * Common test utilities for the cliphub test suite
 */

use anyhow::Result;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tempfile::TempDir;

use cliphub::app_controller::ArtifactSink;
use cliphub::cue_codec::Cue;
use cliphub::generator::GeneratedArtifact;
use cliphub::model::{ChannelPackage, DesignVariant, HubDocument, MediaSource, MovieMetadata, VideoItem};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Cue text with one cue from 0 to 2 seconds
pub fn one_cue_vtt(text: &str) -> String {
    cliphub::cue_codec::serialize(&[Cue::new("00:00:00.000", "00:00:02.000", text)])
}

/// Video with inline media so no file is needed
pub fn inline_video(title: &str) -> VideoItem {
    VideoItem::new(
        MovieMetadata::titled(title),
        MediaSource::inline(title.as_bytes().to_vec(), "video/mp4"),
    )
}

/// The Hello / World / Test channel used by the end-to-end tests
pub fn hello_world_channel() -> ChannelPackage {
    let mut channel = ChannelPackage::new("Greetings", "Three short clips");
    for title in ["Hello", "World", "Test"] {
        let mut video = inline_video(title);
        video.cues = one_cue_vtt(title);
        channel.videos.push(video);
    }
    channel
}

/// Hub with the given channels and secret
pub fn hub_with(channels: Vec<ChannelPackage>, secret: Option<&str>) -> HubDocument {
    let mut hub = HubDocument::new("Test Hub", DesignVariant::Netflix);
    hub.secret = secret.map(str::to_string);
    hub.channels = channels;
    hub
}

/// Sink that keeps artifacts in memory with their delivery time
#[derive(Debug, Default)]
pub struct MemorySink {
    pub delivered: Mutex<Vec<(Instant, GeneratedArtifact)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivered artifacts in order
    pub fn artifacts(&self) -> Vec<GeneratedArtifact> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|(_, artifact)| artifact.clone())
            .collect()
    }

    /// Delivery instants in order
    pub fn instants(&self) -> Vec<Instant> {
        self.delivered.lock().unwrap().iter().map(|(at, _)| *at).collect()
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    async fn deliver(&self, artifact: &GeneratedArtifact) -> Result<PathBuf> {
        self.delivered
            .lock()
            .unwrap()
            .push((Instant::now(), artifact.clone()));
        Ok(PathBuf::from(&artifact.filename))
    }
}
