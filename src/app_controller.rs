use anyhow::{Context, Result};
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::admin::{AdminSession, DocumentContent, SaveMode};
use crate::app_config::{Config, HubConfig, MIN_HUB_COMPANION_DELAY_MS, MIN_SINGLE_COMPANION_DELAY_MS};
use crate::cue_codec;
use crate::file_utils::FileManager;
use crate::generator::{ArtifactGenerator, GeneratedArtifact};
use crate::model::assembly::Assembler;
use crate::model::{
    AgeRating, ChannelPackage, DesignVariant, ExportConfig, HubDocument, MediaSource, MovieMetadata, Playlist,
    VideoItem,
};
use crate::providers::enrichment::{create_enricher, enrich_video};
use crate::providers::Enricher;

// @module: Application controller for artifact export and administration

/// Destination for finished artifacts
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Store one artifact, returning where it went
    async fn deliver(&self, artifact: &GeneratedArtifact) -> Result<PathBuf>;
}

/// Writes artifacts into a directory under their suggested filename
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn deliver(&self, artifact: &GeneratedArtifact) -> Result<PathBuf> {
        FileManager::ensure_dir(&self.dir)?;
        let path = self.dir.join(&artifact.filename);
        tokio::fs::write(&path, artifact.html.as_bytes())
            .await
            .with_context(|| format!("Failed to write artifact: {:?}", path))?;
        Ok(path)
    }
}

/// Spacing between a main artifact and its public companion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryPlan {
    pub companion_delay: Duration,
}

impl DeliveryPlan {
    /// Plan for single-media exports
    pub fn single(config: &Config) -> Self {
        Self::clamped(config.generation.single_companion_delay_ms, MIN_SINGLE_COMPANION_DELAY_MS)
    }

    /// Plan for hub exports
    pub fn hub(config: &Config) -> Self {
        Self::clamped(config.generation.hub_companion_delay_ms, MIN_HUB_COMPANION_DELAY_MS)
    }

    fn clamped(configured_ms: u64, minimum_ms: u64) -> Self {
        if configured_ms < minimum_ms {
            warn!(
                "Companion delay of {}ms is below the {}ms minimum, using the minimum",
                configured_ms, minimum_ms
            );
        }
        Self {
            companion_delay: Duration::from_millis(configured_ms.max(minimum_ms)),
        }
    }
}

/// Hub description read from a JSON manifest.
///
/// Relative paths are resolved against the manifest's directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub design: Option<DesignVariant>,
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub channels: Vec<ChannelManifest>,
}

/// One channel of a hub manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelManifest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: Option<PathBuf>,
    #[serde(default)]
    pub background_music: Option<PathBuf>,
    #[serde(default)]
    pub videos: Vec<VideoManifest>,
    #[serde(default)]
    pub playlists: Vec<PlaylistManifest>,
}

/// One video of a channel manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoManifest {
    /// Stable id for playlist references; generated when absent
    #[serde(default)]
    pub id: Option<String>,
    pub media: PathBuf,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub rating: AgeRating,
    /// WEBVTT cue file
    #[serde(default)]
    pub cues: Option<PathBuf>,
    #[serde(default)]
    pub thumbnail: Option<PathBuf>,
    #[serde(default)]
    pub config: Option<ExportConfig>,
}

/// Playlist of a channel manifest, by video id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistManifest {
    pub title: String,
    #[serde(default)]
    pub videos: Vec<String>,
}

impl HubManifest {
    /// Read a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let text = FileManager::read_to_string(path)?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse hub manifest: {:?}", path))
    }

    /// Build the hub document, reading cue, logo and thumbnail files
    pub fn into_document(self, base_dir: &Path, defaults: &HubConfig) -> Result<HubDocument> {
        let mut hub = HubDocument::new(
            self.name.unwrap_or_else(|| defaults.name.clone()),
            self.design.unwrap_or(defaults.design),
        );
        hub.secret = self.secret.filter(|s| !s.is_empty());

        for channel in self.channels {
            let mut package = ChannelPackage::new(channel.name, channel.description);
            package.logo = channel
                .logo
                .map(|p| FileManager::read_data_uri(base_dir.join(p)))
                .transpose()?;
            package.background_music = channel
                .background_music
                .map(|p| FileManager::read_data_uri(base_dir.join(p)))
                .transpose()?;

            for entry in channel.videos {
                package.videos.push(entry.into_item(base_dir)?);
            }
            for playlist in channel.playlists {
                let playlist = Playlist::new(playlist.title, playlist.videos);
                let dangling = playlist.dangling_ids(&package);
                if !dangling.is_empty() {
                    warn!(
                        "Playlist '{}' in channel '{}' references unknown video id(s): {}",
                        playlist.title,
                        package.name,
                        dangling.join(", ")
                    );
                }
                package.playlists.push(playlist);
            }
            hub.channels.push(package);
        }

        Ok(hub)
    }
}

impl VideoManifest {
    fn into_item(self, base_dir: &Path) -> Result<VideoItem> {
        let media = MediaSource::file(base_dir.join(&self.media));
        let title = self
            .title
            .or_else(|| media.stem())
            .unwrap_or_default();
        let mut item = VideoItem::new(
            MovieMetadata {
                title,
                description: self.description,
                genre: self.genre,
                age_rating: self.rating,
            },
            media,
        );
        if let Some(id) = self.id {
            item.id = id;
        }
        if let Some(cues) = self.cues {
            let text = FileManager::read_to_string(base_dir.join(cues))?;
            let mut parsed = cue_codec::parse(&text);
            cue_codec::sort_by_start(&mut parsed);
            if !parsed.is_empty() {
                item.set_cues(&parsed);
            }
        }
        item.thumbnail = self
            .thumbnail
            .map(|p| FileManager::read_data_uri(base_dir.join(p)))
            .transpose()?;
        if let Some(config) = self.config {
            item.export_config = config;
        }
        Ok(item)
    }
}

/// Action requested against an existing artifact
#[derive(Debug, Clone, PartialEq)]
pub enum AdminAction {
    List,
    AddChannel { name: String },
    DeleteChannel { index: usize },
    AddVideo { channel: usize, file: PathBuf, title: Option<String> },
    DeleteVideo { channel: usize, video: usize },
    SetSecret { secret: String },
    Backup,
    Public,
    RenameTitle { title: String },
}

/// Result of an admin run
#[derive(Debug, Clone, PartialEq)]
pub enum AdminOutcome {
    /// Listing of the live document
    Listing(String),
    /// Path of the saved artifact
    Saved(PathBuf),
}

/// Result of inspecting a cue file
#[derive(Debug, Clone, PartialEq)]
pub struct CueReport {
    /// Normalized cue text
    pub normalized: String,
    pub cue_count: usize,
    /// Timing lines that did not produce a cue
    pub dropped: usize,
    /// Cues whose timing does not parse and will never display
    pub undisplayable: usize,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    generator: ArtifactGenerator,
    enricher: Option<Arc<dyn Enricher>>,
}

impl Controller {
    /// Create a controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let enricher = create_enricher(&config.enrichment)?;
        let generator = ArtifactGenerator::new(&config.generation.watermark_text, &config.generation.lang);
        Ok(Self {
            config,
            generator,
            enricher,
        })
    }

    /// Replace the configured enricher
    pub fn with_enricher(mut self, enricher: Arc<dyn Enricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Export one media item, plus a public companion when requested and a secret is set
    pub async fn export_single(
        &self,
        video: Option<VideoItem>,
        public_copy: bool,
        enrich: bool,
        sink: &dyn ArtifactSink,
    ) -> Result<Vec<PathBuf>> {
        let start_time = Instant::now();
        let mut video = video;
        if enrich {
            if let Some(item) = video.as_mut() {
                self.enrich(std::slice::from_mut(item)).await;
            }
        }

        let progress = Self::media_progress(1);
        let assembled = Assembler::new(self.config.generation.limits())
            .with_progress(progress.clone())
            .assemble_single(video.as_ref())
            .await?;
        progress.finish_and_clear();

        let main = self.generator.render_single(&assembled)?;
        let companion = if public_copy && main.admin_enabled {
            Some(self.generator.render_single_companion(&assembled)?)
        } else {
            None
        };

        let delivered = self.deliver(main, companion, DeliveryPlan::single(&self.config), sink).await?;
        info!("Single export finished in {}", Self::format_duration(start_time.elapsed()));
        Ok(delivered)
    }

    /// Export every media file under `dir` as one channel
    pub async fn export_channel(
        &self,
        dir: &Path,
        name: &str,
        description: &str,
        sink: &dyn ArtifactSink,
    ) -> Result<Vec<PathBuf>> {
        let mut package = ChannelPackage::new(name, description);
        for path in FileManager::find_media_files(dir)? {
            let media = MediaSource::file(path);
            let title = media.stem().unwrap_or_default();
            package.videos.push(VideoItem::new(MovieMetadata::titled(title), media));
        }
        debug!("Found {} media file(s) in {:?}", package.videos.len(), dir);

        let progress = Self::media_progress(package.videos.len() as u64);
        let assembled = Assembler::new(self.config.generation.limits())
            .with_progress(progress.clone())
            .assemble_channel(&package)
            .await?;
        progress.finish_and_clear();

        let main = self.generator.render_hub(&assembled)?;
        self.deliver(main, None, DeliveryPlan::hub(&self.config), sink).await
    }

    /// Export a hub, plus a public companion when requested and a secret is set
    pub async fn export_hub(
        &self,
        mut hub: HubDocument,
        public_copy: bool,
        enrich: bool,
        sink: &dyn ArtifactSink,
    ) -> Result<Vec<PathBuf>> {
        let start_time = Instant::now();
        if enrich {
            for channel in hub.channels.iter_mut() {
                self.enrich(&mut channel.videos).await;
            }
        }

        let progress = Self::media_progress(hub.total_videos() as u64);
        let assembled = Assembler::new(self.config.generation.limits())
            .with_progress(progress.clone())
            .assemble_hub(&hub)
            .await?;
        progress.finish_and_clear();

        let main = self.generator.render_hub(&assembled)?;
        let companion = if public_copy && main.admin_enabled {
            Some(self.generator.render_hub_companion(&assembled)?)
        } else {
            None
        };

        let delivered = self.deliver(main, companion, DeliveryPlan::hub(&self.config), sink).await?;
        info!("Hub export finished in {}", Self::format_duration(start_time.elapsed()));
        Ok(delivered)
    }

    /// Load a manifest and export the hub it describes
    pub async fn export_manifest(
        &self,
        manifest_path: &Path,
        public_copy: bool,
        enrich: bool,
        sink: &dyn ArtifactSink,
    ) -> Result<Vec<PathBuf>> {
        let base_dir = manifest_path.parent().unwrap_or(Path::new("."));
        let hub = HubManifest::load(manifest_path)?.into_document(base_dir, &self.config.hub)?;
        self.export_hub(hub, public_copy, enrich, sink).await
    }

    /// Open `artifact_path`, unlock with `secret`, apply `action` and save
    pub async fn run_admin(
        &self,
        artifact_path: &Path,
        secret: &str,
        action: AdminAction,
        sink: &dyn ArtifactSink,
    ) -> Result<AdminOutcome> {
        let text = FileManager::read_to_string(artifact_path)?;
        let mut session = AdminSession::open(&text)?;
        session.unlock(secret)?;

        let mode = match action {
            AdminAction::List => {
                let listing = Self::describe(session.store()?.content());
                session.close()?;
                return Ok(AdminOutcome::Listing(listing));
            }
            AdminAction::AddChannel { name } => {
                session.add_channel(&name)?;
                SaveMode::KeepSecret
            }
            AdminAction::DeleteChannel { index } => {
                session.delete_channel(index)?;
                SaveMode::KeepSecret
            }
            AdminAction::AddVideo { channel, file, title } => {
                session.add_video(channel, &file, title.as_deref())?;
                SaveMode::KeepSecret
            }
            AdminAction::DeleteVideo { channel, video } => {
                session.delete_video(channel, video)?;
                SaveMode::KeepSecret
            }
            AdminAction::SetSecret { secret } => SaveMode::ChangeSecret(secret),
            AdminAction::Backup => SaveMode::KeepSecret,
            AdminAction::Public => SaveMode::Public,
            AdminAction::RenameTitle { title } => {
                session.rename_title(&title)?;
                SaveMode::KeepSecret
            }
        };

        let artifact = session.save(mode)?;
        let path = sink.deliver(&artifact).await?;
        info!("Saved: {:?}", path);
        Ok(AdminOutcome::Saved(path))
    }

    /// Parse and normalize a cue file
    pub fn inspect_cues(path: &Path) -> Result<CueReport> {
        let text = FileManager::read_to_string(path)?;
        let cues = cue_codec::parse(&text);
        let timing_lines = text.lines().filter(|l| l.contains("-->")).count();
        Ok(CueReport {
            normalized: cue_codec::serialize(&cues),
            cue_count: cues.len(),
            dropped: timing_lines.saturating_sub(cues.len()),
            undisplayable: cues.iter().filter(|c| !c.is_displayable()).count(),
        })
    }

    async fn enrich(&self, videos: &mut [VideoItem]) {
        let Some(enricher) = &self.enricher else {
            warn!("Enrichment requested but no provider is configured");
            return;
        };
        let options = &self.config.enrichment.options;
        for video in videos.iter_mut() {
            let report = enrich_video(enricher.as_ref(), video, options).await;
            debug!("Enriched {}: {:?}", video.media.label(), report);
        }
    }

    /// Deliver the main artifact, then the companion after the planned spacing.
    /// Both are rendered before anything is written.
    async fn deliver(
        &self,
        main: GeneratedArtifact,
        companion: Option<GeneratedArtifact>,
        plan: DeliveryPlan,
        sink: &dyn ArtifactSink,
    ) -> Result<Vec<PathBuf>> {
        let mut delivered = vec![sink.deliver(&main).await?];
        info!("Success: {:?} ({} bytes)", delivered[0], main.size());

        if let Some(companion) = companion {
            tokio::time::sleep(plan.companion_delay).await;
            let path = sink.deliver(&companion).await?;
            info!("Success: {:?} ({} bytes)", path, companion.size());
            delivered.push(path);
        }
        Ok(delivered)
    }

    fn describe(content: &DocumentContent) -> String {
        match content {
            DocumentContent::Single(video) => format!("{} [{}] {}", video.title, video.rating, video.genre),
            DocumentContent::Hub(channels) => {
                let mut out = String::new();
                for (ci, channel) in channels.iter().enumerate() {
                    out.push_str(&format!("[{}] {} ({} video(s))\n", ci, channel.meta.name, channel.content.len()));
                    for (vi, video) in channel.content.iter().enumerate() {
                        out.push_str(&format!("    [{}] {}\n", vi, video.title));
                    }
                }
                out
            }
        }
    }

    fn media_progress(total: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} media ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message("encoding");
        progress_bar
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        if total_seconds >= 60 {
            format!("{}m {}s", total_seconds / 60, total_seconds % 60)
        } else {
            format!("{}.{:03}s", total_seconds, duration.subsec_millis())
        }
    }
}
