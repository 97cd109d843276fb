/*!
 * In-memory document model.
 *
 * Authoring-side representation of videos, channels and hubs. Entities
 * live only until the generator consumes them; the artifact text is the
 * only thing that persists.
 *
 * - `media`: media sources and data URI encoding
 * - `wire`: the JSON shape embedded in generated artifacts
 * - `assembly`: turns authoring entities into the embedded shape
 */

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::cue_codec::{self, Cue};

pub mod assembly;
pub mod media;
pub mod wire;

pub use media::{MediaAsset, MediaSource};

/// Age rating of a video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AgeRating {
    #[default]
    #[serde(rename = "L")]
    General,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "12")]
    Twelve,
    #[serde(rename = "14")]
    Fourteen,
    #[serde(rename = "16")]
    Sixteen,
    #[serde(rename = "18")]
    Eighteen,
}

impl AgeRating {
    /// Every rating in ascending order
    pub const ALL: [AgeRating; 6] = [
        Self::General,
        Self::Ten,
        Self::Twelve,
        Self::Fourteen,
        Self::Sixteen,
        Self::Eighteen,
    ];

    /// Label as shown on the rating badge
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "L",
            Self::Ten => "10",
            Self::Twelve => "12",
            Self::Fourteen => "14",
            Self::Sixteen => "16",
            Self::Eighteen => "18",
        }
    }

    /// Badge color for the rating
    pub fn badge_color(&self) -> &'static str {
        match self {
            Self::General => "#0c9447",
            Self::Ten => "#0f7dc2",
            Self::Twelve => "#f8c411",
            Self::Fourteen => "#e67824",
            Self::Sixteen => "#db2827",
            Self::Eighteen => "#1a1a1a",
        }
    }
}

impl fmt::Display for AgeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeRating {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|rating| rating.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("Invalid age rating: {} (expected one of L, 10, 12, 14, 16, 18)", s))
    }
}

/// Presentation variant of a hub artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DesignVariant {
    #[default]
    Netflix,
    Youtube,
    Custom,
}

impl DesignVariant {
    /// Lowercase tag used in the artifact
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Netflix => "netflix",
            Self::Youtube => "youtube",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for DesignVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DesignVariant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "netflix" => Ok(Self::Netflix),
            "youtube" => Ok(Self::Youtube),
            "custom" => Ok(Self::Custom),
            _ => Err(anyhow!("Invalid design variant: {}", s)),
        }
    }
}

/// Descriptive metadata of a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MovieMetadata {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub age_rating: AgeRating,
}

impl MovieMetadata {
    /// Metadata with only a title set
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Subtitle presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleStyle {
    /// Font size in rem
    pub font_size: f64,
    /// Distance from the bottom edge in percent
    pub bottom_offset: f64,
    /// Background opacity between 0 and 1
    pub bg_opacity: f64,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font_size: 1.5,
            bottom_offset: 10.0,
            bg_opacity: 0.6,
        }
    }
}

/// Per-video export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    #[serde(default = "default_true")]
    pub show_watermark: bool,
    #[serde(default)]
    pub trim_start: f64,
    #[serde(default)]
    pub trim_end: f64,
    #[serde(default, rename = "subStyle")]
    pub subtitle_style: SubtitleStyle,
    #[serde(default = "default_true")]
    pub allow_subtitle_toggle: bool,
    /// Admin secret for single-media exports; never written to a data segment
    #[serde(default, rename = "adminPassword", skip_serializing)]
    pub secret: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            show_watermark: true,
            trim_start: 0.0,
            trim_end: 0.0,
            subtitle_style: SubtitleStyle::default(),
            allow_subtitle_toggle: true,
            secret: None,
        }
    }
}

impl ExportConfig {
    /// The configured secret, empty when unprotected
    pub fn secret_or_empty(&self) -> &str {
        self.secret.as_deref().unwrap_or_default()
    }

    /// Copy of this config without a secret
    pub fn without_secret(&self) -> Self {
        Self {
            secret: None,
            ..self.clone()
        }
    }
}

fn default_true() -> bool {
    true
}

/// A video (or audio) item inside a channel
#[derive(Debug, Clone)]
pub struct VideoItem {
    /// Unique within the owning channel
    pub id: String,
    pub metadata: MovieMetadata,
    pub media: MediaSource,
    /// Thumbnail as a data URI
    pub thumbnail: Option<String>,
    /// Cue text in WEBVTT form, empty when the video has no subtitles
    pub cues: String,
    pub export_config: ExportConfig,
}

impl VideoItem {
    /// Create a video with default export settings and no subtitles
    pub fn new(metadata: MovieMetadata, media: MediaSource) -> Self {
        Self {
            id: new_item_id(),
            metadata,
            media,
            thumbnail: None,
            cues: String::new(),
            export_config: ExportConfig::default(),
        }
    }

    /// Replace the cue text with the serialized form of `cues`
    pub fn set_cues(&mut self, cues: &[Cue]) {
        self.cues = cue_codec::serialize(cues);
    }

    /// Parsed cues of this video
    pub fn parsed_cues(&self) -> Vec<Cue> {
        cue_codec::parse(&self.cues)
    }
}

/// Ordered list of video ids inside a channel.
///
/// Ids are not checked against the channel's videos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub video_ids: Vec<String>,
}

impl Playlist {
    pub fn new(title: impl Into<String>, video_ids: Vec<String>) -> Self {
        Self {
            id: new_item_id(),
            title: title.into(),
            video_ids,
        }
    }

    /// Ids that do not name a video of `channel`
    pub fn dangling_ids<'a>(&'a self, channel: &ChannelPackage) -> Vec<&'a str> {
        self.video_ids
            .iter()
            .filter(|id| !channel.videos.iter().any(|v| &v.id == *id))
            .map(String::as_str)
            .collect()
    }
}

/// A channel with its videos and playlists
#[derive(Debug, Clone)]
pub struct ChannelPackage {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Logo as a data URI
    pub logo: Option<String>,
    /// Background music as a data URI
    pub background_music: Option<String>,
    pub videos: Vec<VideoItem>,
    pub playlists: Vec<Playlist>,
}

impl ChannelPackage {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: new_item_id(),
            name: name.into(),
            description: description.into(),
            logo: None,
            background_music: None,
            videos: Vec::new(),
            playlists: Vec::new(),
        }
    }
}

/// Top-level hub aggregating several channels
#[derive(Debug, Clone)]
pub struct HubDocument {
    pub name: String,
    pub design: DesignVariant,
    pub secret: Option<String>,
    pub channels: Vec<ChannelPackage>,
}

impl HubDocument {
    pub fn new(name: impl Into<String>, design: DesignVariant) -> Self {
        Self {
            name: name.into(),
            design,
            secret: None,
            channels: Vec::new(),
        }
    }

    /// The configured secret, empty when unprotected
    pub fn secret_or_empty(&self) -> &str {
        self.secret.as_deref().unwrap_or_default()
    }

    /// Total number of videos across all channels
    pub fn total_videos(&self) -> usize {
        self.channels.iter().map(|c| c.videos.len()).sum()
    }
}

/// Random short id for authoring entities
pub fn new_item_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..9].to_string()
}
