/*!
 * Enrichment providers.
 *
 * An enricher is the external collaborator that suggests metadata,
 * subtitles and thumbnails for a media item. Its answers are opaque
 * strings; the merge rules live in `enrichment`.
 *
 * - `anthropic`: Anthropic Messages API client
 * - `mock`: deterministic provider for tests
 * - `enrichment`: option handling and fallback merge
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::model::{MediaSource, MovieMetadata};

pub mod anthropic;
pub mod enrichment;
pub mod mock;

/// Generated subtitle payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleData {
    /// Whether speech or lyrics were detected
    #[serde(default)]
    pub has_speech: bool,
    /// Cue text in WEBVTT form
    #[serde(default)]
    pub vtt_content: String,
}

/// Which fields an enrichment pass may replace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentOptions {
    pub title: bool,
    pub description: bool,
    pub genre: bool,
    pub rating: bool,
    pub subtitles: bool,
    pub thumbnail: bool,
}

impl Default for EnrichmentOptions {
    fn default() -> Self {
        Self {
            title: true,
            description: true,
            genre: true,
            rating: true,
            subtitles: false,
            thumbnail: false,
        }
    }
}

impl EnrichmentOptions {
    /// Whether any metadata field is requested
    pub fn wants_metadata(&self) -> bool {
        self.title || self.description || self.genre || self.rating
    }

    /// Options with every field disabled
    pub fn none() -> Self {
        Self {
            title: false,
            description: false,
            genre: false,
            rating: false,
            subtitles: false,
            thumbnail: false,
        }
    }
}

/// Common trait for enrichment providers
#[async_trait]
pub trait Enricher: Send + Sync + Debug {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Suggest metadata for `media`; fields not requested may be returned as-is
    async fn generate_metadata(
        &self,
        media: &MediaSource,
        options: &EnrichmentOptions,
        current: &MovieMetadata,
    ) -> Result<MovieMetadata, ProviderError>;

    /// Transcribe `media` into cue text
    async fn generate_subtitles(&self, media: &MediaSource) -> Result<SubtitleData, ProviderError>;

    /// Produce a thumbnail as a data URI, or `None` when nothing was generated
    async fn generate_thumbnail(
        &self,
        title: &str,
        genre: &str,
        description: &str,
    ) -> Result<Option<String>, ProviderError>;
}
