// @module: Enrichment pass over authoring entities

use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::{debug, info, warn};

use crate::app_config::{EnrichmentConfig, EnrichmentProvider};
use crate::cue_codec;
use crate::model::{MediaAsset, VideoItem};

use super::anthropic::{Anthropic, AnthropicEnricher};
use super::mock::MockEnricher;
use super::{EnrichmentOptions, Enricher};

/// Build the enricher named by the configuration, `None` when disabled
pub fn create_enricher(config: &EnrichmentConfig) -> Result<Option<Arc<dyn Enricher>>> {
    match config.provider {
        EnrichmentProvider::None => Ok(None),
        EnrichmentProvider::Mock => Ok(Some(Arc::new(MockEnricher::working()))),
        EnrichmentProvider::Anthropic => {
            if config.api_key.trim().is_empty() {
                return Err(anyhow!("Anthropic enrichment requires an API key"));
            }
            let client = Anthropic::new(&config.api_key, &config.endpoint, config.timeout_secs);
            Ok(Some(Arc::new(AnthropicEnricher::new(client, &config.model))))
        }
    }
}

/// What an enrichment pass changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentReport {
    pub metadata_updated: bool,
    pub subtitles_updated: bool,
    pub thumbnail_updated: bool,
    /// Provider failures that were absorbed
    pub failures: usize,
}

/// Apply the requested enrichments to `video`.
///
/// Provider failures never abort: metadata keeps its current values,
/// subtitles become empty and the thumbnail stays absent.
pub async fn enrich_video(
    enricher: &dyn Enricher,
    video: &mut VideoItem,
    options: &EnrichmentOptions,
) -> EnrichmentReport {
    let mut report = EnrichmentReport::default();

    if options.wants_metadata() {
        match enricher.generate_metadata(&video.media, options, &video.metadata).await {
            Ok(suggested) => {
                report.metadata_updated = suggested != video.metadata;
                video.metadata = suggested;
            }
            Err(e) => {
                warn!("{}: metadata enrichment failed for {}: {}", enricher.name(), video.media.label(), e);
                report.failures += 1;
            }
        }
    }

    if options.subtitles {
        match enricher.generate_subtitles(&video.media).await {
            Ok(data) if data.has_speech => {
                let mut cues = cue_codec::parse(&data.vtt_content);
                cue_codec::sort_by_start(&mut cues);
                video.cues = if cues.is_empty() { String::new() } else { cue_codec::serialize(&cues) };
                report.subtitles_updated = !video.cues.is_empty();
            }
            Ok(_) => {
                info!("{}: no speech detected in {}", enricher.name(), video.media.label());
                video.cues.clear();
            }
            Err(e) => {
                warn!("{}: subtitle generation failed for {}: {}", enricher.name(), video.media.label(), e);
                video.cues.clear();
                report.failures += 1;
            }
        }
    }

    if options.thumbnail {
        let meta = &video.metadata;
        match enricher.generate_thumbnail(&meta.title, &meta.genre, &meta.description).await {
            Ok(Some(uri)) => match MediaAsset::from_data_uri(&uri) {
                Ok(asset) if asset.mime.starts_with("image/") => {
                    debug!("{}: thumbnail for {} ({} bytes)", enricher.name(), video.media.label(), asset.bytes.len());
                    video.thumbnail = Some(uri);
                    report.thumbnail_updated = true;
                }
                Ok(asset) => {
                    warn!("{}: discarding thumbnail of type {}", enricher.name(), asset.mime);
                    report.failures += 1;
                }
                Err(e) => {
                    warn!("{}: discarding malformed thumbnail: {}", enricher.name(), e);
                    report.failures += 1;
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!("{}: thumbnail generation failed for {}: {}", enricher.name(), video.media.label(), e);
                report.failures += 1;
            }
        }
    }

    report
}
