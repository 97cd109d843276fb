/*!
 * Tests for enrichment providers
 */

use std::sync::Arc;

use async_trait::async_trait;
use cliphub::app_config::{EnrichmentConfig, EnrichmentProvider};
use cliphub::providers::enrichment::{create_enricher, enrich_video};
use cliphub::providers::mock::MockEnricher;
use cliphub::errors::ProviderError;
use cliphub::model::{MediaSource, MovieMetadata};
use cliphub::providers::{EnrichmentOptions, Enricher, SubtitleData};
use crate::common;

/// Test that the mock provider is created from configuration
#[test]
fn test_createEnricher_withMockProvider_shouldReturnMock() {
    let config = EnrichmentConfig {
        provider: EnrichmentProvider::Mock,
        ..EnrichmentConfig::default()
    };

    let enricher = create_enricher(&config).unwrap().unwrap();

    assert_eq!(enricher.name(), "mock");
}

/// Test that an Anthropic provider with a key is created without network access
#[test]
fn test_createEnricher_withAnthropicKey_shouldReturnAnthropic() {
    let config = EnrichmentConfig {
        provider: EnrichmentProvider::Anthropic,
        api_key: "sk-test".to_string(),
        ..EnrichmentConfig::default()
    };

    let enricher = create_enricher(&config).unwrap().unwrap();

    assert_eq!(enricher.name(), "anthropic");
}

/// Test that intermittent failures only affect the failing call
#[tokio::test]
async fn test_enrichVideo_withIntermittentProvider_shouldKeepTitleOnFailure() {
    let enricher: Arc<dyn Enricher> = Arc::new(MockEnricher::intermittent(2));
    let options = EnrichmentOptions::default();
    let mut first = common::inline_video("First");
    let mut second = common::inline_video("Second");

    let first_report = enrich_video(enricher.as_ref(), &mut first, &options).await;
    let second_report = enrich_video(enricher.as_ref(), &mut second, &options).await;

    assert!(first_report.metadata_updated);
    assert_eq!(second_report.failures, 1);
    assert_eq!(second.metadata.title, "Second");
}

/// Test that a provider without speech clears existing cues
#[tokio::test]
async fn test_enrichVideo_withNoSpeech_shouldClearCues() {
    let options = EnrichmentOptions {
        subtitles: true,
        ..EnrichmentOptions::none()
    };
    let mut video = common::inline_video("Quiet");
    video.cues = common::one_cue_vtt("old");

    enrich_video(&MockEnricher::empty(), &mut video, &options).await;

    assert!(video.cues.is_empty());
}

/// Provider returning fixed subtitle text and thumbnail
#[derive(Debug)]
struct FixedEnricher {
    vtt: &'static str,
    thumbnail: &'static str,
}

#[async_trait]
impl Enricher for FixedEnricher {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn generate_metadata(
        &self,
        _media: &MediaSource,
        _options: &EnrichmentOptions,
        current: &MovieMetadata,
    ) -> Result<MovieMetadata, ProviderError> {
        Ok(current.clone())
    }

    async fn generate_subtitles(&self, _media: &MediaSource) -> Result<SubtitleData, ProviderError> {
        Ok(SubtitleData {
            has_speech: true,
            vtt_content: self.vtt.to_string(),
        })
    }

    async fn generate_thumbnail(&self, _title: &str, _genre: &str, _description: &str) -> Result<Option<String>, ProviderError> {
        Ok(Some(self.thumbnail.to_string()))
    }
}

/// Test that generated cues are stored in time order
#[tokio::test]
async fn test_enrichVideo_withUnorderedSubtitles_shouldSortByStart() {
    let enricher = FixedEnricher {
        vtt: "WEBVTT\n\n00:00:05.000 --> 00:00:06.000\nLater\n\n00:00:01.000 --> 00:00:02.000\nEarlier\n\n",
        thumbnail: "data:image/png;base64,AQID",
    };
    let options = EnrichmentOptions {
        subtitles: true,
        ..EnrichmentOptions::none()
    };
    let mut video = common::inline_video("Talk");

    let report = enrich_video(&enricher, &mut video, &options).await;

    assert!(report.subtitles_updated);
    let texts: Vec<String> = video.parsed_cues().into_iter().map(|c| c.text).collect();
    assert_eq!(texts, vec!["Earlier", "Later"]);
}

/// Test that thumbnails which are not image data URIs are discarded
#[tokio::test]
async fn test_enrichVideo_withInvalidThumbnail_shouldDiscardIt() {
    let options = EnrichmentOptions {
        thumbnail: true,
        ..EnrichmentOptions::none()
    };

    for thumbnail in ["https://example.com/poster.png", "data:video/mp4;base64,AQID", "data:image/png;base64,!!"] {
        let enricher = FixedEnricher { vtt: "", thumbnail };
        let mut video = common::inline_video("Poster");

        let report = enrich_video(&enricher, &mut video, &options).await;

        assert!(video.thumbnail.is_none(), "kept {}", thumbnail);
        assert_eq!(report.failures, 1);
        assert!(!report.thumbnail_updated);
    }

    let enricher = FixedEnricher {
        vtt: "",
        thumbnail: "data:image/png;base64,AQID",
    };
    let mut video = common::inline_video("Poster");
    enrich_video(&enricher, &mut video, &options).await;
    assert_eq!(video.thumbnail.as_deref(), Some("data:image/png;base64,AQID"));
}
