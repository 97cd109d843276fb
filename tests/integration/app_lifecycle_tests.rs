/*!
 * Integration tests for the application lifecycle: configuration,
 * manifests and cue inspection through the controller
 */

use anyhow::Result;
use cliphub::app_config::{Config, EnrichmentProvider};
use cliphub::app_controller::{Controller, HubManifest};
use cliphub::cue_codec;
use cliphub::generator::contract::{ArtifactLayout, ACTIVATION_ATTRIBUTE};
use cliphub::model::wire::{StoredChannel, StoredVideo};
use cliphub::model::{AgeRating, DesignVariant};
use cliphub::GenerationError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use crate::common::{self, MemorySink};

const MANIFEST: &str = r#"{
    "name": "Studio",
    "design": "youtube",
    "secret": "pw",
    "channels": [
        {
            "name": "Travel",
            "description": "Trips",
            "logo": "logo.png",
            "videos": [
                { "id": "v1", "media": "media/beach.mp4", "cues": "beach.vtt", "rating": "12", "genre": "Travel" },
                { "id": "v2", "media": "media/hills.mp4", "title": "The Hills" }
            ],
            "playlists": [
                { "title": "Best of", "videos": ["v2", "missing"] }
            ]
        },
        {
            "name": "Music",
            "videos": [ { "media": "media/song.mp3" } ]
        }
    ]
}"#;

fn write_manifest_tree(dir: &Path) -> Result<()> {
    fs::create_dir(dir.join("media"))?;
    common::create_test_file(&dir.join("media"), "beach.mp4", b"beach")?;
    common::create_test_file(&dir.join("media"), "hills.mp4", b"hills")?;
    common::create_test_file(&dir.join("media"), "song.mp3", b"song")?;
    common::create_test_file(dir, "logo.png", &[1, 2, 3])?;
    common::create_test_file(dir, "beach.vtt", common::one_cue_vtt("Waves").as_bytes())?;
    common::create_test_file(dir, "hub.json", MANIFEST.as_bytes())?;
    Ok(())
}

/// A manifest with files next to it becomes a hub document
#[test]
fn test_manifest_intoDocument_shouldResolveFilesAndKeepDanglingPlaylistIds() -> Result<()> {
    let dir = TempDir::new()?;
    write_manifest_tree(dir.path())?;
    let config = Config::default();

    let hub = HubManifest::load(&dir.path().join("hub.json"))?.into_document(dir.path(), &config.hub)?;

    assert_eq!(hub.name, "Studio");
    assert_eq!(hub.design, DesignVariant::Youtube);
    assert_eq!(hub.secret.as_deref(), Some("pw"));
    assert_eq!(hub.total_videos(), 3);

    let travel = &hub.channels[0];
    assert_eq!(travel.logo.as_deref(), Some("data:image/png;base64,AQID"));
    assert_eq!(travel.videos[0].metadata.title, "beach");
    assert_eq!(travel.videos[0].metadata.age_rating, AgeRating::Twelve);
    assert_eq!(travel.videos[0].parsed_cues()[0].text, "Waves");
    assert_eq!(travel.videos[1].metadata.title, "The Hills");
    assert_eq!(travel.playlists[0].dangling_ids(travel), vec!["missing"]);
    assert_eq!(hub.channels[1].videos[0].metadata.title, "song");
    Ok(())
}

/// Cue files listed out of order are stored in time order
#[test]
fn test_manifest_withUnorderedCueFile_shouldSortCues() -> Result<()> {
    let dir = TempDir::new()?;
    common::create_test_file(dir.path(), "talk.mp4", b"talk")?;
    common::create_test_file(
        dir.path(),
        "talk.vtt",
        b"WEBVTT\n\n2\n00:00:09.000 --> 00:00:10.000\nSecond\n\n1\n00:00:01.000 --> 00:00:02.000\nFirst\n\n",
    )?;
    let manifest: HubManifest = serde_json::from_str(
        r#"{ "channels": [ { "name": "Talks", "videos": [ { "media": "talk.mp4", "cues": "talk.vtt" } ] } ] }"#,
    )?;

    let hub = manifest.into_document(dir.path(), &Config::default().hub)?;

    let cues = hub.channels[0].videos[0].parsed_cues();
    assert_eq!(cues[0].text, "First");
    assert_eq!(cues[1].text, "Second");
    Ok(())
}

/// A manifest without a name takes the configured hub name
#[test]
fn test_manifest_withoutName_shouldUseConfiguredDefaults() -> Result<()> {
    let dir = TempDir::new()?;
    let mut config = Config::default();
    config.hub.name = "Family Hub".to_string();

    let manifest: HubManifest = serde_json::from_str(r#"{ "channels": [] }"#)?;
    let hub = manifest.into_document(dir.path(), &config.hub)?;

    assert_eq!(hub.name, "Family Hub");
    assert_eq!(hub.design, config.hub.design);
    assert!(hub.secret.is_none());
    Ok(())
}

/// Exporting a manifest writes the admin artifact and its public companion
#[tokio::test]
async fn test_exportManifest_withPublicCopy_shouldDeliverBothArtifacts() -> Result<()> {
    let dir = TempDir::new()?;
    write_manifest_tree(dir.path())?;
    let controller = Controller::new_for_test()?;
    let sink = MemorySink::new();

    controller.export_manifest(&dir.path().join("hub.json"), true, false, &sink).await?;

    let artifacts = sink.artifacts();
    assert_eq!(artifacts.len(), 2);
    assert_eq!(artifacts[0].filename, "Studio_ADM.html");
    assert_eq!(artifacts[1].filename, "Studio_PUBLICO.html");
    assert!(!artifacts[1].html.contains(ACTIVATION_ATTRIBUTE));

    let channels: Vec<StoredChannel> = ArtifactLayout::parse(&artifacts[1].html)?.decode()?;
    assert_eq!(channels[0].meta.name, "Travel");
    assert_eq!(channels[0].content[0].src, "data:video/mp4;base64,YmVhY2g=");
    assert_eq!(channels[0].playlists[0].video_ids, vec!["v2", "missing"]);
    assert_eq!(channels[1].content[0].src, "data:audio/mpeg;base64,c29uZw==");
    Ok(())
}

/// A manifest pointing at a missing media file fails without output
#[tokio::test]
async fn test_exportManifest_withMissingMedia_shouldFail() -> Result<()> {
    let dir = TempDir::new()?;
    write_manifest_tree(dir.path())?;
    fs::remove_file(dir.path().join("media").join("hills.mp4"))?;
    let controller = Controller::new_for_test()?;
    let sink = MemorySink::new();

    let result = controller.export_manifest(&dir.path().join("hub.json"), false, false, &sink).await;

    assert!(matches!(
        result.unwrap_err().downcast_ref::<GenerationError>(),
        Some(GenerationError::MediaRead { .. })
    ));
    assert!(sink.artifacts().is_empty());
    Ok(())
}

/// A configuration file drives the controller, including mock enrichment
#[test]
fn test_controller_withMockEnrichmentConfig_shouldEnrichBeforeExport() -> Result<()> {
    let dir = TempDir::new()?;
    let config_path = dir.path().join("cliphub.json");
    let mut config = Config::load_or_create(&config_path)?;
    config.enrichment.provider = EnrichmentProvider::Mock;
    config.validate()?;
    let controller = Controller::with_config(config)?;
    let media = common::create_test_file(dir.path(), "lake.mp4", b"lake")?;
    let video = cliphub::VideoItem::new(
        cliphub::MovieMetadata::titled("lake"),
        cliphub::MediaSource::file(media),
    );
    let sink = MemorySink::new();

    tokio_test::block_on(async { controller.export_single(Some(video), false, true, &sink).await })?;

    let stored: StoredVideo = ArtifactLayout::parse(&sink.artifacts()[0].html)?.decode()?;
    assert_eq!(stored.title, "[AI] lake");
    assert_eq!(stored.desc, "Generated synopsis of lake");
    assert_eq!(stored.rating, AgeRating::Twelve);
    assert!(stored.vtt.is_empty());
    assert_eq!(sink.artifacts()[0].filename, "_AI__lake.html");
    Ok(())
}

/// Inspecting a cue file reports what parsing dropped
#[test]
fn test_inspectCues_withMalformedInput_shouldReportDropsAndUndisplayableCues() -> Result<()> {
    let dir = TempDir::new()?;
    let text = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\n00:00:03.000 --> 00:00:04.000\nSecond\n\nbad --> worse\nBroken\n\n";
    let path = common::create_test_file(dir.path(), "odd.vtt", text.as_bytes())?;

    let report = Controller::inspect_cues(&path)?;

    assert_eq!(report.cue_count, 2);
    assert_eq!(report.dropped, 1);
    assert_eq!(report.undisplayable, 1);
    let normalized = cue_codec::parse(&report.normalized);
    assert_eq!(normalized[0].start_time, "00:00:03.000");
    assert_eq!(normalized[1].text, "Broken");
    Ok(())
}
