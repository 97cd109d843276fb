/*!
 * Integration tests for authoring to artifact exports
 */

use anyhow::Result;
use cliphub::app_controller::{Controller, DirectorySink};
use cliphub::cue_codec;
use cliphub::generator::contract::{ArtifactLayout, SecretLiteral, ACTIVATION_ATTRIBUTE, DATA_END_MARKER, DATA_START_MARKER};
use cliphub::model::wire::{StoredChannel, StoredVideo};
use cliphub::model::ChannelPackage;
use cliphub::GenerationError;
use std::time::Duration;
use crate::common::{self, MemorySink};

fn channel_of(name: &str, videos: usize) -> ChannelPackage {
    let mut channel = ChannelPackage::new(name, "");
    for i in 0..videos {
        channel.videos.push(common::inline_video(&format!("{} {}", name, i)));
    }
    channel
}

/// Three subtitled videos in one channel end up in order inside one data segment
#[tokio::test]
async fn test_exportHub_withThreeSubtitledVideos_shouldEmbedThemInOrder() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let sink = MemorySink::new();
    let hub = common::hub_with(vec![common::hello_world_channel()], None);

    controller.export_hub(hub, false, false, &sink).await?;

    let artifacts = sink.artifacts();
    assert_eq!(artifacts.len(), 1);
    let html = &artifacts[0].html;
    assert_eq!(html.matches(DATA_START_MARKER).count(), 1);
    assert_eq!(html.matches(DATA_END_MARKER).count(), 1);

    let channels: Vec<StoredChannel> = ArtifactLayout::parse(html)?.decode()?;
    let titles: Vec<&str> = channels[0].content.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles, vec!["Hello", "World", "Test"]);
    for video in &channels[0].content {
        let cues = cue_codec::parse(&video.vtt);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, video.title);
        assert_eq!(cues[0].end_seconds(), 2.0);
    }
    assert_eq!(artifacts[0].filename, "Test_Hub.html");
    Ok(())
}

/// A protected hub with a public copy yields an admin artifact then a spaced companion
#[tokio::test]
async fn test_exportHub_withSecretAndPublicCopy_shouldDeliverSpacedCompanion() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let sink = MemorySink::new();
    let hub = common::hub_with(vec![common::hello_world_channel()], Some("s3cret"));

    controller.export_hub(hub, true, false, &sink).await?;

    let artifacts = sink.artifacts();
    assert_eq!(artifacts.len(), 2);
    assert_eq!(artifacts[0].filename, "Test_Hub_ADM.html");
    assert_eq!(artifacts[1].filename, "Test_Hub_PUBLICO.html");
    assert_eq!(SecretLiteral::find(&artifacts[0].html)?.map(|s| s.value), Some("s3cret".to_string()));
    assert!(artifacts[0].html.contains(ACTIVATION_ATTRIBUTE));

    let companion = &artifacts[1];
    assert!(!companion.admin_enabled);
    assert!(!companion.html.contains(ACTIVATION_ATTRIBUTE));
    assert!(SecretLiteral::find(&companion.html)?.map_or(true, |s| s.value.is_empty()));

    let instants = sink.instants();
    assert!(instants[1].duration_since(instants[0]) >= Duration::from_millis(1000));
    Ok(())
}

/// Hubs above the channel threshold keep ten videos per channel
#[tokio::test]
async fn test_exportHub_withSixChannels_shouldTruncateEachChannel() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let sink = MemorySink::new();
    let channels = (0..6).map(|i| channel_of(&format!("C{}", i), 12)).collect();

    controller.export_hub(common::hub_with(channels, None), false, false, &sink).await?;

    let decoded: Vec<StoredChannel> = ArtifactLayout::parse(&sink.artifacts()[0].html)?.decode()?;
    assert_eq!(decoded.len(), 6);
    assert!(decoded.iter().all(|c| c.content.len() == 10));
    assert_eq!(decoded[0].content[9].title, "C0 9");
    Ok(())
}

/// Hubs at the channel threshold keep every video
#[tokio::test]
async fn test_exportHub_withFiveChannels_shouldKeepEveryVideo() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let sink = MemorySink::new();
    let channels = (0..5).map(|i| channel_of(&format!("C{}", i), 12)).collect();

    controller.export_hub(common::hub_with(channels, None), false, false, &sink).await?;

    let decoded: Vec<StoredChannel> = ArtifactLayout::parse(&sink.artifacts()[0].html)?.decode()?;
    assert!(decoded.iter().all(|c| c.content.len() == 12));
    Ok(())
}

/// Empty inputs fail before anything is delivered
#[tokio::test]
async fn test_export_withEmptyInputs_shouldFailWithoutDelivering() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let sink = MemorySink::new();

    let no_channels = controller.export_hub(common::hub_with(vec![], Some("pw")), true, false, &sink).await;
    let empty_channels = controller
        .export_hub(common::hub_with(vec![channel_of("A", 0), channel_of("B", 0)], None), false, false, &sink)
        .await;
    let no_media = controller.export_single(None, true, false, &sink).await;

    for result in [no_channels, empty_channels] {
        let error = result.unwrap_err();
        assert!(matches!(error.downcast_ref::<GenerationError>(), Some(GenerationError::EmptyHub)));
    }
    assert!(matches!(
        no_media.unwrap_err().downcast_ref::<GenerationError>(),
        Some(GenerationError::NoMedia)
    ));
    assert!(sink.artifacts().is_empty());
    Ok(())
}

/// A protected single export yields the admin artifact and a public companion
#[tokio::test]
async fn test_exportSingle_withSecretAndPublicCopy_shouldDeliverBothCopies() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let sink = MemorySink::new();
    let mut video = common::inline_video("Summer Trip");
    video.export_config.secret = Some("pw".to_string());

    controller.export_single(Some(video), true, false, &sink).await?;

    let artifacts = sink.artifacts();
    assert_eq!(artifacts[0].filename, "Summer_Trip_ADM.html");
    assert_eq!(artifacts[1].filename, "Summer_Trip_PUBLIC.html");
    let stored: StoredVideo = ArtifactLayout::parse(&artifacts[1].html)?.decode()?;
    assert_eq!(stored.title, "Summer Trip");
    assert!(!ArtifactLayout::parse(&artifacts[0].html)?.data_json().contains("adminPassword"));
    let instants = sink.instants();
    assert!(instants[1].duration_since(instants[0]) >= Duration::from_millis(500));
    Ok(())
}

/// A public copy is not written for unprotected artifacts
#[tokio::test]
async fn test_exportSingle_withoutSecret_shouldSkipCompanion() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let sink = MemorySink::new();

    controller.export_single(Some(common::inline_video("Clip")), true, false, &sink).await?;

    let artifacts = sink.artifacts();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].filename, "Clip.html");
    assert!(SecretLiteral::find(&artifacts[0].html)?.is_none());
    Ok(())
}

/// A directory of media becomes one channel written to disk
#[tokio::test]
async fn test_exportChannel_withMediaDirectory_shouldWriteArtifact() -> Result<()> {
    let media_dir = common::create_temp_dir()?;
    let out_dir = common::create_temp_dir()?;
    common::create_test_file(media_dir.path(), "b_second.mp4", b"two")?;
    common::create_test_file(media_dir.path(), "a_first.mp3", b"one")?;
    common::create_test_file(media_dir.path(), "readme.txt", b"skip")?;
    let controller = Controller::new_for_test()?;

    let written = controller
        .export_channel(media_dir.path(), "My Channel", "", &DirectorySink::new(out_dir.path()))
        .await?;

    assert_eq!(written, vec![out_dir.path().join("My_Channel.html")]);
    let html = std::fs::read_to_string(&written[0])?;
    let channels: Vec<StoredChannel> = ArtifactLayout::parse(&html)?.decode()?;
    let titles: Vec<&str> = channels[0].content.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles, vec!["a_first", "b_second"]);
    assert_eq!(channels[0].content[0].src, "data:audio/mpeg;base64,b25l");
    Ok(())
}

/// An empty media directory is an empty channel
#[tokio::test]
async fn test_exportChannel_withNoMedia_shouldFail() -> Result<()> {
    let media_dir = common::create_temp_dir()?;
    let sink = MemorySink::new();
    let controller = Controller::new_for_test()?;

    let result = controller.export_channel(media_dir.path(), "Empty", "", &sink).await;

    assert!(matches!(
        result.unwrap_err().downcast_ref::<GenerationError>(),
        Some(GenerationError::EmptyChannel { .. })
    ));
    Ok(())
}
