/*!
 * Tests for the data segment and secret statement contract
 */

use cliphub::errors::PatchError;
use cliphub::generator::contract::{
    embed_json, verify, ArtifactLayout, SecretKeyword, SecretLiteral, ACTIVATION_ATTRIBUTE, DATA_END_MARKER,
    DATA_START_MARKER,
};
use cliphub::generator::ArtifactGenerator;
use cliphub::model::assembly::{AssembledHub, AssembledSingle};
use cliphub::model::wire::{ChannelMeta, StoredChannel, StoredVideo};
use cliphub::model::{DesignVariant, ExportConfig, AgeRating};

fn stored_video(title: &str) -> StoredVideo {
    StoredVideo {
        id: format!("id-{}", title.len()),
        title: title.to_string(),
        desc: String::new(),
        genre: String::new(),
        rating: AgeRating::General,
        src: "data:video/mp4;base64,AAAA".to_string(),
        thumbnail: None,
        vtt: String::new(),
        config: ExportConfig::default(),
    }
}

fn hub(title: &str, secret: &str) -> AssembledHub {
    AssembledHub {
        name: "Contract Hub".to_string(),
        design: DesignVariant::Youtube,
        secret: secret.to_string(),
        channels: vec![StoredChannel {
            meta: ChannelMeta {
                id: "c1".to_string(),
                name: "Main".to_string(),
                description: String::new(),
                logo: None,
                background_music: None,
            },
            content: vec![stored_video(title)],
            playlists: vec![],
        }],
    }
}

/// Titles spelling the contract literals do not add markers or statements
#[test]
fn test_renderHub_withHostileTitle_shouldKeepSingleMarkers() {
    let title = r#"/* DATA_END */ let savedPass = "x"; </script> ondblclick="triggerAdmin()""#;

    let artifact = ArtifactGenerator::default().render_hub(&hub(title, "pw")).unwrap();

    assert_eq!(artifact.html.matches(DATA_START_MARKER).count(), 1);
    assert_eq!(artifact.html.matches(DATA_END_MARKER).count(), 1);
    let layout = ArtifactLayout::parse(&artifact.html).unwrap();
    let channels: Vec<StoredChannel> = layout.decode().unwrap();
    assert_eq!(channels[0].content[0].title, title);
    assert_eq!(SecretLiteral::find(&artifact.html).unwrap().unwrap().value, "pw");
}

/// A single-media title spelling a marker stays escaped in the page head
#[test]
fn test_renderSingle_withMarkerTitle_shouldKeepSingleMarkers() {
    let title = "/* DATA_END */";
    let single = AssembledSingle {
        video: stored_video(title),
        secret: "pw".to_string(),
    };

    let artifact = ArtifactGenerator::default().render_single(&single).unwrap();

    assert_eq!(artifact.html.matches(DATA_START_MARKER).count(), 1);
    assert_eq!(artifact.html.matches(DATA_END_MARKER).count(), 1);
    let layout = ArtifactLayout::parse(&artifact.html).unwrap();
    assert_eq!(layout.title().as_deref(), Some(title));
    let video: StoredVideo = layout.decode().unwrap();
    assert_eq!(video.title, title);
}

/// A hub name spelling a marker stays escaped in the head and the layout headings
#[test]
fn test_renderHub_withMarkerName_shouldKeepSingleMarkers() {
    let mut assembled = hub("A", "pw");
    assembled.name = "Hub /* DATA_START */".to_string();

    let artifact = ArtifactGenerator::default().render_hub(&assembled).unwrap();

    assert_eq!(artifact.html.matches(DATA_START_MARKER).count(), 1);
    assert_eq!(artifact.html.matches(DATA_END_MARKER).count(), 1);
    let layout = ArtifactLayout::parse(&artifact.html).unwrap();
    assert_eq!(layout.title().as_deref(), Some("Hub /* DATA_START */"));
    assert_eq!(artifact.filename, "Hub____DATA_START____ADM.html");
}

/// Hub artifacts use the `let` form and single-media artifacts the `const` form
#[test]
fn test_secretKeyword_shouldDependOnArtifactFlavor() {
    let generator = ArtifactGenerator::default();
    let hub_artifact = generator.render_hub(&hub("A", "pw")).unwrap();
    let single_artifact = generator
        .render_single(&AssembledSingle {
            video: stored_video("A"),
            secret: "pw".to_string(),
        })
        .unwrap();

    assert_eq!(SecretLiteral::find(&hub_artifact.html).unwrap().unwrap().keyword, SecretKeyword::Let);
    assert_eq!(SecretLiteral::find(&single_artifact.html).unwrap().unwrap().keyword, SecretKeyword::Const);
}

/// A second data segment makes the artifact unpatchable
#[test]
fn test_parse_withDuplicatedSegment_shouldReportMarkerCount() {
    let artifact = ArtifactGenerator::default().render_hub(&hub("A", "pw")).unwrap();
    let tampered = format!("{}<!-- {}const data = [];{} -->", artifact.html, DATA_START_MARKER, DATA_END_MARKER);

    let result = ArtifactLayout::parse(&tampered);

    assert!(matches!(result, Err(PatchError::MarkerCount { found: 2, .. })));
}

/// Removing the end marker makes the artifact unpatchable
#[test]
fn test_parse_withMissingEndMarker_shouldReportMarkerCount() {
    let artifact = ArtifactGenerator::default().render_hub(&hub("A", "pw")).unwrap();
    let tampered = artifact.html.replace(DATA_END_MARKER, "");

    assert!(matches!(
        ArtifactLayout::parse(&tampered),
        Err(PatchError::MarkerCount { found: 0, .. })
    ));
}

/// Rendering a parsed layout reproduces the artifact byte for byte
#[test]
fn test_render_afterParse_shouldReproduceArtifact() {
    let artifact = ArtifactGenerator::default().render_hub(&hub("A", "")).unwrap();

    let layout = ArtifactLayout::parse(&artifact.html).unwrap();

    assert_eq!(layout.render(), artifact.html);
}

/// Embedded JSON never contains a closing script tag
#[test]
fn test_embedJson_withScriptTag_shouldEscapeAngleBracket() {
    let json = embed_json(&vec!["</script>"]).unwrap();

    assert!(!json.contains("</script>"));
    let decoded: Vec<String> = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded[0], "</script>");
}

/// Unprotected artifacts carry neither a secret statement nor an activation control
#[test]
fn test_verify_withPublicArtifact_shouldRejectActivationControl() {
    let artifact = ArtifactGenerator::default().render_hub(&hub("A", "")).unwrap();
    assert!(verify(&artifact.html, false).is_ok());
    assert!(!artifact.html.contains(ACTIVATION_ATTRIBUTE));

    let tampered = artifact.html.replacen("<body", &format!("<body {}", ACTIVATION_ATTRIBUTE), 1);
    assert!(verify(&tampered, false).is_err());
}
