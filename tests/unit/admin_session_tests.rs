/*!
 * Tests for the admin session state machine
 */

use cliphub::admin::{AdminSession, SaveMode, SecretGate, SessionState, BYPASS_SECRET};
use cliphub::errors::AdminError;
use cliphub::generator::contract::{ArtifactLayout, SecretLiteral};
use cliphub::generator::ArtifactGenerator;
use cliphub::model::assembly::AssembledSingle;
use cliphub::model::wire::StoredVideo;
use cliphub::model::{AgeRating, ExportConfig};

fn single_artifact(title: &str, secret: &str) -> String {
    let single = AssembledSingle {
        video: StoredVideo {
            id: "v1".to_string(),
            title: title.to_string(),
            desc: "A description".to_string(),
            genre: "Drama".to_string(),
            rating: AgeRating::Fourteen,
            src: "data:video/mp4;base64,AAAA".to_string(),
            thumbnail: None,
            vtt: String::new(),
            config: ExportConfig::default(),
        },
        secret: secret.to_string(),
    };
    ArtifactGenerator::default().render_single(&single).unwrap().html
}

/// KNOWN FLAW: the bypass value unlocks any protected artifact
#[test]
fn test_unlock_withBypassSecret_shouldUnlockRegardlessOfConfiguredSecret() {
    let mut session = AdminSession::open(&single_artifact("Movie", "correct horse")).unwrap();

    session.unlock(BYPASS_SECRET).unwrap();

    assert_eq!(session.state(), SessionState::Unlocked);
}

/// KNOWN FLAW: the gate accepts the bypass even when no secret is configured
#[test]
fn test_secretGate_withEmptyConfiguredSecret_shouldStillAcceptBypass() {
    assert!(SecretGate::accepts("", BYPASS_SECRET));
    assert!(!SecretGate::accepts("", "anything else"));
}

/// Renaming a single-media artifact updates its data, title and filename
#[test]
fn test_save_afterRename_shouldWriteBackupWithNewTitle() {
    let mut session = AdminSession::open(&single_artifact("Movie", "pw")).unwrap();
    session.unlock("pw").unwrap();
    session.rename_title("Director's Cut").unwrap();

    let saved = session.save(SaveMode::KeepSecret).unwrap();

    assert_eq!(saved.filename, "Director_s_Cut_BACKUP.html");
    let layout = ArtifactLayout::parse(&saved.html).unwrap();
    let video: StoredVideo = layout.decode().unwrap();
    assert_eq!(video.title, "Director's Cut");
    assert_eq!(layout.title().as_deref(), Some("Director's Cut"));
    assert_eq!(SecretLiteral::find(&saved.html).unwrap().unwrap().value, "pw");
}

/// Renaming to a title that spells a marker still saves a parseable artifact
#[test]
fn test_save_afterRenameToMarkerTitle_shouldKeepContract() {
    let title = "/* DATA_END */";
    let mut session = AdminSession::open(&single_artifact("Movie", "pw")).unwrap();
    session.unlock("pw").unwrap();
    session.rename_title(title).unwrap();

    let saved = session.save(SaveMode::KeepSecret).unwrap();

    let layout = ArtifactLayout::parse(&saved.html).unwrap();
    assert_eq!(layout.title().as_deref(), Some(title));
    let video: StoredVideo = layout.decode().unwrap();
    assert_eq!(video.title, title);

    let mut reopened = AdminSession::open(&saved.html).unwrap();
    reopened.unlock("pw").unwrap();
    assert!(reopened.save(SaveMode::Public).is_ok());
}

/// A secret found in the data segment is not written back on save
#[test]
fn test_save_withSecretInDataSegment_shouldDropItFromData() {
    let html = single_artifact("Movie", "pw");
    let mut layout = ArtifactLayout::parse(&html).unwrap();
    let mut data: serde_json::Value = layout.decode().unwrap();
    data["config"]["adminPassword"] = serde_json::Value::from("leaked");
    layout.replace_data(&data).unwrap();
    let injected = layout.render();
    assert!(injected.contains("leaked"));

    let mut session = AdminSession::open(&injected).unwrap();
    session.unlock("pw").unwrap();
    let saved = session.save(SaveMode::KeepSecret).unwrap();

    let data_json = ArtifactLayout::parse(&saved.html).unwrap().data_json().to_string();
    assert!(!data_json.contains("adminPassword"));
    assert!(!data_json.contains("leaked"));
    assert_eq!(SecretLiteral::find(&saved.html).unwrap().unwrap().value, "pw");
}

/// A failed save leaves the session open with its edits
#[test]
fn test_save_withUnsupportedMode_shouldKeepSessionAndEdits() {
    let mut session = AdminSession::open(&single_artifact("Movie", "pw")).unwrap();
    session.unlock("pw").unwrap();
    session.rename_title("Renamed").unwrap();

    let result = session.save(SaveMode::ChangeSecret("new".to_string()));

    assert!(matches!(result, Err(AdminError::UnsupportedOperation(_))));
    assert_eq!(session.state(), SessionState::Editing);
    assert_eq!(session.store().unwrap().version(), 1);
}

/// Hub-only operations are refused on single-media artifacts
#[test]
fn test_addChannel_onSingleArtifact_shouldBeUnsupported() {
    let mut session = AdminSession::open(&single_artifact("Movie", "pw")).unwrap();
    session.unlock("pw").unwrap();

    assert!(matches!(session.add_channel("X"), Err(AdminError::UnsupportedOperation(_))));
}

/// A public save empties the secret and removes the console entry point
#[test]
fn test_save_public_shouldWritePublicCopyWithEmptySecret() {
    let mut session = AdminSession::open(&single_artifact("Movie", "pw")).unwrap();
    session.unlock("pw").unwrap();

    let saved = session.save(SaveMode::Public).unwrap();

    assert_eq!(saved.filename, "Movie_PUBLIC.html");
    assert!(!saved.html.contains(r#"ondblclick="triggerAdmin()""#));
    assert_eq!(SecretLiteral::find(&saved.html).unwrap().unwrap().value, "");

    let mut reopened = AdminSession::open(&saved.html).unwrap();
    assert!(matches!(reopened.unlock("pw"), Err(AdminError::ConsoleUnavailable)));
}

/// Operations before unlocking are refused
#[test]
fn test_renameTitle_whileLocked_shouldFail() {
    let mut session = AdminSession::open(&single_artifact("Movie", "pw")).unwrap();

    assert!(matches!(session.rename_title("x"), Err(AdminError::Locked)));
    assert!(matches!(session.save(SaveMode::Public), Err(AdminError::Locked)));
}
