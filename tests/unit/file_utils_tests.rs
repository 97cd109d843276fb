/*!
 * Tests for file utilities
 */

use anyhow::Result;
use cliphub::file_utils::{FileManager, FileType};
use crate::common;

/// Test file type detection by extension
#[test]
fn test_detectFileType_withKnownExtensions_shouldClassify() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let video = common::create_test_file(temp_dir.path(), "a.webm", b"x")?;
    let cues = common::create_test_file(temp_dir.path(), "a.vtt", b"WEBVTT\n\n")?;
    let artifact = common::create_test_file(temp_dir.path(), "Hub_ADM.html", b"<html>")?;
    let other = common::create_test_file(temp_dir.path(), "notes.txt", b"x")?;

    assert_eq!(FileManager::detect_file_type(&video)?, FileType::Video);
    assert_eq!(FileManager::detect_file_type(&cues)?, FileType::Subtitle);
    assert_eq!(FileManager::detect_file_type(&artifact)?, FileType::Artifact);
    assert_eq!(FileManager::detect_file_type(&other)?, FileType::Unknown);
    Ok(())
}

/// Test that a missing file is an error
#[test]
fn test_detectFileType_withMissingFile_shouldFail() {
    assert!(FileManager::detect_file_type("/definitely/not/here.mp4").is_err());
}

/// Test media discovery on a missing directory
#[test]
fn test_findMediaFiles_withMissingDirectory_shouldFail() {
    assert!(FileManager::find_media_files("/definitely/not/here").is_err());
}

/// Test directory creation is idempotent
#[test]
fn test_ensureDir_calledTwice_shouldSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested)?;
    FileManager::ensure_dir(&nested)?;

    assert!(FileManager::dir_exists(&nested));
    Ok(())
}
