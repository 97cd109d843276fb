/*!
 * Tests for WEBVTT cue parsing and serialization
 */

use cliphub::cue_codec::{self, Cue};

/// Parsing serialized cues keeps order, timing and text
#[test]
fn test_parse_withSerializedCues_shouldPreserveOrderTimingAndText() {
    let cues = vec![
        Cue::new("00:00:01.000", "00:00:03.500", "First line"),
        Cue::new("00:00:04.000", "00:00:06.000", "Second\nwith two lines"),
        Cue::new("01:02:03.004", "01:02:05.000", "Late cue"),
    ];

    let parsed = cue_codec::parse(&cue_codec::serialize(&cues));

    assert_eq!(parsed.len(), cues.len());
    for (original, reparsed) in cues.iter().zip(parsed.iter()) {
        assert_eq!(reparsed.start_time, original.start_time);
        assert_eq!(reparsed.end_time, original.end_time);
        assert_eq!(reparsed.text, original.text);
    }
}

/// Serializing an empty list yields only the header
#[test]
fn test_serialize_withNoCues_shouldReturnHeaderAndBlankLine() {
    assert_eq!(cue_codec::serialize(&[]), "WEBVTT\n\n");
}

/// A timing line right after another timing line drops the first cue
#[test]
fn test_parse_withConsecutiveTimingLines_shouldDropFirstCue() {
    let text = "WEBVTT\n\n1\n00:00:00.000 --> 00:00:01.000\n00:00:02.000 --> 00:00:03.000\nkept\n\n";

    let cues = cue_codec::parse(text);

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].start_time, "00:00:02.000");
    assert_eq!(cues[0].text, "kept");
}

/// Files without a trailing blank line still yield their last cue
#[test]
fn test_parse_withoutTrailingBlankLine_shouldKeepLastCue() {
    let cues = cue_codec::parse("WEBVTT\n\n00:00:00.000 --> 00:00:02.000\nHello");

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "Hello");
}

/// Malformed timestamps parse but never display
#[test]
fn test_parse_withMalformedTiming_shouldKeepCueAsUndisplayable() {
    let cues = cue_codec::parse("WEBVTT\n\nab:cd --> 00:00:02.000\nBroken\n\n");

    assert_eq!(cues.len(), 1);
    assert!(!cues[0].is_displayable());
    assert!(!cues[0].is_active_at(1.0));
}

/// Active window includes both bounds
#[test]
fn test_isActiveAt_shouldIncludeBounds() {
    let cue = Cue::new("00:00:01.000", "00:00:02.000", "x");

    assert!(cue.is_active_at(1.0));
    assert!(cue.is_active_at(2.0));
    assert!(!cue.is_active_at(2.001));
}
