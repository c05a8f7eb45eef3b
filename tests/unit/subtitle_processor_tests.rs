/*!
 * Tests for cue parsing and the cue store
 */

use std::fmt::Write;

use subweave::app_config::MalformedCuePolicy;
use subweave::errors::SubtitleError;
use subweave::subtitle_processor::{clean_cue_text, Cue, CueStore};

use crate::common;

/// Test parsing of a well-formed SRT document
#[test]
fn test_from_srt_string_withValidContent_shouldParseAllCues() {
    let content = "1\n00:00:01,000 --> 00:00:04,000\nFirst line.\n\n2\n00:00:05,000 --> 00:00:09,000\nSecond line.\n";
    let store = CueStore::from_srt_string(content, MalformedCuePolicy::Skip).unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.cues[0].start_ms, 1000);
    assert_eq!(store.cues[0].end_ms, 4000);
    assert_eq!(store.cues[0].source_text, "First line.");
    assert_eq!(store.cues[1].source_text, "Second line.");
}

/// Test that dot-separated milliseconds are accepted alongside commas
#[test]
fn test_from_srt_string_withDotMillis_shouldParse() {
    let content = "1\n00:00:01.500 --> 00:00:03.250\nText here.\n";
    let store = CueStore::from_srt_string(content, MalformedCuePolicy::Skip).unwrap();

    assert_eq!(store.cues[0].start_ms, 1500);
    assert_eq!(store.cues[0].end_ms, 3250);
}

/// Test multi-line cue text joining
#[test]
fn test_from_srt_string_withMultilineText_shouldCollapseLines() {
    let content = "1\n00:00:01,000 --> 00:00:04,000\nfirst half\nsecond half\n";
    let store = CueStore::from_srt_string(content, MalformedCuePolicy::Skip).unwrap();

    assert_eq!(store.cues[0].source_text, "first half second half");
}

/// Test the skip policy on a malformed block
#[test]
fn test_from_srt_string_withInvertedTimes_skipPolicy_shouldDropBlock() {
    let content = "1\n00:00:05,000 --> 00:00:02,000\nbackwards\n\n2\n00:00:06,000 --> 00:00:08,000\nfine.\n";
    let store = CueStore::from_srt_string(content, MalformedCuePolicy::Skip).unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.cues[0].source_text, "fine.");
}

/// Test the abort policy on a malformed block
#[test]
fn test_from_srt_string_withInvertedTimes_abortPolicy_shouldFail() {
    let content = "1\n00:00:05,000 --> 00:00:02,000\nbackwards\n";
    let result = CueStore::from_srt_string(content, MalformedCuePolicy::Abort);

    assert!(matches!(result, Err(SubtitleError::MalformedCue { .. })));
}

/// Test that an input with nothing usable is rejected
#[test]
fn test_from_srt_string_withNoUsableCues_shouldFail() {
    let result = CueStore::from_srt_string("not a subtitle\n", MalformedCuePolicy::Skip);
    assert!(matches!(result, Err(SubtitleError::NoCues)));
}

/// Test that stores come out sorted and renumbered
#[test]
fn test_from_srt_string_withUnorderedBlocks_shouldSortByStart() {
    let content = "5\n00:00:10,000 --> 00:00:12,000\nlater.\n\n9\n00:00:01,000 --> 00:00:03,000\nearlier.\n";
    let store = CueStore::from_srt_string(content, MalformedCuePolicy::Skip).unwrap();

    assert_eq!(store.cues[0].source_text, "earlier.");
    assert_eq!(store.cues[0].index, 1);
    assert_eq!(store.cues[1].index, 2);
}

/// Test markup and artifact cleanup
#[test]
fn test_clean_cue_text_withMarkupAndLabels_shouldStripAll() {
    assert_eq!(clean_cue_text("<b>bold</b> words"), "bold words");
    assert_eq!(clean_cue_text("{\\an8}positioned"), "positioned");
    assert_eq!(clean_cue_text("[applause] thanks"), "thanks");
    assert_eq!(clean_cue_text("Narrator: once upon a time"), "once upon a time");
}

/// Test bilingual display output
#[test]
fn test_cue_display_withTranslation_shouldRenderBothLines() {
    let mut cue = Cue::new(1, 0, 2000, "Hello.".to_string());
    cue.translated_text = Some("你好。".to_string());

    let mut output = String::new();
    write!(output, "{}", cue).unwrap();

    assert!(output.contains("00:00:00,000 --> 00:00:02,000"));
    assert!(output.contains("Hello.\n你好。"));
}

/// Test file round trip through the filesystem
#[test]
fn test_srt_file_roundTrip_shouldPreserveCues() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_subtitle(dir.path(), "in.srt").unwrap();

    let store = CueStore::from_srt_file(&input, MalformedCuePolicy::Skip).unwrap();
    assert_eq!(store.len(), 3);

    let output = dir.path().join("out.srt");
    store.write_to_srt(&output).unwrap();

    let reparsed = CueStore::from_srt_file(&output, MalformedCuePolicy::Skip).unwrap();
    assert_eq!(reparsed.len(), 3);
    assert_eq!(reparsed.cues[2].source_text, "For testing purposes.");
}
