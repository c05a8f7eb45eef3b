/*!
 * End-to-end pipeline tests over real subtitle files
 */

use std::sync::Arc;

use subweave::app_config::{Config, MalformedCuePolicy, TranslationConfig};
use subweave::app_controller::Controller;
use subweave::providers::{MockProvider, TranslationProvider};
use subweave::subtitle_processor::CueStore;
use subweave::translation::TranslationCoordinator;

use crate::common;

fn mock_coordinator(primary: MockProvider, secondary: Option<MockProvider>) -> TranslationCoordinator {
    let config = TranslationConfig {
        retry_backoff_ms: 1,
        ..TranslationConfig::default()
    };
    TranslationCoordinator::new(
        config,
        String::new(),
        Arc::new(primary),
        secondary.map(|p| Arc::new(p) as Arc<dyn TranslationProvider>),
    )
}

/// Test the whole chain on a messy file: overlaps, fragments, markup
#[tokio::test]
async fn test_pipeline_withMessyFile_shouldProduceValidBilingualTrack() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_overlapping_subtitle(dir.path(), "messy.srt").unwrap();

    let store = CueStore::from_srt_file(&input, MalformedCuePolicy::Skip).unwrap();
    assert_eq!(store.len(), 4);

    let controller = Controller::new_for_test().unwrap();
    let finished = controller
        .run_pipeline(store, &mock_coordinator(MockProvider::working(), None), |_, _| {})
        .await
        .unwrap();

    assert_eq!(finished.len(), 4);
    common::assert_invariants(&finished, 100, 500);
    for cue in &finished.cues {
        assert!(cue.translated_text.is_some(), "cue {} untranslated", cue.index);
        assert!(!cue.source_text.contains('<'), "markup survived cleanup");
        assert!(!cue.source_text.contains('['), "artifact survived cleanup");
    }
}

/// Test fallback correctness end to end: dead providers leave each cue
/// carrying its own source text as the translation
#[tokio::test]
async fn test_pipeline_withDeadProviders_shouldPassEachCuesOwnTextThrough() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_overlapping_subtitle(dir.path(), "messy.srt").unwrap();
    let store = CueStore::from_srt_file(&input, MalformedCuePolicy::Skip).unwrap();

    let controller = Controller::new_for_test().unwrap();
    let finished = controller
        .run_pipeline(
            store,
            &mock_coordinator(MockProvider::failing(), Some(MockProvider::failing())),
            |_, _| {},
        )
        .await
        .unwrap();

    for cue in &finished.cues {
        assert_eq!(
            cue.translated_text.as_deref(),
            Some(cue.source_text.as_str()),
            "cue {} should fall back to its own source text",
            cue.index
        );
    }
    common::assert_invariants(&finished, 100, 500);
}

/// Test that the finished store survives a write/reparse round trip
#[tokio::test]
async fn test_pipeline_output_shouldReparseAsValidSrt() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_subtitle(dir.path(), "clean.srt").unwrap();
    let store = CueStore::from_srt_file(&input, MalformedCuePolicy::Skip).unwrap();

    let controller = Controller::new_for_test().unwrap();
    let finished = controller
        .run_pipeline(store, &mock_coordinator(MockProvider::working(), None), |_, _| {})
        .await
        .unwrap();

    let output = dir.path().join("out.srt");
    finished.write_to_srt(&output).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("[译]"), "translated line missing from output");

    let reparsed = CueStore::from_srt_file(&output, MalformedCuePolicy::Skip).unwrap();
    assert_eq!(reparsed.len(), finished.len());
}

/// Test that pipeline timing repair preserves cue count and ordering
#[tokio::test]
async fn test_pipeline_shouldNeverDropOrReorderCues() {
    let store = common::store_of(&[
        (0, 100, "first"),
        (0, 100, "second"),
        (0, 100, "third."),
        (50, 700, "Fourth one here!"),
    ]);

    let controller = Controller::new_for_test().unwrap();
    let finished = controller
        .run_pipeline(store, &mock_coordinator(MockProvider::working(), None), |_, _| {})
        .await
        .unwrap();

    assert_eq!(finished.len(), 4);
    assert_eq!(finished.cues[0].source_text, "first");
    assert_eq!(finished.cues[3].source_text, "Fourth one here!");
    let indices: Vec<usize> = finished.cues.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);
}

/// Test controller construction validates configuration up front
#[test]
fn test_controller_withBadLanguage_shouldRefuseToStart() {
    let mut config = Config::default();
    config.target_language = "??".to_string();
    assert!(Controller::with_config(config).is_err());
}
