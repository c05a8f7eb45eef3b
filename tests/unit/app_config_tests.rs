/*!
 * Tests for configuration loading, validation and persistence
 */

use subweave::app_config::{Config, MalformedCuePolicy, ProviderKind};

use crate::common;

/// Test that a missing config file is created with defaults
#[test]
fn test_from_file_withMissingFile_shouldCreateDefault() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config::from_file(&path).unwrap();
    assert!(path.exists());
    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "zh");
    assert_eq!(config.translation.provider, ProviderKind::Glm);
}

/// Test save/load round trip
#[test]
fn test_save_and_load_shouldPreserveValues() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.target_language = "fr".to_string();
    config.translation.batch_size = 7;
    config.timing.min_gap_ms = 250;
    config.malformed_cues = MalformedCuePolicy::Abort;
    config.save_to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.target_language, "fr");
    assert_eq!(loaded.translation.batch_size, 7);
    assert_eq!(loaded.timing.min_gap_ms, 250);
    assert_eq!(loaded.malformed_cues, MalformedCuePolicy::Abort);
}

/// Test that a sparse config file fills in every default
#[test]
fn test_from_file_withPartialJson_shouldFillDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{ "target_language": "ja", "timing": { "min_gap_ms": 80 } }"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.target_language, "ja");
    assert_eq!(config.timing.min_gap_ms, 80);
    assert_eq!(config.timing.min_duration_ms, 500);
    assert_eq!(config.merge.max_unit_members, 4);
    assert_eq!(config.translation.concurrent_batches, 4);
}

/// Test that invalid stored values are rejected at load time
#[test]
fn test_from_file_withInvalidLanguage_shouldFailValidation() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{ "source_language": "nonsense" }"#,
    )
    .unwrap();

    assert!(Config::from_file(&path).is_err());
}

/// Test validation of degenerate numeric settings
#[test]
fn test_validate_withZeroBatchSize_shouldFail() {
    let mut config = Config::default();
    config.translation.batch_size = 0;
    assert!(config.validate().is_err());
}
