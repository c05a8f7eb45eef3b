/*!
 * Tests for language code utilities
 */

use subweave::language_utils;

/// Test validation across code formats
#[test]
fn test_validate_language_code_withVariousFormats_shouldAcceptValidOnes() {
    assert!(language_utils::validate_language_code("en").is_ok());
    assert!(language_utils::validate_language_code("zho").is_ok());
    assert!(language_utils::validate_language_code("zh-TW").is_ok());
    assert!(language_utils::validate_language_code("").is_err());
    assert!(language_utils::validate_language_code("english").is_err());
}

/// Test name resolution for prompt construction
#[test]
fn test_language_name_withRegionSuffix_shouldResolveBaseLanguage() {
    assert_eq!(language_utils::language_name("zh-CN").unwrap(), "Chinese");
    assert_eq!(language_utils::language_name("pt_BR").unwrap(), "Portuguese");
}

/// Test code equivalence across 639-1 and 639-3
#[test]
fn test_language_codes_match_withEquivalentCodes_shouldMatch() {
    assert!(language_utils::language_codes_match("en", "eng"));
    assert!(language_utils::language_codes_match("zh-CN", "zho"));
    assert!(!language_utils::language_codes_match("zh", "ja"));
}
