use anyhow::{anyhow, Result};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Cue language tags arrive as ISO 639-1 (2-letter) or ISO 639-3 (3-letter)
/// codes, optionally carrying a region suffix such as "zh-CN". Providers are
/// given plain English language names for prompt construction.
/// Validate a language code, accepting an optional region suffix
pub fn validate_language_code(code: &str) -> Result<()> {
    lookup(code).map(|_| ())
}

/// Get the English language name for a code (e.g. "zh-CN" -> "Chinese")
pub fn language_name(code: &str) -> Result<String> {
    lookup(code).map(|lang| lang.to_name().to_string())
}

/// Strip a region suffix from a language tag ("zh-CN" -> "zh")
pub fn base_code(code: &str) -> &str {
    code.split(['-', '_']).next().unwrap_or(code)
}

/// Check if two language codes refer to the same language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (lookup(code1), lookup(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn lookup(code: &str) -> Result<Language> {
    let base = base_code(code.trim()).to_lowercase();

    let found = match base.len() {
        2 => Language::from_639_1(&base),
        3 => Language::from_639_3(&base),
        _ => None,
    };

    found.ok_or_else(|| anyhow!("Invalid language code: {}", code))
}
