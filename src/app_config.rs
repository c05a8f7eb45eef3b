use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::default::Default;
use std::path::Path;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Short description of the material, forwarded to the provider
    #[serde(default)]
    pub context: String,

    /// Timing repair config
    #[serde(default)]
    pub timing: TimingConfig,

    /// Sentence merging config
    #[serde(default)]
    pub merge: MergeConfig,

    /// Split refinement config
    #[serde(default)]
    pub segment: SegmentConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Style parameters handed to the rendering collaborator
    #[serde(default)]
    pub style: StyleConfig,

    /// What to do with cue blocks that fail to parse
    #[serde(default)]
    pub malformed_cues: MalformedCuePolicy,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Timing invariants enforced by the reconciler
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct TimingConfig {
    /// Minimum silence between adjacent cues, in milliseconds
    #[serde(default = "default_min_gap_ms")]
    pub min_gap_ms: u64,

    /// Minimum display duration of a cue, in milliseconds
    #[serde(default = "default_min_duration_ms")]
    pub min_duration_ms: u64,

    /// Maximum number of repair passes before giving up
    #[serde(default = "default_max_reconcile_passes")]
    pub max_reconcile_passes: usize,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_gap_ms: default_min_gap_ms(),
            min_duration_ms: default_min_duration_ms(),
            max_reconcile_passes: default_max_reconcile_passes(),
        }
    }
}

/// Sentence merging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MergeConfig {
    /// Maximum number of cues merged into one translation unit
    #[serde(default = "default_max_unit_members")]
    pub max_unit_members: usize,

    /// Marks that close a sentence and therefore a unit
    #[serde(default = "default_sentence_terminators")]
    pub sentence_terminators: Vec<char>,

    /// Proper-noun corrections applied to source text before translation
    #[serde(default)]
    pub term_corrections: BTreeMap<String, String>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            max_unit_members: default_max_unit_members(),
            sentence_terminators: default_sentence_terminators(),
            term_corrections: BTreeMap::new(),
        }
    }
}

/// Split refinement configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SegmentConfig {
    /// How many characters before a split point to search for punctuation
    #[serde(default = "default_punctuation_search_window")]
    pub punctuation_search_window: usize,

    /// Marks a split point is allowed to move back to
    #[serde(default = "default_punctuation_marks")]
    pub punctuation_marks: Vec<char>,

    /// Minimum characters a refined slice may shrink to
    #[serde(default = "default_min_slice_chars")]
    pub min_slice_chars: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            punctuation_search_window: default_punctuation_search_window(),
            punctuation_marks: default_punctuation_marks(),
            min_slice_chars: default_min_slice_chars(),
        }
    }
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    // @provider: Zhipu GLM chat completions
    #[default]
    Glm,
    // @provider: Google web translation endpoint
    Google,
}

impl ProviderKind {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Glm => "GLM",
            Self::Google => "Google",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Glm => write!(f, "glm"),
            Self::Google => write!(f, "google"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "glm" => Ok(Self::Glm),
            "google" => Ok(Self::Google),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Translation coordination configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Primary provider used for batch translation
    #[serde(default)]
    pub provider: ProviderKind,

    /// Secondary, lower-context provider used when a batch keeps failing
    #[serde(default = "default_fallback_provider")]
    pub fallback_provider: Option<ProviderKind>,

    /// Number of units submitted per provider call
    #[serde(default = "default_translation_batch_size")]
    pub batch_size: usize,

    /// How many times a failed batch is retried before degrading
    #[serde(default = "default_translation_retry_count")]
    pub retry_count: u32,

    /// Base backoff between retries, in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Maximum batches in flight at once
    #[serde(default = "default_concurrent_batches")]
    pub concurrent_batches: usize,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// GLM provider settings
    #[serde(default)]
    pub glm: GlmConfig,

    /// Google provider settings
    #[serde(default)]
    pub google: GoogleConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            fallback_provider: default_fallback_provider(),
            batch_size: default_translation_batch_size(),
            retry_count: default_translation_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            concurrent_batches: default_concurrent_batches(),
            timeout_secs: default_timeout_secs(),
            glm: GlmConfig::default(),
            google: GoogleConfig::default(),
        }
    }
}

/// GLM service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GlmConfig {
    /// Model name (e.g. "glm-4-flash")
    #[serde(default = "default_glm_model")]
    pub model: String,

    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL (optional, for self-hosted gateways)
    #[serde(default = "String::new")]
    pub endpoint: String,
}

impl Default for GlmConfig {
    fn default() -> Self {
        Self {
            model: default_glm_model(),
            api_key: String::new(),
            endpoint: String::new(),
        }
    }
}

/// Google web endpoint configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GoogleConfig {
    /// Service endpoint URL
    #[serde(default = "default_google_endpoint")]
    pub endpoint: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            endpoint: default_google_endpoint(),
        }
    }
}

/// Opaque parameters forwarded to the styling collaborator
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StyleConfig {
    /// Resolution-dependent font size for the rendered track
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Identifier of the configured style table entry
    #[serde(default = "default_style_id")]
    pub style_id: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            style_id: default_style_id(),
        }
    }
}

/// What to do when a cue block fails to parse
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MalformedCuePolicy {
    /// Log and drop the offending block
    #[default]
    Skip,
    /// Abort ingestion on the first malformed block
    Abort,
}

/// Log level configuration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's level filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "zh".to_string()
}

fn default_min_gap_ms() -> u64 {
    100
}

fn default_min_duration_ms() -> u64 {
    500
}

fn default_max_reconcile_passes() -> usize {
    5
}

fn default_max_unit_members() -> usize {
    4
}

fn default_sentence_terminators() -> Vec<char> {
    vec!['.', '!', '?', '。', '！', '？', '…']
}

fn default_punctuation_search_window() -> usize {
    12
}

fn default_punctuation_marks() -> Vec<char> {
    vec![
        ',', '.', '!', '?', ';', ':', '，', '。', '！', '？', '、', '；', '：',
    ]
}

fn default_min_slice_chars() -> usize {
    2
}

fn default_fallback_provider() -> Option<ProviderKind> {
    Some(ProviderKind::Google)
}

fn default_translation_batch_size() -> usize {
    24
}

fn default_translation_retry_count() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_concurrent_batches() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_glm_model() -> String {
    "glm-4-flash".to_string()
}

fn default_google_endpoint() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_font_size() -> u32 {
    28
}

fn default_style_id() -> String {
    "bilingual-default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            target_language: default_target_language(),
            context: String::new(),
            timing: TimingConfig::default(),
            merge: MergeConfig::default(),
            segment: SegmentConfig::default(),
            translation: TranslationConfig::default(),
            style: StyleConfig::default(),
            malformed_cues: MalformedCuePolicy::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file, creating a default one if missing
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            let config = Self::default();
            config.save_to_file(path)?;
            log::info!("Created default configuration at {}", path.display());
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Default configuration path under the user config directory
    pub fn default_path() -> std::path::PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("subweave")
            .join("conf.json")
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_language_code(&self.source_language)
            .with_context(|| format!("Invalid source language: {}", self.source_language))?;
        language_utils::validate_language_code(&self.target_language)
            .with_context(|| format!("Invalid target language: {}", self.target_language))?;

        if self.timing.min_duration_ms == 0 {
            return Err(anyhow!("min_duration_ms must be greater than zero"));
        }
        if self.timing.max_reconcile_passes == 0 {
            return Err(anyhow!("max_reconcile_passes must be greater than zero"));
        }
        if self.merge.max_unit_members == 0 {
            return Err(anyhow!("max_unit_members must be greater than zero"));
        }
        if self.merge.sentence_terminators.is_empty() {
            return Err(anyhow!("sentence_terminators must not be empty"));
        }
        if self.translation.batch_size == 0 {
            return Err(anyhow!("translation batch_size must be greater than zero"));
        }
        if self.translation.concurrent_batches == 0 {
            return Err(anyhow!("concurrent_batches must be greater than zero"));
        }
        if self.translation.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than zero"));
        }
        if self.translation.fallback_provider == Some(self.translation.provider) {
            return Err(anyhow!(
                "fallback_provider must differ from the primary provider"
            ));
        }
        Ok(())
    }
}
