// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, ProviderKind};
use app_controller::Controller;

mod app_config;
mod app_controller;
mod errors;
mod language_utils;
mod providers;
mod styling;
mod subtitle_processor;
mod timeline;
mod translation;

/// CLI Wrapper for ProviderKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProvider {
    Glm,
    Google,
}

impl From<CliProvider> for ProviderKind {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::Glm => ProviderKind::Glm,
            CliProvider::Google => ProviderKind::Google,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// subweave - bilingual subtitle timeline synchronization
///
/// Repairs subtitle timing, merges fragmentary cues into full sentences,
/// translates them in batches and writes a bilingual SRT track.
#[derive(Parser, Debug)]
#[command(name = "subweave")]
#[command(version = "0.1.0")]
#[command(about = "Bilingual subtitle synchronization tool")]
#[command(long_about = "subweave takes a rough subtitle track, repairs overlaps and degenerate
timings, merges fragmentary cues into whole sentences, translates them and
redistributes the translation across the original time slots.

EXAMPLES:
    subweave input.srt                        # Translate using default config
    subweave -f input.srt                     # Force overwrite existing output
    subweave -o out.srt input.srt             # Explicit output path
    subweave -p google input.srt              # Use the Google endpoint directly
    subweave -s en -t zh input.srt            # Translate from English to Chinese
    subweave --context 'cooking show' in.srt  # Give the provider some context
    subweave --log-level debug input.srt      # Verbose logging

CONFIGURATION:
    Configuration lives under the user config directory by default
    (e.g. ~/.config/subweave/conf.json). You can specify a different config
    file with --config. If the config file doesn't exist, a default one will
    be created automatically.

SUPPORTED PROVIDERS:
    glm    - Zhipu GLM chat-completions API (default, requires API key)
    google - Google web translation endpoint (no key, lower quality)")]
struct CommandLineOptions {
    /// Input subtitle file (SRT)
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output subtitle file (defaults to <input>.<target-language>.srt)
    #[arg(short, long)]
    output_path: Option<PathBuf>,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliProvider>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'zh', 'en', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Short description of the material, forwarded to the provider
    #[arg(long)]
    context: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value_t = Config::default_path().to_string_lossy().into_owned())]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = if Path::new(&cli.config_path).exists() {
        Config::from_file(&cli.config_path)?
    } else {
        log::warn!(
            "Config file not found at '{}', creating default config.",
            cli.config_path
        );
        let config = Config::default();
        config.save_to_file(&cli.config_path)?;
        config
    };

    // Override config with CLI options if provided
    if let Some(provider) = cli.provider {
        config.translation.provider = provider.into();
        if config.translation.fallback_provider == Some(config.translation.provider) {
            config.translation.fallback_provider = None;
        }
    }
    if let Some(source_language) = cli.source_language {
        config.source_language = source_language;
    }
    if let Some(target_language) = cli.target_language {
        config.target_language = target_language;
    }
    if let Some(context) = cli.context {
        config.context = context;
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let output_path = cli
        .output_path
        .unwrap_or_else(|| default_output_path(&cli.input_path, &config.target_language));

    let controller = Controller::with_config(config)?;
    controller
        .run(cli.input_path, output_path, cli.force_overwrite)
        .await
}

// input.srt + "zh" -> input.zh.srt
fn default_output_path(input: &Path, target_language: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let file_name = format!("{}.{}.srt", stem, target_language);
    input.with_file_name(file_name)
}
