/*!
 * # subweave - bilingual subtitle timeline synchronization
 *
 * A Rust library that turns a rough, overlapping subtitle track into a clean
 * bilingual one: timings are repaired, fragmentary cues are merged into full
 * sentences for translation, and translated text is redistributed across the
 * original time slots.
 *
 * ## Features
 *
 * - SRT ingestion with markup cleanup and malformed-block policies
 * - Iterative timing repair (overlaps, minimum gaps, minimum durations)
 * - Sentence-aware merging of fragmentary cues into translation units
 * - Batched, concurrent translation with retry and provider degradation
 * - Duration-proportional redistribution of translated text, refined to
 *   punctuation boundaries
 * - Bilingual SRT output, re-validated against every timing invariant
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Cue parsing and the canonical cue store
 * - `timeline`: The pipeline stages:
 *   - `timeline::reconciler`: Timing repair
 *   - `timeline::merger`: Sentence-unit grouping
 *   - `timeline::distributor`: Proportional text redistribution
 *   - `timeline::segmenter`: Punctuation-boundary refinement
 *   - `timeline::assembler`: Final assembly and validation
 * - `translation`: Batch coordination and provider degradation
 * - `providers`: Client implementations for translation backends:
 *   - `providers::glm`: Zhipu GLM chat-completions client
 *   - `providers::google`: Google web endpoint client
 *   - `providers::mock`: Configurable fake for tests
 * - `styling`: Rendering sinks for the finished store
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod styling;
pub mod subtitle_processor;
pub mod timeline;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use subtitle_processor::{Cue, CueStore};
pub use timeline::TranslationUnit;
