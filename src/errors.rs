/*!
 * Error types for the subweave engine.
 *
 * This module contains custom error types for the different stages of the
 * pipeline, using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors raised while ingesting subtitle data
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// A cue block could not be parsed into a valid timed line
    #[error("Malformed cue at line {line}: {reason}")]
    MalformedCue {
        /// Line number in the source document
        line: usize,
        /// Why the block was rejected
        reason: String,
    },

    /// The input contained no usable cues at all
    #[error("No valid cues found in input")]
    NoCues,
}

/// Errors raised by the timing reconciler
#[derive(Error, Debug)]
pub enum TimingError {
    /// The pass cap was reached with gap/duration violations remaining
    #[error("Schedule did not converge after {passes} passes: {remaining} violation(s) remain, first at cue {first_cue}")]
    UnresolvableSchedule {
        /// Number of repair passes that were run
        passes: usize,
        /// Violations still present after the final pass
        remaining: usize,
        /// Index of the first cue still in violation
        first_cue: usize,
    },
}

/// Errors that can occur when talking to a translation provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// The call exceeded its time budget
    #[error("Provider call timed out after {0}s")]
    Timeout(u64),

    /// The provider returned a different number of translations than submitted
    #[error("Result count mismatch: submitted {expected}, received {actual}")]
    ResultCountMismatch {
        /// Number of texts submitted
        expected: usize,
        /// Number of translations received
        actual: usize,
    },
}

/// Errors raised when the output assembler re-validates the finished store
#[derive(Error, Debug)]
pub enum AssemblyError {
    /// Cues are no longer ordered by start time
    #[error("Cue {index} starts at {start_ms}ms, before the previous cue ({prev_start_ms}ms)")]
    OutOfOrder {
        index: usize,
        start_ms: u64,
        prev_start_ms: u64,
    },

    /// Two adjacent cues sit closer than the minimum gap
    #[error("Gap between cues {prev_index} and {index} is {gap_ms}ms, below the {min_gap_ms}ms minimum")]
    GapTooSmall {
        prev_index: usize,
        index: usize,
        gap_ms: i64,
        min_gap_ms: u64,
    },

    /// A cue is displayed for less than the minimum duration
    #[error("Cue {index} lasts {duration_ms}ms, below the {min_duration_ms}ms minimum")]
    DurationTooShort {
        index: usize,
        duration_ms: u64,
        min_duration_ms: u64,
    },

    /// A non-fallback cue came out of distribution without translated text
    #[error("Cue {index} has no translated text after distribution")]
    MissingTranslation { index: usize },

    /// Units and distributed slices handed to the assembler do not line up
    #[error("Distribution misaligned for unit {unit}: {reason}")]
    Misaligned { unit: usize, reason: String },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle ingestion
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from timing reconciliation
    #[error("Timing error: {0}")]
    Timing(#[from] TimingError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from output assembly
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
