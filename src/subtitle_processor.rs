use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::MalformedCuePolicy;
use crate::errors::SubtitleError;

// @module: Cue parsing and the canonical cue store

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2})[,.](\d{3}) --> (\d{2}):(\d{2}):(\d{2})[,.](\d{3})")
        .unwrap()
});

// @const: Markup and artifact cleanup patterns
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static BRACKET_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}|\[[^\]]*\]").unwrap());
static SPEAKER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(Speaker|Narrator|Host|Guest)\s*\d*:\s*").unwrap());
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// One timed line of source text, later carrying its translation
#[derive(Debug, Clone)]
pub struct Cue {
    /// Sequence position, stable once assigned at parse time
    pub index: usize,

    /// Start offset in milliseconds
    pub start_ms: u64,

    /// End offset in milliseconds
    pub end_ms: u64,

    /// Original-language text, never empty
    pub source_text: String,

    /// Translated text, populated by distribution
    pub translated_text: Option<String>,
}

impl Cue {
    /// Creates a new cue without validation - used by tests and internal callers
    pub fn new(index: usize, start_ms: u64, end_ms: u64, source_text: String) -> Self {
        Cue {
            index,
            start_ms,
            end_ms,
            source_text,
            translated_text: None,
        }
    }

    // @creates: Validated cue
    // @validates: Time range and non-empty text
    pub fn new_validated(
        index: usize,
        start_ms: u64,
        end_ms: u64,
        source_text: String,
        line: usize,
    ) -> Result<Self, SubtitleError> {
        if end_ms <= start_ms {
            return Err(SubtitleError::MalformedCue {
                line,
                reason: format!("end time {}ms <= start time {}ms", end_ms, start_ms),
            });
        }

        let trimmed = source_text.trim();
        if trimmed.is_empty() {
            return Err(SubtitleError::MalformedCue {
                line,
                reason: "empty cue text".to_string(),
            });
        }

        Ok(Cue {
            index,
            start_ms,
            end_ms,
            source_text: trimmed.to_string(),
            translated_text: None,
        })
    }

    /// Display duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(
            f,
            "{} --> {}",
            Self::format_timestamp(self.start_ms),
            Self::format_timestamp(self.end_ms)
        )?;
        writeln!(f, "{}", self.source_text)?;
        if let Some(translated) = &self.translated_text {
            writeln!(f, "{}", translated)?;
        }
        writeln!(f)
    }
}

/// The canonical ordered collection of cues
///
/// Ordered by start time, ties broken by index. Ownership of the store
/// transfers stage to stage through the pipeline; no stage observes a
/// partially transformed store.
#[derive(Debug, Default)]
pub struct CueStore {
    /// Cues in display order
    pub cues: Vec<Cue>,
}

impl CueStore {
    /// Create an empty store
    pub fn new() -> Self {
        CueStore { cues: Vec::new() }
    }

    /// Number of cues in the store
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Whether the store holds no cues
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Parse an SRT file into a cue store
    pub fn from_srt_file<P: AsRef<Path>>(
        path: P,
        policy: MalformedCuePolicy,
    ) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;
        let store = Self::from_srt_string(&content, policy)?;
        debug!("Parsed {} cues from {}", store.len(), path.display());
        Ok(store)
    }

    /// Parse SRT content into a cue store
    ///
    /// Blocks that fail validation are skipped with a warning or abort
    /// ingestion, depending on the policy.
    pub fn from_srt_string(
        content: &str,
        policy: MalformedCuePolicy,
    ) -> Result<Self, SubtitleError> {
        let mut cues: Vec<Cue> = Vec::new();

        // State variables for parsing
        let mut current_seq: Option<usize> = None;
        let mut current_times: Option<(u64, u64)> = None;
        let mut current_text = String::new();
        let mut block_line = 0;
        let mut line_number = 0;
        let mut skipped = 0;

        let finalize = |seq: usize,
                        times: (u64, u64),
                        text: &str,
                        line: usize,
                        cues: &mut Vec<Cue>,
                        skipped: &mut usize|
         -> Result<(), SubtitleError> {
            let cleaned = clean_cue_text(text);
            if cleaned.is_empty() {
                debug!("Dropping cue {}: nothing left after cleanup", seq);
                return Ok(());
            }
            match Cue::new_validated(seq, times.0, times.1, cleaned, line) {
                Ok(cue) => {
                    cues.push(cue);
                    Ok(())
                }
                Err(e) => match policy {
                    MalformedCuePolicy::Skip => {
                        warn!("Skipping cue: {}", e);
                        *skipped += 1;
                        Ok(())
                    }
                    MalformedCuePolicy::Abort => Err(e),
                },
            }
        };

        for line in content.lines() {
            line_number += 1;
            let trimmed = line.trim();

            // A blank line closes the current block
            if trimmed.is_empty() {
                if let (Some(seq), Some(times)) = (current_seq, current_times) {
                    if !current_text.is_empty() {
                        finalize(seq, times, &current_text, block_line, &mut cues, &mut skipped)?;
                    }
                }
                current_seq = None;
                current_times = None;
                current_text.clear();
                continue;
            }

            // Sequence number opens a new block
            if current_seq.is_none() && current_text.is_empty() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    current_seq = Some(num);
                    block_line = line_number;
                    continue;
                }
            }

            // Timestamp line follows the sequence number
            if current_seq.is_some() && current_times.is_none() {
                if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                    let start_ms = timestamp_captures_to_ms(&caps, 1);
                    let end_ms = timestamp_captures_to_ms(&caps, 5);
                    current_times = Some((start_ms, end_ms));
                    continue;
                } else if policy == MalformedCuePolicy::Abort {
                    return Err(SubtitleError::MalformedCue {
                        line: line_number,
                        reason: format!("expected timestamp, got: {}", trimmed),
                    });
                } else {
                    warn!("Missing timestamp at line {}: {}", line_number, trimmed);
                    skipped += 1;
                    current_seq = None;
                    continue;
                }
            }

            // Anything after the timestamp belongs to the cue text
            if current_times.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(trimmed);
            } else {
                debug!("Stray text at line {} outside any cue block", line_number);
            }
        }

        // Close the last block
        if let (Some(seq), Some(times)) = (current_seq, current_times) {
            if !current_text.is_empty() {
                finalize(seq, times, &current_text, block_line, &mut cues, &mut skipped)?;
            }
        }

        if cues.is_empty() {
            return Err(SubtitleError::NoCues);
        }

        if skipped > 0 {
            warn!("Skipped {} malformed cue block(s)", skipped);
        }

        let mut store = CueStore { cues };
        store.sort_and_renumber();
        store.warn_on_duplicate_slots();
        Ok(store)
    }

    /// Sort by (start, index) and assign sequential indices
    pub fn sort_and_renumber(&mut self) {
        self.cues
            .sort_by(|a, b| a.start_ms.cmp(&b.start_ms).then(a.index.cmp(&b.index)));
        for (i, cue) in self.cues.iter_mut().enumerate() {
            cue.index = i + 1;
        }
    }

    // Identical (start, end) pairs are an input defect awaiting reconciliation
    fn warn_on_duplicate_slots(&self) {
        for pair in self.cues.windows(2) {
            if pair[0].start_ms == pair[1].start_ms && pair[0].end_ms == pair[1].end_ms {
                warn!(
                    "Cues {} and {} share the time slot {}..{}ms",
                    pair[0].index, pair[1].index, pair[0].start_ms, pair[0].end_ms
                );
            }
        }
    }

    /// Write the store as an SRT file (bilingual when translations are present)
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let mut out = String::new();
        for cue in &self.cues {
            out.push_str(&cue.to_string());
        }
        fs::write(path, out)
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;
        Ok(())
    }
}

impl fmt::Display for CueStore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Cue store with {} cue(s)", self.cues.len())?;
        if let (Some(first), Some(last)) = (self.cues.first(), self.cues.last()) {
            writeln!(
                f,
                "Span: {} --> {}",
                Cue::format_timestamp(first.start_ms),
                Cue::format_timestamp(last.end_ms)
            )?;
        }
        Ok(())
    }
}

/// Strip markup tags, bracketed artifacts and speaker labels, collapse whitespace
pub fn clean_cue_text(text: &str) -> String {
    let text = TAG_REGEX.replace_all(text, "");
    let text = BRACKET_REGEX.replace_all(&text, "");
    let text = SPEAKER_REGEX.replace_all(text.trim(), "");
    let text = WHITESPACE_REGEX.replace_all(&text, " ");
    text.trim().to_string()
}

fn timestamp_captures_to_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
    let hours: u64 = caps
        .get(start_idx)
        .map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let minutes: u64 = caps
        .get(start_idx + 1)
        .map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let seconds: u64 = caps
        .get(start_idx + 2)
        .map_or(0, |m| m.as_str().parse().unwrap_or(0));
    let millis: u64 = caps
        .get(start_idx + 3)
        .map_or(0, |m| m.as_str().parse().unwrap_or(0));

    (hours * 3600 + minutes * 60 + seconds) * 1000 + millis
}
