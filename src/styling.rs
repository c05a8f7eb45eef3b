use std::path::{Path, PathBuf};

use anyhow::Result;
use log::info;

use crate::app_config::StyleConfig;
use crate::subtitle_processor::CueStore;

// @module: Handing the finished store to a rendering sink

/// Opaque rendering parameters forwarded alongside the finished store.
///
/// The engine never interprets these values; they travel untouched from the
/// configuration to whatever renders the track.
#[derive(Debug, Clone)]
pub struct StyleParams {
    /// Resolution-dependent font size
    pub font_size: u32,
    /// Identifier of the configured style table entry
    pub style_id: String,
}

impl From<&StyleConfig> for StyleParams {
    fn from(config: &StyleConfig) -> Self {
        StyleParams {
            font_size: config.font_size,
            style_id: config.style_id.clone(),
        }
    }
}

/// Destination for a finished bilingual store
pub trait SubtitleSink {
    /// Consume the finished store together with its style parameters
    fn write(&self, store: &CueStore, params: &StyleParams) -> Result<()>;
}

/// Sink that writes the store as a bilingual SRT file
#[derive(Debug)]
pub struct SrtFileSink {
    path: PathBuf,
}

impl SrtFileSink {
    /// Create a sink writing to the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        SrtFileSink {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SubtitleSink for SrtFileSink {
    fn write(&self, store: &CueStore, params: &StyleParams) -> Result<()> {
        // SRT carries no styling, so the params only show up in the log
        info!(
            "Writing {} cue(s) to {} (style '{}', font size {})",
            store.len(),
            self.path.display(),
            params.style_id,
            params.font_size
        );
        store.write_to_srt(&self.path)
    }
}
