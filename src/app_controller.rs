use anyhow::{anyhow, Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::PathBuf;

use crate::app_config::Config;
use crate::styling::{SrtFileSink, StyleParams, SubtitleSink};
use crate::subtitle_processor::CueStore;
use crate::timeline::{
    OutputAssembler, PunctuationSegmenter, SentenceMerger, TimeDistributor, TimingReconciler,
};
use crate::translation::TranslationCoordinator;

// @module: Application controller driving the full pipeline

/// Main application controller for bilingual subtitle synchronization
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.source_language.is_empty() && !self.config.target_language.is_empty()
    }

    /// Run the main workflow: parse, synchronize, translate, write
    pub async fn run(
        &self,
        input_file: PathBuf,
        output_file: PathBuf,
        force_overwrite: bool,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        if output_file.exists() && !force_overwrite {
            warn!("Skipping file, output already exists (use -f to force overwrite)");
            return Ok(());
        }

        let store = CueStore::from_srt_file(&input_file, self.config.malformed_cues)?;
        info!(
            "Parsed {} cue(s) from {}",
            store.len(),
            input_file.display()
        );

        let coordinator = TranslationCoordinator::from_config(&self.config);

        // Batch count is only known once the coordinator has chunked the
        // units, so the bar gets its length from the first progress tick
        let multi_progress = MultiProgress::new();
        let progress_bar = multi_progress.add(ProgressBar::new(0));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} batches {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        let bar = progress_bar.clone();
        let finished = self
            .run_pipeline(store, &coordinator, move |done, total| {
                bar.set_length(total as u64);
                bar.set_position(done as u64);
            })
            .await?;
        progress_bar.finish_and_clear();

        let sink = SrtFileSink::new(&output_file);
        sink.write(&finished, &StyleParams::from(&self.config.style))?;

        info!("Completed in {:?}", start_time.elapsed());
        Ok(())
    }

    /// Run the pipeline stages over an in-memory store
    ///
    /// Public with an injectable coordinator so tests can drive the whole
    /// chain against mock providers.
    pub async fn run_pipeline(
        &self,
        store: CueStore,
        coordinator: &TranslationCoordinator,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<CueStore> {
        let reconciled = TimingReconciler::new(self.config.timing).reconcile(store)?;

        let units = SentenceMerger::new(self.config.merge.clone()).merge(&reconciled);
        info!(
            "Merged {} cue(s) into {} translation unit(s)",
            reconciled.len(),
            units.len()
        );

        let (units, stats) = coordinator.translate_units(units, progress_callback).await;
        if stats.fallback_units > 0 {
            warn!(
                "{} of {} unit(s) ship untranslated after provider degradation",
                stats.fallback_units,
                stats.total_units()
            );
        }

        let segmenter = PunctuationSegmenter::new(self.config.segment.clone());
        let mut units = units;
        let mut distributed: Vec<Vec<String>> = units
            .iter()
            .map(|unit| {
                if unit.fallback {
                    // Fallback units reuse member source text at assembly
                    Vec::new()
                } else {
                    segmenter.refine(TimeDistributor::distribute(unit, &reconciled))
                }
            })
            .collect();

        // A translation shorter than its member count cannot give every cue
        // a visible slice; such units pass their source text through rather
        // than aborting the run
        for (unit, slices) in units.iter_mut().zip(distributed.iter_mut()) {
            if !unit.fallback && slices.iter().any(|s| s.trim().is_empty()) {
                warn!(
                    "Translation too short to cover {} member cue(s), passing source through",
                    unit.len()
                );
                unit.fallback = true;
                slices.clear();
            }
        }

        let finished =
            OutputAssembler::new(self.config.timing).assemble(reconciled, &units, &distributed)?;
        Ok(finished)
    }
}
