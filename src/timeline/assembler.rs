use log::debug;

use crate::app_config::TimingConfig;
use crate::errors::AssemblyError;
use crate::subtitle_processor::CueStore;
use crate::timeline::merger::TranslationUnit;

// @module: Final assembly of translated slices into bilingual cues

/// Writes distributed translation slices back into the cue store and
/// re-validates every timing invariant before the store leaves the pipeline.
///
/// The assembler trusts nothing: even though the reconciler already repaired
/// the schedule, every invariant is checked again on the finished store so
/// that a bug in an intermediate stage surfaces as a hard error instead of a
/// corrupt output file.
pub struct OutputAssembler {
    timing: TimingConfig,
}

impl OutputAssembler {
    /// Create an assembler enforcing the given timing invariants
    pub fn new(timing: TimingConfig) -> Self {
        OutputAssembler { timing }
    }

    /// Fill in translated text per cue and validate the finished store
    ///
    /// `distributed` holds one slice vector per unit, in unit order; fallback
    /// units ignore their slices and reuse each member's own source text.
    pub fn assemble(
        &self,
        mut store: CueStore,
        units: &[TranslationUnit],
        distributed: &[Vec<String>],
    ) -> Result<CueStore, AssemblyError> {
        if units.len() != distributed.len() {
            return Err(AssemblyError::Misaligned {
                unit: units.len().min(distributed.len()),
                reason: format!(
                    "{} unit(s) but {} distribution(s)",
                    units.len(),
                    distributed.len()
                ),
            });
        }

        for (unit_pos, (unit, slices)) in units.iter().zip(distributed).enumerate() {
            if unit.fallback {
                // Degraded unit: every member keeps its own source text so
                // the viewer still gets a readable, correctly timed line
                for &cue_pos in &unit.member_indices {
                    let cue = &mut store.cues[cue_pos];
                    cue.translated_text = Some(cue.source_text.clone());
                }
                continue;
            }

            if slices.len() != unit.len() {
                return Err(AssemblyError::Misaligned {
                    unit: unit_pos,
                    reason: format!(
                        "{} member(s) but {} slice(s)",
                        unit.len(),
                        slices.len()
                    ),
                });
            }

            for (&cue_pos, slice) in unit.member_indices.iter().zip(slices) {
                let cue = &mut store.cues[cue_pos];
                let trimmed = slice.trim();
                if trimmed.is_empty() {
                    return Err(AssemblyError::MissingTranslation { index: cue.index });
                }
                cue.translated_text = Some(trimmed.to_string());
            }
        }

        self.validate(&store)?;
        debug!("Assembled {} bilingual cue(s)", store.len());
        Ok(store)
    }

    // Re-check every invariant on the finished store
    fn validate(&self, store: &CueStore) -> Result<(), AssemblyError> {
        for cue in &store.cues {
            if cue.duration_ms() < self.timing.min_duration_ms {
                return Err(AssemblyError::DurationTooShort {
                    index: cue.index,
                    duration_ms: cue.duration_ms(),
                    min_duration_ms: self.timing.min_duration_ms,
                });
            }
            if cue.translated_text.is_none() {
                return Err(AssemblyError::MissingTranslation { index: cue.index });
            }
        }

        for pair in store.cues.windows(2) {
            if pair[1].start_ms < pair[0].start_ms {
                return Err(AssemblyError::OutOfOrder {
                    index: pair[1].index,
                    start_ms: pair[1].start_ms,
                    prev_start_ms: pair[0].start_ms,
                });
            }
            let gap = pair[1].start_ms as i64 - pair[0].end_ms as i64;
            if gap < self.timing.min_gap_ms as i64 {
                return Err(AssemblyError::GapTooSmall {
                    prev_index: pair[0].index,
                    index: pair[1].index,
                    gap_ms: gap,
                    min_gap_ms: self.timing.min_gap_ms,
                });
            }
        }

        Ok(())
    }
}
