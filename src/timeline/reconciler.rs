use log::{debug, warn};

use crate::app_config::TimingConfig;
use crate::errors::TimingError;
use crate::subtitle_processor::CueStore;

// @module: Iterative repair of cue timing

/// Repairs overlaps, undersized gaps and degenerate durations in a cue store.
///
/// The reconciler runs a bounded number of passes over adjacent cue pairs.
/// Where the next cue starts inside the previous cue's slot (plus the minimum
/// gap), the previous cue is shortened, but never below its minimum duration;
/// when shortening is impossible the next cue is pushed later instead. A store
/// that already satisfies every invariant passes through unchanged, so the
/// operation is idempotent.
pub struct TimingReconciler {
    config: TimingConfig,
}

impl TimingReconciler {
    /// Create a reconciler with the given timing invariants
    pub fn new(config: TimingConfig) -> Self {
        TimingReconciler { config }
    }

    /// Repair the store, or fail if the schedule cannot be made valid
    /// within the configured pass cap
    pub fn reconcile(&self, mut store: CueStore) -> Result<CueStore, TimingError> {
        if store.cues.len() < 2 {
            self.fix_degenerate_durations(&mut store);
            return Ok(store);
        }

        store.sort_and_renumber();
        self.fix_degenerate_durations(&mut store);

        let mut passes_run = 0;
        for pass in 1..=self.config.max_reconcile_passes {
            passes_run = pass;
            let adjusted = self.run_pass(&mut store);
            let remaining = self.violations(&store);

            debug!(
                "Reconcile pass {}: {} adjustment(s), {} violation(s) remaining",
                pass,
                adjusted,
                remaining.len()
            );

            if remaining.is_empty() {
                return Ok(store);
            }
        }

        let remaining = self.violations(&store);
        if let Some(&first_cue) = remaining.first() {
            warn!(
                "Timing reconciliation failed to converge: {} violation(s) after {} passes",
                remaining.len(),
                passes_run
            );
            return Err(TimingError::UnresolvableSchedule {
                passes: passes_run,
                remaining: remaining.len(),
                first_cue,
            });
        }

        Ok(store)
    }

    // Zero-duration, inverted and undersized cues are corrected to the
    // minimum duration anchored at their start before any overlap pass runs.
    // Overlaps introduced here are repaired by the passes.
    fn fix_degenerate_durations(&self, store: &mut CueStore) {
        for cue in &mut store.cues {
            if cue.end_ms <= cue.start_ms || cue.duration_ms() < self.config.min_duration_ms {
                debug!(
                    "Cue {} has degenerate duration ({}..{}ms), extending to minimum",
                    cue.index, cue.start_ms, cue.end_ms
                );
                cue.end_ms = cue.start_ms + self.config.min_duration_ms;
            }
        }
    }

    // One left-to-right pass over adjacent pairs. Returns the number of
    // adjustments made.
    fn run_pass(&self, store: &mut CueStore) -> usize {
        let min_gap = self.config.min_gap_ms;
        let min_duration = self.config.min_duration_ms;
        let mut adjusted = 0;

        for i in 0..store.cues.len() - 1 {
            let prev_start = store.cues[i].start_ms;
            let prev_end = store.cues[i].end_ms;
            let next_start = store.cues[i + 1].start_ms;

            if next_start >= prev_end + min_gap {
                continue;
            }

            let shrunk_end = next_start.saturating_sub(min_gap);
            if shrunk_end >= prev_start + min_duration {
                // Shorten the previous cue to restore the gap
                store.cues[i].end_ms = shrunk_end;
            } else {
                // Shortening would undercut the minimum duration; push the
                // next cue later instead, keeping its own duration intact
                let new_start = prev_end + min_gap;
                let next = &mut store.cues[i + 1];
                next.start_ms = new_start;
                if next.end_ms < new_start + min_duration {
                    next.end_ms = new_start + min_duration;
                }
            }
            adjusted += 1;
        }

        adjusted
    }

    // Indices of cues violating the gap or duration invariant
    fn violations(&self, store: &CueStore) -> Vec<usize> {
        let mut out = Vec::new();

        for cue in &store.cues {
            if cue.duration_ms() < self.config.min_duration_ms {
                out.push(cue.index);
            }
        }
        for pair in store.cues.windows(2) {
            if pair[1].start_ms < pair[0].end_ms + self.config.min_gap_ms {
                out.push(pair[1].index);
            }
        }

        out.sort_unstable();
        out.dedup();
        out
    }
}
