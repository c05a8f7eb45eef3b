use crate::subtitle_processor::CueStore;
use crate::timeline::merger::TranslationUnit;

// @module: Proportional redistribution of translated text over time slots

/// Splits a unit's translated text back across its member cues' time slots.
///
/// Each member receives a character budget proportional to its share of the
/// unit's total duration. Split points prefer the nearest whitespace at or
/// after the budget boundary and always fall on `char` boundaries; the final
/// member absorbs any trailing text. Concatenating the slices in order
/// reproduces the translated text exactly (split whitespace stays attached to
/// the left slice), so the partition is lossless.
pub struct TimeDistributor;

impl TimeDistributor {
    /// Split the unit's translated text into one slice per member cue
    pub fn distribute(unit: &TranslationUnit, store: &CueStore) -> Vec<String> {
        let text = unit.translated_text.as_deref().unwrap_or("");
        let durations: Vec<u64> = unit
            .member_indices
            .iter()
            .map(|&i| store.cues[i].duration_ms())
            .collect();
        Self::split_proportionally(text, &durations)
    }

    /// Split text into `durations.len()` contiguous slices, sized by each
    /// duration's share of the total
    pub fn split_proportionally(text: &str, durations: &[u64]) -> Vec<String> {
        let member_count = durations.len();
        if member_count == 0 {
            return Vec::new();
        }
        if member_count == 1 {
            return vec![text.to_string()];
        }

        let chars: Vec<char> = text.chars().collect();
        let total_chars = chars.len();
        let total_duration: u64 = durations.iter().sum();

        let mut slices = Vec::with_capacity(member_count);
        let mut pos = 0usize;

        for (i, &duration) in durations.iter().enumerate() {
            if i == member_count - 1 {
                // The final member absorbs the rest in full
                slices.push(chars[pos..].iter().collect());
                break;
            }

            let budget = if total_duration == 0 {
                // Degenerate unit, fall back to an equal split
                total_chars / member_count
            } else {
                (total_chars as f64 * duration as f64 / total_duration as f64).round() as usize
            };

            // Leave at least one character for each remaining member
            let remaining = member_count - 1 - i;
            let cap = total_chars.saturating_sub(remaining).max(pos);
            let target = (pos + budget.max(1)).min(cap);
            let split = Self::snap_to_whitespace(&chars, target, cap);

            slices.push(chars[pos..split].iter().collect());
            pos = split;
        }

        slices
    }

    // Nearest whitespace at or after `target`, capped so later members are
    // not starved; the whitespace itself stays with the left slice. Without
    // whitespace in range (CJK text) the budget boundary stands.
    fn snap_to_whitespace(chars: &[char], target: usize, cap: usize) -> usize {
        let mut i = target;
        while i < cap {
            if chars[i].is_whitespace() {
                return i + 1;
            }
            i += 1;
        }
        target
    }
}
