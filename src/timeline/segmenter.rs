use crate::app_config::SegmentConfig;

// @module: Nudging split points onto punctuation boundaries

/// Refines the distributor's split points to prefer clause boundaries.
///
/// Viewers read at sentence and clause boundaries; a split in the middle of a
/// clause harms comprehension even when the duration proportions are exact.
/// For each interior boundary the segmenter searches a bounded window before
/// the split for a punctuation mark and moves the split there, unless the
/// move would empty a slice or undercut the minimum slice length. The overall
/// partition stays lossless: characters only move between neighboring slices.
pub struct PunctuationSegmenter {
    config: SegmentConfig,
}

impl PunctuationSegmenter {
    /// Create a segmenter with the given configuration
    pub fn new(config: SegmentConfig) -> Self {
        PunctuationSegmenter { config }
    }

    /// Adjust the split points of a distributed partition
    pub fn refine(&self, mut slices: Vec<String>) -> Vec<String> {
        if slices.len() < 2 {
            return slices;
        }

        for i in 0..slices.len() - 1 {
            let left: Vec<char> = slices[i].chars().collect();

            // Trailing whitespace is separator, not content
            let Some(last_content) = left.iter().rposition(|c| !c.is_whitespace()) else {
                continue;
            };

            if self.is_punctuation(left[last_content]) {
                continue;
            }

            let Some(mark) = self.find_preceding_mark(&left, last_content) else {
                continue;
            };

            // The kept prefix must stay above the minimum slice length
            let keep = mark + 1;
            if keep < self.config.min_slice_chars {
                continue;
            }

            let tail: String = left[keep..].iter().collect();
            slices[i + 1].insert_str(0, &tail);
            slices[i] = left[..keep].iter().collect();
        }

        slices
    }

    fn is_punctuation(&self, c: char) -> bool {
        self.config.punctuation_marks.contains(&c)
    }

    // Nearest punctuation before `end`, no further back than the window
    fn find_preceding_mark(&self, chars: &[char], end: usize) -> Option<usize> {
        let lower = end.saturating_sub(self.config.punctuation_search_window);
        (lower..end).rev().find(|&j| self.is_punctuation(chars[j]))
    }
}
