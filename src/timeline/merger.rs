use log::debug;

use crate::app_config::MergeConfig;
use crate::subtitle_processor::CueStore;

// @module: Grouping fragmentary cues into translatable sentence units

/// A contiguous run of cues grouped for joint translation.
///
/// Units reference cues by position in the store that produced them; the
/// store remains the sole owner of the cues and outlives the unit.
#[derive(Debug, Clone)]
pub struct TranslationUnit {
    /// Positions of the member cues in the source store, in order
    pub member_indices: Vec<usize>,

    /// Member source texts joined with single spaces
    pub concatenated_source: String,

    /// Minimum start over the members, in milliseconds
    pub unit_start_ms: u64,

    /// Maximum end over the members, in milliseconds
    pub unit_end_ms: u64,

    /// Translation of the concatenated source, filled by the coordinator
    pub translated_text: Option<String>,

    /// Whether the unit degraded to untranslated passthrough
    pub fallback: bool,
}

impl TranslationUnit {
    /// Number of member cues
    pub fn len(&self) -> usize {
        self.member_indices.len()
    }

    /// Whether the unit has no members (never produced by the merger)
    pub fn is_empty(&self) -> bool {
        self.member_indices.is_empty()
    }
}

/// Groups reconciled cues into semantic translation units.
///
/// ASR output and native captions rarely align with sentence boundaries, and
/// translating fragment by fragment destroys cross-fragment context. The
/// merger accumulates cues greedily until a sentence terminator closes the
/// running unit or the member cap bounds its size.
pub struct SentenceMerger {
    config: MergeConfig,
}

impl SentenceMerger {
    /// Create a merger with the given configuration
    pub fn new(config: MergeConfig) -> Self {
        SentenceMerger { config }
    }

    /// Group every cue of the store into ordered, non-overlapping units
    pub fn merge(&self, store: &CueStore) -> Vec<TranslationUnit> {
        let mut units = Vec::new();
        let mut position = 0;

        while position < store.cues.len() {
            let mut members = vec![position];
            let mut last_text = store.cues[position].source_text.as_str();
            position += 1;

            while position < store.cues.len()
                && members.len() < self.config.max_unit_members
                && !self.ends_sentence(last_text)
            {
                members.push(position);
                last_text = store.cues[position].source_text.as_str();
                position += 1;
            }

            units.push(self.build_unit(store, members));
        }

        debug!(
            "Merged {} cue(s) into {} translation unit(s)",
            store.cues.len(),
            units.len()
        );
        units
    }

    fn ends_sentence(&self, text: &str) -> bool {
        text.trim_end()
            .chars()
            .next_back()
            .is_some_and(|c| self.config.sentence_terminators.contains(&c))
    }

    fn build_unit(&self, store: &CueStore, members: Vec<usize>) -> TranslationUnit {
        let texts: Vec<&str> = members
            .iter()
            .map(|&i| store.cues[i].source_text.as_str())
            .collect();
        let mut concatenated = texts.join(" ");
        concatenated = self.correct_terms(&concatenated);

        let unit_start_ms = members
            .iter()
            .map(|&i| store.cues[i].start_ms)
            .min()
            .unwrap_or(0);
        let unit_end_ms = members
            .iter()
            .map(|&i| store.cues[i].end_ms)
            .max()
            .unwrap_or(0);

        TranslationUnit {
            member_indices: members,
            concatenated_source: concatenated,
            unit_start_ms,
            unit_end_ms,
            translated_text: None,
            fallback: false,
        }
    }

    // Proper-noun fixes applied before the text reaches the provider
    fn correct_terms(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (wrong, right) in &self.config.term_corrections {
            out = out.replace(wrong.as_str(), right.as_str());
        }
        out
    }
}
