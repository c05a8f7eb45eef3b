/*!
 * The timeline reconciliation and bilingual synchronization engine.
 *
 * The pipeline stages live here, each consuming the previous stage's output:
 * - `reconciler`: repairs overlaps, gaps and degenerate durations
 * - `merger`: groups reconciled cues into translation units
 * - `distributor`: splits translated text back across member time slots
 * - `segmenter`: nudges split points onto punctuation boundaries
 * - `assembler`: merges everything into final bilingual cues and validates
 */

pub mod assembler;
pub mod distributor;
pub mod merger;
pub mod reconciler;
pub mod segmenter;

pub use assembler::OutputAssembler;
pub use distributor::TimeDistributor;
pub use merger::{SentenceMerger, TranslationUnit};
pub use reconciler::TimingReconciler;
pub use segmenter::PunctuationSegmenter;
