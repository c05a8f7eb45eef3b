/*!
 * Translation coordination.
 *
 * The coordinator owns the provider lifecycle for a run: it batches
 * translation units, drives the primary provider with bounded concurrency,
 * and walks the degradation ladder (batch retries, per-unit secondary
 * provider, untranslated passthrough) so a provider outage degrades output
 * quality instead of failing the run.
 */

pub mod coordinator;

pub use coordinator::{TranslationCoordinator, TranslationStats};
