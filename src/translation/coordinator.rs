use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use parking_lot::Mutex;
use rand::Rng;
use tokio::sync::Semaphore;
use tokio::time::timeout;

use crate::app_config::{Config, ProviderKind, TranslationConfig};
use crate::errors::ProviderError;
use crate::language_utils;
use crate::providers::{GlmProvider, GoogleProvider, TranslationProvider};
use crate::timeline::TranslationUnit;

/// Counters describing how a translation run went
#[derive(Debug, Default, Clone, Copy)]
pub struct TranslationStats {
    /// Units translated by the primary provider
    pub translated_units: usize,
    /// Units translated by the secondary provider after batch failure
    pub degraded_units: usize,
    /// Units left untranslated (passthrough)
    pub fallback_units: usize,
    /// Batch attempts that failed and were retried
    pub retried_batches: usize,
}

impl TranslationStats {
    /// Total units the run accounted for
    pub fn total_units(&self) -> usize {
        self.translated_units + self.degraded_units + self.fallback_units
    }
}

/// Drives translation of merged units through the configured providers.
///
/// Batches run concurrently under a semaphore; results are reassembled in
/// unit order regardless of completion order. A batch that keeps failing is
/// never fatal: its units degrade to the secondary provider one by one, and
/// units the secondary cannot handle either fall through untranslated.
pub struct TranslationCoordinator {
    config: TranslationConfig,
    context: String,
    primary: Arc<dyn TranslationProvider>,
    secondary: Option<Arc<dyn TranslationProvider>>,
}

impl TranslationCoordinator {
    /// Create a coordinator over explicit provider instances
    pub fn new(
        config: TranslationConfig,
        context: String,
        primary: Arc<dyn TranslationProvider>,
        secondary: Option<Arc<dyn TranslationProvider>>,
    ) -> Self {
        Self {
            config,
            context,
            primary,
            secondary,
        }
    }

    /// Create a coordinator with providers built from the application config
    pub fn from_config(config: &Config) -> Self {
        let primary = Self::build_provider(config.translation.provider, config);
        let secondary = config
            .translation
            .fallback_provider
            .map(|kind| Self::build_provider(kind, config));

        Self::new(
            config.translation.clone(),
            config.context.clone(),
            primary,
            secondary,
        )
    }

    fn build_provider(kind: ProviderKind, config: &Config) -> Arc<dyn TranslationProvider> {
        // Config validation already checked the codes, so name resolution
        // only falls back to the raw code for exotic tags
        let name_of = |code: &str| {
            language_utils::language_name(code).unwrap_or_else(|_| code.to_string())
        };

        match kind {
            ProviderKind::Glm => Arc::new(GlmProvider::new(
                config.translation.glm.clone(),
                name_of(&config.source_language),
                name_of(&config.target_language),
            )),
            ProviderKind::Google => Arc::new(GoogleProvider::new(
                config.translation.google.clone(),
                language_utils::base_code(&config.source_language),
                language_utils::base_code(&config.target_language),
            )),
        }
    }

    /// Translate every unit, preserving order, never failing the run
    ///
    /// The progress callback receives (completed_batches, total_batches)
    /// after each batch finishes, from whatever task finished it.
    pub async fn translate_units(
        &self,
        units: Vec<TranslationUnit>,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> (Vec<TranslationUnit>, TranslationStats) {
        if units.is_empty() {
            return (units, TranslationStats::default());
        }

        let batches = self.split_into_batches(units);
        let total_batches = batches.len();
        info!(
            "Translating {} batch(es) via {} (max {} in flight)",
            total_batches,
            self.primary.name(),
            self.config.concurrent_batches
        );

        let semaphore = Arc::new(Semaphore::new(self.config.concurrent_batches));
        let stats = Arc::new(Mutex::new(TranslationStats::default()));
        let completed = Arc::new(AtomicUsize::new(0));

        let mut results = stream::iter(batches.into_iter().enumerate())
            .map(|(batch_index, batch)| {
                let semaphore = Arc::clone(&semaphore);
                let stats = Arc::clone(&stats);
                let completed = Arc::clone(&completed);
                let progress_callback = progress_callback.clone();

                async move {
                    let _permit = semaphore.acquire().await.ok();

                    let start_time = Instant::now();
                    let out = self.translate_batch_with_degradation(batch, &stats).await;
                    debug!(
                        "Batch {} of {} finished in {:?}",
                        batch_index + 1,
                        total_batches,
                        start_time.elapsed()
                    );

                    let current = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total_batches);

                    (batch_index, out)
                }
            })
            .buffer_unordered(self.config.concurrent_batches)
            .collect::<Vec<_>>()
            .await;

        // Reassemble in submission order
        results.sort_by_key(|(idx, _)| *idx);
        let translated: Vec<TranslationUnit> = results
            .into_iter()
            .flat_map(|(_, batch)| batch)
            .collect();

        let final_stats = *stats.lock();
        info!(
            "Translation done: {} translated, {} degraded, {} passthrough",
            final_stats.translated_units, final_stats.degraded_units, final_stats.fallback_units
        );
        (translated, final_stats)
    }

    fn split_into_batches(&self, units: Vec<TranslationUnit>) -> Vec<Vec<TranslationUnit>> {
        let mut batches = Vec::new();
        let mut iter = units.into_iter();
        loop {
            let batch: Vec<TranslationUnit> =
                iter.by_ref().take(self.config.batch_size).collect();
            if batch.is_empty() {
                break;
            }
            batches.push(batch);
        }
        batches
    }

    // One batch through the full degradation ladder
    async fn translate_batch_with_degradation(
        &self,
        mut batch: Vec<TranslationUnit>,
        stats: &Mutex<TranslationStats>,
    ) -> Vec<TranslationUnit> {
        let texts: Vec<String> = batch
            .iter()
            .map(|unit| unit.concatenated_source.clone())
            .collect();

        match self.call_with_retries(&texts, stats).await {
            Ok(translations) => {
                for (unit, translation) in batch.iter_mut().zip(translations) {
                    unit.translated_text = Some(translation);
                }
                stats.lock().translated_units += batch.len();
                batch
            }
            Err(e) => {
                warn!(
                    "Batch of {} unit(s) exhausted retries on {}: {}",
                    batch.len(),
                    self.primary.name(),
                    e
                );
                self.degrade_batch(batch, stats).await
            }
        }
    }

    // Primary provider with retry, backoff and a per-call timeout
    async fn call_with_retries(
        &self,
        texts: &[String],
        stats: &Mutex<TranslationStats>,
    ) -> Result<Vec<String>, ProviderError> {
        let budget = Duration::from_secs(self.config.timeout_secs);
        let mut last_error = ProviderError::RequestFailed("no attempt made".to_string());

        for attempt in 0..=self.config.retry_count {
            let result = match timeout(
                budget,
                self.primary.translate_batch(texts, &self.context),
            )
            .await
            {
                Ok(inner) => inner,
                Err(_) => Err(ProviderError::Timeout(self.config.timeout_secs)),
            };

            match result {
                Ok(translations) if translations.len() == texts.len() => {
                    return Ok(translations);
                }
                Ok(translations) => {
                    // Off-by-one answers cannot be aligned to units safely
                    last_error = ProviderError::ResultCountMismatch {
                        expected: texts.len(),
                        actual: translations.len(),
                    };
                }
                Err(e) => last_error = e,
            }

            if attempt < self.config.retry_count {
                stats.lock().retried_batches += 1;
                let backoff = self.config.retry_backoff_ms * (attempt as u64 + 1);
                let jitter = rand::rng().random_range(0..=self.config.retry_backoff_ms.max(1) / 2);
                warn!(
                    "Attempt {} failed ({}), retrying in {}ms",
                    attempt + 1,
                    last_error,
                    backoff + jitter
                );
                tokio::time::sleep(Duration::from_millis(backoff + jitter)).await;
            }
        }

        Err(last_error)
    }

    // Per-unit secondary provider, then passthrough for whatever remains
    async fn degrade_batch(
        &self,
        mut batch: Vec<TranslationUnit>,
        stats: &Mutex<TranslationStats>,
    ) -> Vec<TranslationUnit> {
        let budget = Duration::from_secs(self.config.timeout_secs);

        for unit in &mut batch {
            if let Some(secondary) = &self.secondary {
                let texts = std::slice::from_ref(&unit.concatenated_source);
                let result = match timeout(
                    budget,
                    secondary.translate_batch(texts, &self.context),
                )
                .await
                {
                    Ok(inner) => inner,
                    Err(_) => Err(ProviderError::Timeout(self.config.timeout_secs)),
                };

                match result {
                    Ok(translations) if translations.len() == 1 => {
                        unit.translated_text = translations.into_iter().next();
                        stats.lock().degraded_units += 1;
                        continue;
                    }
                    Ok(_) => warn!("{} answered with wrong count for single unit", secondary.name()),
                    Err(e) => warn!("{} failed for unit: {}", secondary.name(), e),
                }
            }

            // End of the ladder: the unit ships untranslated
            unit.fallback = true;
            stats.lock().fallback_units += 1;
        }

        batch
    }
}
