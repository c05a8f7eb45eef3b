/*!
 * Tests for translation coordination and the degradation ladder
 */

use std::sync::atomic::Ordering;
use std::sync::Arc;

use subweave::app_config::TranslationConfig;
use subweave::providers::{MockProvider, TranslationProvider};
use subweave::timeline::TranslationUnit;
use subweave::translation::TranslationCoordinator;

fn units(count: usize) -> Vec<TranslationUnit> {
    (0..count)
        .map(|i| TranslationUnit {
            member_indices: vec![i],
            concatenated_source: format!("sentence number {}.", i),
            unit_start_ms: i as u64 * 2000,
            unit_end_ms: i as u64 * 2000 + 1500,
            translated_text: None,
            fallback: false,
        })
        .collect()
}

fn config(batch_size: usize, retry_count: u32, timeout_secs: u64) -> TranslationConfig {
    TranslationConfig {
        batch_size,
        retry_count,
        retry_backoff_ms: 1,
        concurrent_batches: 2,
        timeout_secs,
        ..TranslationConfig::default()
    }
}

fn coordinator_with(
    config: TranslationConfig,
    primary: MockProvider,
    secondary: Option<MockProvider>,
) -> TranslationCoordinator {
    TranslationCoordinator::new(
        config,
        String::new(),
        Arc::new(primary),
        secondary.map(|p| Arc::new(p) as Arc<dyn TranslationProvider>),
    )
}

/// Test the happy path across several batches
#[tokio::test]
async fn test_translate_units_withWorkingProvider_shouldFillEveryUnit() {
    let coordinator = coordinator_with(config(3, 1, 5), MockProvider::working(), None);
    let (out, stats) = coordinator.translate_units(units(8), |_, _| {}).await;

    assert_eq!(out.len(), 8);
    assert_eq!(stats.translated_units, 8);
    assert_eq!(stats.total_units(), 8);
    for (i, unit) in out.iter().enumerate() {
        assert_eq!(unit.concatenated_source, format!("sentence number {}.", i));
        assert!(unit.translated_text.is_some());
    }
}

/// Test that a transient failure is absorbed by retries
#[tokio::test]
async fn test_translate_units_withTransientFailure_shouldRetryAndSucceed() {
    let primary = MockProvider::flaky(1);
    let counter = primary.call_counter();
    let coordinator = coordinator_with(config(10, 2, 5), primary, None);

    let (out, stats) = coordinator.translate_units(units(4), |_, _| {}).await;

    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert_eq!(stats.translated_units, 4);
    assert_eq!(stats.retried_batches, 1);
    assert!(out.iter().all(|u| !u.fallback));
}

/// Test the full ladder: primary dead, secondary picks up per unit
#[tokio::test]
async fn test_translate_units_withDeadPrimary_shouldDegradePerUnit() {
    let secondary = MockProvider::working();
    let secondary_counter = secondary.call_counter();
    let coordinator =
        coordinator_with(config(10, 1, 5), MockProvider::failing(), Some(secondary));

    let (out, stats) = coordinator.translate_units(units(5), |_, _| {}).await;

    assert_eq!(secondary_counter.load(Ordering::SeqCst), 5);
    assert_eq!(stats.degraded_units, 5);
    assert_eq!(stats.fallback_units, 0);
    assert!(out.iter().all(|u| u.translated_text.is_some()));
}

/// Test the bottom of the ladder: both providers dead
#[tokio::test]
async fn test_translate_units_withEverythingDead_shouldMarkFallback() {
    let coordinator = coordinator_with(
        config(10, 1, 5),
        MockProvider::failing(),
        Some(MockProvider::failing()),
    );

    let (out, stats) = coordinator.translate_units(units(3), |_, _| {}).await;

    assert_eq!(stats.fallback_units, 3);
    assert!(out.iter().all(|u| u.fallback && u.translated_text.is_none()));
}

/// Test that an off-by-one provider answer never gets padded or truncated
#[tokio::test]
async fn test_translate_units_withCountMismatch_shouldNotAlignAnswers() {
    let coordinator = coordinator_with(config(10, 1, 5), MockProvider::count_mismatch(), None);
    let (out, stats) = coordinator.translate_units(units(4), |_, _| {}).await;

    assert_eq!(stats.translated_units, 0);
    assert_eq!(stats.fallback_units, 4);
    assert!(out.iter().all(|u| u.translated_text.is_none()));
}

/// Test that a hung provider trips the per-call timeout
#[tokio::test]
async fn test_translate_units_withHungProvider_shouldTimeOutIntoFallback() {
    let coordinator = coordinator_with(config(10, 0, 1), MockProvider::slow(5_000), None);
    let (out, stats) = coordinator.translate_units(units(2), |_, _| {}).await;

    assert_eq!(stats.fallback_units, 2);
    assert!(out.iter().all(|u| u.fallback));
}

/// Test that empty input is a no-op
#[tokio::test]
async fn test_translate_units_withNoUnits_shouldReturnEmpty() {
    let coordinator = coordinator_with(config(10, 1, 5), MockProvider::working(), None);
    let (out, stats) = coordinator.translate_units(Vec::new(), |_, _| {}).await;

    assert!(out.is_empty());
    assert_eq!(stats.total_units(), 0);
}
