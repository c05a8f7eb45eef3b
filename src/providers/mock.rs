/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds, echoing marked translations
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::flaky(n)` - Fails the first n calls, then works
 * - `MockProvider::count_mismatch()` - Returns one translation too few
 * - `MockProvider::slow(ms)` - Delays long enough to trip timeouts
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::TranslationProvider;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a marked translation
    Working,
    /// Always fails with an error
    Failing,
    /// Fails the first `fail_first` calls, then succeeds
    FlakyThenWorking { fail_first: usize },
    /// Succeeds but drops the last translation from the batch
    CountMismatch,
    /// Succeeds with a one-character translation per text
    Terse,
    /// Sleeps before answering (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing coordinator behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of translate_batch calls made so far
    call_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that fails the first `fail_first` calls, then works
    pub fn flaky(fail_first: usize) -> Self {
        Self::new(MockBehavior::FlakyThenWorking { fail_first })
    }

    /// Create a mock that always returns one translation too few
    pub fn count_mismatch() -> Self {
        Self::new(MockBehavior::CountMismatch)
    }

    /// Create a mock that answers with a single character per text
    pub fn terse() -> Self {
        Self::new(MockBehavior::Terse)
    }

    /// Create a mock that sleeps `delay_ms` before answering
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Handle to the call counter, for asserting on retry behavior
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }

    /// Number of translate_batch calls made so far
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn translate_all(texts: &[String]) -> Vec<String> {
        texts.iter().map(|t| format!("[译] {}", t)).collect()
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        _context: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(Self::translate_all(texts)),
            MockBehavior::Failing => Err(ProviderError::RequestFailed(
                "mock provider configured to fail".to_string(),
            )),
            MockBehavior::FlakyThenWorking { fail_first } => {
                if call < fail_first {
                    Err(ProviderError::RequestFailed(format!(
                        "mock flaky failure {} of {}",
                        call + 1,
                        fail_first
                    )))
                } else {
                    Ok(Self::translate_all(texts))
                }
            }
            MockBehavior::CountMismatch => {
                let mut translations = Self::translate_all(texts);
                translations.pop();
                Ok(translations)
            }
            MockBehavior::Terse => Ok(texts.iter().map(|_| "好".to_string()).collect()),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                Ok(Self::translate_all(texts))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::RequestFailed(
                "mock provider configured to fail".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
