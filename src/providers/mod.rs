/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported translation
 * backends:
 * - GLM: Zhipu chat-completions API, batch-capable
 * - Google: public web translation endpoint, one text per call
 * - Mock: configurable fake for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation providers
///
/// This trait defines the interface that all provider implementations must
/// follow, allowing the coordinator to drive primary and secondary providers
/// interchangeably through trait objects.
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    /// Short human-readable provider name, used in logs and stats
    fn name(&self) -> &'static str;

    /// Translate a batch of texts, preserving order and count
    ///
    /// # Arguments
    /// * `texts` - The source texts, one entry per translation unit
    /// * `context` - Optional material description forwarded to the backend
    ///
    /// # Returns
    /// * `Result<Vec<String>, ProviderError>` - Exactly one translation per
    ///   input text, in input order, or an error for the whole batch
    async fn translate_batch(
        &self,
        texts: &[String],
        context: &str,
    ) -> Result<Vec<String>, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the provider is reachable
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

pub mod glm;
pub mod google;
pub mod mock;

pub use glm::GlmProvider;
pub use google::GoogleProvider;
pub use mock::{MockBehavior, MockProvider};
