use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::app_config::GlmConfig;
use crate::errors::ProviderError;
use crate::providers::TranslationProvider;

// Chat responses often arrive wrapped in a markdown code fence
static CODE_FENCE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*```(?:json)?\s*(.*?)\s*```\s*$").unwrap());

/// GLM client using the Zhipu chat-completions API
///
/// Batches are submitted as a JSON array of source texts and the model is
/// instructed to answer with a JSON array of the same length. The array shape
/// makes count verification trivial and keeps one network round trip per
/// batch instead of one per unit.
#[derive(Debug)]
pub struct GlmProvider {
    /// HTTP client for API requests
    client: Client,
    /// Provider settings (model, key, endpoint)
    config: GlmConfig,
    /// Source language display name, e.g. "English"
    source_language: String,
    /// Target language display name, e.g. "Chinese"
    target_language: String,
}

/// GLM chat completion request
#[derive(Debug, Serialize)]
struct GlmRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<GlmMessage>,

    /// Temperature for generation, kept low for faithful translation
    temperature: f32,
}

/// GLM message format
#[derive(Debug, Serialize, Deserialize)]
struct GlmMessage {
    /// Role of the message sender (system, user, assistant)
    role: String,

    /// Content of the message
    content: String,
}

/// GLM chat completion response
#[derive(Debug, Deserialize)]
struct GlmResponse {
    /// Completion choices, the first one carries the answer
    choices: Vec<GlmChoice>,
}

/// Individual choice in a GLM response
#[derive(Debug, Deserialize)]
struct GlmChoice {
    /// The generated message
    message: GlmMessage,
}

impl GlmProvider {
    const DEFAULT_ENDPOINT: &'static str = "https://open.bigmodel.cn/api/paas/v4";

    /// Create a new GLM client
    pub fn new(
        config: GlmConfig,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            config,
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    fn api_url(&self) -> String {
        if self.config.endpoint.is_empty() {
            format!("{}/chat/completions", Self::DEFAULT_ENDPOINT)
        } else {
            format!(
                "{}/chat/completions",
                self.config.endpoint.trim_end_matches('/')
            )
        }
    }

    fn system_prompt(&self, context: &str) -> String {
        let mut prompt = format!(
            "You are a professional subtitle translator. Translate each {} text in the \
             given JSON array into natural, colloquial {}. Answer with ONLY a JSON array \
             of strings, one translation per input, same order and length. Do not merge, \
             split, number or annotate entries.",
            self.source_language, self.target_language
        );
        if !context.is_empty() {
            prompt.push_str("\nMaterial context: ");
            prompt.push_str(context);
        }
        prompt
    }

    async fn complete(&self, request: GlmRequest) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(self.api_url())
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("GLM API error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let glm_response = response
            .json::<GlmResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        glm_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::ParseError("response contained no choices".to_string()))
    }

    /// Parse the model's answer into one translation per input text
    fn parse_translations(answer: &str, expected: usize) -> Result<Vec<String>, ProviderError> {
        let body = CODE_FENCE_REGEX
            .captures(answer)
            .and_then(|caps| caps.get(1))
            .map_or(answer, |m| m.as_str());

        let translations: Vec<String> = serde_json::from_str(body.trim())
            .map_err(|e| ProviderError::ParseError(format!("expected JSON array: {}", e)))?;

        if translations.len() != expected {
            return Err(ProviderError::ResultCountMismatch {
                expected,
                actual: translations.len(),
            });
        }

        Ok(translations)
    }
}

#[async_trait]
impl TranslationProvider for GlmProvider {
    fn name(&self) -> &'static str {
        "GLM"
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        context: &str,
    ) -> Result<Vec<String>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let payload = serde_json::to_string(texts)
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let request = GlmRequest {
            model: self.config.model.clone(),
            messages: vec![
                GlmMessage {
                    role: "system".to_string(),
                    content: self.system_prompt(context),
                },
                GlmMessage {
                    role: "user".to_string(),
                    content: payload,
                },
            ],
            temperature: 0.2,
        };

        debug!("Submitting batch of {} text(s) to GLM", texts.len());
        let answer = self.complete(request).await?;
        Self::parse_translations(&answer, texts.len())
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let probe = vec!["Hello".to_string()];
        self.translate_batch(&probe, "").await?;
        Ok(())
    }
}
