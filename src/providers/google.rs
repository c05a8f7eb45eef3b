use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::app_config::GoogleConfig;
use crate::errors::ProviderError;
use crate::providers::TranslationProvider;

/// Google client using the public web translation endpoint
///
/// The endpoint only takes one text per request and has no notion of
/// surrounding context, which makes it a lower-quality secondary provider.
/// The coordinator uses it per unit after a batch has exhausted its retries
/// on the primary provider.
#[derive(Debug)]
pub struct GoogleProvider {
    /// HTTP client for API requests
    client: Client,
    /// Provider settings (endpoint)
    config: GoogleConfig,
    /// Source language ISO code, e.g. "en"
    source_code: String,
    /// Target language ISO code, e.g. "zh"
    target_code: String,
}

impl GoogleProvider {
    /// Create a new Google web endpoint client
    pub fn new(
        config: GoogleConfig,
        source_code: impl Into<String>,
        target_code: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            config,
            source_code: source_code.into(),
            target_code: target_code.into(),
        }
    }

    fn request_url(&self, text: &str) -> Result<Url, ProviderError> {
        let base = format!(
            "{}/translate_a/single",
            self.config.endpoint.trim_end_matches('/')
        );
        let mut url =
            Url::parse(&base).map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("client", "gtx")
            .append_pair("sl", &self.source_code)
            .append_pair("tl", &self.target_code)
            .append_pair("dt", "t")
            .append_pair("q", text);
        Ok(url)
    }

    async fn translate_one(&self, text: &str) -> Result<String, ProviderError> {
        let url = self.request_url(text)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Google endpoint error ({}): {}", status, error_text);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Self::extract_translation(&body)
    }

    // The endpoint answers with nested arrays; the translation is split
    // across the first element of each inner segment
    fn extract_translation(body: &Value) -> Result<String, ProviderError> {
        let segments = body
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError("missing segment array".to_string()))?;

        let translated: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        if translated.is_empty() {
            return Err(ProviderError::ParseError(
                "response carried no translated text".to_string(),
            ));
        }

        Ok(translated)
    }
}

#[async_trait]
impl TranslationProvider for GoogleProvider {
    fn name(&self) -> &'static str {
        "Google"
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        _context: &str,
    ) -> Result<Vec<String>, ProviderError> {
        debug!("Translating {} text(s) via Google web endpoint", texts.len());
        let mut translations = Vec::with_capacity(texts.len());
        for text in texts {
            translations.push(self.translate_one(text).await?);
        }
        Ok(translations)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.translate_one("Hello").await?;
        Ok(())
    }
}
