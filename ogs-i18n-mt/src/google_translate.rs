//! Google Translate API provider for machine translation
//!
//! This module integrates with Google Translate API v2.
//!
//! # Authentication
//!
//! The API key comes from `keys.json` (`google_api_key`) or the
//! `GOOGLE_TRANSLATE_API_KEY` environment variable.
//!
//! # Example
//!
//! ```ignore
//! use ogs_i18n_mt::{GoogleTranslateProvider, MachineTranslator};
//!
//! let provider = GoogleTranslateProvider::from_env()?;
//! let texts = vec!["Resign".to_string(), "Pass".to_string()];
//! let results = provider.translate_batch(&texts, "en", "fr").await?;
//! ```

use crate::error::{MtError, MtResult};
use crate::translator::{
    LanguageMatch, MachineTranslator, SupportedLanguages, check_batch_len, validate_locale,
};
use async_trait::async_trait;
use serde_json::json;
use tracing::info;

pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_TRANSLATE_API_KEY";

/// The key goes in a header so it never appears in a request URL
const API_KEY_HEADER: &str = "X-goog-api-key";

/// Google Translate API v2 provider
///
/// Large batches are split into requests of at most [`GoogleTranslateProvider::MAX_BATCH_SIZE`]
/// strings, sent one after another.
#[derive(Clone)]
pub struct GoogleTranslateProvider {
    /// API key for authentication
    api_key: String,
    /// HTTP client for async requests
    client: reqwest::Client,
    /// Base URL for Google Translate API
    base_url: String,
}

impl GoogleTranslateProvider {
    /// Maximum number of texts per API request
    pub const MAX_BATCH_SIZE: usize = 100;

    /// Maximum characters per string (30KB per Google Translate API limits)
    const MAX_CHARS_PER_STRING: usize = 30_000;

    /// Create a new GoogleTranslateProvider with an explicit API key
    ///
    /// # Errors
    ///
    /// `ConfigError` if the key is blank, `NetworkError` if the HTTP client
    /// cannot be built.
    pub fn new(api_key: String) -> MtResult<Self> {
        if api_key.trim().is_empty() {
            return Err(MtError::ConfigError("API key cannot be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            client,
            base_url: "https://translation.googleapis.com/language/translate/v2".to_string(),
        })
    }

    /// Create a provider from the `GOOGLE_TRANSLATE_API_KEY` environment variable
    pub fn from_env() -> MtResult<Self> {
        let api_key = std::env::var(GOOGLE_API_KEY_ENV).map_err(|_| {
            MtError::ConfigError(format!("{} environment variable not set", GOOGLE_API_KEY_ENV))
        })?;

        Self::new(api_key)
    }

    /// Point the provider at a different endpoint (proxies, test servers)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Chunk a batch of texts into API-safe sizes
    fn chunk_batch(texts: &[String]) -> Vec<&[String]> {
        texts.chunks(Self::MAX_BATCH_SIZE).collect()
    }

    async fn check_status(response: reqwest::Response) -> MtResult<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(if status.is_client_error() {
            MtError::ConfigError(format!("API client error ({}): {}", status, error_text))
        } else {
            MtError::TranslationError(format!("API server error ({}): {}", status, error_text))
        })
    }

    /// Translate a single chunk of texts via the API
    async fn translate_chunk(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<Vec<String>> {
        let body = json!({
            "q": texts,
            "source": source_locale,
            "target": target_locale,
            "format": "text"
        });

        let response = self
            .client
            .post(&self.base_url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let json: serde_json::Value = response.json().await.map_err(|e| {
            MtError::TranslationError(format!("Failed to parse API response: {}", e))
        })?;

        parse_translations(&json)
    }
}

/// Extract `data.translations[].translatedText`
fn parse_translations(json: &serde_json::Value) -> MtResult<Vec<String>> {
    let translations = json["data"]["translations"].as_array().ok_or_else(|| {
        MtError::TranslationError(
            "Invalid API response: missing 'data.translations' array".to_string(),
        )
    })?;

    translations
        .iter()
        .map(|t| {
            t["translatedText"]
                .as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| {
                    MtError::TranslationError(
                        "Invalid API response: missing 'translatedText' field".to_string(),
                    )
                })
        })
        .collect()
}

/// Extract `data.languages[].language`
fn parse_languages(json: &serde_json::Value) -> MtResult<SupportedLanguages> {
    let languages = json["data"]["languages"].as_array().ok_or_else(|| {
        MtError::TranslationError(
            "Invalid API response: missing 'data.languages' array".to_string(),
        )
    })?;

    let codes: Vec<String> = languages
        .iter()
        .filter_map(|l| l["language"].as_str().map(str::to_string))
        .collect();
    Ok(SupportedLanguages::new(codes, LanguageMatch::Exact))
}

impl std::fmt::Debug for GoogleTranslateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTranslateProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for GoogleTranslateProvider {
    async fn translate_batch(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<Vec<String>> {
        validate_locale(source_locale)?;
        validate_locale(target_locale)?;

        if texts.is_empty() {
            return Ok(Vec::new());
        }

        for (i, text) in texts.iter().enumerate() {
            if text.len() > Self::MAX_CHARS_PER_STRING {
                return Err(MtError::TranslationError(format!(
                    "Text at index {} exceeds maximum length of {} characters",
                    i,
                    Self::MAX_CHARS_PER_STRING
                )));
            }
        }

        let mut all_results = Vec::with_capacity(texts.len());

        // Chunks are sent sequentially
        for chunk in Self::chunk_batch(texts) {
            let chunk_results = self
                .translate_chunk(chunk, source_locale, target_locale)
                .await?;
            check_batch_len(self.provider_name(), chunk.len(), chunk_results.len())?;
            all_results.extend(chunk_results);
            info!("Google Translated {} strings", chunk.len());
        }

        Ok(all_results)
    }

    async fn supported_languages(&self) -> MtResult<SupportedLanguages> {
        let response = self
            .client
            .get(format!("{}/languages?target=en", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let json: serde_json::Value = response.json().await.map_err(|e| {
            MtError::TranslationError(format!("Failed to parse API response: {}", e))
        })?;
        parse_languages(&json)
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}
