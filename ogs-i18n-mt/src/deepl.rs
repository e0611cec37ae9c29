//! DeepL API provider
//!
//! DeepL keeps digits and punctuation intact very reliably, so it is asked
//! first and receives the whole work list of a language in a single request.
//!
//! Keys ending in `:fx` belong to the free plan and are served from
//! `api-free.deepl.com`; all other keys use `api.deepl.com`.

use crate::error::{MtError, MtResult};
use crate::translator::{
    LanguageMatch, MachineTranslator, SupportedLanguages, check_batch_len, validate_locale,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

pub const DEEPL_API_KEY_ENV: &str = "DEEPL_API_KEY";

const FREE_API_URL: &str = "https://api-free.deepl.com";
const PRO_API_URL: &str = "https://api.deepl.com";

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<TranslatedText>,
}

#[derive(Debug, Deserialize)]
struct TranslatedText {
    text: String,
}

#[derive(Debug, Deserialize)]
struct LanguageInfo {
    language: String,
}

#[derive(Clone)]
pub struct DeeplProvider {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl DeeplProvider {
    pub fn new(api_key: String) -> MtResult<Self> {
        if api_key.trim().is_empty() {
            return Err(MtError::ConfigError("API key cannot be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| MtError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = if api_key.ends_with(":fx") {
            FREE_API_URL
        } else {
            PRO_API_URL
        }
        .to_string();

        Ok(Self {
            api_key,
            client,
            base_url,
        })
    }

    pub fn from_env() -> MtResult<Self> {
        let api_key = std::env::var(DEEPL_API_KEY_ENV).map_err(|_| {
            MtError::ConfigError(format!("{} environment variable not set", DEEPL_API_KEY_ENV))
        })?;
        Self::new(api_key)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn auth_header(&self) -> String {
        format!("DeepL-Auth-Key {}", self.api_key)
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

        Err(match status.as_u16() {
            401 | 403 => MtError::ConfigError(format!("DeepL rejected the API key ({})", status)),
            456 => MtError::TranslationError("DeepL quota exceeded".to_string()),
            _ => MtError::TranslationError(format!("DeepL error ({}): {}", status, error_text)),
        })
    }
}

/// DeepL expects upper-case language codes (`PT-BR`, `DE`)
fn deepl_language_code(locale: &str) -> String {
    locale.replace('_', "-").to_uppercase()
}

impl std::fmt::Debug for DeeplProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeeplProvider")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for DeeplProvider {
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

        let body = json!({
            "text": texts,
            "source_lang": deepl_language_code(source_locale),
            "target_lang": deepl_language_code(target_locale),
        });

        let response = self
            .client
            .post(format!("{}/v2/translate", self.base_url))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(&body)
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let parsed: TranslateResponse = response.json().await.map_err(|e| {
            MtError::TranslationError(format!("Failed to parse DeepL response: {}", e))
        })?;

        let results: Vec<String> = parsed.translations.into_iter().map(|t| t.text).collect();
        check_batch_len(self.provider_name(), texts.len(), results.len())?;
        info!("DeepL translated {} strings", results.len());
        Ok(results)
    }

    async fn supported_languages(&self) -> MtResult<SupportedLanguages> {
        let response = self
            .client
            .get(format!("{}/v2/languages?type=target", self.base_url))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let languages: Vec<LanguageInfo> = response.json().await.map_err(|e| {
            MtError::TranslationError(format!("Failed to parse DeepL languages: {}", e))
        })?;

        Ok(SupportedLanguages::new(
            languages.into_iter().map(|l| l.language),
            LanguageMatch::CaseInsensitive,
        ))
    }

    fn provider_name(&self) -> &str {
        "DeepL"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_key_uses_free_endpoint() {
        let provider = DeeplProvider::new("abc-123:fx".to_string()).unwrap();
        assert_eq!(provider.base_url(), FREE_API_URL);
        let provider = DeeplProvider::new("abc-123".to_string()).unwrap();
        assert_eq!(provider.base_url(), PRO_API_URL);
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            DeeplProvider::new(String::new()),
            Err(MtError::ConfigError(_))
        ));
    }

    #[test]
    fn test_language_codes_are_upper_case() {
        assert_eq!(deepl_language_code("pt-br"), "PT-BR");
        assert_eq!(deepl_language_code("zh_CN"), "ZH-CN");
        assert_eq!(deepl_language_code("de"), "DE");
    }

    #[test]
    fn test_parse_translate_response() {
        let parsed: TranslateResponse = serde_json::from_str(
            r#"{"translations": [{"detected_source_language": "EN", "text": "Aufgeben"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.translations[0].text, "Aufgeben");
    }

    #[test]
    fn test_debug_output_masks_key() {
        let provider = DeeplProvider::new("secret:fx".to_string()).unwrap();
        let debug_str = format!("{:?}", provider);
        assert!(!debug_str.contains("secret"));
    }

    #[tokio::test]
    async fn test_batch_empty_makes_no_request() {
        let provider = DeeplProvider::new("k".to_string())
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        assert!(provider.translate_batch(&[], "en", "de").await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore] // Run with: cargo test --ignored
    async fn test_real_api_languages() {
        if std::env::var(DEEPL_API_KEY_ENV).is_err() {
            eprintln!("Skipping: {} not set", DEEPL_API_KEY_ENV);
            return;
        }
        let provider = DeeplProvider::from_env().unwrap();
        let langs = provider.supported_languages().await.unwrap();
        assert!(langs.supports("de"));
    }
}
