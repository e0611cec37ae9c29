//! Mock Machine Translator for testing
//!
//! A deterministic, API-free translator for exercising the translation
//! engine and the audit pipeline without keys or network access. Every
//! batch request is recorded so tests can assert how many provider calls a
//! run issued and with which payload.
//!
//! # Example
//!
//! ```ignore
//! use ogs_i18n_mt::{MachineTranslator, MockMode, MockTranslator};
//!
//! let mock = MockTranslator::new("DeepL", MockMode::Suffix, ["fr"]);
//! let result = mock.translate_batch(&["hello".to_string()], "en", "fr").await?;
//! assert_eq!(result, vec!["hello_fr"]);
//! assert_eq!(mock.call_count(), 1);
//! ```

use crate::error::{MtError, MtResult};
use crate::translator::{LanguageMatch, MachineTranslator, SupportedLanguages};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append locale suffix: "hello" → "hello_fr"
    /// This preserves surrogates perfectly for testing
    Suffix,

    /// Use predefined mappings: (text, target_locale) → translation,
    /// falling back to `Suffix`
    Mappings(HashMap<(String, String), String>),

    /// Reverse word order, as SOV languages do to placeholder positions
    Reorder,

    /// Simulate API errors
    Error(String),

    /// No-op: return input unchanged
    NoOp,

    /// Suffix, but answer with one translation fewer than requested
    DropLast,
}

/// One recorded `translate_batch` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    pub target_locale: String,
    pub texts: Vec<String>,
}

/// Mock translator that simulates various translation scenarios
#[derive(Debug, Clone)]
pub struct MockTranslator {
    name: String,
    mode: MockMode,
    languages: Vec<String>,
    matching: LanguageMatch,
    requests: Arc<Mutex<Vec<MockRequest>>>,
}

impl MockTranslator {
    /// Create a mock named `name` that supports the given target languages
    pub fn new<I, S>(name: &str, mode: MockMode, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            mode,
            languages: languages.into_iter().map(Into::into).collect(),
            matching: LanguageMatch::Exact,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Compare target languages ignoring case, like DeepL
    pub fn case_insensitive(mut self) -> Self {
        self.matching = LanguageMatch::CaseInsensitive;
        self
    }

    /// Number of `translate_batch` calls so far
    pub fn call_count(&self) -> usize {
        self.requests().len()
    }

    /// All recorded `translate_batch` calls
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Apply translation logic based on the mode
    fn apply_translation(&self, text: &str, target: &str) -> MtResult<String> {
        match &self.mode {
            MockMode::Suffix | MockMode::DropLast => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_{}", text, target)))
            }
            MockMode::Reorder => {
                let words: Vec<&str> = text.split_whitespace().rev().collect();
                Ok(words.join(" "))
            }
            MockMode::Error(msg) => Err(MtError::TranslationError(msg.clone())),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate_batch(
        &self,
        texts: &[String],
        _source_locale: &str,
        target_locale: &str,
    ) -> MtResult<Vec<String>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(MockRequest {
                target_locale: target_locale.to_string(),
                texts: texts.to_vec(),
            });
        }

        let mut results = texts
            .iter()
            .map(|text| self.apply_translation(text, target_locale))
            .collect::<MtResult<Vec<String>>>()?;
        if matches!(self.mode, MockMode::DropLast) {
            results.pop();
        }
        Ok(results)
    }

    async fn supported_languages(&self) -> MtResult<SupportedLanguages> {
        Ok(SupportedLanguages::new(
            self.languages.iter().cloned(),
            self.matching,
        ))
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}
