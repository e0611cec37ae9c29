//! Content-safety policy for detecting vandalized translations
//!
//! Community-maintained catalogs occasionally receive hostile edits. A
//! translation is treated as vandalized when it matches a profanity word list
//! (English, or the target language) on word boundaries, or when it contains
//! any denylisted symbol.
//!
//! The word lists and symbols are data, not code: a versioned JSON document
//! is compiled once into an immutable [`ContentPolicy`].
//!
//! ```json
//! {
//!     "version": 1,
//!     "symbols": ["卐"],
//!     "profanity": { "en": ["..."], "de": ["..."] }
//! }
//! ```

use crate::error::{I18nError, I18nResult};
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

const BUILTIN_POLICY: &str = include_str!("../data/content-policy.json");

/// Language whose word list applies to every catalog
pub const BASE_PROFANITY_LANGUAGE: &str = "en";

#[derive(Debug, Deserialize)]
struct PolicyDocument {
    version: u32,
    #[serde(default)]
    symbols: Vec<String>,
    #[serde(default)]
    profanity: BTreeMap<String, Vec<String>>,
}

/// Why a string was flagged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VandalismReason {
    /// Matched the profanity list of the given language
    Profanity { language: String },
    /// Contained a denylisted symbol
    Symbol(String),
}

impl std::fmt::Display for VandalismReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VandalismReason::Profanity { language } => {
                write!(f, "{} profanity detected", language)
            }
            VandalismReason::Symbol(symbol) => write!(f, "denylisted symbol {}", symbol),
        }
    }
}

/// Compiled profanity patterns and symbol denylist
#[derive(Debug, Clone)]
pub struct ContentPolicy {
    version: u32,
    symbols: Vec<String>,
    profanity: HashMap<String, Regex>,
}

impl ContentPolicy {
    /// Policy shipped with the crate
    pub fn builtin() -> I18nResult<Self> {
        Self::from_json_str(BUILTIN_POLICY, Path::new("content-policy.json"))
    }

    /// Load a replacement policy document from disk
    pub fn load(path: &Path) -> I18nResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| I18nError::io(path, e))?;
        Self::from_json_str(&content, path)
    }

    pub fn from_json_str(content: &str, origin: &Path) -> I18nResult<Self> {
        let doc: PolicyDocument =
            serde_json::from_str(content).map_err(|e| I18nError::json(origin, e.to_string()))?;

        let mut profanity = HashMap::new();
        for (language, words) in &doc.profanity {
            if let Some(regex) = compile_word_list(words)? {
                profanity.insert(language.clone(), regex);
            }
        }

        let symbols = doc
            .symbols
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase())
            .collect();

        Ok(ContentPolicy {
            version: doc.version,
            symbols,
            profanity,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Check a translated string for `language`
    ///
    /// The base (English) list is checked first, then the target language's
    /// own list, then the symbol denylist.
    pub fn check(&self, language: &str, text: &str) -> Option<VandalismReason> {
        for lang in [BASE_PROFANITY_LANGUAGE, language] {
            if let Some(regex) = self.profanity.get(lang)
                && regex.is_match(text)
            {
                return Some(VandalismReason::Profanity {
                    language: lang.to_string(),
                });
            }
        }

        let lower = text.to_lowercase();
        self.symbols
            .iter()
            .find(|symbol| lower.contains(symbol.as_str()))
            .map(|symbol| VandalismReason::Symbol(symbol.clone()))
    }

    pub fn looks_vandalized(&self, language: &str, text: &str) -> bool {
        self.check(language, text).is_some()
    }
}

fn compile_word_list(words: &[String]) -> I18nResult<Option<Regex>> {
    let alternatives: Vec<String> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(|w| format!(r"\b{}\b", regex::escape(w)))
        .collect();
    if alternatives.is_empty() {
        return Ok(None);
    }

    RegexBuilder::new(&format!("(?:{})", alternatives.join("|")))
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|e| I18nError::Config(format!("invalid profanity pattern: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(json: &str) -> ContentPolicy {
        ContentPolicy::from_json_str(json, Path::new("policy.json")).unwrap()
    }

    #[test]
    fn test_builtin_policy_loads() {
        let policy = ContentPolicy::builtin().unwrap();
        assert_eq!(policy.version(), 1);
        assert!(!policy.looks_vandalized("fr", "Bonjour tout le monde"));
    }

    #[test]
    fn test_profanity_matches_word_boundaries() {
        let policy = policy(r#"{"version": 1, "profanity": {"en": ["darn"]}}"#);
        assert!(policy.looks_vandalized("fr", "well darn it"));
        assert!(policy.looks_vandalized("fr", "DARN"));
        assert!(!policy.looks_vandalized("fr", "darned"));
    }

    #[test]
    fn test_target_language_list() {
        let policy = policy(r#"{"version": 2, "profanity": {"de": ["mist"]}}"#);
        assert_eq!(
            policy.check("de", "So ein Mist"),
            Some(VandalismReason::Profanity {
                language: "de".to_string()
            })
        );
        assert_eq!(policy.check("fr", "So ein Mist"), None);
    }

    #[test]
    fn test_symbol_denylist_is_case_folded() {
        let policy = policy(r#"{"version": 1, "symbols": ["☭", "ᛋᛋ", "XX"]}"#);
        assert_eq!(
            policy.check("ru", "Привет ☭"),
            Some(VandalismReason::Symbol("☭".to_string()))
        );
        assert!(policy.looks_vandalized("ru", "aXxb"));
        assert!(!policy.looks_vandalized("ru", "ᛋ alone"));
    }

    #[test]
    fn test_words_are_literal() {
        let policy = policy(r#"{"version": 1, "profanity": {"en": ["a.b"]}}"#);
        assert!(policy.looks_vandalized("en", "a.b"));
        assert!(!policy.looks_vandalized("en", "axb"));
    }

    #[test]
    fn test_malformed_policy() {
        let result = ContentPolicy::from_json_str("{\"symbols\": 3}", Path::new("p.json"));
        assert!(matches!(result, Err(I18nError::Json { .. })));
    }
}
