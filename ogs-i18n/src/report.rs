//! Per-language status, the missing-count summary and client marker files
//!
//! Each language's client bundle (`locale/<lang>.js`) carries a single
//! assignment the UI reads to nag translators:
//!
//! ```js
//! window.ogs_missing_translation_count = 12;
//! ```
//!
//! The assignment is rewritten in place when present and appended otherwise,
//! so repeated runs with the same count leave the file byte-identical.

use crate::error::{I18nError, I18nResult};
use crate::locale::LanguageCode;
use crate::persist::{write_atomic, write_json_pretty};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Global the client reads the missing count from
pub const DEFAULT_MARKER_GLOBAL: &str = "window.ogs_missing_translation_count";

/// Aggregate counts for one language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LanguageSummary {
    pub missing_count: usize,
    pub error_count: usize,
    pub vandalization_count: usize,
}

impl LanguageSummary {
    pub fn status(&self) -> LanguageStatus {
        if self.vandalization_count > 0 {
            LanguageStatus::Vandalized
        } else if self.error_count > 0 {
            LanguageStatus::Bad
        } else if self.missing_count > 0 {
            LanguageStatus::Missing
        } else {
            LanguageStatus::Good
        }
    }
}

/// Final classification of a language, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LanguageStatus {
    Vandalized,
    Bad,
    Missing,
    Good,
}

/// The one status line reported for a language
pub fn status_line(language: &LanguageCode, summary: &LanguageSummary) -> String {
    match summary.status() {
        LanguageStatus::Vandalized => format!(
            "*** VANDALIZED *** {}: {} vandalizations",
            language, summary.vandalization_count
        ),
        LanguageStatus::Bad => format!(
            "** BAD ** {}: {} missing {} errors",
            language, summary.missing_count, summary.error_count
        ),
        LanguageStatus::Missing => {
            format!("MISSING {}: {} missing", language, summary.missing_count)
        }
        LanguageStatus::Good => format!("GOOD {}", language),
    }
}

/// Running per-language totals, in the order languages were processed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    languages: Vec<(LanguageCode, LanguageSummary)>,
}

impl StatusReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, language: LanguageCode, summary: LanguageSummary) {
        self.languages.push((language, summary));
    }

    pub fn languages(&self) -> &[(LanguageCode, LanguageSummary)] {
        &self.languages
    }

    pub fn get(&self, language: &LanguageCode) -> Option<&LanguageSummary> {
        self.languages
            .iter()
            .find(|(l, _)| l == language)
            .map(|(_, s)| s)
    }

    /// Languages with at least one vandalized string, with their counts
    pub fn vandalized(&self) -> Vec<(LanguageCode, usize)> {
        self.languages
            .iter()
            .filter(|(_, s)| s.vandalization_count > 0)
            .map(|(l, s)| (l.clone(), s.vandalization_count))
            .collect()
    }

    pub fn total_missing(&self) -> usize {
        self.languages.iter().map(|(_, s)| s.missing_count).sum()
    }

    /// `{ language: missing_count }` in processing order
    pub fn missing_by_language(&self) -> Map<String, Value> {
        self.languages
            .iter()
            .map(|(l, s)| (l.as_str().to_string(), Value::from(s.missing_count)))
            .collect()
    }

    /// Write the missing-count summary (`translations_missing.json`)
    pub fn write_summary(&self, path: &Path) -> I18nResult<()> {
        write_json_pretty(path, &self.missing_by_language())
    }
}

/// Rewrites the missing-count assignment in client marker files
#[derive(Debug, Clone)]
pub struct MissingCountMarker {
    global: String,
    pattern: Regex,
}

impl MissingCountMarker {
    pub fn new(global: &str) -> I18nResult<Self> {
        let valid = !global.is_empty()
            && global
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '$');
        if !valid {
            return Err(I18nError::Config(format!(
                "invalid marker global name: {}",
                global
            )));
        }

        let pattern = Regex::new(&format!(r"{} = [0-9]+;", regex::escape(global)))
            .map_err(|e| I18nError::Config(format!("invalid marker pattern: {}", e)))?;

        Ok(MissingCountMarker {
            global: global.to_string(),
            pattern,
        })
    }

    pub fn global(&self) -> &str {
        &self.global
    }

    fn assignment(&self, count: usize) -> String {
        format!("{} = {};", self.global, count)
    }

    /// Marker file contents with the assignment set to `count`
    pub fn rewrite(&self, content: &str, count: usize) -> String {
        let assignment = self.assignment(count);
        if self.pattern.is_match(content) {
            self.pattern
                .replace(content, regex::NoExpand(&assignment))
                .into_owned()
        } else {
            format!("{}{}", content, assignment)
        }
    }

    /// Rewrite a marker file on disk, creating it if absent
    ///
    /// Returns whether the file contents changed.
    pub fn update_file(&self, path: &Path, count: usize) -> I18nResult<bool> {
        let current = if path.exists() {
            fs::read_to_string(path).map_err(|e| I18nError::io(path, e))?
        } else {
            String::new()
        };

        let updated = self.rewrite(&current, count);
        if updated == current && path.exists() {
            return Ok(false);
        }
        write_atomic(path, updated.as_bytes())?;
        Ok(true)
    }
}

impl Default for MissingCountMarker {
    fn default() -> Self {
        MissingCountMarker {
            global: DEFAULT_MARKER_GLOBAL.to_string(),
            pattern: Regex::new(&format!(r"{} = [0-9]+;", regex::escape(DEFAULT_MARKER_GLOBAL)))
                .expect("default marker pattern is valid"),
        }
    }
}

/// Marker file path: `<dir>/<language>.js`, keyed by the registry spelling
pub fn marker_path(locale_dir: &Path, language: &LanguageCode) -> PathBuf {
    locale_dir.join(format!("{}.js", language.as_str()))
}
