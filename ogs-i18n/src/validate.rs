//! Integrity validation of one language's catalog
//!
//! For every active entry, every non-empty source string (singular and plural)
//! is paired with every translated form. Each pair is checked for:
//!
//! 1. **Missing translation** - the form is blank. If the cache holds a machine
//!    translation for the source, the remaining checks run against that text.
//! 2. **Vandalism** - profanity or a denylisted symbol.
//! 3. **Format mismatch** - differing number of `%s`/`%d` specifiers.
//! 4. **Placeholder mismatch** - a source `{{label}}` absent from the translation.
//!    `{{num}}` may be dropped when the translation contains no `{{` at all,
//!    since languages often spell out "one" instead of the numeral.

use crate::cache::TranslationCache;
use crate::content::{ContentPolicy, VandalismReason};
use crate::loader::Catalog;
use crate::locale::LanguageCode;
use crate::placeholder::{NUMERAL_LABEL, distinct_label_tokens, format_specifier_count};
use crate::report::LanguageSummary;
use std::collections::HashSet;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindingKind {
    MissingTranslation,
    FormatMismatch { expected: usize, found: usize },
    PlaceholderMismatch { token: String },
    Vandalized(VandalismReason),
}

/// One problem with one (source, translation) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFinding {
    pub language: LanguageCode,
    pub kind: FindingKind,
    pub source_text: String,
    pub actual_text: String,
    /// The checked text came from the machine translation cache
    pub auto_translated: bool,
}

impl ValidationFinding {
    pub fn is_error(&self) -> bool {
        matches!(
            self.kind,
            FindingKind::FormatMismatch { .. } | FindingKind::PlaceholderMismatch { .. }
        )
    }
}

impl std::fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.auto_translated {
            write!(f, "[autotranslated] ")?;
        }
        let catalog = self.language.catalog_tag();
        match &self.kind {
            FindingKind::MissingTranslation => {
                write!(f, "{}.po: missing translation: {}", catalog, self.source_text)
            }
            FindingKind::FormatMismatch { .. } => write!(
                f,
                "{}.po: %s mismatch: {} -> {}",
                catalog, self.source_text, self.actual_text
            ),
            FindingKind::PlaceholderMismatch { token } => write!(
                f,
                "{}.po: label replacement for {} missing: {} -> {}",
                catalog, token, self.source_text, self.actual_text
            ),
            FindingKind::Vandalized(reason) => write!(
                f,
                "{}.po: vandalization ({}): {} -> {}",
                catalog, reason, self.source_text, self.actual_text
            ),
        }
    }
}

/// Result of validating one catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageReport {
    pub language: LanguageCode,
    pub summary: LanguageSummary,
    pub findings: Vec<ValidationFinding>,
    /// Distinct source strings with at least one blank form, in catalog order
    pub missing_sources: Vec<String>,
}

impl LanguageReport {
    fn new(language: LanguageCode) -> Self {
        LanguageReport {
            language,
            summary: LanguageSummary::default(),
            findings: Vec::new(),
            missing_sources: Vec::new(),
        }
    }

    pub fn is_vandalized(&self) -> bool {
        self.summary.vandalization_count > 0
    }
}

/// Checks (source, translation) pairs against a content policy
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    policy: &'a ContentPolicy,
    cache: &'a TranslationCache,
}

impl<'a> Validator<'a> {
    pub fn new(policy: &'a ContentPolicy, cache: &'a TranslationCache) -> Self {
        Validator { policy, cache }
    }

    /// Validate every active entry of `catalog`
    pub fn validate(&self, catalog: &Catalog) -> LanguageReport {
        let language = &catalog.language;
        let mut report = LanguageReport::new(language.clone());
        let mut seen_missing = HashSet::new();

        for entry in catalog.active_entries() {
            for source in entry.source_strings() {
                for form in &entry.translations {
                    let (text, auto_translated) = if form.trim().is_empty() {
                        report.summary.missing_count += 1;
                        if seen_missing.insert(source.to_string()) {
                            report.missing_sources.push(source.to_string());
                        }
                        report.findings.push(ValidationFinding {
                            language: language.clone(),
                            kind: FindingKind::MissingTranslation,
                            source_text: source.to_string(),
                            actual_text: form.clone(),
                            auto_translated: false,
                        });
                        match self.cache.get(language, source) {
                            Some(cached) => (cached, true),
                            None => continue,
                        }
                    } else {
                        (form.as_str(), false)
                    };

                    for kind in self.check_pair(language, source, text) {
                        let finding = ValidationFinding {
                            language: language.clone(),
                            kind,
                            source_text: source.to_string(),
                            actual_text: text.to_string(),
                            auto_translated,
                        };
                        warn!("{}", finding);
                        if finding.is_error() {
                            report.summary.error_count += 1;
                        } else {
                            report.summary.vandalization_count += 1;
                        }
                        report.findings.push(finding);
                    }
                }
            }
        }

        report
    }

    /// Every problem with `translation` as a rendering of `source`
    pub fn check_pair(
        &self,
        language: &LanguageCode,
        source: &str,
        translation: &str,
    ) -> Vec<FindingKind> {
        let mut kinds = Vec::new();

        if let Some(reason) = self.policy.check(language.as_str(), translation) {
            kinds.push(FindingKind::Vandalized(reason));
        }

        let expected = format_specifier_count(source);
        let found = format_specifier_count(translation);
        if expected != found {
            kinds.push(FindingKind::FormatMismatch { expected, found });
        }

        let has_any_label = translation.contains("{{");
        for token in distinct_label_tokens(source) {
            if token == NUMERAL_LABEL && !has_any_label {
                continue;
            }
            if !translation.contains(token) {
                kinds.push(FindingKind::PlaceholderMismatch {
                    token: token.to_string(),
                });
            }
        }

        kinds
    }
}
