//! Placeholder extraction and numeric surrogate protection
//!
//! Source strings carry two kinds of placeholders that must survive
//! translation byte-for-byte:
//!
//! - printf-style format specifiers: `%s`, `%d`
//! - UI interpolation labels: `{{identifier}}`
//!
//! Machine translation engines happily translate or re-punctuate both. Before
//! dispatch every placeholder is swapped for an opaque run of digits that MT
//! engines pass through untouched, and swapped back afterwards:
//!
//! ```text
//! Source:     "You have {{num}} new messages from %s"
//! Protected:  "You have 43210000 new messages from 8888888"
//! Translated: "Você tem 43210000 novas mensagens de 8888888"
//! Restored:   "Você tem {{num}} novas mensagens de %s"
//! ```

use regex::Regex;
use std::sync::LazyLock;

static FORMAT_SPECIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[sd]").expect("format specifier pattern is valid"));

static LABEL_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{[a-zA-Z_]+\}\}").expect("label token pattern is valid")
});

/// Fixed surrogates for the two format specifiers
pub const FORMAT_SURROGATES: [(&str, &str); 2] = [("%s", "8888888"), ("%d", "9999999")];

/// Label surrogates are the last eight digits of this prefix followed by a counter
const LABEL_SURROGATE_PREFIX: &str = "987654321000";
const LABEL_SURROGATE_WIDTH: usize = 8;

/// Label whose absence is tolerated when a translation has no labels at all
pub const NUMERAL_LABEL: &str = "{{num}}";

/// Number of `%s`/`%d` specifiers in `text`
pub fn format_specifier_count(text: &str) -> usize {
    FORMAT_SPECIFIER.find_iter(text).count()
}

/// `{{identifier}}` tokens of `text`, in order of appearance, duplicates included
pub fn label_tokens(text: &str) -> Vec<&str> {
    LABEL_TOKEN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Distinct `{{identifier}}` tokens of `text`, in order of first appearance
pub fn distinct_label_tokens(text: &str) -> Vec<&str> {
    let mut seen = Vec::new();
    for token in label_tokens(text) {
        if !seen.contains(&token) {
            seen.push(token);
        }
    }
    seen
}

fn label_surrogate(counter: usize) -> String {
    let raw = format!("{}{}", LABEL_SURROGATE_PREFIX, counter);
    raw[raw.len() - LABEL_SURROGATE_WIDTH..].to_string()
}

/// One token ↔ surrogate pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surrogate {
    pub token: String,
    pub surrogate: String,
}

/// Bidirectional placeholder ↔ surrogate table
///
/// A single table is shared by every language in a run, so a label always
/// maps to the same surrogate. Surrogates are assigned in first-encountered
/// order and never reuse digits that occur in any registered source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMap {
    entries: Vec<Surrogate>,
    next_label: usize,
}

impl Default for PlaceholderMap {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceholderMap {
    /// Table pre-seeded with the format specifier surrogates
    pub fn new() -> Self {
        PlaceholderMap {
            entries: FORMAT_SURROGATES
                .iter()
                .map(|(token, surrogate)| Surrogate {
                    token: token.to_string(),
                    surrogate: surrogate.to_string(),
                })
                .collect(),
            next_label: 0,
        }
    }

    /// Build a table covering every label in `sources`
    pub fn for_sources<'a, I>(sources: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let sources: Vec<&str> = sources.into_iter().collect();
        let mut map = Self::new();
        map.register_sources(&sources);
        map
    }

    /// Assign surrogates to labels of `sources` not yet in the table
    ///
    /// `sources` also serves as the collision corpus: a candidate surrogate
    /// that already occurs in any of them is skipped.
    pub fn register_sources(&mut self, sources: &[&str]) {
        for source in sources {
            for token in distinct_label_tokens(source) {
                if self.surrogate_for(token).is_none() {
                    let surrogate = self.next_free_surrogate(sources);
                    self.entries.push(Surrogate {
                        token: token.to_string(),
                        surrogate,
                    });
                }
            }
        }
    }

    fn next_free_surrogate(&mut self, corpus: &[&str]) -> String {
        loop {
            let candidate = label_surrogate(self.next_label);
            self.next_label += 1;
            let clashes_with_text = corpus.iter().any(|s| s.contains(&candidate));
            let clashes_with_table = self
                .entries
                .iter()
                .any(|e| e.surrogate.contains(&candidate) || candidate.contains(&e.surrogate));
            if !clashes_with_text && !clashes_with_table {
                return candidate;
            }
        }
    }

    /// Whether `source` already contains a surrogate from the table
    ///
    /// Label surrogates avoid registered text, but the format surrogates are
    /// fixed. Such a source cannot round-trip: its own digits would be restored
    /// to `%s`/`%d`.
    pub fn collides(&self, source: &str) -> bool {
        self.entries.iter().any(|e| source.contains(&e.surrogate))
    }

    pub fn surrogate_for(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.token == token)
            .map(|e| e.surrogate.as_str())
    }

    pub fn token_for(&self, surrogate: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.surrogate == surrogate)
            .map(|e| e.token.as_str())
    }

    pub fn entries(&self) -> &[Surrogate] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace every known placeholder in `text` with its surrogate
    pub fn protect(&self, text: &str) -> String {
        let mut result = text.to_string();
        for entry in &self.entries {
            if result.contains(&entry.token) {
                result = result.replace(&entry.token, &entry.surrogate);
            }
        }
        result
    }

    /// Replace every surrogate in `text` with its original placeholder
    ///
    /// Providers sometimes duplicate a surrogate; all occurrences are restored.
    pub fn restore(&self, text: &str) -> String {
        let mut result = text.to_string();
        for entry in &self.entries {
            while result.contains(&entry.surrogate) {
                result = result.replace(&entry.surrogate, &entry.token);
            }
        }
        result
    }
}
