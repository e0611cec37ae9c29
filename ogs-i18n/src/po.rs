//! Gettext PO catalog parser
//!
//! Parses the subset of the PO format produced by `xgettext`/`msgmerge` and by
//! translation platforms:
//!
//! ```text
//! # translator comment
//! #: src/views/Play/QuickMatch.tsx:120
//! #, fuzzy
//! msgctxt "Game speed"
//! msgid "You have {{num}} new message"
//! msgid_plural "You have {{num}} new messages"
//! msgstr[0] "Vous avez {{num}} nouveau message"
//! msgstr[1] ""
//! "continued on the next line"
//!
//! #~ msgid "An old string"
//! #~ msgstr "Une vieille chaîne"
//! ```
//!
//! The header entry (empty `msgid` without context) is not returned as a
//! catalog entry. Entries prefixed with `#~` are returned with `obsolete` set.

use crate::error::{I18nError, I18nResult};
use std::path::Path;

/// Upper bound on `msgstr[n]`; no language has this many plural forms
pub const MAX_PLURAL_FORMS: usize = 32;

/// One translatable unit of a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Disambiguating `msgctxt`, if any
    pub context: Option<String>,
    /// Singular source string (`msgid`)
    pub source_text: String,
    /// Plural source string (`msgid_plural`)
    pub source_text_plural: Option<String>,
    /// Translated forms, one per plural category. Empty string means untranslated.
    pub translations: Vec<String>,
    /// Entry was commented out with `#~`
    pub obsolete: bool,
    /// Flags from `#,` lines (e.g. `fuzzy`, `javascript-format`)
    pub flags: Vec<String>,
    /// Source references from `#:` lines
    pub references: Vec<String>,
}

impl CatalogEntry {
    pub fn new(source_text: &str, translations: Vec<String>) -> Self {
        CatalogEntry {
            source_text: source_text.to_string(),
            translations,
            ..Default::default()
        }
    }

    pub fn with_plural(mut self, source_text_plural: &str) -> Self {
        self.source_text_plural = Some(source_text_plural.to_string());
        self
    }

    /// Non-empty source strings: the singular, then the plural if present
    pub fn source_strings(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.source_text.as_str())
            .chain(self.source_text_plural.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn is_fuzzy(&self) -> bool {
        self.flags.iter().any(|f| f == "fuzzy")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Context,
    Id,
    IdPlural,
    Str(usize),
}

#[derive(Debug, Default)]
struct PendingEntry {
    start_line: usize,
    context: Option<String>,
    id: Option<String>,
    id_plural: Option<String>,
    strs: Vec<Option<String>>,
    obsolete: bool,
    flags: Vec<String>,
    references: Vec<String>,
}

impl PendingEntry {
    fn is_empty(&self) -> bool {
        self.context.is_none()
            && self.id.is_none()
            && self.strs.is_empty()
            && self.flags.is_empty()
            && self.references.is_empty()
    }

    fn has_msgstr(&self) -> bool {
        !self.strs.is_empty()
    }
}

struct PoParser<'a> {
    origin: &'a Path,
    entries: Vec<CatalogEntry>,
    pending: PendingEntry,
    field: Field,
}

impl<'a> PoParser<'a> {
    fn new(origin: &'a Path) -> Self {
        PoParser {
            origin,
            entries: Vec::new(),
            pending: PendingEntry::default(),
            field: Field::None,
        }
    }

    fn error(&self, line: usize, message: impl Into<String>) -> I18nError {
        I18nError::CatalogSyntax {
            path: self.origin.display().to_string(),
            line,
            message: message.into(),
        }
    }

    /// Close the pending entry, appending it unless it is the header
    fn flush(&mut self) -> I18nResult<()> {
        let pending = std::mem::take(&mut self.pending);
        self.field = Field::None;

        if pending.is_empty() {
            return Ok(());
        }

        let Some(id) = pending.id else {
            return Err(self.error(pending.start_line, "entry has no msgid"));
        };
        if pending.strs.is_empty() {
            return Err(self.error(pending.start_line, "entry has no msgstr"));
        }

        if id.is_empty() && pending.context.is_none() {
            // Header entry
            return Ok(());
        }

        self.entries.push(CatalogEntry {
            context: pending.context,
            source_text: id,
            source_text_plural: pending.id_plural,
            translations: pending
                .strs
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect(),
            obsolete: pending.obsolete,
            flags: pending.flags,
            references: pending.references,
        });
        Ok(())
    }

    /// Start a new entry if the pending one is already complete
    fn begin_element(&mut self, line_no: usize) -> I18nResult<()> {
        if self.pending.has_msgstr() {
            self.flush()?;
        }
        if self.pending.is_empty() {
            self.pending.start_line = line_no;
        }
        Ok(())
    }

    fn parse_line(&mut self, line_no: usize, raw: &str) -> I18nResult<()> {
        let mut line = raw.trim();
        if line.is_empty() {
            self.field = Field::None;
            return Ok(());
        }

        let mut obsolete = false;
        if let Some(rest) = line.strip_prefix("#~") {
            if rest.starts_with('|') {
                // Previous-msgid of an obsolete entry
                return Ok(());
            }
            obsolete = true;
            line = rest.trim();
            if line.is_empty() {
                return Ok(());
            }
        }

        if let Some(comment) = line.strip_prefix('#') {
            self.begin_element(line_no)?;
            self.field = Field::None;
            if let Some(flags) = comment.strip_prefix(',') {
                self.pending.flags.extend(
                    flags
                        .split(',')
                        .map(str::trim)
                        .filter(|f| !f.is_empty())
                        .map(str::to_string),
                );
            } else if let Some(refs) = comment.strip_prefix(':') {
                self.pending
                    .references
                    .extend(refs.split_whitespace().map(str::to_string));
            }
            return Ok(());
        }

        if line.starts_with('"') {
            let value = self.parse_string(line_no, line)?;
            return self.append_continuation(line_no, &value);
        }

        let (keyword, rest) = line
            .split_once(|c: char| c.is_whitespace())
            .map(|(k, r)| (k, r.trim()))
            .ok_or_else(|| self.error(line_no, format!("unexpected content: {}", line)))?;
        let value = self.parse_string(line_no, rest)?;

        match keyword {
            "msgctxt" => {
                self.begin_element(line_no)?;
                self.pending.context = Some(value);
                self.field = Field::Context;
            }
            "msgid" => {
                self.begin_element(line_no)?;
                if self.pending.id.is_some() {
                    return Err(self.error(line_no, "msgid without preceding msgstr"));
                }
                self.pending.id = Some(value);
                self.pending.obsolete = obsolete;
                self.field = Field::Id;
            }
            "msgid_plural" => {
                if self.pending.id.is_none() || self.pending.has_msgstr() {
                    return Err(self.error(line_no, "msgid_plural must follow msgid"));
                }
                self.pending.id_plural = Some(value);
                self.field = Field::IdPlural;
            }
            "msgstr" => {
                self.require_id(line_no)?;
                self.set_msgstr(line_no, 0, value)?;
            }
            other => {
                let index = other
                    .strip_prefix("msgstr[")
                    .and_then(|s| s.strip_suffix(']'))
                    .and_then(|s| s.parse::<usize>().ok())
                    .ok_or_else(|| self.error(line_no, format!("unknown keyword: {}", other)))?;
                self.require_id(line_no)?;
                if self.pending.id_plural.is_none() {
                    return Err(self.error(line_no, "msgstr[n] without msgid_plural"));
                }
                self.set_msgstr(line_no, index, value)?;
            }
        }
        Ok(())
    }

    fn require_id(&self, line_no: usize) -> I18nResult<()> {
        if self.pending.id.is_none() {
            return Err(self.error(line_no, "msgstr without msgid"));
        }
        Ok(())
    }

    fn set_msgstr(&mut self, line_no: usize, index: usize, value: String) -> I18nResult<()> {
        if index >= MAX_PLURAL_FORMS {
            return Err(self.error(
                line_no,
                format!("plural index {} out of range (max {})", index, MAX_PLURAL_FORMS - 1),
            ));
        }
        if self.pending.strs.len() <= index {
            self.pending.strs.resize(index + 1, None);
        }
        if self.pending.strs[index].is_some() {
            return Err(self.error(line_no, format!("duplicate msgstr[{}]", index)));
        }
        self.pending.strs[index] = Some(value);
        self.field = Field::Str(index);
        Ok(())
    }

    fn append_continuation(&mut self, line_no: usize, value: &str) -> I18nResult<()> {
        let target = match self.field {
            Field::None => return Err(self.error(line_no, "string continuation without keyword")),
            Field::Context => self.pending.context.as_mut(),
            Field::Id => self.pending.id.as_mut(),
            Field::IdPlural => self.pending.id_plural.as_mut(),
            Field::Str(i) => self.pending.strs.get_mut(i).and_then(Option::as_mut),
        };
        match target {
            Some(s) => {
                s.push_str(value);
                Ok(())
            }
            None => Err(self.error(line_no, "string continuation without keyword")),
        }
    }

    /// Parse a quoted C-style string literal
    fn parse_string(&self, line_no: usize, literal: &str) -> I18nResult<String> {
        let inner = literal
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .filter(|_| literal.len() >= 2)
            .ok_or_else(|| self.error(line_no, format!("expected quoted string: {}", literal)))?;

        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('a') => out.push('\u{07}'),
                    Some('b') => out.push('\u{08}'),
                    Some('f') => out.push('\u{0C}'),
                    Some('v') => out.push('\u{0B}'),
                    Some(other @ ('"' | '\\' | '\'' | '?')) => out.push(other),
                    Some(other) => {
                        return Err(
                            self.error(line_no, format!("invalid escape sequence: \\{}", other))
                        );
                    }
                    None => return Err(self.error(line_no, "dangling backslash")),
                },
                '"' => return Err(self.error(line_no, "unescaped quote inside string")),
                _ => out.push(c),
            }
        }
        Ok(out)
    }
}

/// Parse PO catalog text. `origin` is only used in error messages.
pub fn parse_po(content: &str, origin: &Path) -> I18nResult<Vec<CatalogEntry>> {
    let mut parser = PoParser::new(origin);
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    for (i, line) in content.lines().enumerate() {
        parser.parse_line(i + 1, line)?;
    }
    parser.flush()?;
    Ok(parser.entries)
}
