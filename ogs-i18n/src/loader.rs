use crate::error::{I18nError, I18nResult};
use crate::locale::{LanguageCode, LanguageRegistry};
use crate::po::{CatalogEntry, parse_po};
use std::fs;
use std::path::{Path, PathBuf};

/// All entries of one language's catalog, in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub language: LanguageCode,
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(language: LanguageCode, entries: Vec<CatalogEntry>) -> Self {
        Catalog { language, entries }
    }

    /// Entries that take part in validation
    pub fn active_entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|e| !e.obsolete)
    }
}

/// Path of a language's gettext catalog: `<dir>/<catalog_tag>.po`
///
/// `pt-BR` resolves to `locale/pt_BR.po`.
pub fn catalog_path(locale_dir: &Path, language: &LanguageCode) -> PathBuf {
    locale_dir.join(format!("{}.po", language.catalog_tag()))
}

/// Load a single language's catalog
///
/// # Errors
/// - Catalog file not found or unreadable
/// - Catalog syntax errors (reported with file and line)
pub fn load_catalog(locale_dir: &Path, language: &LanguageCode) -> I18nResult<Catalog> {
    let path = catalog_path(locale_dir, language);
    let content = fs::read_to_string(&path).map_err(|e| I18nError::io(&path, e))?;
    let entries = parse_po(&content, &path)?;
    Ok(Catalog::new(language.clone(), entries))
}

/// Load every catalog named by the registry, in registry order
///
/// There is no partial-language skip: the first missing or malformed file
/// fails the whole load.
pub fn load_all_catalogs(
    locale_dir: &Path,
    registry: &LanguageRegistry,
) -> I18nResult<Vec<Catalog>> {
    registry
        .languages()
        .iter()
        .map(|language| load_catalog(locale_dir, language))
        .collect()
}
