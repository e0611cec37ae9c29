//! Translation catalog auditing for the online-go.com client
//!
//! Loads the gettext catalog of every supported language, checks each
//! translation for placeholder integrity and vandalism, and maintains the
//! per-language missing-translation counts the client displays.
//!
//! Network-facing machine translation lives in the `ogs-i18n-mt` crate.

pub mod cache;
pub mod content;
pub mod error;
pub mod loader;
pub mod locale;
pub mod persist;
pub mod placeholder;
pub mod po;
pub mod report;
pub mod validate;

pub use cache::TranslationCache;
pub use content::{ContentPolicy, VandalismReason};
pub use error::{I18nError, I18nResult};
pub use loader::{Catalog, catalog_path, load_all_catalogs, load_catalog};
pub use locale::{LanguageCode, LanguageRegistry, validate_locale};
pub use placeholder::PlaceholderMap;
pub use po::{CatalogEntry, parse_po};
pub use report::{
    DEFAULT_MARKER_GLOBAL, LanguageStatus, LanguageSummary, MissingCountMarker, StatusReport,
    marker_path, status_line,
};
pub use validate::{FindingKind, LanguageReport, ValidationFinding, Validator};
