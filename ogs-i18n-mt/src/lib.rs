//! Machine translation support for ogs-i18n
//!
//! Fills gaps in the community translations with machine translations while
//! keeping format specifiers and `{{label}}` tokens intact, and drives the
//! whole audit run behind the `audit-translations` binary.
//!
//! # Workflow Example
//!
//! ```ignore
//! use ogs_i18n::{ContentPolicy, MissingCountMarker};
//! use ogs_i18n_mt::{AuditPipeline, PipelineConfig, ProviderKeys, build_providers};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::new(std::path::Path::new("."));
//!     let policy = ContentPolicy::builtin()?;
//!     let marker = MissingCountMarker::default();
//!     let providers = build_providers(&ProviderKeys::load("keys.json".as_ref())?)?;
//!
//!     let report = AuditPipeline::new(&config, &policy, &marker)
//!         .with_providers(providers)
//!         .run()
//!         .await?;
//!     println!("{} strings missing", report.status.total_missing());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod deepl;
pub mod engine;
pub mod error;
pub mod google_translate;
pub mod mock;
pub mod pipeline;
pub mod translator;

// End-to-end pipeline tests (only available during testing)
#[cfg(test)]
mod integration_tests;

pub use config::{ProviderKeys, ProviderPreference};
pub use deepl::DeeplProvider;
pub use engine::{EngineStats, TranslationEngine, WorkList};
pub use error::{MtError, MtResult};
pub use google_translate::GoogleTranslateProvider;
pub use mock::{MockMode, MockRequest, MockTranslator};
pub use pipeline::{AuditPipeline, PipelineConfig, RunReport, build_providers};
pub use translator::{LanguageMatch, MachineTranslator, SupportedLanguages};
