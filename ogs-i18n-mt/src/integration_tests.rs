//! End-to-end tests for the audit pipeline
//!
//! Each test lays out a small project in a temporary directory (registry,
//! catalogs, marker files) and drives [`AuditPipeline`] with mock providers.

use crate::config::ProviderPreference;
use crate::error::MtError;
use crate::mock::{MockMode, MockTranslator};
use crate::pipeline::{AuditPipeline, PipelineConfig};
use crate::translator::MachineTranslator;
use ogs_i18n::{
    ContentPolicy, I18nError, LanguageCode, LanguageStatus, MissingCountMarker, TranslationCache,
    status_line,
};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

const PO_HEADER: &str = r#"msgid ""
msgstr ""
"Content-Type: text/plain; charset=UTF-8\n"

"#;

struct Project {
    dir: TempDir,
    config: PipelineConfig,
}

impl Project {
    fn new(languages: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("locale")).unwrap();
        let registry: serde_json::Map<String, serde_json::Value> = languages
            .iter()
            .map(|l| (l.to_string(), serde_json::Value::from(l.to_uppercase())))
            .collect();
        fs::write(
            dir.path().join("languages.json"),
            serde_json::to_string(&registry).unwrap(),
        )
        .unwrap();
        let config = PipelineConfig::new(dir.path());
        Project { dir, config }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    fn write_catalog(&self, file_name: &str, body: &str) {
        fs::write(
            self.path("locale").join(file_name),
            format!("{}{}", PO_HEADER, body),
        )
        .unwrap();
    }

    fn write_marker(&self, language: &str, content: &str) {
        fs::write(self.marker(language), content).unwrap();
    }

    fn marker(&self, language: &str) -> PathBuf {
        self.path("locale").join(format!("{}.js", language))
    }

    fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    fn summary(&self) -> serde_json::Map<String, serde_json::Value> {
        serde_json::from_str(&self.read("locale/translations_missing.json")).unwrap()
    }

    fn cache(&self) -> TranslationCache {
        TranslationCache::load_or_init(&self.path("autotranslations.json")).unwrap()
    }
}

fn lang(s: &str) -> LanguageCode {
    LanguageCode::new(s).unwrap()
}

fn providers(mocks: &[&MockTranslator]) -> Option<Vec<Arc<dyn MachineTranslator>>> {
    Some(
        mocks
            .iter()
            .map(|m| Arc::new((*m).clone()) as Arc<dyn MachineTranslator>)
            .collect(),
    )
}

fn policy() -> ContentPolicy {
    ContentPolicy::builtin().unwrap()
}

// ========== Audit Only ==========

#[tokio::test]
async fn test_audit_without_providers_skips_translation() {
    let project = Project::new(&["fr", "de"]);
    project.write_catalog(
        "fr.po",
        "msgid \"Pass\"\nmsgstr \"Passer\"\n\nmsgid \"Resign\"\nmsgstr \"\"\n",
    );
    project.write_catalog("de.po", "msgid \"Pass\"\nmsgstr \"Passen\"\n");
    project.write_marker("fr", "export default {};\n");

    let (policy, marker) = (policy(), MissingCountMarker::default());
    let report = AuditPipeline::new(&project.config, &policy, &marker)
        .run()
        .await
        .unwrap();

    assert!(report.translation.is_none());
    assert_eq!(report.status.total_missing(), 1);
    assert_eq!(
        report.languages[0].missing_sources,
        vec!["Resign".to_string()]
    );

    let summary = project.summary();
    let order: Vec<&String> = summary.keys().collect();
    assert_eq!(order, vec!["fr", "de"]);
    assert_eq!(summary["fr"], 1);
    assert_eq!(summary["de"], 0);

    assert_eq!(
        project.read("locale/fr.js"),
        "export default {};\nwindow.ogs_missing_translation_count = 1;"
    );
    assert_eq!(
        project.read("locale/de.js"),
        "window.ogs_missing_translation_count = 0;"
    );
    // A fresh cache file is initialized even when nothing is translated
    assert!(project.cache().is_empty());
}

#[tokio::test]
async fn test_plural_forms_are_counted_per_form() {
    let project = Project::new(&["pl"]);
    project.write_catalog(
        "pl.po",
        concat!(
            "msgid \"{{num}} stone\"\n",
            "msgid_plural \"{{num}} stones\"\n",
            "msgstr[0] \"\"\n",
            "msgstr[1] \"\"\n",
            "msgstr[2] \"\"\n",
        ),
    );

    let (policy, marker) = (policy(), MissingCountMarker::default());
    let report = AuditPipeline::new(&project.config, &policy, &marker)
        .run()
        .await
        .unwrap();

    // Three blank forms checked against both the singular and the plural
    assert_eq!(report.status.get(&lang("pl")).unwrap().missing_count, 6);
    assert_eq!(
        report.languages[0].missing_sources,
        vec!["{{num}} stone".to_string(), "{{num}} stones".to_string()]
    );
}

#[tokio::test]
async fn test_missing_catalog_is_fatal_after_earlier_markers() {
    let project = Project::new(&["fr", "de"]);
    project.write_catalog("fr.po", "msgid \"Pass\"\nmsgstr \"\"\n");

    let (policy, marker) = (policy(), MissingCountMarker::default());
    let result = AuditPipeline::new(&project.config, &policy, &marker)
        .run()
        .await;

    match result {
        Err(MtError::Catalog(I18nError::Io { path, .. })) => assert!(path.ends_with("de.po")),
        other => panic!("Expected a catalog I/O error, got {:?}", other),
    }
    assert!(project.marker("fr").exists());
    assert!(!project.path("locale/translations_missing.json").exists());
}

// ========== Vandalism Gate ==========

#[tokio::test]
async fn test_vandalized_catalog_stops_before_translation() {
    let project = Project::new(&["fr", "de"]);
    project.write_catalog("fr.po", "msgid \"Resign\"\nmsgstr \"\"\n");
    project.write_catalog(
        "de.po",
        "msgid \"Pass\"\nmsgstr \"Passen ☭\"\n\nmsgid \"Resign\"\nmsgstr \"\"\n",
    );
    project.write_marker("de", "window.ogs_missing_translation_count = 7;");

    let google = MockTranslator::new("Google", MockMode::Suffix, ["fr", "de"]);
    let (policy, marker) = (policy(), MissingCountMarker::default());
    let result = AuditPipeline::new(&project.config, &policy, &marker)
        .with_providers(providers(&[&google]))
        .run()
        .await;

    match result {
        Err(MtError::Vandalized(languages)) => {
            assert_eq!(languages, vec![("de".to_string(), 1)]);
        }
        other => panic!("Expected Vandalized, got {:?}", other),
    }
    assert_eq!(google.call_count(), 0);

    // The vandalized language's marker is left alone; the summary still lists it
    assert_eq!(
        project.read("locale/de.js"),
        "window.ogs_missing_translation_count = 7;"
    );
    assert_eq!(
        project.read("locale/fr.js"),
        "window.ogs_missing_translation_count = 1;"
    );
    assert_eq!(project.summary()["de"], 1);
}

#[tokio::test]
async fn test_vandalism_without_providers_is_reported_not_fatal() {
    let project = Project::new(&["de"]);
    project.write_catalog("de.po", "msgid \"Pass\"\nmsgstr \"Passen ☭\"\n");

    let (policy, marker) = (policy(), MissingCountMarker::default());
    let report = AuditPipeline::new(&project.config, &policy, &marker)
        .run()
        .await
        .unwrap();

    assert!(report.translation.is_none());
    let summary = report.status.get(&lang("de")).unwrap();
    assert_eq!(summary.status(), LanguageStatus::Vandalized);
    assert_eq!(
        status_line(&lang("de"), summary),
        "*** VANDALIZED *** de: 1 vandalizations"
    );
    assert!(!project.marker("de").exists());
}

// ========== Translation Phase ==========

#[tokio::test]
async fn test_numeral_label_survives_translation() {
    let project = Project::new(&["pt-BR"]);
    project.write_catalog("pt_BR.po", "msgid \"You have {{num}} new messages\"\nmsgstr \"\"\n");

    let deepl = MockTranslator::new("DeepL", MockMode::Suffix, ["PT-BR"]).case_insensitive();
    let google = MockTranslator::new("Google", MockMode::Suffix, ["pt-BR"]);
    let (policy, marker) = (policy(), MissingCountMarker::default());
    let report = AuditPipeline::new(&project.config, &policy, &marker)
        .with_providers(providers(&[&deepl, &google]))
        .run()
        .await
        .unwrap();

    let stats = report.translation.unwrap();
    assert_eq!(stats.provider_calls, 2);
    assert_eq!(stats.strings_translated, 1);
    assert_eq!(
        google.requests()[0].texts,
        vec!["You have 43210000 new messages".to_string()]
    );
    assert_eq!(
        project
            .cache()
            .get(&lang("pt-BR"), "You have {{num}} new messages"),
        Some("You have {{num}} new messages_pt-BR")
    );
    assert_eq!(
        project.read("locale/pt-BR.js"),
        "window.ogs_missing_translation_count = 1;"
    );
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let project = Project::new(&["fr", "ja"]);
    project.write_catalog(
        "fr.po",
        "msgid \"%s resigned\"\nmsgstr \"\"\n\nmsgid \"Pass\"\nmsgstr \"Passer\"\n",
    );
    project.write_catalog("ja.po", "msgid \"{{user}} joined\"\nmsgstr \"\"\n");

    let google = MockTranslator::new("Google", MockMode::Suffix, ["fr", "ja"]);
    let (policy, marker) = (policy(), MissingCountMarker::default());
    let pipeline = AuditPipeline::new(&project.config, &policy, &marker)
        .with_providers(providers(&[&google]));

    let first = pipeline.run().await.unwrap();
    assert_eq!(first.translation.unwrap().provider_calls, 2);
    assert_eq!(
        project.cache().get(&lang("fr"), "%s resigned"),
        Some("%s resigned_fr")
    );

    let files = [
        "autotranslations.json",
        "locale/translations_missing.json",
        "locale/fr.js",
        "locale/ja.js",
    ];
    let before: Vec<String> = files.iter().map(|f| project.read(f)).collect();

    let second = pipeline.run().await.unwrap();
    assert_eq!(second.translation.unwrap().provider_calls, 0);
    assert_eq!(google.call_count(), 2);
    // Cached translations are validated in place of the blanks and pass
    assert!(second.languages.iter().all(|r| r.summary.error_count == 0));

    let after: Vec<String> = files.iter().map(|f| project.read(f)).collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_broken_cached_translation_is_reported() {
    let project = Project::new(&["es"]);
    project.write_catalog("es.po", "msgid \"%s played %d moves\"\nmsgstr \"\"\n");
    fs::write(
        project.path("autotranslations.json"),
        r#"{"es": {"%s played %d moves": "jugó movimientos"}}"#,
    )
    .unwrap();

    let (policy, marker) = (policy(), MissingCountMarker::default());
    let report = AuditPipeline::new(&project.config, &policy, &marker)
        .run()
        .await
        .unwrap();

    let summary = report.status.get(&lang("es")).unwrap();
    assert_eq!(summary.missing_count, 1);
    assert_eq!(summary.error_count, 1);
    assert!(
        report.languages[0]
            .findings
            .iter()
            .any(|f| f.auto_translated && f.is_error())
    );
}

#[tokio::test]
async fn test_prefer_first_keeps_deepl_output() {
    let project = Project::new(&["de"]);
    project.write_catalog("de.po", "msgid \"Resign\"\nmsgstr \"\"\n");

    let mut deepl_map = HashMap::new();
    deepl_map.insert(
        ("Resign".to_string(), "de".to_string()),
        "Aufgeben".to_string(),
    );
    let deepl = MockTranslator::new("DeepL", MockMode::Mappings(deepl_map), ["DE"])
        .case_insensitive();
    let google = MockTranslator::new("Google", MockMode::Suffix, ["de"]);

    let mut config = project.config.clone();
    config.preference = ProviderPreference::PreferFirst;
    let (policy, marker) = (policy(), MissingCountMarker::default());
    AuditPipeline::new(&config, &policy, &marker)
        .with_providers(providers(&[&deepl, &google]))
        .run()
        .await
        .unwrap();

    assert_eq!(google.call_count(), 0);
    assert_eq!(project.cache().get(&lang("de"), "Resign"), Some("Aufgeben"));
}

#[tokio::test]
async fn test_provider_failure_keeps_finished_languages() {
    let project = Project::new(&["de", "fr"]);
    project.write_catalog("de.po", "msgid \"Resign\"\nmsgstr \"\"\n");
    project.write_catalog("fr.po", "msgid \"Resign\"\nmsgstr \"\"\n");

    let mut mappings = HashMap::new();
    mappings.insert(("Resign".to_string(), "de".to_string()), "Aufgeben".to_string());
    let working = MockTranslator::new("DeepL", MockMode::Mappings(mappings), ["de"]);
    let failing = MockTranslator::new("Google", MockMode::Error("quota".to_string()), ["fr"]);

    let (policy, marker) = (policy(), MissingCountMarker::default());
    let result = AuditPipeline::new(&project.config, &policy, &marker)
        .with_providers(providers(&[&working, &failing]))
        .run()
        .await;

    assert!(matches!(result, Err(MtError::TranslationError(_))));
    let cache = project.cache();
    assert_eq!(cache.get(&lang("de"), "Resign"), Some("Aufgeben"));
    assert_eq!(cache.language_len(&lang("fr")), 0);
}

#[tokio::test]
async fn test_unsupported_language_does_not_fail_run() {
    let project = Project::new(&["tlh"]);
    project.write_catalog("tlh.po", "msgid \"Resign\"\nmsgstr \"\"\n");

    let google = MockTranslator::new("Google", MockMode::Suffix, ["de"]);
    let (policy, marker) = (policy(), MissingCountMarker::default());
    let report = AuditPipeline::new(&project.config, &policy, &marker)
        .with_providers(providers(&[&google]))
        .run()
        .await
        .unwrap();

    assert_eq!(
        report.translation.unwrap().unsupported_languages,
        vec![lang("tlh")]
    );
    assert!(project.cache().is_empty());
    assert!(project.marker("tlh").exists());
}
