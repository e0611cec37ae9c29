use clap::Parser;
use ogs_i18n::{ContentPolicy, DEFAULT_MARKER_GLOBAL, MissingCountMarker};
use ogs_i18n_mt::{
    AuditPipeline, MtError, PipelineConfig, ProviderKeys, ProviderPreference, build_providers,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Audit translation catalogs and fill gaps with machine translations
#[derive(Debug, Parser)]
#[command(name = "audit-translations", version, about)]
struct Cli {
    /// Directory the other paths are relative to
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Language registry (JSON object keyed by language code)
    #[arg(long, default_value = "languages.json")]
    languages: PathBuf,

    /// Directory holding `<lang>.po` catalogs and `<lang>.js` marker files
    #[arg(long, default_value = "locale")]
    locale_dir: PathBuf,

    /// Machine translation cache
    #[arg(long, default_value = "autotranslations.json")]
    cache: PathBuf,

    /// Provider credentials
    #[arg(long, default_value = "keys.json")]
    keys: PathBuf,

    /// Missing-count summary (default: <locale-dir>/translations_missing.json)
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Global assigned in marker files
    #[arg(long, default_value = DEFAULT_MARKER_GLOBAL)]
    marker_global: String,

    /// Replacement content policy (symbols and profanity lists)
    #[arg(long)]
    denylist: Option<PathBuf>,

    /// Which provider's result to keep when several translate a language
    #[arg(long, value_enum, default_value_t = ProviderPreference::PreferLast)]
    prefer: ProviderPreference,

    /// Language the catalogs' source strings are written in
    #[arg(long, default_value = "en")]
    source_lang: String,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::new(&self.root);
        config.languages_file = self.languages.clone();
        config.locale_dir = self.locale_dir.clone();
        config.cache_file = self.cache.clone();
        config.summary_file = self
            .summary
            .clone()
            .unwrap_or_else(|| self.locale_dir.join("translations_missing.json"));
        config.source_locale = self.source_lang.clone();
        config.preference = self.prefer;
        config
    }
}

async fn run(cli: &Cli) -> Result<(), MtError> {
    let policy = match &cli.denylist {
        Some(path) => ContentPolicy::load(&cli.root.join(path))?,
        None => ContentPolicy::builtin()?,
    };
    let marker = MissingCountMarker::new(&cli.marker_global)?;
    let keys = ProviderKeys::load(&cli.root.join(&cli.keys))?;
    let providers = build_providers(&keys)?;
    let config = cli.pipeline_config();

    AuditPipeline::new(&config, &policy, &marker)
        .with_providers(providers)
        .run()
        .await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match run(&cli).await {
        Ok(()) => {
            println!("Done");
            ExitCode::SUCCESS
        }
        Err(MtError::Vandalized(languages)) => {
            let counts: serde_json::Map<String, serde_json::Value> = languages
                .into_iter()
                .map(|(language, count)| (language, serde_json::Value::from(count)))
                .collect();
            match serde_json::to_string_pretty(&counts) {
                Ok(json) => eprintln!("{}", json),
                Err(e) => eprintln!("{:?} ({})", counts, e),
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
