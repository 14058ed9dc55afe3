//! Subcommands and the helpers they share.

pub mod amount;
pub mod analyze;
pub mod config;
pub mod date;
pub mod ping;
pub mod save;

use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use sugeum_core::{
    Analysis, Assistant, ChatBackend, LlmExtractor, SugeumConfig, UsageLedger,
};
use sugeum_remote::OpenAiChatBackend;

pub(crate) fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sugeum")
        .join("config.json")
}

/// The `-c` path, else the default path.
pub(crate) fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the config file if it exists, else defaults.
///
/// An explicit path that does not exist is an error.
pub(crate) fn load_config(explicit: Option<&str>) -> anyhow::Result<SugeumConfig> {
    let path = config_path(explicit);
    if path.exists() {
        return Ok(SugeumConfig::from_file(&path)?);
    }
    if explicit.is_some() {
        anyhow::bail!("Config file not found: {}", path.display());
    }
    Ok(SugeumConfig::default())
}

/// `--today` as `YYYY-MM-DD`, else the local date.
pub(crate) fn reference_date(today: Option<&str>) -> anyhow::Result<NaiveDate> {
    match today {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("Invalid --today value '{}': {}", value, e)),
        None => Ok(Local::now().date_naive()),
    }
}

/// Analyze a note with the provider when configured, with rules otherwise.
pub(crate) async fn analyze_note(
    config: &SugeumConfig,
    text: &str,
    rules_only: bool,
    ledger: &mut UsageLedger,
    today: NaiveDate,
) -> anyhow::Result<Analysis> {
    let max_chars = config.extraction.max_input_chars;
    if rules_only || config.extraction.rules_only {
        return run_assistant(Assistant::rules_only(), text, max_chars, ledger, today).await;
    }

    match OpenAiChatBackend::from_config(&config.provider) {
        Ok(backend) => {
            let assistant = Assistant::new(LlmExtractor::from_config(backend, &config.provider));
            let spinner = spinner(format!("Analyzing with {}...", config.provider.model));
            let result = run_assistant(assistant, text, max_chars, ledger, today).await;
            spinner.finish_and_clear();
            result
        }
        Err(e) => {
            warn!(error = %e, "provider unavailable, using rules");
            run_assistant(Assistant::rules_only(), text, max_chars, ledger, today).await
        }
    }
}

async fn run_assistant<B: ChatBackend>(
    assistant: Assistant<B>,
    text: &str,
    max_chars: usize,
    ledger: &mut UsageLedger,
    today: NaiveDate,
) -> anyhow::Result<Analysis> {
    let assistant = assistant.with_max_input_chars(max_chars);
    Ok(assistant.analyze(text, ledger, today).await?)
}

pub(crate) fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
