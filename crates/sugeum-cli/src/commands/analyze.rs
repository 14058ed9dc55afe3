//! Analyze command - extract and normalize a single note.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde_json::json;
use tracing::debug;

use sugeum_core::{Analysis, ExtractionSource, UsageLedger};

use super::{analyze_note, load_config, reference_date};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// The note to analyze
    #[arg(required = true)]
    text: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Skip the provider and use rules only
    #[arg(long)]
    rules_only: bool,

    /// Reference date for relative expressions (YYYY-MM-DD, default: today)
    #[arg(long)]
    today: Option<String>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let today = reference_date(args.today.as_deref())?;
    let mut ledger = UsageLedger::new(config.limits.clone());

    let analysis = analyze_note(&config, &args.text, args.rules_only, &mut ledger, today).await?;
    debug!(source = analysis.source.label(), "analysis complete");

    let output = format_analysis(&analysis, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

pub(crate) fn format_analysis(analysis: &Analysis, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(analysis),
        OutputFormat::Csv => format_csv(analysis),
        OutputFormat::Text => Ok(format_text(analysis)),
    }
}

fn format_json(analysis: &Analysis) -> anyhow::Result<String> {
    let reason = match &analysis.source {
        ExtractionSource::Llm => None,
        ExtractionSource::Rules { reason } => Some(reason.to_string()),
    };

    let value = json!({
        "source": analysis.source.label(),
        "fallback_reason": reason,
        "fields": analysis.fields,
        "record": analysis.submission.record(),
    });

    Ok(serde_json::to_string_pretty(&value)?)
}

fn format_csv(analysis: &Analysis) -> anyhow::Result<String> {
    let record = analysis.submission.record();
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "who",
        "what",
        "when",
        "where",
        "why",
        "how",
        "payment_method",
        "memo",
        "source",
    ])?;

    wtr.write_record([
        record.who.as_str(),
        record.what.as_str(),
        record.when_for_display(),
        record.place.as_str(),
        record.why.as_str(),
        record.how.as_str(),
        record.payment_method.as_str(),
        record.memo.as_str(),
        analysis.source.label(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub(crate) fn format_text(analysis: &Analysis) -> String {
    let record = analysis.submission.record();
    let mut output = String::new();

    output.push_str(&format!("누가 (who):   {}\n", record.who));
    output.push_str(&format!("무엇 (what):  {}\n", record.what));
    output.push_str(&format!("언제 (when):  {}", record.when_for_display()));
    if !record.when.is_empty() && record.when != record.when_for_display() {
        output.push_str(&format!(" ({})", record.when));
    }
    output.push('\n');
    output.push_str(&format!("어디 (where): {}\n", record.place));
    output.push_str(&format!("왜 (why):     {}\n", record.why));
    output.push_str(&format!("어떻게 (how): {}\n", record.how));
    output.push_str(&format!("결제 방법:    {}\n", record.payment_method));

    match &analysis.source {
        ExtractionSource::Llm => output.push_str("\nsource: llm"),
        ExtractionSource::Rules { reason } => {
            output.push_str(&format!("\nsource: rules ({})", reason));
        }
    }

    output
}
