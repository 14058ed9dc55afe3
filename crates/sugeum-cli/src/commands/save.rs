//! Save command - analyze a note, confirm, and write it to the record store.

use clap::Args;
use console::{style, Term};
use tracing::info;

use sugeum_core::{SubmissionError, UsageLedger};
use sugeum_remote::NotionStore;

use super::analyze::format_text;
use super::{analyze_note, load_config, reference_date};

/// Arguments for the save command.
#[derive(Args)]
pub struct SaveArgs {
    /// The note to save
    #[arg(required = true)]
    text: String,

    /// Save without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Skip the provider and use rules only
    #[arg(long)]
    rules_only: bool,

    /// Reference date for relative expressions (YYYY-MM-DD, default: today)
    #[arg(long)]
    today: Option<String>,
}

pub async fn run(args: SaveArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let today = reference_date(args.today.as_deref())?;
    let mut ledger = UsageLedger::new(config.limits.clone());

    let mut analysis =
        analyze_note(&config, &args.text, args.rules_only, &mut ledger, today).await?;

    println!("{}", format_text(&analysis));
    println!();

    if !args.yes && !confirm("이대로 저장할까요? [y/N] ")? {
        println!("{} Not saved.", style("ℹ").blue());
        return Ok(());
    }

    let store = NotionStore::from_config(&config.store)?;
    match analysis.submission.save(&store, &mut ledger, today).await {
        Ok(location) => {
            info!(location = %location, "saved");
            println!("{} Saved: {}", style("✓").green(), location);
            Ok(())
        }
        Err(SubmissionError::Persistence(failure)) => {
            eprintln!("{} {}", style("✗").red(), failure);
            Err(failure.into())
        }
        Err(e) => Err(e.into()),
    }
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    let term = Term::stdout();
    term.write_str(prompt)?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "예" | "네"))
}
