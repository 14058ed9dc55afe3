//! Date command - resolve a date expression.

use clap::Args;

use sugeum_core::resolve_korean_date;

use super::reference_date;

/// Arguments for the date command.
#[derive(Args)]
pub struct DateArgs {
    /// Date expression (내일, 다음주 수요일, 3월 5일, ...)
    #[arg(required = true)]
    expression: String,

    /// Reference date (YYYY-MM-DD, default: today)
    #[arg(long)]
    today: Option<String>,
}

pub fn run(args: DateArgs) -> anyhow::Result<()> {
    let today = reference_date(args.today.as_deref())?;
    let resolved = resolve_korean_date(&args.expression, today);

    if resolved.is_empty() {
        anyhow::bail!("Could not resolve date expression: {}", args.expression);
    }

    println!("{}", resolved);
    Ok(())
}
