//! Amount command - normalize an amount expression.

use clap::Args;

use sugeum_core::{normalize_amount, parse_korean_amount};

/// Arguments for the amount command.
#[derive(Args)]
pub struct AmountArgs {
    /// Amount expression (1000만원, 2억 3천만, 50만, ...)
    #[arg(required = true)]
    expression: String,

    /// Print the won count as a plain integer
    #[arg(long)]
    raw: bool,
}

pub fn run(args: AmountArgs) -> anyhow::Result<()> {
    if args.raw {
        let won = parse_korean_amount(&args.expression).ok_or_else(|| {
            anyhow::anyhow!("Not an amount expression: {}", args.expression)
        })?;
        println!("{}", won);
    } else {
        println!("{}", normalize_amount(&args.expression));
    }

    Ok(())
}
