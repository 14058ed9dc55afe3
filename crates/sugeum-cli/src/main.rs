//! CLI for construction-site payment notes.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{amount, analyze, config, date, ping, save};

/// Sugeum - turn payment notes into ledger records
#[derive(Parser)]
#[command(name = "sugeum")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and normalize a note without saving it
    Analyze(analyze::AnalyzeArgs),

    /// Analyze a note and save it to the record store
    Save(save::SaveArgs),

    /// Resolve a Korean date expression
    Date(date::DateArgs),

    /// Normalize a Korean amount expression
    Amount(amount::AmountArgs),

    /// Check the record store connection
    Ping,

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Analyze(args) => analyze::run(args, config_path).await,
        Commands::Save(args) => save::run(args, config_path).await,
        Commands::Date(args) => date::run(args),
        Commands::Amount(args) => amount::run(args),
        Commands::Ping => ping::run(config_path).await,
        Commands::Config(args) => config::run(args, config_path),
    }
}
