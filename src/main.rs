use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxwatch::currency::Currency;
use fxwatch::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxwatch::AppCommand {
    fn from(cmd: Commands) -> fxwatch::AppCommand {
        match cmd {
            Commands::Currencies => fxwatch::AppCommand::Currencies,
            Commands::Convert { amount, from, to } => {
                fxwatch::AppCommand::Convert { amount, from, to }
            }
            Commands::Watch { amount, from, to } => fxwatch::AppCommand::Watch { amount, from, to },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List available currencies
    Currencies,
    /// Convert an amount once and exit
    Convert {
        /// Amount to convert; "." and "," both work as decimal separator
        amount: String,
        /// Source currency code
        from: Currency,
        /// Target currency code
        to: Currency,
    },
    /// Convert continuously, refreshing the rate until interrupted
    Watch {
        /// Amount to convert; the rate alone is shown when omitted
        amount: Option<String>,
        /// Source currency code
        from: Option<Currency>,
        /// Target currency code
        to: Option<Currency>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => fxwatch::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = fxwatch::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
api:
  base_url: "http://api.evp.lt"
  timeout_secs: 60
  retry_limit: 1

refresh_interval_secs: 10
decimal_separator: "."
available_currencies: [UAH, USD, EUR, GBP, PLN, CHF]
from_currency: EUR
to_currency: USD
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
