//! SolFlow CLI - program-flow diagram explorer with an LLM assistant.
//!
//! Opens the diagram window by default; `ask`, `diagram` and `config` run
//! headless.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::config as config_cmd;
use config::{Config, Overrides};

/// SolFlow: explore a Solana program's instruction flow and ask an assistant about it.
#[derive(Parser, Debug)]
#[command(
    name = "solflow",
    author,
    version,
    about = "SolFlow: program-flow diagram with an AI assistant",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// JSON config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "SOLFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// TOML file with a [provider] table
    #[arg(long, global = true)]
    provider_file: Option<PathBuf>,

    /// Model name sent with completion requests
    #[arg(long, global = true)]
    model: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the diagram window (default command).
    Ui,

    /// Ask the assistant one question and print the reply.
    Ask {
        /// The question to send.
        question: String,
    },

    /// Print the seed diagram as JSON.
    Diagram,

    /// Manage configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Show path to config file.
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity; RUST_LOG wins when set.
    let default_filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn,solflow::save=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let overrides = Overrides {
        config_file: cli.config,
        provider_file: cli.provider_file,
        model: cli.model,
        api_url: cli.api_url,
    };

    match cli.command.unwrap_or(Commands::Ui) {
        Commands::Ui => {
            let config = Config::load(&overrides)?;
            let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
            commands::ui::execute(&config, runtime.handle().clone())?;
        }

        Commands::Ask { question } => {
            let config = Config::load(&overrides)?;
            let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
            runtime.block_on(commands::ask::execute(&config, &question))?;
        }

        Commands::Diagram => commands::diagram::execute()?,

        Commands::Config(action) => match action {
            ConfigCommands::Show => {
                let config = Config::load(&overrides)?;
                config_cmd::show(&config, &overrides)?;
            }
            ConfigCommands::Path => config_cmd::path(&overrides)?,
        },
    }

    Ok(())
}
