use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "cinder")]
#[command(version, about = "AI pair-programming assistant for the terminal")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip confirmation prompts
    #[arg(long, global = true)]
    pub yes: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Path to the session file. Defaults to .cinder/session.json
    #[arg(long, global = true)]
    pub session: Option<PathBuf>,

    /// Model identifier override. Overrides cinder.toml and the session's own model
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show context usage for the current session
    Status,
    /// Run the compression check for the current session
    Compact {
        /// Show the compression decision without performing it
        #[arg(long)]
        status: bool,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// List known model context budgets
    Models,
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any problems
    Validate,
    /// Initialize a default cinder.toml file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match &cli.command {
        Commands::Status => cmd::cmd_status(&project_dir, &cli)?,
        Commands::Compact { status } => cmd::cmd_compact(&project_dir, &cli, *status).await?,
        Commands::Config { command } => cmd::cmd_config(&project_dir, command.clone())?,
        Commands::Models => cmd::cmd_models(),
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose { "cinder=debug" } else { "cinder=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
