//! relbot binary entry point

mod cli;

use anyhow::Context;
use clap::{Parser, Subcommand};
use relbot::config::BotConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "relbot",
    version,
    about = "Release-engineering automation bot for dist-git forges"
)]
struct Cli {
    /// Path to the configuration file (defaults to the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the merge train over open bot-authored pull requests
    Train {
        /// Only this component (default: every configured component)
        #[arg(long)]
        component: Option<String>,

        /// Show decisions without merging anything
        #[arg(long)]
        dry_run: bool,

        /// Preview decisions and prompt before merging
        #[arg(long)]
        confirm: bool,
    },

    /// Detect missing updates for a component across active releases
    Updates {
        /// Component name
        component: String,

        /// Component version to look for
        #[arg(long)]
        version: String,

        /// Create updates for the releases found missing
        #[arg(long)]
        publish: bool,

        /// Notes attached to a created update
        #[arg(long)]
        notes: Option<String>,
    },

    /// List active releases known to the update-tracking service
    Releases,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let config_path = args
        .config
        .or_else(BotConfig::default_path)
        .context("no --config given and no user config directory found")?;
    let config = BotConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    match args.command {
        Command::Train {
            component,
            dry_run,
            confirm,
        } => {
            cli::train::run_train(
                &config,
                component.as_deref(),
                cli::train::TrainOptions { dry_run, confirm },
            )
            .await?;
        }
        Command::Updates {
            component,
            version,
            publish,
            notes,
        } => {
            cli::updates::run_updates(&config, &component, &version, publish, notes.as_deref())
                .await?;
        }
        Command::Releases => cli::updates::run_releases(&config).await?,
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose { "relbot=debug" } else { "relbot=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
