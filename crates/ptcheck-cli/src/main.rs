//! ptcheck CLI - Check public transport route relations in OSM data

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{check, completions, config as config_cmd, list};
use config::Config;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "ptcheck")]
#[command(author, version, about = "Structural checks for public transport route relations")]
pub struct Cli {
    /// Output format: table, json (defaults to the config value)
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate route relations from an OSM JSON file
    Check(check::CheckArgs),
    /// List route relations in an OSM JSON file
    List(list::ListArgs),
    /// Manage configuration
    Config(config_cmd::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Settings shared by all commands, after merging flags over the config file
pub struct AppContext {
    pub config: Config,
    pub format: OutputFormat,
    pub verbose: u8,
    pub quiet: bool,
}

impl AppContext {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        let config = Config::load();
        let format = match cli.format.as_deref() {
            Some(flag) => OutputFormat::parse(flag)?,
            None => OutputFormat::parse(&config.format).unwrap_or_else(|e| {
                tracing::warn!("Ignoring config format: {}", e);
                OutputFormat::Table
            }),
        };
        Ok(Self {
            config,
            format,
            verbose: cli.verbose,
            quiet: cli.quiet,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting ptcheck CLI");

    let ctx = AppContext::new(&cli)?;

    match &cli.command {
        Commands::Check(args) => {
            if !check::run(args, &ctx).await? {
                std::process::exit(1);
            }
        }
        Commands::List(args) => list::run(args, &ctx).await?,
        Commands::Config(args) => config_cmd::run(args, ctx.format)?,
        Commands::Completions(args) => completions::run(args)?,
    }

    Ok(())
}
