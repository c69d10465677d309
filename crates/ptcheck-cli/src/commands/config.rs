//! Config command for managing CLI configuration

use clap::{Args, Subcommand};

use crate::config::{config_file_path, Config};
use crate::output::{to_json, OutputFormat};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print one config value
    Get {
        /// Config key (format, rule, jobs)
        key: String,
    },
    /// Change one config value
    Set {
        /// Config key (format, rule, jobs)
        key: String,
        /// New value
        value: String,
    },
    /// Print every config value
    List,
    /// Print the config file location
    Path,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: &ConfigArgs, format: OutputFormat) -> anyhow::Result<()> {
    match &args.command {
        ConfigCommands::Get { key } => run_get(key),
        ConfigCommands::Set { key, value } => run_set(key, value),
        ConfigCommands::List => run_list(format),
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
            Ok(())
        }
        ConfigCommands::Init { force } => run_init(*force),
    }
}

fn run_get(key: &str) -> anyhow::Result<()> {
    if !Config::keys().contains(&key) {
        anyhow::bail!(
            "Unknown config key: {}. Available keys: {}",
            key,
            Config::keys().join(", ")
        );
    }
    let config = Config::load();
    println!("{}", config.get(key).unwrap_or_else(|| "(not set)".to_string()));
    Ok(())
}

fn run_set(key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = Config::load();
    config.set(key, value)?;
    config.save()?;
    println!("Set {} = {}", key, value);
    Ok(())
}

fn run_list(format: OutputFormat) -> anyhow::Result<()> {
    let config = Config::load();
    match format {
        OutputFormat::Json => println!("{}", to_json(&config)?),
        OutputFormat::Table => {
            println!("Config file: {}", config_file_path().display());
            println!();
            for key in Config::keys() {
                let value = config.get(key).unwrap_or_else(|| "(not set)".to_string());
                println!("{} = {}", key, value);
            }
        }
    }
    Ok(())
}

fn run_init(force: bool) -> anyhow::Result<()> {
    let path = config_file_path();
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    Config::default().save()?;
    println!("Created config file at {}", path.display());
    Ok(())
}
