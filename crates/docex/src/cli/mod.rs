pub mod categories;
pub mod check;
pub mod run;

use clap::{Args, Parser, Subcommand};
use console::style;
use dialoguer::Password;
use docex_lib::config::PASSWORD_ENV;
use docex_lib::{Config, ConnectionSettings, Result};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docex")]
#[command(about = "Extract stored document attachments into a categorized folder tree", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Test connectivity to the source database")]
    Check {
        #[command(flatten)]
        source: SourceArgs,
    },

    #[command(about = "Extract every category into the output folder")]
    Run {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, short = 'o', help = "Output root folder")]
        output: Option<PathBuf>,

        #[arg(long, help = "Process all categories concurrently")]
        parallel: bool,

        #[arg(long, help = "Per-query timeout in seconds")]
        query_timeout: Option<u64>,

        #[arg(long, help = "Write every log entry as a JSON line to this file")]
        log_file: Option<PathBuf>,
    },

    #[command(about = "List categories and their folder layout")]
    Categories {
        #[arg(help = "Show only this category")]
        category: Option<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    #[arg(long, help = "Directory containing the source database")]
    pub server: Option<String>,

    #[arg(long, help = "Source database file name")]
    pub database: Option<String>,

    #[arg(long, short = 'u', help = "Source user name")]
    pub username: Option<String>,

    #[arg(long, help = "Source password (falls back to DOCEX_PASSWORD or a prompt)")]
    pub password: Option<String>,
}

pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config = Config::load(path)?;
    match &config.loaded_from {
        Some(path) => log::info!("Using configuration {}", path.display()),
        None => log::debug!("No configuration file found, using defaults"),
    }
    Ok(config)
}

/// Merges flags over the config file and asks for whatever is still missing.
pub fn resolve_settings(
    config: &Config,
    args: SourceArgs,
    output_root: Option<PathBuf>,
) -> Result<ConnectionSettings> {
    let server = args
        .server
        .or_else(|| config.source.server.clone())
        .unwrap_or_default();
    let database = args
        .database
        .or_else(|| config.source.database.clone())
        .unwrap_or_default();
    let username = args
        .username
        .or_else(|| config.source.username.clone())
        .unwrap_or_default();

    let password = match args.password.or_else(|| std::env::var(PASSWORD_ENV).ok()) {
        Some(password) => password,
        None => Password::new()
            .with_prompt(format!("Password for {}", style(&username).cyan()))
            .allow_empty_password(true)
            .interact()?,
    };

    let output_root = output_root
        .or_else(|| config.output.root.clone())
        .unwrap_or_default();

    Ok(ConnectionSettings {
        server,
        database,
        username,
        password,
        output_root,
    })
}
