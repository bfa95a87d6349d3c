//! SiteCheck CLI - Command-line interface for SiteCheck
//!
//! Provides commands for:
//! - Browsing the photo inbox feed
//! - Browsing the folder directory
//! - Assigning a photo to a folder through the full drop flow
//! - Viewing and managing configuration

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    assign::AssignCommand, config::ConfigCommand, folders::FoldersCommand,
    photos::PhotosCommand, CommandContext,
};
use output::OutputFormat;
use sitecheck_core::config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "sitecheck",
    version,
    about = "Assign site inspection photos to quality control folders"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List photos from the inbox feed
    Photos(PhotosCommand),
    /// List candidate folders
    Folders(FoldersCommand),
    /// Assign a photo to a folder as its before or after photo
    Assign(AssignCommand),
    /// View and manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    // Setup tracing; the configured level applies unless -v or RUST_LOG say otherwise
    let filter = match cli.verbose {
        0 => Config::load_or_default(&config_path).logging.level,
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let ctx = CommandContext::new(format, config_path, cli.quiet);

    match cli.command {
        Commands::Photos(cmd) => cmd.execute(&ctx).await,
        Commands::Folders(cmd) => cmd.execute(&ctx).await,
        Commands::Assign(cmd) => cmd.execute(&ctx).await,
        Commands::Config(cmd) => cmd.execute(&ctx).await,
    }
}
