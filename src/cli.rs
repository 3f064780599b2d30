// ABOUTME: Command-line interface definitions using clap
// ABOUTME: Publish, connection test, and settings subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wikipub")]
#[command(about = "Publish Markdown notes to a Wiki.js wiki over GraphQL", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// GraphQL endpoint (overrides settings/env)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token (overrides settings/env)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Settings file location
    #[arg(long = "config", global = true, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Print diagnostic log lines
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Publish a note: update the page with the same title, or create it
    Publish {
        /// Markdown file to publish
        file: PathBuf,

        /// Directory the wiki path is computed from (default: current dir)
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// List pages to check the URL and token
    TestConnection,

    /// Show or change stored settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the effective settings
    Show,

    /// Store the GraphQL endpoint
    SetUrl { url: String },

    /// Store the bearer token
    SetToken { token: String },
}
