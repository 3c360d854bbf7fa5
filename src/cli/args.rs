use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "navigator", author, version, about = "Natural-language browser automation agent", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a navigator.yaml/navigator.toml config file.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Write logs to this file in addition to stderr.
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run one task to completion.
    Run {
        /// The natural-language task for the agent to accomplish.
        #[arg(long)]
        task: String,

        /// Force headless browser mode regardless of configuration.
        #[arg(long)]
        headless: bool,

        /// Override the configured maximum step count.
        #[arg(long)]
        max_steps: Option<u32>,

        /// Print the full JSON history instead of a human-readable summary.
        #[arg(long)]
        json: bool,
    },
    /// Configuration-related subcommands.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the JSON Schema for the configuration surface.
    Schema,
    /// Load and validate configuration without running anything.
    Check,
}
