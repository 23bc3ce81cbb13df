//! hexaudit CLI tool.
//!
//! Usage:
//! ```bash
//! hexaudit review [OPTIONS] [PATH]
//! hexaudit init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod advisor;
mod commands;

/// LLM-assisted architecture review for hexagonal projects
#[derive(Parser)]
#[command(name = "hexaudit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review a project (or a single file) and print the report
    Review {
        /// Path to review (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// File extension selecting which files are reviewed
        #[arg(long)]
        extension: Option<String>,

        /// Bound on concurrent analysis tasks
        #[arg(long)]
        concurrency: Option<usize>,

        /// Context lines shown around each finding
        #[arg(long)]
        pad: Option<usize>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Model name for the advisor endpoint
        #[arg(long)]
        model: Option<String>,

        /// Base URL of an OpenAI-compatible advisor endpoint
        #[arg(long)]
        base_url: Option<String>,

        /// API key for the advisor endpoint
        #[arg(long, env = "HEXAUDIT_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Skip all model-driven passes (dependency audit only)
        #[arg(long)]
        no_model: bool,
    },

    /// Initialize a configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for review reports.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Review {
            path,
            format,
            extension,
            concurrency,
            pad,
            exclude,
            model,
            base_url,
            api_key,
            no_model,
        } => commands::review::run(commands::review::ReviewArgs {
            path,
            format,
            extension,
            concurrency,
            pad,
            exclude,
            model,
            base_url,
            api_key,
            no_model,
            config: cli.config,
        }),
        Commands::Init { force } => commands::init::run(force),
    }
}
