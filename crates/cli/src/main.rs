//! PonyPrompt CLI — the main entry point.
//!
//! Commands:
//! - `init`        — Write the default config and create category directories
//! - `serve`       — Start the HTTP gateway
//! - `generate`    — Compose one prompt and print it
//! - `categories`  — Show every category and its candidate files
//! - `doctor`      — Diagnose config and corpus health
//! - `config`      — Show, validate, or locate the configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "ponyprompt",
    about = "PonyPrompt — random prompt composer for image generation pipelines",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default config and create the corpus directories
    Init,

    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Compose a single prompt and print it
    Generate {
        /// Free text placed before the sampled fragments
        #[arg(short, long, default_value = "")]
        text: String,

        /// Seed the random draws for a reproducible prompt
        #[arg(short, long)]
        seed: Option<u64>,

        /// Also print fragments and diagnostics
        #[arg(long)]
        explain: bool,
    },

    /// List categories with their availability and file counts
    Categories,

    /// Diagnose config and corpus health
    Doctor,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Validate the configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    if cli.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Generate {
            text,
            seed,
            explain,
        } => commands::generate::run(text, seed, explain).await?,
        Commands::Categories => commands::categories::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
        },
    }

    Ok(())
}
