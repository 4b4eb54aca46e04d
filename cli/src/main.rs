//! EventForms CLI
//!
//! Command-line interface for the EventForms form builder and API.
//!
//! # Usage
//!
//! ```bash
//! eventforms forms build --event meetup --script signup.yaml
//! eventforms forms build --event meetup --script signup.yaml --submit
//! eventforms forms list --format json
//! eventforms users create --name Ada --email ada@example.com --password secret
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;
mod script;

const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Parser)]
#[command(name = "eventforms")]
#[command(version)]
#[command(about = "EventForms Command Line Interface", long_about = None)]
struct Cli {
    /// API base URL
    #[arg(long, env = "EVENTFORMS_API_URL")]
    api_url: Option<String>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and submit forms
    Forms {
        #[command(subcommand)]
        action: FormCommands,
    },
    /// Manage users
    Users {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum FormCommands {
    /// List stored forms
    List,
    /// Replay a builder script and print the resulting form
    Build {
        /// Event the form belongs to
        #[arg(long)]
        event: String,
        /// YAML or JSON list of builder operations
        #[arg(short, long)]
        script: PathBuf,
        /// Submit the built form to the API and wait for the result
        #[arg(long)]
        submit: bool,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List all users
    List,
    /// Create a new user
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = config::Config::load(cli.profile.as_deref()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config not loaded, using defaults");
        config::Config::default()
    });
    let api_url = cli.api_url.or(config.api_url).unwrap_or_else(|| DEFAULT_API_URL.into());
    let format = cli.format.or(config.default_format).unwrap_or(output::OutputFormat::Table);

    let client = commands::ApiClient::new(&api_url);

    let result = match cli.command {
        Commands::Forms { action } => commands::forms::handle(action, &client, format).await,
        Commands::Users { action } => commands::users::handle(action, &client, format).await,
        Commands::Config { action } => commands::config::handle(action, cli.profile.as_deref()).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
