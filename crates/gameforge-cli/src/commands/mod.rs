//! CLI command definitions and dispatch.

pub mod commit;
pub mod file;
pub mod game;
pub mod migrate;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use gameforge::{AppConfig, AppError, DatabasePool, GameStore};

/// GameForge: versioned file store for game projects
#[derive(Debug, Parser)]
#[command(name = "gameforge", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Load `config/default.toml` overlaid with `config/{env}.toml` instead
    /// of a single file
    #[arg(short, long, conflicts_with = "config")]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Game management
    Game(game::GameArgs),
    /// File inspection
    File(file::FileArgs),
    /// Commit inspection
    Commit(commit::CommitArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &self.source(), self.format).await,
            Commands::Game(args) => game::execute(args, &self.source(), self.format).await,
            Commands::File(args) => file::execute(args, &self.source(), self.format).await,
            Commands::Commit(args) => commit::execute(args, &self.source(), self.format).await,
        }
    }

    /// Where configuration is read from
    pub fn source(&self) -> ConfigSource {
        match &self.env {
            Some(env) => ConfigSource::Env(env.clone()),
            None => ConfigSource::File(self.config.clone()),
        }
    }
}

/// Configuration origin selected on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A single TOML file
    File(String),
    /// Named environment layered over `config/default.toml`
    Env(String),
}

/// Helper: load configuration
pub fn load_config(source: &ConfigSource) -> Result<AppConfig, AppError> {
    match source {
        ConfigSource::File(path) => AppConfig::from_file(path),
        ConfigSource::Env(env) => AppConfig::load(env),
    }
    .map_err(|e| AppError::configuration(format!("Failed to load config: {e}")))
}

/// Helper: connect to the database without touching the schema
pub async fn connect_db(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: build the full store, migrating first if configured to
pub async fn open_store(source: &ConfigSource) -> Result<GameStore, AppError> {
    let config = load_config(source)?;
    GameStore::connect(&config).await
}
