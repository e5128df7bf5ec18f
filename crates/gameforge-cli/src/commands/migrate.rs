//! Database migration management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use gameforge::AppError;
use gameforge_database::migration;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Show which embedded migrations have been applied
    Status,
}

/// Migration display row
#[derive(Debug, Serialize, Tabled)]
struct MigrationRow {
    /// Migration version
    version: i64,
    /// Description
    description: String,
    /// Whether it has been applied
    applied: bool,
}

/// Execute migration commands
pub async fn execute(
    args: &MigrateArgs,
    config: &super::ConfigSource,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config)?;
    let db = super::connect_db(&config).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            migration::run_migrations(db.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Status => {
            if !db.health_check().await? {
                return Err(AppError::storage("Database did not answer the health check"));
            }
            let applied = migration::applied_versions(db.pool()).await?;
            let rows: Vec<MigrationRow> = migration::embedded_migrations()
                .into_iter()
                .map(|(version, description)| MigrationRow {
                    version,
                    description,
                    applied: applied.contains(&version),
                })
                .collect();

            let pending = rows.iter().filter(|r| !r.applied).count();
            output::print_list(&rows, format);
            if pending > 0 && format == OutputFormat::Table {
                output::print_warning(&format!("{pending} migration(s) pending"));
            }
        }
    }

    db.close().await;
    Ok(())
}
