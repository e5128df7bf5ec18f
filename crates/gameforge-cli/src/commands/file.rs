//! File inspection CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use gameforge::{AppError, FileId, FileVersion, GameId};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// List a game's files with their current version
    List {
        /// Game ID
        #[arg(short, long)]
        game: GameId,
    },
    /// Print a file's content
    Show {
        /// File ID
        id: FileId,
        /// Print this version instead of the current one
        #[arg(short, long)]
        version: Option<i32>,
    },
    /// Show a file's version history, oldest first
    History {
        /// File ID
        id: FileId,
    },
}

/// File display row for table output
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// File ID
    id: String,
    /// File name (last path segment)
    name: String,
    /// Path
    path: String,
    /// Type
    #[serde(rename = "type")]
    #[tabled(rename = "type")]
    file_type: String,
    /// Current version
    version: i32,
    /// Content size in bytes
    bytes: usize,
    /// Updated at
    updated_at: String,
}

/// Version display row for table output
#[derive(Debug, Serialize, Tabled)]
struct VersionRow {
    /// Version number
    version: i32,
    /// Commit message
    message: String,
    /// Author
    created_by: String,
    /// Content size in bytes
    bytes: usize,
    /// Created at
    created_at: String,
}

impl From<&FileVersion> for VersionRow {
    fn from(v: &FileVersion) -> Self {
        Self {
            version: v.version,
            message: v.commit_message.clone().unwrap_or_default(),
            created_by: v.created_by.clone().unwrap_or_default(),
            bytes: v.content.len(),
            created_at: output::short_time(&v.created_at),
        }
    }
}

/// Execute file commands
pub async fn execute(
    args: &FileArgs,
    config: &super::ConfigSource,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = super::open_store(config).await?;

    match &args.command {
        FileCommand::List { game } => {
            let files = store.files.get_game_snapshot(*game).await?;
            let rows: Vec<FileRow> = files
                .iter()
                .map(|f| FileRow {
                    id: f.file.id.to_string(),
                    name: f.file.file_name().to_string(),
                    path: f.file.path.clone(),
                    file_type: f.file.file_type.clone(),
                    version: f.current_version,
                    bytes: f.content.len(),
                    updated_at: output::short_time(&f.file.updated_at),
                })
                .collect();
            output::print_list(&rows, format);
        }
        FileCommand::Show { id, version } => {
            let version = match version {
                Some(n) => store.versions.get_file_version(*id, *n).await?,
                None => store.versions.get_latest_version(*id).await?,
            };

            match format {
                OutputFormat::Json => output::print_json(&version),
                OutputFormat::Table => print!("{}", version.content),
            }
        }
        FileCommand::History { id } => {
            let history = store.versions.get_file_history(*id).await?;
            match format {
                OutputFormat::Json => output::print_json(&history),
                OutputFormat::Table => {
                    let rows: Vec<VersionRow> = history.iter().map(VersionRow::from).collect();
                    output::print_list(&rows, format);
                }
            }
        }
    }

    store.close().await;
    Ok(())
}
