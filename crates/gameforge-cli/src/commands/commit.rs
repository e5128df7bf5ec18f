//! Commit inspection CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use gameforge::{AppError, Commit, CommitId, GameId, PageRequest};

/// Arguments for commit commands
#[derive(Debug, Args)]
pub struct CommitArgs {
    /// Commit subcommand
    #[command(subcommand)]
    pub command: CommitCommand,
}

/// Commit subcommands
#[derive(Debug, Subcommand)]
pub enum CommitCommand {
    /// List a game's commits, newest first
    List {
        /// Game ID
        #[arg(short, long)]
        game: GameId,
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Commits per page
        #[arg(long, default_value_t = 25)]
        page_size: u64,
    },
    /// Show a commit and the versions it created
    Show {
        /// Commit ID
        id: CommitId,
    },
}

/// Commit display row for table output
#[derive(Debug, Serialize, Tabled)]
struct CommitRow {
    /// Commit ID
    id: String,
    /// Message
    message: String,
    /// Author
    created_by: String,
    /// Created at
    created_at: String,
}

impl From<&Commit> for CommitRow {
    fn from(c: &Commit) -> Self {
        Self {
            id: c.id.to_string(),
            message: c.message.clone(),
            created_by: c.created_by.clone().unwrap_or_default(),
            created_at: output::short_time(&c.created_at),
        }
    }
}

/// Member display row for table output
#[derive(Debug, Serialize, Tabled)]
struct MemberRow {
    /// File path
    path: String,
    /// File type
    #[tabled(rename = "type")]
    file_type: String,
    /// Version created by the commit
    version: i32,
    /// Content size in bytes
    bytes: usize,
}

/// Execute commit commands
pub async fn execute(
    args: &CommitArgs,
    config: &super::ConfigSource,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = super::open_store(config).await?;

    match &args.command {
        CommitCommand::List {
            game,
            page,
            page_size,
        } => {
            let page = store
                .commits
                .list_commits_page(*game, PageRequest::new(*page, *page_size))
                .await?;

            match format {
                OutputFormat::Json => output::print_json(&page),
                OutputFormat::Table => {
                    let rows: Vec<CommitRow> = page.items.iter().map(CommitRow::from).collect();
                    output::print_list(&rows, format);
                    println!(
                        "Page {}/{} ({} commits)",
                        page.page,
                        page.total_pages.max(1),
                        page.total_items
                    );
                }
            }
        }
        CommitCommand::Show { id } => {
            let detail = store.commits.get_commit(*id).await?;

            match format {
                OutputFormat::Json => output::print_json(&detail),
                OutputFormat::Table => {
                    let commit = &detail.commit;
                    println!("Commit");
                    output::print_kv("ID", &commit.id.to_string());
                    output::print_kv("Game", &commit.game_id.to_string());
                    output::print_kv("Message", &commit.message);
                    output::print_kv("Author", commit.created_by.as_deref().unwrap_or("-"));
                    output::print_kv("Created", &output::short_time(&commit.created_at));

                    let rows: Vec<MemberRow> = detail
                        .files
                        .iter()
                        .map(|m| MemberRow {
                            path: m.path.clone(),
                            file_type: m.file_type.clone(),
                            version: m.version.version,
                            bytes: m.version.content.len(),
                        })
                        .collect();
                    output::print_list(&rows, format);
                }
            }
        }
    }

    store.close().await;
    Ok(())
}
