//! Game management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use gameforge::{AppError, CreateGameRequest, Game, GameId};

/// Arguments for game commands
#[derive(Debug, Args)]
pub struct GameArgs {
    /// Game subcommand
    #[command(subcommand)]
    pub command: GameCommand,
}

/// Game subcommands
#[derive(Debug, Subcommand)]
pub enum GameCommand {
    /// List all games, most recently created first
    List,
    /// Create a new game
    Create {
        /// Game name (will prompt if not provided)
        #[arg(short, long)]
        name: Option<String>,
        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Show a game and its files
    Show {
        /// Game ID
        id: GameId,
    },
    /// Delete a game with all its files, versions, and commits
    Delete {
        /// Game ID
        id: GameId,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Game display row for table output
#[derive(Debug, Serialize, Tabled)]
struct GameRow {
    /// Game ID
    id: String,
    /// Name
    name: String,
    /// Description
    description: String,
    /// Created at
    created_at: String,
    /// Updated at
    updated_at: String,
}

impl From<&Game> for GameRow {
    fn from(g: &Game) -> Self {
        Self {
            id: g.id.to_string(),
            name: g.name.clone(),
            description: g.description.clone().unwrap_or_default(),
            created_at: output::short_time(&g.created_at),
            updated_at: output::short_time(&g.updated_at),
        }
    }
}

/// Execute game commands
pub async fn execute(
    args: &GameArgs,
    config: &super::ConfigSource,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = super::open_store(config).await?;

    match &args.command {
        GameCommand::List => {
            let games = store.games.list_games().await?;
            match format {
                OutputFormat::Json => output::print_json(&games),
                OutputFormat::Table => {
                    let rows: Vec<GameRow> = games.iter().map(GameRow::from).collect();
                    output::print_list(&rows, format);
                }
            }
        }
        GameCommand::Create { name, description } => {
            let name = match name {
                Some(n) => n.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Game name")
                    .interact_text()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };

            let game = store
                .games
                .create_game(CreateGameRequest {
                    name,
                    description: description.clone(),
                })
                .await?;

            match format {
                OutputFormat::Json => output::print_json(&game),
                OutputFormat::Table => {
                    output::print_success(&format!("Game '{}' created (id: {})", game.name, game.id))
                }
            }
        }
        GameCommand::Show { id } => {
            let game = store.games.get_game(*id).await?;
            let files = store.files.list_files(*id).await?;

            match format {
                OutputFormat::Json => output::print_json(&serde_json::json!({
                    "game": game,
                    "files": files,
                })),
                OutputFormat::Table => {
                    println!("Game");
                    output::print_kv("ID", &game.id.to_string());
                    output::print_kv("Name", &game.name);
                    output::print_kv("Description", game.description.as_deref().unwrap_or("-"));
                    output::print_kv("Created", &output::short_time(&game.created_at));
                    output::print_kv("Updated", &output::short_time(&game.updated_at));
                    output::print_kv("Files", &files.len().to_string());
                    for f in &files {
                        println!("    {}  {:<6} {}", f.id, f.file_type, f.path);
                    }
                }
            }
        }
        GameCommand::Delete { id, force } => {
            let game = store.games.get_game(*id).await?;

            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete game '{}' with all files, versions, and commits?",
                        game.name
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            store.games.delete_game(*id).await?;
            output::print_success(&format!("Game '{}' deleted", game.name));
        }
    }

    store.close().await;
    Ok(())
}
