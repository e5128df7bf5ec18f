//! Game CRUD. Deleting a game removes everything it owns.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use gameforge_core::error::AppError;
use gameforge_core::types::{self, GameId};
use gameforge_database::repositories::game::GameRepository;
use gameforge_entity::game::Game;

use crate::validation::{non_blank, validate_request};

/// Data for creating a game.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGameRequest {
    /// Display name.
    #[validate(custom(function = "non_blank"))]
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Data for updating a game. Absent fields are left unchanged; a blank
/// description clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateGameRequest {
    /// New display name.
    #[validate(custom(function = "non_blank"))]
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
}

/// Creates, reads, updates, and deletes games.
#[derive(Debug, Clone)]
pub struct GameService {
    /// Game repository.
    game_repo: Arc<GameRepository>,
}

impl GameService {
    /// Creates a new game service.
    pub fn new(game_repo: Arc<GameRepository>) -> Self {
        Self { game_repo }
    }

    /// Creates an empty game.
    pub async fn create_game(&self, req: CreateGameRequest) -> Result<Game, AppError> {
        validate_request(&req)?;

        let now = types::now();
        let game = Game {
            id: GameId::new(),
            name: req.name.trim().to_string(),
            description: req.description.filter(|d| !d.trim().is_empty()),
            created_at: now,
            updated_at: now,
        };

        let game = self.game_repo.create(&game).await?;

        info!(game_id = %game.id, name = %game.name, "Game created");

        Ok(game)
    }

    /// Gets a game by ID.
    pub async fn get_game(&self, game_id: GameId) -> Result<Game, AppError> {
        self.game_repo
            .find_by_id(game_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Game {game_id} not found")))
    }

    /// Lists all games, most recently created first.
    pub async fn list_games(&self) -> Result<Vec<Game>, AppError> {
        let games = self.game_repo.find_all().await?;
        debug!(count = games.len(), "Listed games");
        Ok(games)
    }

    /// Renames a game or changes its description.
    pub async fn update_game(
        &self,
        game_id: GameId,
        req: UpdateGameRequest,
    ) -> Result<Game, AppError> {
        validate_request(&req)?;

        let current = self.get_game(game_id).await?;

        let name = req
            .name
            .map(|n| n.trim().to_string())
            .unwrap_or(current.name);
        let description = match req.description {
            Some(d) if d.trim().is_empty() => None,
            Some(d) => Some(d),
            None => current.description,
        };

        let updated = self
            .game_repo
            .update(game_id, &name, description.as_deref(), types::now())
            .await?;
        if !updated {
            return Err(AppError::not_found(format!("Game {game_id} not found")));
        }

        info!(game_id = %game_id, "Game updated");

        self.get_game(game_id).await
    }

    /// Deletes a game with all of its files, versions, and commits.
    pub async fn delete_game(&self, game_id: GameId) -> Result<(), AppError> {
        if !self.game_repo.delete(game_id).await? {
            return Err(AppError::not_found(format!("Game {game_id} not found")));
        }

        info!(game_id = %game_id, "Game deleted");

        Ok(())
    }
}
