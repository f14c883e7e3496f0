use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use common::{Game, GameFilter, GameListResult, Genre, Platform};
use tracing::info;
use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::query::GameQuery;
use crate::repository::GameRepository;
use crate::validation;

/// Business rules of the catalog on top of a [`GameRepository`].
///
/// Update and delete check existence and then write without holding a lock
/// in between, so concurrent writers to the same game race and the last one
/// wins.
#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn GameRepository>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn GameRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_game(&self, mut game: Game) -> Result<Game> {
        validation::validate_game(&game).map_err(CatalogError::Validation)?;

        let now = Utc::now();
        game.id = Uuid::new_v4();
        game.title = game.title.trim().to_string();
        game.created_at = now;
        game.updated_at = now;

        info!(title = %game.title, "creating game");
        self.repo.create(&game).await
    }

    pub async fn get_game(&self, id: Uuid) -> Result<Game> {
        info!(%id, "fetching game");
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound("Game".to_string()))
    }

    /// Replaces the stored game. The creation timestamp always comes from
    /// the stored record, whatever the payload carries.
    pub async fn update_game(&self, mut game: Game) -> Result<Game> {
        validation::validate_game(&game).map_err(CatalogError::Validation)?;

        let existing = self
            .repo
            .get_by_id(game.id)
            .await?
            .ok_or_else(|| CatalogError::NotFound("Game".to_string()))?;

        game.title = game.title.trim().to_string();
        game.created_at = existing.created_at;
        game.updated_at = next_update_time(existing.updated_at);

        info!(id = %game.id, title = %game.title, "updating game");
        self.repo.update(&game).await
    }

    pub async fn delete_game(&self, id: Uuid) -> Result<()> {
        if self.repo.get_by_id(id).await?.is_none() {
            return Err(CatalogError::NotFound("Game".to_string()));
        }

        info!(%id, "deleting game");
        self.repo.delete(id).await
    }

    pub async fn list_games(&self, filter: Option<GameFilter>) -> Result<GameListResult> {
        let query = GameQuery::from_filter(filter.unwrap_or_default());

        info!(
            page = query.pagination.page,
            page_size = query.pagination.page_size,
            title = query.title.as_deref().unwrap_or(""),
            "listing games"
        );
        self.repo.list(&query).await
    }

    pub async fn create_genre(&self, name: String) -> Result<Genre> {
        validation::validate_reference_name("Genre", &name).map_err(CatalogError::Validation)?;

        let genre = Genre {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
        };
        info!(name = %genre.name, "creating genre");
        self.repo.create_genre(&genre).await
    }

    pub async fn get_all_genres(&self) -> Result<Vec<Genre>> {
        info!("fetching all genres");
        self.repo.get_all_genres().await
    }

    pub async fn create_platform(&self, name: String) -> Result<Platform> {
        validation::validate_reference_name("Platform", &name).map_err(CatalogError::Validation)?;

        let platform = Platform {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
        };
        info!(name = %platform.name, "creating platform");
        self.repo.create_platform(&platform).await
    }

    pub async fn get_all_platforms(&self) -> Result<Vec<Platform>> {
        info!("fetching all platforms");
        self.repo.get_all_platforms().await
    }
}

/// Current time, bumped past `previous` when the clock has not moved on.
fn next_update_time(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
