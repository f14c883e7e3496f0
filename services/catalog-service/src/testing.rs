//! In-memory [`GameRepository`] used by the service and handler tests. It
//! records the name of every call and applies [`GameQuery`] the way the SQL
//! does.

use std::cmp::Ordering;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use common::{Game, GameListResult, Genre, Platform};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::query::{GameQuery, SortDirection, SortField};
use crate::repository::GameRepository;

#[derive(Default)]
struct State {
    games: Vec<Game>,
    genres: Vec<Genre>,
    platforms: Vec<Platform>,
    calls: Vec<&'static str>,
    fail_next_write: bool,
}

#[derive(Default)]
pub struct InMemoryRepository {
    state: Mutex<State>,
}

pub fn sample_game(title: &str) -> Game {
    let now = Utc::now();
    Game {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: String::new(),
        developer: String::new(),
        publisher: String::new(),
        release_date: None,
        price: Decimal::ZERO,
        average_rating: Decimal::ZERO,
        image_url: String::new(),
        genres: vec![],
        platforms: vec![],
        created_at: now,
        updated_at: now,
    }
}

impl InMemoryRepository {
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn fail_next_write(&self) {
        self.state.lock().unwrap().fail_next_write = true;
    }

    /// Stores a game directly, bypassing the call log.
    pub fn insert_game(&self, game: Game) -> Game {
        self.state.lock().unwrap().games.push(game.clone());
        game
    }

    pub fn insert_genre(&self, name: &str) -> Genre {
        let genre = Genre { id: Uuid::new_v4(), name: name.to_string() };
        self.state.lock().unwrap().genres.push(genre.clone());
        genre
    }

    pub fn insert_platform(&self, name: &str) -> Platform {
        let platform = Platform { id: Uuid::new_v4(), name: name.to_string() };
        self.state.lock().unwrap().platforms.push(platform.clone());
        platform
    }

    fn begin_write(&self, call: &'static str) -> Result<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if std::mem::take(&mut state.fail_next_write) {
            return Err(CatalogError::Store(sqlx::Error::PoolTimedOut));
        }
        Ok(state)
    }
}

/// Keeps only references to known records, hydrated with their names.
fn resolve<T: Clone>(wanted: &[T], known: &[T], id: impl Fn(&T) -> Uuid) -> Vec<T> {
    known
        .iter()
        .filter(|k| wanted.iter().any(|w| id(w) == id(k)))
        .cloned()
        .collect()
}

fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

fn matches(game: &Game, query: &GameQuery) -> bool {
    contains_ci(&game.title, &query.title)
        && contains_ci(&game.developer, &query.developer)
        && contains_ci(&game.publisher, &query.publisher)
        && query.min_rating.is_none_or(|min| game.average_rating >= min)
        && query.min_price.is_none_or(|min| game.price >= min)
        && query.max_price.is_none_or(|max| game.price <= max)
        && (query.genres.is_empty() || game.genres.iter().any(|g| query.genres.contains(&g.name)))
        && (query.platforms.is_empty()
            || game.platforms.iter().any(|p| query.platforms.contains(&p.name)))
}

fn compare(a: &Game, b: &Game, field: SortField, direction: SortDirection) -> Ordering {
    let ordering = match field {
        SortField::Id => Ordering::Equal,
        SortField::Title => a.title.cmp(&b.title),
        // NULL release dates sort last ascending, like PostgreSQL.
        SortField::ReleaseDate => match (a.release_date, b.release_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortField::Price => a.price.cmp(&b.price),
        SortField::AverageRating => a.average_rating.cmp(&b.average_rating),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
    };
    let ordering = match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    };
    ordering.then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl GameRepository for InMemoryRepository {
    async fn create(&self, game: &Game) -> Result<Game> {
        let mut state = self.begin_write("create")?;
        let mut stored = game.clone();
        stored.genres = resolve(&game.genres, &state.genres, |g| g.id);
        stored.platforms = resolve(&game.platforms, &state.platforms, |p| p.id);
        state.games.push(stored.clone());
        Ok(stored)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Game>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("get_by_id");
        Ok(state.games.iter().find(|g| g.id == id).cloned())
    }

    async fn update(&self, game: &Game) -> Result<Game> {
        let mut state = self.begin_write("update")?;
        let mut stored = game.clone();
        stored.genres = resolve(&game.genres, &state.genres, |g| g.id);
        stored.platforms = resolve(&game.platforms, &state.platforms, |p| p.id);
        let slot = state
            .games
            .iter_mut()
            .find(|g| g.id == game.id)
            .ok_or(CatalogError::Store(sqlx::Error::RowNotFound))?;
        *slot = stored.clone();
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut state = self.begin_write("delete")?;
        let before = state.games.len();
        state.games.retain(|g| g.id != id);
        if state.games.len() == before {
            return Err(CatalogError::Store(sqlx::Error::RowNotFound));
        }
        Ok(())
    }

    async fn list(&self, query: &GameQuery) -> Result<GameListResult> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("list");

        let mut matching: Vec<Game> = state
            .games
            .iter()
            .filter(|g| matches(g, query))
            .cloned()
            .collect();
        matching.sort_by(|a, b| compare(a, b, query.sort_field, query.sort_direction));

        let total_count = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(query.pagination.offset() as usize)
            .take(query.pagination.limit() as usize)
            .collect();
        Ok(GameListResult::new(page, total_count, query.pagination))
    }

    async fn create_genre(&self, genre: &Genre) -> Result<Genre> {
        let mut state = self.begin_write("create_genre")?;
        if state.genres.iter().any(|g| g.name == genre.name) {
            return Err(CatalogError::Store(sqlx::Error::Protocol(
                "duplicate key value violates unique constraint \"genres_name_key\"".into(),
            )));
        }
        state.genres.push(genre.clone());
        Ok(genre.clone())
    }

    async fn get_all_genres(&self) -> Result<Vec<Genre>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("get_all_genres");
        Ok(state.genres.clone())
    }

    async fn create_platform(&self, platform: &Platform) -> Result<Platform> {
        let mut state = self.begin_write("create_platform")?;
        if state.platforms.iter().any(|p| p.name == platform.name) {
            return Err(CatalogError::Store(sqlx::Error::Protocol(
                "duplicate key value violates unique constraint \"platforms_name_key\"".into(),
            )));
        }
        state.platforms.push(platform.clone());
        Ok(platform.clone())
    }

    async fn get_all_platforms(&self) -> Result<Vec<Platform>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("get_all_platforms");
        Ok(state.platforms.clone())
    }
}
