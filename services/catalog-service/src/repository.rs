use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use common::{Game, GameListResult, Genre, Platform};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::models::{DbGame, DbGameLink, DbNamed};
use crate::query::{GameQuery, GAME_COLUMNS};

/// Persistence boundary of the catalog. Every method is a single store
/// operation; multi-row writes run in one transaction.
#[async_trait]
pub trait GameRepository: Send + Sync {
     async fn create(&self, game: &Game) -> Result<Game>;
     async fn get_by_id(&self, id: Uuid) -> Result<Option<Game>>;
     async fn update(&self, game: &Game) -> Result<Game>;
     async fn delete(&self, id: Uuid) -> Result<()>;
     async fn list(&self, query: &GameQuery) -> Result<GameListResult>;

     async fn create_genre(&self, genre: &Genre) -> Result<Genre>;
     async fn get_all_genres(&self) -> Result<Vec<Genre>>;

     async fn create_platform(&self, platform: &Platform) -> Result<Platform>;
     async fn get_all_platforms(&self) -> Result<Vec<Platform>>;
}

#[derive(Clone)]
pub struct PgGameRepository {
     pool: PgPool,
}

impl PgGameRepository {
     pub fn new(pool: PgPool) -> Self {
          Self { pool }
     }

     async fn load_links(&self, sql: &str, game_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<DbGameLink>>> {
          let mut grouped: HashMap<Uuid, Vec<DbGameLink>> = HashMap::new();
          if game_ids.is_empty() {
               return Ok(grouped);
          }

          let rows = sqlx::query_as::<_, DbGameLink>(sql)
               .bind(game_ids)
               .fetch_all(&self.pool)
               .await?;

          for row in rows {
               grouped.entry(row.game_id).or_default().push(row);
          }
          Ok(grouped)
     }

     /// Attaches genres and platforms to a page of game rows, keeping the
     /// row order.
     async fn hydrate(&self, rows: Vec<DbGame>) -> Result<Vec<Game>> {
          let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
          let mut genres = self.load_links(SELECT_GENRE_LINKS, &ids).await?;
          let mut platforms = self.load_links(SELECT_PLATFORM_LINKS, &ids).await?;

          Ok(rows
               .into_iter()
               .map(|row| {
                    let genres = genres.remove(&row.id).unwrap_or_default();
                    let platforms = platforms.remove(&row.id).unwrap_or_default();
                    row.into_game(
                         genres.into_iter().map(Genre::from).collect(),
                         platforms.into_iter().map(Platform::from).collect(),
                    )
               })
               .collect())
     }

     async fn link_associations(tx: &mut Transaction<'_, Postgres>, game: &Game) -> Result<()> {
          let genre_ids: Vec<Uuid> = game.genres.iter().map(|g| g.id).collect();
          let platform_ids: Vec<Uuid> = game.platforms.iter().map(|p| p.id).collect();

          sqlx::query(
               r#"
               INSERT INTO game_genres (game_id, genre_id)
               SELECT $1, id FROM genres WHERE id = ANY($2)
               ON CONFLICT DO NOTHING
               "#,
          )
          .bind(game.id)
          .bind(genre_ids)
          .execute(&mut **tx)
          .await?;

          sqlx::query(
               r#"
               INSERT INTO game_platforms (game_id, platform_id)
               SELECT $1, id FROM platforms WHERE id = ANY($2)
               ON CONFLICT DO NOTHING
               "#,
          )
          .bind(game.id)
          .bind(platform_ids)
          .execute(&mut **tx)
          .await?;

          Ok(())
     }

     async fn unlink_associations(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<()> {
          sqlx::query("DELETE FROM game_genres WHERE game_id = $1")
               .bind(id)
               .execute(&mut **tx)
               .await?;
          sqlx::query("DELETE FROM game_platforms WHERE game_id = $1")
               .bind(id)
               .execute(&mut **tx)
               .await?;
          Ok(())
     }

     async fn fetch_game(&self, id: Uuid) -> Result<Option<Game>> {
          let row = sqlx::query_as::<_, DbGame>(&format!(
               "SELECT {GAME_COLUMNS} FROM games g WHERE g.id = $1 AND g.deleted_at IS NULL"
          ))
          .bind(id)
          .fetch_optional(&self.pool)
          .await?;

          match row {
               Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
               None => Ok(None),
          }
     }
}

const SELECT_GENRE_LINKS: &str = r#"
     SELECT gg.game_id, ge.id, ge.name
     FROM game_genres gg
     JOIN genres ge ON ge.id = gg.genre_id
     WHERE gg.game_id = ANY($1)
     ORDER BY ge.name
"#;

const SELECT_PLATFORM_LINKS: &str = r#"
     SELECT gp.game_id, pl.id, pl.name
     FROM game_platforms gp
     JOIN platforms pl ON pl.id = gp.platform_id
     WHERE gp.game_id = ANY($1)
     ORDER BY pl.name
"#;

#[async_trait]
impl GameRepository for PgGameRepository {
     async fn create(&self, game: &Game) -> Result<Game> {
          let mut tx = self.pool.begin().await?;

          sqlx::query(
               r#"
               INSERT INTO games (id, title, description, developer, publisher, release_date,
                                  price, average_rating, image_url, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               "#,
          )
          .bind(game.id)
          .bind(&game.title)
          .bind(&game.description)
          .bind(&game.developer)
          .bind(&game.publisher)
          .bind(game.release_date)
          .bind(game.price)
          .bind(game.average_rating)
          .bind(&game.image_url)
          .bind(game.created_at)
          .bind(game.updated_at)
          .execute(&mut *tx)
          .await?;

          Self::link_associations(&mut tx, game).await?;
          tx.commit().await?;

          self.fetch_game(game.id)
               .await?
               .ok_or(CatalogError::Store(sqlx::Error::RowNotFound))
     }

     async fn get_by_id(&self, id: Uuid) -> Result<Option<Game>> {
          self.fetch_game(id).await
     }

     async fn update(&self, game: &Game) -> Result<Game> {
          let mut tx = self.pool.begin().await?;

          let result = sqlx::query(
               r#"
               UPDATE games
               SET
                    title = $2,
                    description = $3,
                    developer = $4,
                    publisher = $5,
                    release_date = $6,
                    price = $7,
                    average_rating = $8,
                    image_url = $9,
                    created_at = $10,
                    updated_at = $11
               WHERE id = $1 AND deleted_at IS NULL
               "#,
          )
          .bind(game.id)
          .bind(&game.title)
          .bind(&game.description)
          .bind(&game.developer)
          .bind(&game.publisher)
          .bind(game.release_date)
          .bind(game.price)
          .bind(game.average_rating)
          .bind(&game.image_url)
          .bind(game.created_at)
          .bind(game.updated_at)
          .execute(&mut *tx)
          .await?;

          if result.rows_affected() == 0 {
               return Err(sqlx::Error::RowNotFound.into());
          }

          Self::unlink_associations(&mut tx, game.id).await?;
          Self::link_associations(&mut tx, game).await?;
          tx.commit().await?;

          self.fetch_game(game.id)
               .await?
               .ok_or(CatalogError::Store(sqlx::Error::RowNotFound))
     }

     async fn delete(&self, id: Uuid) -> Result<()> {
          let mut tx = self.pool.begin().await?;

          let result = sqlx::query(
               "UPDATE games SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL",
          )
          .bind(id)
          .bind(Utc::now())
          .execute(&mut *tx)
          .await?;

          if result.rows_affected() == 0 {
               return Err(sqlx::Error::RowNotFound.into());
          }

          Self::unlink_associations(&mut tx, id).await?;
          tx.commit().await?;
          Ok(())
     }

     async fn list(&self, query: &GameQuery) -> Result<GameListResult> {
          let (total_count,) = query
               .count_query()
               .build_query_as::<(i64,)>()
               .fetch_one(&self.pool)
               .await?;

          let rows = query
               .page_query()
               .build_query_as::<DbGame>()
               .fetch_all(&self.pool)
               .await?;

          let games = self.hydrate(rows).await?;
          Ok(GameListResult::new(games, total_count, query.pagination))
     }

     async fn create_genre(&self, genre: &Genre) -> Result<Genre> {
          let row = sqlx::query_as::<_, DbNamed>(
               "INSERT INTO genres (id, name) VALUES ($1, $2) RETURNING id, name",
          )
          .bind(genre.id)
          .bind(&genre.name)
          .fetch_one(&self.pool)
          .await?;
          Ok(row.into())
     }

     async fn get_all_genres(&self) -> Result<Vec<Genre>> {
          let rows = sqlx::query_as::<_, DbNamed>("SELECT id, name FROM genres ORDER BY name")
               .fetch_all(&self.pool)
               .await?;
          Ok(rows.into_iter().map(Genre::from).collect())
     }

     async fn create_platform(&self, platform: &Platform) -> Result<Platform> {
          let row = sqlx::query_as::<_, DbNamed>(
               "INSERT INTO platforms (id, name) VALUES ($1, $2) RETURNING id, name",
          )
          .bind(platform.id)
          .bind(&platform.name)
          .fetch_one(&self.pool)
          .await?;
          Ok(row.into())
     }

     async fn get_all_platforms(&self) -> Result<Vec<Platform>> {
          let rows = sqlx::query_as::<_, DbNamed>("SELECT id, name FROM platforms ORDER BY name")
               .fetch_all(&self.pool)
               .await?;
          Ok(rows.into_iter().map(Platform::from).collect())
     }
}
