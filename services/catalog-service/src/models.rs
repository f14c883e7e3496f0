use chrono::{DateTime, NaiveDate, Utc};
use common::{Game, Genre, Platform};
use sqlx::types::Decimal;
use uuid::Uuid;

/// Row of the `games` table. Soft-deleted rows never reach this type because
/// every read filters on `deleted_at IS NULL`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbGame {
     pub id: Uuid,
     pub title: String,
     pub description: String,
     pub developer: String,
     pub publisher: String,
     pub release_date: Option<NaiveDate>,
     pub price: Decimal,
     pub average_rating: Decimal,
     pub image_url: String,
     pub created_at: DateTime<Utc>,
     pub updated_at: DateTime<Utc>,
}

/// A genre or platform name together with the game it is attached to.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbGameLink {
     pub game_id: Uuid,
     pub id: Uuid,
     pub name: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DbNamed {
     pub id: Uuid,
     pub name: String,
}

impl DbGame {
     pub fn into_game(self, genres: Vec<Genre>, platforms: Vec<Platform>) -> Game {
          Game {
               id: self.id,
               title: self.title,
               description: self.description,
               developer: self.developer,
               publisher: self.publisher,
               release_date: self.release_date,
               price: self.price,
               average_rating: self.average_rating,
               image_url: self.image_url,
               genres,
               platforms,
               created_at: self.created_at,
               updated_at: self.updated_at,
          }
     }
}

impl From<DbNamed> for Genre {
     fn from(row: DbNamed) -> Self {
          Genre { id: row.id, name: row.name }
     }
}

impl From<DbNamed> for Platform {
     fn from(row: DbNamed) -> Self {
          Platform { id: row.id, name: row.name }
     }
}

impl From<DbGameLink> for Genre {
     fn from(row: DbGameLink) -> Self {
          Genre { id: row.id, name: row.name }
     }
}

impl From<DbGameLink> for Platform {
     fn from(row: DbGameLink) -> Self {
          Platform { id: row.id, name: row.name }
     }
}
