use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;

pub const DEFAULT_GENRES: [&str; 10] = [
     "Action",
     "Aventure",
     "RPG",
     "FPS",
     "Stratégie",
     "Simulation",
     "Sport",
     "Course",
     "Puzzle",
     "Plateforme",
];

pub const DEFAULT_PLATFORMS: [&str; 7] = [
     "PC",
     "PlayStation 5",
     "PlayStation 4",
     "Xbox Series X",
     "Xbox One",
     "Nintendo Switch",
     "Mobile",
];

pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
     let pool = PgPoolOptions::new()
          .max_connections(100)
          .min_connections(10)
          .max_lifetime(Duration::from_secs(60 * 60))
          .connect(&config.connection_url())
          .await?;

     info!(host = %config.host, database = %config.name, "connected to PostgreSQL");
     Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
     info!("running database migrations");
     sqlx::migrate!("./migrations").run(pool).await?;
     info!("database migrations finished");
     Ok(())
}

/// Inserts the default genres and platforms into an empty catalog.
pub async fn seed_reference_data(pool: &PgPool) -> Result<(), sqlx::Error> {
     let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM genres")
          .fetch_one(pool)
          .await?;

     if count > 0 {
          info!(genres = count, "reference data already present, skipping seed");
          return Ok(());
     }

     let mut tx = pool.begin().await?;
     for name in DEFAULT_GENRES {
          sqlx::query("INSERT INTO genres (id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
               .bind(Uuid::new_v4())
               .bind(name)
               .execute(&mut *tx)
               .await?;
     }
     for name in DEFAULT_PLATFORMS {
          sqlx::query("INSERT INTO platforms (id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
               .bind(Uuid::new_v4())
               .bind(name)
               .execute(&mut *tx)
               .await?;
     }
     tx.commit().await?;

     info!(
          genres = DEFAULT_GENRES.len(),
          platforms = DEFAULT_PLATFORMS.len(),
          "seeded reference data"
     );
     Ok(())
}
