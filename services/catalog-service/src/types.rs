use chrono::{DateTime, NaiveDate, Utc};
use common::{Game, GameFilter, Genre, Platform};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /games` and `PUT /games/{id}`. Fields the server owns
/// (`id`, `updated_at`) are ignored; `created_at` is accepted but the
/// service decides what is stored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GamePayload {
    pub title: String,
    pub description: String,
    pub developer: String,
    pub publisher: String,
    pub release_date: Option<NaiveDate>,
    pub price: Decimal,
    pub average_rating: Decimal,
    pub image_url: String,
    pub genres: Vec<AssociationRef>,
    pub platforms: Vec<AssociationRef>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Reference to an existing genre or platform. Only the id is used.
#[derive(Debug, Clone, Deserialize)]
pub struct AssociationRef {
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
}

impl GamePayload {
    pub fn into_game(self, id: Uuid) -> Game {
        let now = Utc::now();
        Game {
            id,
            title: self.title,
            description: self.description,
            developer: self.developer,
            publisher: self.publisher,
            release_date: self.release_date,
            price: self.price,
            average_rating: self.average_rating,
            image_url: self.image_url,
            genres: self
                .genres
                .into_iter()
                .map(|r| Genre { id: r.id, name: r.name })
                .collect(),
            platforms: self
                .platforms
                .into_iter()
                .map(|r| Platform { id: r.id, name: r.name })
                .collect(),
            created_at: self.created_at.unwrap_or(now),
            updated_at: now,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NamePayload {
    #[serde(default)]
    pub name: String,
}

/// Query string of `GET /games`. `genres` and `platforms` accept repeated
/// keys (`genres=RPG&genres=Action`), comma-separated values, or both.
#[derive(Debug, Default, Deserialize)]
pub struct ListGamesQuery {
    pub title: Option<String>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub min_rating: Option<Decimal>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl ListGamesQuery {
    pub fn into_filter(self) -> GameFilter {
        GameFilter {
            title: self.title,
            developer: self.developer,
            publisher: self.publisher,
            genres: split_list(self.genres),
            platforms: split_list(self.platforms),
            min_rating: self.min_rating,
            min_price: self.min_price,
            max_price: self.max_price,
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            page: self.page.unwrap_or(0),
            page_size: self.page_size.unwrap_or(0),
        }
    }
}

fn split_list(values: Vec<String>) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
