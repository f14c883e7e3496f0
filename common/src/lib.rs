use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

pub mod models {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Genre {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Platform {
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Game {
        pub id: Uuid,
        pub title: String,
        pub description: String,
        pub developer: String,
        pub publisher: String,
        pub release_date: Option<NaiveDate>,
        pub price: Decimal,
        pub average_rating: Decimal,
        pub image_url: String,
        pub genres: Vec<Genre>,
        pub platforms: Vec<Platform>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Constraints for one list query. Every field is optional; an empty
    /// string or list imposes no constraint.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct GameFilter {
        pub title: Option<String>,
        pub developer: Option<String>,
        pub publisher: Option<String>,
        pub genres: Vec<String>,
        pub platforms: Vec<String>,
        pub min_rating: Option<Decimal>,
        pub min_price: Option<Decimal>,
        pub max_price: Option<Decimal>,
        pub sort_by: Option<String>,
        pub sort_order: Option<String>,
        pub page: i64,
        pub page_size: i64,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct GameListResult {
        pub games: Vec<Game>,
        pub total_count: i64,
        pub page: i64,
        pub page_size: i64,
        pub total_pages: i64,
    }

    impl GameListResult {
        pub fn new(games: Vec<Game>, total_count: i64, pagination: Pagination) -> Self {
            Self {
                games,
                total_count,
                page: pagination.page,
                page_size: pagination.page_size,
                total_pages: pagination.total_pages(total_count),
            }
        }
    }
}

pub mod utils {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_PAGE_SIZE: i64 = 10;

    /// Effective page window of a list query. Non-positive inputs fall back
    /// to the defaults.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Pagination {
        pub page: i64,
        pub page_size: i64,
    }

    impl Pagination {
        pub fn new(page: i64, page_size: i64) -> Self {
            Self {
                page: if page <= 0 { DEFAULT_PAGE } else { page },
                page_size: if page_size <= 0 { DEFAULT_PAGE_SIZE } else { page_size },
            }
        }

        pub fn offset(&self) -> i64 {
            (self.page - 1).saturating_mul(self.page_size)
        }

        pub fn limit(&self) -> i64 {
            self.page_size
        }

        pub fn total_pages(&self, total_count: i64) -> i64 {
            if total_count <= 0 {
                return 0;
            }
            (total_count - 1) / self.page_size + 1
        }
    }

    impl Default for Pagination {
        fn default() -> Self {
            Self::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
        }
    }

    /// Trims `value` and drops it when nothing is left.
    pub fn non_blank(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

pub use models::*;
pub use utils::*;
