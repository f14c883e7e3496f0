//! Translation of a [`GameFilter`] into the SQL that reads one page of games.
//!
//! Nothing here touches the database: [`GameQuery::count_query`] and
//! [`GameQuery::page_query`] only assemble a [`QueryBuilder`], which the
//! repository executes.

use common::{non_blank, GameFilter, Pagination};
use rust_decimal::Decimal;
use sqlx::{Postgres, QueryBuilder};

pub const GAME_COLUMNS: &str = "g.id, g.title, g.description, g.developer, g.publisher, \
     g.release_date, g.price, g.average_rating, g.image_url, g.created_at, g.updated_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    ReleaseDate,
    Price,
    AverageRating,
    CreatedAt,
}

impl SortField {
    /// Whitelists the requested field; anything unknown sorts by id.
    pub fn from_requested(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("title") => SortField::Title,
            Some("release_date") => SortField::ReleaseDate,
            Some("price") => SortField::Price,
            Some("average_rating") => SortField::AverageRating,
            Some("created_at") => SortField::CreatedAt,
            _ => SortField::Id,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "g.id",
            SortField::Title => "g.title",
            SortField::ReleaseDate => "g.release_date",
            SortField::Price => "g.price",
            SortField::AverageRating => "g.average_rating",
            SortField::CreatedAt => "g.created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_requested(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A normalized filter: blank strings removed, sort resolved against the
/// whitelist and pagination defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct GameQuery {
    pub title: Option<String>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    pub genres: Vec<String>,
    pub platforms: Vec<String>,
    pub min_rating: Option<Decimal>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub pagination: Pagination,
}

impl GameQuery {
    pub fn from_filter(filter: GameFilter) -> Self {
        let sort_field = SortField::from_requested(filter.sort_by.as_deref());
        // Identity ordering is always ascending.
        let sort_direction = match sort_field {
            SortField::Id => SortDirection::Asc,
            _ => SortDirection::from_requested(filter.sort_order.as_deref()),
        };

        GameQuery {
            title: non_blank(filter.title),
            developer: non_blank(filter.developer),
            publisher: non_blank(filter.publisher),
            genres: clean_names(filter.genres),
            platforms: clean_names(filter.platforms),
            min_rating: filter.min_rating,
            min_price: filter.min_price,
            max_price: filter.max_price,
            sort_field,
            sort_direction,
            pagination: Pagination::new(filter.page, filter.page_size),
        }
    }

    /// `SELECT COUNT(*)` over every row matching the filter, ignoring
    /// pagination.
    pub fn count_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM games g");
        self.push_conditions(&mut qb);
        qb
    }

    /// The rows of the requested page in the resolved order, ties broken by
    /// id ascending.
    pub fn page_query(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT {GAME_COLUMNS} FROM games g"));
        self.push_conditions(&mut qb);

        qb.push(" ORDER BY ");
        qb.push(self.sort_field.column());
        qb.push(" ");
        qb.push(self.sort_direction.keyword());
        if self.sort_field != SortField::Id {
            qb.push(", g.id ASC");
        }

        qb.push(" LIMIT ");
        qb.push_bind(self.pagination.limit());
        qb.push(" OFFSET ");
        qb.push_bind(self.pagination.offset());
        qb
    }

    fn push_conditions(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push(" WHERE g.deleted_at IS NULL");

        for (column, value) in [
            ("g.title", &self.title),
            ("g.developer", &self.developer),
            ("g.publisher", &self.publisher),
        ] {
            if let Some(value) = value {
                qb.push(format!(" AND {column} ILIKE "));
                qb.push_bind(like_pattern(value));
            }
        }

        if let Some(min_rating) = self.min_rating {
            qb.push(" AND g.average_rating >= ");
            qb.push_bind(min_rating);
        }
        if let Some(min_price) = self.min_price {
            qb.push(" AND g.price >= ");
            qb.push_bind(min_price);
        }
        if let Some(max_price) = self.max_price {
            qb.push(" AND g.price <= ");
            qb.push_bind(max_price);
        }

        // EXISTS keeps one row per game no matter how many names match.
        if !self.genres.is_empty() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM game_genres gg JOIN genres ge ON ge.id = gg.genre_id \
                 WHERE gg.game_id = g.id AND ge.name = ANY(",
            );
            qb.push_bind(self.genres.clone());
            qb.push("))");
        }
        if !self.platforms.is_empty() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM game_platforms gp JOIN platforms pl ON pl.id = gp.platform_id \
                 WHERE gp.game_id = g.id AND pl.name = ANY(",
            );
            qb.push_bind(self.platforms.clone());
            qb.push("))");
        }
    }
}

/// Case-insensitive substring pattern with LIKE wildcards in the input
/// matched literally.
pub fn like_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn clean_names(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .filter_map(|name| non_blank(Some(name)))
        .collect()
}
