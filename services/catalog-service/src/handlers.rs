use axum::{
    extract::{
        rejection::JsonRejection,
        Json, Path, State,
    },
    http::StatusCode,
};
use axum_extra::extract::{Query, QueryRejection};
use common::{Game, GameListResult, Genre, Platform};
use uuid::Uuid;

use crate::error::ApiError;
use crate::service::CatalogService;
use crate::types::{GamePayload, ListGamesQuery, MessageResponse, NamePayload};

fn parse_game_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid game ID".to_string()))
}

pub async fn create_game(
    State(service): State<CatalogService>,
    payload: Result<Json<GamePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Game>), ApiError> {
    let Json(payload) = payload?;
    let game = service.create_game(payload.into_game(Uuid::nil())).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

pub async fn get_game(
    State(service): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<Json<Game>, ApiError> {
    let id = parse_game_id(&id)?;
    Ok(Json(service.get_game(id).await?))
}

pub async fn update_game(
    State(service): State<CatalogService>,
    Path(id): Path<String>,
    payload: Result<Json<GamePayload>, JsonRejection>,
) -> Result<Json<Game>, ApiError> {
    let id = parse_game_id(&id)?;
    let Json(payload) = payload?;
    Ok(Json(service.update_game(payload.into_game(id)).await?))
}

pub async fn delete_game(
    State(service): State<CatalogService>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_game_id(&id)?;
    service.delete_game(id).await?;
    Ok(Json(MessageResponse {
        message: "Game deleted successfully".to_string(),
    }))
}

pub async fn list_games(
    State(service): State<CatalogService>,
    query: Result<Query<ListGamesQuery>, QueryRejection>,
) -> Result<Json<GameListResult>, ApiError> {
    let Query(query) = query?;
    Ok(Json(service.list_games(Some(query.into_filter())).await?))
}

pub async fn create_genre(
    State(service): State<CatalogService>,
    payload: Result<Json<NamePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Genre>), ApiError> {
    let Json(payload) = payload?;
    let genre = service.create_genre(payload.name).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

pub async fn get_all_genres(
    State(service): State<CatalogService>,
) -> Result<Json<Vec<Genre>>, ApiError> {
    Ok(Json(service.get_all_genres().await?))
}

pub async fn create_platform(
    State(service): State<CatalogService>,
    payload: Result<Json<NamePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Platform>), ApiError> {
    let Json(payload) = payload?;
    let platform = service.create_platform(payload.name).await?;
    Ok((StatusCode::CREATED, Json(platform)))
}

pub async fn get_all_platforms(
    State(service): State<CatalogService>,
) -> Result<Json<Vec<Platform>>, ApiError> {
    Ok(Json(service.get_all_platforms().await?))
}
