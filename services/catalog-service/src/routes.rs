use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    timeout::{RequestBodyTimeoutLayer, TimeoutLayer},
    trace::TraceLayer,
};

use crate::handlers::{
    create_game, create_genre, create_platform, delete_game, get_all_genres, get_all_platforms,
    get_game, list_games, update_game,
};
use crate::service::CatalogService;

pub fn create_routes(service: CatalogService, read_timeout: Duration, write_timeout: Duration) -> Router {
    let catalog = Router::new()
        .route("/games", post(create_game).get(list_games))
        .route("/games/{id}", get(get_game).put(update_game).delete(delete_game))
        .route("/genres", post(create_genre).get(get_all_genres))
        .route("/platforms", post(create_platform).get(get_all_platforms));

    Router::new()
        .nest("/api/v1/catalog", catalog)
        .layer(RequestBodyTimeoutLayer::new(read_timeout))
        .layer(TimeoutLayer::new(write_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}
