pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::{Router, http::StatusCode, routing::get};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{catalog::CatalogService, config::Config, error::AppError};

pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: CatalogService,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/movies", get(routes::list_movies).post(routes::create_movie))
        .route("/movies/search", get(routes::search_movies))
        .route(
            "/movies/{id}",
            get(routes::get_movie).put(routes::update_movie).delete(routes::delete_movie),
        )
        .route("/actors", get(routes::list_actors).post(routes::create_actor))
        .route(
            "/actors/{id}",
            get(routes::get_actor).put(routes::update_actor).delete(routes::delete_actor),
        )
        .route("/actors/{id}/movies", get(routes::actor_movies))
        .fallback(|| async { AppError::new(StatusCode::NOT_FOUND, "route not found") })
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any)),
        )
}
