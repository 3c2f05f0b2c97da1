use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{
        Actor, ActorInput, Movie, MovieListing, MovieQuery, MovieUpdate, NewMovie, PageParams,
    },
};

type JsonBody<T> = Result<Json<T>, JsonRejection>;

pub async fn health(State(state): State<Arc<AppState>>) -> AppResult<Json<serde_json::Value>> {
    state.catalog.ping().await.map_err(|e| AppError::from(anyhow::Error::new(e)))?;
    Ok(Json(json!({ "status": "ok" })))
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> AppResult<Json<MovieListing>> {
    let Query(params) = query?;
    Ok(Json(state.catalog.list_movies(&params).await?))
}

pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MovieQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Movie>>> {
    let Query(query) = query?;
    Ok(Json(state.catalog.search_movies(&query).await?))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Json<Movie>> {
    let Path(id) = path?;
    Ok(Json(state.catalog.get_movie(&id).await?))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    body: JsonBody<NewMovie>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = body?;
    let movie = state.catalog.create_movie(input).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    body: JsonBody<MovieUpdate>,
) -> AppResult<Json<Movie>> {
    let Path(id) = path?;
    let Json(input) = body?;
    Ok(Json(state.catalog.update_movie(&id, input).await?))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = path?;
    state.catalog.delete_movie(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_actors(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Actor>>> {
    Ok(Json(state.catalog.list_actors().await?))
}

pub async fn get_actor(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<Actor>> {
    let Path(id) = path?;
    Ok(Json(state.catalog.get_actor(id).await?))
}

pub async fn actor_movies(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<Vec<Movie>>> {
    let Path(id) = path?;
    Ok(Json(state.catalog.actor_movies(id).await?))
}

pub async fn create_actor(
    State(state): State<Arc<AppState>>,
    body: JsonBody<ActorInput>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = body?;
    let actor = state.catalog.create_actor(input).await?;
    Ok((StatusCode::CREATED, Json(actor)))
}

pub async fn update_actor(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
    body: JsonBody<ActorInput>,
) -> AppResult<Json<Actor>> {
    let Path(id) = path?;
    let Json(input) = body?;
    Ok(Json(state.catalog.update_actor(id, input).await?))
}

pub async fn delete_actor(
    State(state): State<Arc<AppState>>,
    path: Result<Path<i32>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = path?;
    state.catalog.delete_actor(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
