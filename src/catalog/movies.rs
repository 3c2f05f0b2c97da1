use sea_orm::{DbErr, SqlErr, TransactionTrait};
use tracing::debug;

use super::{CatalogService, resolve_cast};
use crate::{
    error::{CatalogError, CatalogResult},
    models::{Actor, Movie, MovieListing, MovieQuery, MovieUpdate, NewMovie, Page, PageParams},
    store::MovieStore,
};

impl CatalogService {
    pub async fn create_movie(&self, input: NewMovie) -> CatalogResult<Movie> {
        input.validate()?;
        let (id, data) = input.into_parts();

        let txn = self.db.begin().await?;
        let movies = MovieStore::new(&txn);

        if movies.exists(&id).await? {
            return Err(duplicate_movie(&id));
        }

        let cast = resolve_cast(&txn, &data.cast).await?;
        let movie = assemble(id, data, cast);

        movies.insert(&movie).await.map_err(|e| insert_failed(e, &movie.id))?;
        txn.commit().await?;

        debug!(movie_id = %movie.id, cast = movie.cast.len(), "created movie");
        Ok(movie)
    }

    pub async fn get_movie(&self, id: &str) -> CatalogResult<Movie> {
        MovieStore::new(&self.db).get(id).await?.ok_or_else(|| CatalogError::movie_not_found(id))
    }

    /// Replaces every mutable field. The id never changes.
    pub async fn update_movie(&self, id: &str, input: MovieUpdate) -> CatalogResult<Movie> {
        input.validate()?;

        let txn = self.db.begin().await?;
        let movies = MovieStore::new(&txn);

        if !movies.exists(id).await? {
            return Err(CatalogError::movie_not_found(id));
        }

        let cast = resolve_cast(&txn, &input.cast).await?;
        let movie = assemble(id.to_string(), input, cast);

        movies.replace(&movie).await?;
        txn.commit().await?;

        debug!(movie_id = %movie.id, cast = movie.cast.len(), "updated movie");
        Ok(movie)
    }

    pub async fn delete_movie(&self, id: &str) -> CatalogResult<()> {
        let txn = self.db.begin().await?;

        if !MovieStore::new(&txn).delete(id).await? {
            return Err(CatalogError::movie_not_found(id));
        }
        txn.commit().await?;

        debug!(movie_id = %id, "deleted movie");
        Ok(())
    }

    /// Every movie when neither `page` nor `size` is given, otherwise one
    /// 1-based page with `size` clamped to [`crate::models::MAX_PAGE_SIZE`].
    pub async fn list_movies(&self, params: &PageParams) -> CatalogResult<MovieListing> {
        let Some(request) = params.resolve()? else {
            return Ok(MovieListing::All(MovieStore::new(&self.db).list_all().await?));
        };

        // count and page share one snapshot
        let txn = self.db.begin().await?;
        let movies = MovieStore::new(&txn);
        let total = movies.count().await?;
        let items = match request.offset() {
            Some(offset) => movies.page(offset, request.size).await?,
            None => Vec::new(),
        };
        txn.commit().await?;

        Ok(MovieListing::Paged(Page::new(items, request, total)))
    }

    pub async fn search_movies(&self, query: &MovieQuery) -> CatalogResult<Vec<Movie>> {
        let movies = MovieStore::new(&self.db);
        if query.is_unfiltered() {
            return Ok(movies.list_all().await?);
        }
        Ok(movies.find(query).await?)
    }
}

fn assemble(id: String, data: MovieUpdate, cast: Vec<Actor>) -> Movie {
    Movie {
        id,
        title: data.title,
        release_year: data.release_year,
        description: data.description,
        pictures: data.pictures,
        cast,
    }
}

fn duplicate_movie(id: &str) -> CatalogError {
    CatalogError::Conflict(format!("movie with id {id} already exists"))
}

/// A unique violation here means a concurrent create won the race for `id`.
fn insert_failed(err: DbErr, id: &str) -> CatalogError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => duplicate_movie(id),
        _ => CatalogError::from(err),
    }
}
