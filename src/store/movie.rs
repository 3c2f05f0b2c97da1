use std::collections::{BTreeSet, HashMap};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
    sea_query::{Expr, Query},
};

use super::{ActorStore, BIND_CHUNK};
use crate::{
    entities::{movie, movie_cast, movie_picture},
    models::{Actor, Movie, MovieQuery},
};

pub struct MovieStore<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> MovieStore<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: &str) -> Result<Option<Movie>, DbErr> {
        let Some(row) = movie::Entity::find_by_id(id.to_string()).one(self.conn).await? else {
            return Ok(None);
        };
        Ok(self.hydrate(vec![row]).await?.pop())
    }

    pub async fn exists(&self, id: &str) -> Result<bool, DbErr> {
        Ok(movie::Entity::find_by_id(id.to_string()).count(self.conn).await? > 0)
    }

    pub async fn list_all(&self) -> Result<Vec<Movie>, DbErr> {
        let rows = movie::Entity::find().order_by_asc(movie::Column::Id).all(self.conn).await?;
        self.hydrate(rows).await
    }

    /// Title is a case-sensitive substring match; `instr` keeps `%` and `_`
    /// in the needle literal, unlike `LIKE`.
    pub async fn find(&self, query: &MovieQuery) -> Result<Vec<Movie>, DbErr> {
        let mut select = movie::Entity::find();
        if let Some(title) = &query.title {
            select =
                select.filter(Expr::cust_with_values("instr(\"title\", ?) > 0", [title.clone()]));
        }
        if let Some(year) = query.year {
            select = select.filter(movie::Column::ReleaseYear.eq(year));
        }
        let rows = select.order_by_asc(movie::Column::Id).all(self.conn).await?;
        self.hydrate(rows).await
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        movie::Entity::find().count(self.conn).await
    }

    pub async fn page(&self, offset: u64, limit: u64) -> Result<Vec<Movie>, DbErr> {
        let rows = movie::Entity::find()
            .order_by_asc(movie::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.conn)
            .await?;
        self.hydrate(rows).await
    }

    /// Movies whose cast contains `actor_id`.
    pub async fn referencing_actor(&self, actor_id: i32) -> Result<Vec<Movie>, DbErr> {
        let cast_of = Query::select()
            .column(movie_cast::Column::MovieId)
            .from(movie_cast::Entity)
            .and_where(movie_cast::Column::ActorId.eq(actor_id))
            .to_owned();
        let rows = movie::Entity::find()
            .filter(movie::Column::Id.in_subquery(cast_of))
            .order_by_asc(movie::Column::Id)
            .all(self.conn)
            .await?;
        self.hydrate(rows).await
    }

    pub async fn count_referencing_actor(&self, actor_id: i32) -> Result<u64, DbErr> {
        movie_cast::Entity::find()
            .filter(movie_cast::Column::ActorId.eq(actor_id))
            .count(self.conn)
            .await
    }

    pub async fn insert(&self, movie: &Movie) -> Result<(), DbErr> {
        movie::Entity::insert(to_row(movie)).exec_without_returning(self.conn).await?;
        self.write_children(movie).await
    }

    pub async fn replace(&self, movie: &Movie) -> Result<(), DbErr> {
        to_row(movie).update(self.conn).await?;
        self.clear_children(&movie.id).await?;
        self.write_children(movie).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, DbErr> {
        self.clear_children(id).await?;
        let res = movie::Entity::delete_by_id(id.to_string()).exec(self.conn).await?;
        Ok(res.rows_affected > 0)
    }

    async fn clear_children(&self, id: &str) -> Result<(), DbErr> {
        movie_picture::Entity::delete_many()
            .filter(movie_picture::Column::MovieId.eq(id))
            .exec(self.conn)
            .await?;
        movie_cast::Entity::delete_many()
            .filter(movie_cast::Column::MovieId.eq(id))
            .exec(self.conn)
            .await?;
        Ok(())
    }

    async fn write_children(&self, movie: &Movie) -> Result<(), DbErr> {
        if !movie.pictures.is_empty() {
            let pictures =
                movie.pictures.iter().enumerate().map(|(pos, url)| movie_picture::ActiveModel {
                    movie_id: Set(movie.id.clone()),
                    position: Set(pos as i32),
                    url: Set(url.clone()),
                });
            movie_picture::Entity::insert_many(pictures).exec_without_returning(self.conn).await?;
        }

        if !movie.cast.is_empty() {
            let cast = movie.cast.iter().map(|actor| movie_cast::ActiveModel {
                movie_id: Set(movie.id.clone()),
                actor_id: Set(actor.id),
            });
            movie_cast::Entity::insert_many(cast).exec_without_returning(self.conn).await?;
        }

        Ok(())
    }

    /// Attaches pictures and cast to bare movie rows, preserving row order.
    async fn hydrate(&self, rows: Vec<movie::Model>) -> Result<Vec<Movie>, DbErr> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();

        let mut pictures: HashMap<String, Vec<String>> = HashMap::new();
        let mut cast_rows = Vec::new();
        for chunk in ids.chunks(BIND_CHUNK) {
            let picture_rows = movie_picture::Entity::find()
                .filter(movie_picture::Column::MovieId.is_in(chunk.iter().cloned()))
                .order_by_asc(movie_picture::Column::MovieId)
                .order_by_asc(movie_picture::Column::Position)
                .all(self.conn)
                .await?;
            for row in picture_rows {
                pictures.entry(row.movie_id).or_default().push(row.url);
            }

            cast_rows.extend(
                movie_cast::Entity::find()
                    .filter(movie_cast::Column::MovieId.is_in(chunk.iter().cloned()))
                    .all(self.conn)
                    .await?,
            );
        }

        let actor_ids: Vec<i32> =
            cast_rows.iter().map(|c| c.actor_id).collect::<BTreeSet<_>>().into_iter().collect();
        let actors: HashMap<i32, Actor> = ActorStore::new(self.conn)
            .find_by_ids(&actor_ids)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();
        let mut cast: HashMap<String, Vec<Actor>> = HashMap::new();
        for row in cast_rows {
            if let Some(actor) = actors.get(&row.actor_id) {
                cast.entry(row.movie_id).or_default().push(actor.clone());
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let mut members = cast.remove(&row.id).unwrap_or_default();
                members.sort_by_key(|a| a.id);
                Movie {
                    pictures: pictures.remove(&row.id).unwrap_or_default(),
                    cast: members,
                    id: row.id,
                    title: row.title,
                    release_year: row.release_year,
                    description: row.description,
                }
            })
            .collect())
    }
}

fn to_row(movie: &Movie) -> movie::ActiveModel {
    movie::ActiveModel {
        id: Set(movie.id.clone()),
        title: Set(movie.title.clone()),
        release_year: Set(movie.release_year),
        description: Set(movie.description.clone()),
    }
}
