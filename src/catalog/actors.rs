use sea_orm::{DbErr, SqlErr, TransactionTrait};
use tracing::debug;

use super::CatalogService;
use crate::{
    error::{CatalogError, CatalogResult},
    models::{Actor, ActorInput, Movie},
    store::{ActorStore, MovieStore},
};

impl CatalogService {
    pub async fn create_actor(&self, input: ActorInput) -> CatalogResult<Actor> {
        input.validate()?;
        let actor = ActorStore::new(&self.db).insert(&input).await?;
        debug!(actor_id = actor.id, "created actor");
        Ok(actor)
    }

    pub async fn get_actor(&self, id: i32) -> CatalogResult<Actor> {
        ActorStore::new(&self.db).get(id).await?.ok_or_else(|| CatalogError::actor_not_found(id))
    }

    pub async fn list_actors(&self) -> CatalogResult<Vec<Actor>> {
        Ok(ActorStore::new(&self.db).list_all().await?)
    }

    /// Movies whose cast includes the actor.
    pub async fn actor_movies(&self, id: i32) -> CatalogResult<Vec<Movie>> {
        let txn = self.db.begin().await?;
        if !ActorStore::new(&txn).exists(id).await? {
            return Err(CatalogError::actor_not_found(id));
        }
        let movies = MovieStore::new(&txn).referencing_actor(id).await?;
        txn.commit().await?;
        Ok(movies)
    }

    pub async fn update_actor(&self, id: i32, input: ActorInput) -> CatalogResult<Actor> {
        input.validate()?;

        let txn = self.db.begin().await?;
        let actors = ActorStore::new(&txn);

        if !actors.exists(id).await? {
            return Err(CatalogError::actor_not_found(id));
        }

        let actor = Actor { id, name: input.name, birthdate: input.birthdate };
        actors.replace(&actor).await?;
        txn.commit().await?;

        debug!(actor_id = id, "updated actor");
        Ok(actor)
    }

    /// Refuses while any movie's cast still references the actor.
    pub async fn delete_actor(&self, id: i32) -> CatalogResult<()> {
        let txn = self.db.begin().await?;
        let actors = ActorStore::new(&txn);

        if !actors.exists(id).await? {
            return Err(CatalogError::actor_not_found(id));
        }

        if MovieStore::new(&txn).count_referencing_actor(id).await? > 0 {
            return Err(actor_in_use());
        }

        actors.delete(id).await.map_err(delete_failed)?;
        txn.commit().await?;

        debug!(actor_id = id, "deleted actor");
        Ok(())
    }
}

fn actor_in_use() -> CatalogError {
    CatalogError::Conflict("cannot delete actor associated with movies".to_string())
}

/// The `movie_cast` foreign key catches a cast written after the guard ran.
fn delete_failed(err: DbErr) -> CatalogError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => actor_in_use(),
        _ => CatalogError::from(err),
    }
}
