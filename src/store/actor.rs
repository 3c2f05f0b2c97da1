use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::BIND_CHUNK;
use crate::{
    entities::actor,
    models::{Actor, ActorInput},
};

pub struct ActorStore<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ActorStore<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<Actor>, DbErr> {
        actor::Entity::find_by_id(id).one(self.conn).await?.map(to_actor).transpose()
    }

    pub async fn exists(&self, id: i32) -> Result<bool, DbErr> {
        Ok(actor::Entity::find_by_id(id).count(self.conn).await? > 0)
    }

    pub async fn list_all(&self) -> Result<Vec<Actor>, DbErr> {
        actor::Entity::find()
            .order_by_asc(actor::Column::Id)
            .all(self.conn)
            .await?
            .into_iter()
            .map(to_actor)
            .collect()
    }

    /// Actors whose id is in `ids`. Unknown ids are simply absent from the
    /// result and duplicates collapse to a single row.
    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<Actor>, DbErr> {
        let mut actors = Vec::new();
        for chunk in ids.chunks(BIND_CHUNK) {
            let rows = actor::Entity::find()
                .filter(actor::Column::Id.is_in(chunk.iter().copied()))
                .all(self.conn)
                .await?;
            for row in rows {
                actors.push(to_actor(row)?);
            }
        }
        actors.sort_by_key(|a| a.id);
        actors.dedup_by_key(|a| a.id);
        Ok(actors)
    }

    /// Inserts a new row and returns it with its store-assigned id.
    pub async fn insert(&self, input: &ActorInput) -> Result<Actor, DbErr> {
        let model = actor::ActiveModel {
            id: NotSet,
            name: Set(input.name.clone()),
            birthdate: Set(input.birthdate.map(|d| d.to_string())),
        };
        to_actor(model.insert(self.conn).await?)
    }

    pub async fn replace(&self, actor: &Actor) -> Result<(), DbErr> {
        let model = actor::ActiveModel {
            id: Set(actor.id),
            name: Set(actor.name.clone()),
            birthdate: Set(actor.birthdate.map(|d| d.to_string())),
        };
        model.update(self.conn).await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<bool, DbErr> {
        let res = actor::Entity::delete_by_id(id).exec(self.conn).await?;
        Ok(res.rows_affected > 0)
    }
}

fn to_actor(row: actor::Model) -> Result<Actor, DbErr> {
    let birthdate = row
        .birthdate
        .as_deref()
        .map(str::parse::<jiff::civil::Date>)
        .transpose()
        .map_err(|e: jiff::Error| {
            DbErr::Type(format!("actor {} has invalid birthdate: {e}", row.id))
        })?;
    Ok(Actor { id: row.id, name: row.name, birthdate })
}
