//! Movie and actor operations with the rules that keep casts consistent.
//!
//! Every write runs inside one store transaction: existence checks, cast
//! resolution and persistence commit together or not at all. Dropping an
//! uncommitted `DatabaseTransaction` rolls it back, so any early `?` return
//! leaves the store untouched.

mod actors;
mod movies;

use std::collections::{BTreeSet, HashSet};

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};

use crate::{
    error::{CatalogError, CatalogResult},
    models::Actor,
    store::ActorStore,
};

#[derive(Clone)]
pub struct CatalogService {
    db: DatabaseConnection,
}

impl CatalogService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn ping(&self) -> Result<(), DbErr> {
        self.db.ping().await
    }
}

/// Resolves requested actor ids to actors, all or nothing.
///
/// The request is rejected unless the store returns exactly as many actors as
/// ids were asked for. Ids are not deduplicated first, so a repeated id also
/// fails the check.
pub(crate) async fn resolve_cast<C: ConnectionTrait>(
    conn: &C,
    ids: &[i32],
) -> CatalogResult<Vec<Actor>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let actors = ActorStore::new(conn).find_by_ids(ids).await?;
    if actors.len() != ids.len() {
        let found: HashSet<i32> = actors.iter().map(|a| a.id).collect();
        let missing: BTreeSet<i32> =
            ids.iter().copied().filter(|id| !found.contains(id)).collect();
        return Err(CatalogError::InvalidReference { missing: missing.into_iter().collect() });
    }

    Ok(actors)
}
