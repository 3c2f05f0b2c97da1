//! Record store for movies and actors.
//!
//! Each store borrows any [`sea_orm::ConnectionTrait`], so the same calls run
//! against the pool or inside an open `DatabaseTransaction`. Transaction
//! boundaries belong to the caller.

mod actor;
mod movie;

pub use actor::ActorStore;
pub use movie::MovieStore;

/// Upper bound on ids bound into a single `IN (...)` list, well under
/// SQLite's host parameter limit.
const BIND_CHUNK: usize = 500;
