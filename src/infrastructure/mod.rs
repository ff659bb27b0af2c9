//! Infrastructure layer implementations
//!
//! Concrete [`GraphStore`](crate::store::GraphStore) implementations that bridge
//! the session with external database servers.

mod arango;

pub use arango::{provision, ArangoConnection, ArangoDatabase, ArangoGraphStore};
