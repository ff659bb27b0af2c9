//! Typed graph-document session
//!
//! Maps strongly-typed vertex and edge records onto the collections of a named
//! graph. Vertices are created first; the identities the store hands back are
//! what edges are built from. ArangoDB is the production backend, an in-memory
//! store backs the tests.

pub mod components;
pub mod config;
pub mod demo;
pub mod errors;
pub mod infrastructure;
pub mod session;
pub mod store;
pub mod value_objects;

// Re-export main types
pub use errors::{GraphSessionError, GraphSessionResult};
pub use session::{Created, GraphSession};

// Re-export record types
pub use components::{Cast, CastType, Document, EdgeRecord, Production};

// Re-export storage seam and implementations
pub use infrastructure::{ArangoConnection, ArangoDatabase, ArangoGraphStore};
pub use store::{GraphStore, InMemoryGraphStore};

// Re-export configuration
pub use config::{ConnectionConfig, Credentials, TransportOptions};

// Re-export value objects
pub use value_objects::{
    CollectionRef, CollectionRole, DocumentMeta, Edge, EdgeDefinition, GraphDefinition, Identity,
    Vertex,
};
