//! Document-graph storage seam
//!
//! A [`GraphStore`] is a handle on one graph inside one database. The session
//! talks to the backend only through this trait, so tests run against
//! [`InMemoryGraphStore`] and the binary runs against ArangoDB.

mod memory;

pub use memory::InMemoryGraphStore;

use crate::components::Document;
use crate::errors::GraphSessionResult;
use crate::value_objects::{CollectionRef, DocumentMeta, GraphDefinition};
use async_trait::async_trait;

/// Storage operations the graph session relies on
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Database the graph lives in
    fn database(&self) -> &str;

    /// Graph this handle writes into
    fn graph(&self) -> &GraphDefinition;

    /// Persist one document and return the metadata the store assigned
    async fn create_document(
        &self,
        collection: &CollectionRef,
        document: Document,
    ) -> GraphSessionResult<DocumentMeta>;

    /// Fetch one document by key, system attributes included
    async fn read_document(
        &self,
        collection: &CollectionRef,
        key: &str,
    ) -> GraphSessionResult<Document>;

    /// Check whether a document exists
    async fn document_exists(
        &self,
        collection: &CollectionRef,
        key: &str,
    ) -> GraphSessionResult<bool> {
        match self.read_document(collection, key).await {
            Ok(_) => Ok(true),
            Err(error) if error.is_not_found() => Ok(false),
            Err(error) => Err(error),
        }
    }

    /// Backend-specific shutdown before the handle goes away.
    ///
    /// The connection itself is released when the store is dropped;
    /// [`GraphSession::close`](crate::session::GraphSession::close) calls this
    /// and then drops the store.
    async fn close(&self) {}
}
