//! Typed graph session
//!
//! A [`GraphSession`] owns one [`GraphStore`] handle and maps caller-defined
//! records onto the graph's collections. Vertices are created first; the
//! identities they return are the only way to build an edge, and both endpoints
//! are resolved against the store before the edge is written.
//!
//! Every operation races the session's cancellation token and, when set, a
//! per-operation deadline. Losing that race surfaces
//! [`GraphSessionError::Cancelled`]. A create that the server completed before
//! the cancellation landed is not rolled back; read it back if it matters.

use crate::components::{from_document, to_document, EdgeRecord};
use crate::errors::{GraphSessionError, GraphSessionResult};
use crate::store::GraphStore;
use crate::value_objects::{CollectionRef, Edge, GraphDefinition, Identity, Vertex};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// A freshly stored record and the identity the store gave it
#[derive(Debug, Clone)]
pub struct Created<K, T> {
    pub identity: Identity<K>,
    /// Revision token assigned by the store
    pub revision: String,
    /// The record exactly as it was handed in
    pub record: T,
}

/// Typed create/read access to one graph
pub struct GraphSession<S: GraphStore> {
    store: S,
    cancel: CancellationToken,
    deadline: Option<Duration>,
}

impl<S: GraphStore> GraphSession<S> {
    /// Wrap a provisioned store
    pub fn new(store: S) -> Self {
        Self {
            store,
            cancel: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Abort in-flight and future operations when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Abort any single operation that takes longer than `deadline`
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Token that cancels this session's operations
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn database(&self) -> &str {
        self.store.database()
    }

    pub fn graph(&self) -> &GraphDefinition {
        self.store.graph()
    }

    /// Store `record` as a new vertex in `collection`
    pub async fn create_vertex<T: Serialize>(
        &self,
        collection: &str,
        record: T,
    ) -> GraphSessionResult<Created<Vertex, T>> {
        let operation = "create vertex";
        let target = self.vertex_collection(operation, collection)?;
        let document = to_document(operation, &record)?;

        let meta = self
            .guarded(operation, self.store.create_document(&target, document))
            .await?;
        info!(
            "Created vertex {} in collection '{}' of database '{}'",
            meta.id,
            collection,
            self.database()
        );

        Ok(Created {
            identity: Identity::new(meta.id),
            revision: meta.rev,
            record,
        })
    }

    /// Read a vertex back as `T`, without the store's system attributes
    pub async fn read_vertex<T: DeserializeOwned>(
        &self,
        collection: &str,
        identity: &Identity<Vertex>,
    ) -> GraphSessionResult<T> {
        let operation = "read vertex";
        let source = self.vertex_collection(operation, collection)?;
        let key = match (identity.collection(), identity.key()) {
            (Some(owner), Some(key)) if owner == collection => key,
            _ => return Err(GraphSessionError::not_found(collection, identity.as_str())),
        };

        let document = self
            .guarded(operation, self.store.read_document(&source, key))
            .await?;
        debug!("Read vertex {}", identity);
        from_document(operation, document)
    }

    /// Link two existing vertices through `edge_collection`.
    ///
    /// `from` must live in the edge definition's source collection and `to` in
    /// its target collection.
    pub async fn create_edge<P: Serialize>(
        &self,
        edge_collection: &str,
        from: &Identity<Vertex>,
        to: &Identity<Vertex>,
        payload: P,
    ) -> GraphSessionResult<Created<Edge, EdgeRecord<P>>> {
        let operation = "create edge";
        let edges = &self.graph().edge_definition;
        if edge_collection != edges.collection {
            return Err(GraphSessionError::validation(
                operation,
                format!(
                    "'{}' is not the edge collection of graph '{}'",
                    edge_collection,
                    self.graph().name
                ),
            ));
        }

        self.resolve_endpoint(from, &edges.from).await?;
        self.resolve_endpoint(to, &edges.to).await?;

        let record = EdgeRecord::new(from.clone(), to.clone(), payload);
        let document = record.to_document()?;
        let meta = self
            .guarded(
                operation,
                self.store.create_document(&edges.edge_ref(), document),
            )
            .await?;
        info!("Created edge {}: {} -> {}", meta.id, from, to);

        Ok(Created {
            identity: Identity::new(meta.id),
            revision: meta.rev,
            record,
        })
    }

    /// Shut the store down and drop it, releasing its connection
    pub async fn close(self) {
        self.store.close().await;
        debug!("Graph session on '{}' closed", self.store.database());
    }

    fn vertex_collection(
        &self,
        operation: &'static str,
        name: &str,
    ) -> GraphSessionResult<CollectionRef> {
        if name.trim().is_empty() {
            return Err(GraphSessionError::validation(
                operation,
                "collection name cannot be empty",
            ));
        }
        match self.graph().collection_ref(name) {
            Some(collection) if collection.role.is_vertex() => Ok(collection),
            Some(_) => Err(GraphSessionError::validation(
                operation,
                format!("'{name}' is an edge collection"),
            )),
            None => Err(GraphSessionError::validation(
                operation,
                format!(
                    "'{}' is not a vertex collection of graph '{}'",
                    name,
                    self.graph().name
                ),
            )),
        }
    }

    /// An endpoint must name a stored vertex, and that vertex must sit in the
    /// collection the edge definition expects at this end.
    async fn resolve_endpoint(
        &self,
        endpoint: &Identity<Vertex>,
        expected_collection: &str,
    ) -> GraphSessionResult<()> {
        let dangling = || GraphSessionError::DanglingReference {
            identity: endpoint.as_str().to_string(),
        };

        let (Some(collection), Some(key)) = (endpoint.collection(), endpoint.key()) else {
            return Err(dangling());
        };
        let vertices = match self.graph().collection_ref(collection) {
            Some(vertices) if vertices.role.is_vertex() => vertices,
            _ => return Err(dangling()),
        };

        let exists = self
            .guarded("create edge", self.store.document_exists(&vertices, key))
            .await?;
        if !exists {
            return Err(dangling());
        }

        if collection != expected_collection {
            return Err(GraphSessionError::validation(
                "create edge",
                format!(
                    "endpoint '{}' must be in collection '{}'",
                    endpoint, expected_collection
                ),
            ));
        }
        Ok(())
    }

    async fn guarded<T, F>(&self, operation: &'static str, call: F) -> GraphSessionResult<T>
    where
        F: Future<Output = GraphSessionResult<T>>,
    {
        if self.cancel.is_cancelled() {
            warn!("{} skipped: session cancelled", operation);
            return Err(GraphSessionError::Cancelled { operation });
        }

        let bounded = async {
            match self.deadline {
                Some(deadline) => match tokio::time::timeout(deadline, call).await {
                    Ok(result) => result,
                    Err(_) => {
                        warn!("{} exceeded its deadline of {:?}", operation, deadline);
                        Err(GraphSessionError::Cancelled { operation })
                    }
                },
                None => call.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                warn!("{} cancelled while in flight", operation);
                Err(GraphSessionError::Cancelled { operation })
            }
            result = bounded => result,
        }
    }
}
