//! In-memory graph store

use super::GraphStore;
use crate::components::edge::{FROM_ATTRIBUTE, TO_ATTRIBUTE};
use crate::components::Document;
use crate::errors::{GraphSessionError, GraphSessionResult};
use crate::value_objects::{CollectionRef, CollectionRole, DocumentMeta, GraphDefinition};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Graph store that keeps documents in process memory.
///
/// Behaves like the real backend for the operations the session uses: numeric
/// keys, revision tokens, unique keys per collection and referential checks on
/// edge endpoints.
pub struct InMemoryGraphStore {
    database: String,
    graph: GraphDefinition,
    collections: Mutex<HashMap<String, BTreeMap<String, Document>>>,
    next_key: AtomicU64,
    offline: AtomicBool,
    latency: Option<Duration>,
}

impl InMemoryGraphStore {
    /// Provision an empty graph: one collection per name in the edge definition
    pub fn new(database: impl Into<String>, graph: GraphDefinition) -> Self {
        let mut collections = HashMap::new();
        for name in graph.vertex_collections() {
            collections.insert(name.to_string(), BTreeMap::new());
        }
        collections.insert(graph.edge_definition.collection.clone(), BTreeMap::new());

        Self {
            database: database.into(),
            graph,
            collections: Mutex::new(collections),
            next_key: AtomicU64::new(1),
            offline: AtomicBool::new(false),
            latency: None,
        }
    }

    /// Delay every operation, to exercise deadlines and cancellation
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every subsequent operation fail as if the server went away
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of documents stored in a collection
    pub fn document_count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .get(collection)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }

    async fn reach(&self, operation: &'static str) -> GraphSessionResult<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(GraphSessionError::unavailable(operation, "store is offline"));
        }
        Ok(())
    }

    fn check_role(&self, collection: &CollectionRef) -> GraphSessionResult<()> {
        match self.graph.collection_ref(&collection.name) {
            Some(known) if known.role.is_vertex() == collection.role.is_vertex() => Ok(()),
            Some(known) => Err(GraphSessionError::validation(
                "create document",
                format!(
                    "collection '{}' is a {} collection, not {}",
                    collection.name, known.role, collection.role
                ),
            )),
            None => Err(GraphSessionError::validation(
                "create document",
                format!(
                    "collection '{}' is not part of graph '{}'",
                    collection.name, self.graph.name
                ),
            )),
        }
    }

    fn endpoint_exists(
        collections: &HashMap<String, BTreeMap<String, Document>>,
        identity: &str,
        expected_collection: &str,
    ) -> bool {
        match identity.split_once('/') {
            Some((collection, key)) if collection == expected_collection => collections
                .get(collection)
                .is_some_and(|documents| documents.contains_key(key)),
            _ => false,
        }
    }

    fn check_endpoints(
        &self,
        collections: &HashMap<String, BTreeMap<String, Document>>,
        document: &Document,
    ) -> GraphSessionResult<()> {
        let edges = &self.graph.edge_definition;
        for (attribute, expected) in [(FROM_ATTRIBUTE, &edges.from), (TO_ATTRIBUTE, &edges.to)] {
            let Some(Value::String(identity)) = document.get(attribute) else {
                return Err(GraphSessionError::validation(
                    "create edge",
                    format!("edge document needs a string '{attribute}'"),
                ));
            };
            if !Self::endpoint_exists(collections, identity, expected) {
                return Err(GraphSessionError::validation(
                    "create edge",
                    format!("referenced document '{identity}' does not exist"),
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    fn database(&self) -> &str {
        &self.database
    }

    fn graph(&self) -> &GraphDefinition {
        &self.graph
    }

    async fn create_document(
        &self,
        collection: &CollectionRef,
        mut document: Document,
    ) -> GraphSessionResult<DocumentMeta> {
        self.reach("create document").await?;
        self.check_role(collection)?;

        let mut collections = self.collections.lock();
        if collection.role == CollectionRole::Edge {
            self.check_endpoints(&collections, &document)?;
        }

        let key = match document.get("_key") {
            Some(Value::String(key)) if !key.is_empty() && !key.contains('/') => key.clone(),
            Some(_) => {
                return Err(GraphSessionError::validation(
                    "create document",
                    "illegal document key",
                ))
            }
            None => self.next_key.fetch_add(1, Ordering::SeqCst).to_string(),
        };

        let documents = collections
            .get_mut(&collection.name)
            .ok_or_else(|| GraphSessionError::not_found(&collection.name, &key))?;
        if documents.contains_key(&key) {
            return Err(GraphSessionError::validation(
                "create document",
                format!("unique constraint violated for key '{key}'"),
            ));
        }

        let meta = DocumentMeta {
            id: format!("{}/{}", collection.name, key),
            key: key.clone(),
            rev: format!("_{}", &uuid::Uuid::new_v4().simple().to_string()[..10]),
        };
        document.insert("_id".to_string(), Value::String(meta.id.clone()));
        document.insert("_key".to_string(), Value::String(meta.key.clone()));
        document.insert("_rev".to_string(), Value::String(meta.rev.clone()));
        documents.insert(key, document);

        tracing::debug!("Stored {} in memory", meta.id);
        Ok(meta)
    }

    async fn read_document(
        &self,
        collection: &CollectionRef,
        key: &str,
    ) -> GraphSessionResult<Document> {
        self.reach("read document").await?;
        let collections = self.collections.lock();
        collections
            .get(&collection.name)
            .and_then(|documents| documents.get(key))
            .cloned()
            .ok_or_else(|| {
                GraphSessionError::not_found(&collection.name, format!("{}/{}", collection.name, key))
            })
    }
}
