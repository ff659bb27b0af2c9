//! Graph value objects
//!
//! Value objects are immutable types that describe the shape of a stored graph:
//! document identities, collection references and the edge definition that ties
//! vertex collections together. They are compared by value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker for identities of vertex documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vertex {}

/// Marker for identities of edge documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {}

/// Opaque document handle assigned by the storage layer, `<collection>/<key>`.
///
/// The kind parameter keeps vertex and edge identities apart, so an edge's own
/// identity cannot be passed where an edge endpoint is expected.
pub struct Identity<K> {
    id: String,
    _kind: PhantomData<fn() -> K>,
}

impl<K> Identity<K> {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            _kind: PhantomData,
        }
    }

    /// Wrap a token that did not come from a create call in this process.
    ///
    /// Nothing about the token is checked here; operations that consume it
    /// resolve it against the store first.
    pub fn unverified(raw: impl Into<String>) -> Self {
        Self::new(raw)
    }

    /// The full token as stored
    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// Collection part of the token, if the token has one
    pub fn collection(&self) -> Option<&str> {
        self.split().map(|(collection, _)| collection)
    }

    /// Key part of the token, if the token has one
    pub fn key(&self) -> Option<&str> {
        self.split().map(|(_, key)| key)
    }

    fn split(&self) -> Option<(&str, &str)> {
        self.id
            .split_once('/')
            .filter(|(collection, key)| !collection.is_empty() && !key.is_empty())
    }
}

impl<K> Clone for Identity<K> {
    fn clone(&self) -> Self {
        Self::new(self.id.clone())
    }
}

impl<K> PartialEq for Identity<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<K> Eq for Identity<K> {}

impl<K> Hash for Identity<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<K> fmt::Debug for Identity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Identity").field(&self.id).finish()
    }
}

impl<K> fmt::Display for Identity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Storage-assigned metadata returned by a successful create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Full identity, `<collection>/<key>`
    #[serde(rename = "_id")]
    pub id: String,
    /// Key within the collection
    #[serde(rename = "_key")]
    pub key: String,
    /// Revision token
    #[serde(rename = "_rev")]
    pub rev: String,
}

impl DocumentMeta {
    /// Attribute names the storage layer adds to every stored document
    pub const SYSTEM_ATTRIBUTES: [&'static str; 3] = ["_id", "_key", "_rev"];
}

/// Role a collection plays in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionRole {
    /// Vertex collection edges start from
    VertexSource,
    /// Vertex collection edges point to
    VertexTarget,
    /// Edge collection
    Edge,
}

impl CollectionRole {
    /// Whether documents in this collection are vertices
    pub fn is_vertex(&self) -> bool {
        !matches!(self, CollectionRole::Edge)
    }
}

impl fmt::Display for CollectionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CollectionRole::VertexSource => "vertex-source",
            CollectionRole::VertexTarget => "vertex-target",
            CollectionRole::Edge => "edge",
        };
        f.write_str(label)
    }
}

/// A collection name paired with its role
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionRef {
    pub name: String,
    pub role: CollectionRole,
}

impl CollectionRef {
    pub fn new(name: impl Into<String>, role: CollectionRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.role)
    }
}

/// One edge collection joining exactly one source and one target vertex collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDefinition {
    /// Edge collection name
    pub collection: String,
    /// Source vertex collection
    pub from: String,
    /// Target vertex collection
    pub to: String,
}

impl EdgeDefinition {
    pub fn new(
        collection: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn edge_ref(&self) -> CollectionRef {
        CollectionRef::new(self.collection.clone(), CollectionRole::Edge)
    }

    pub fn source_ref(&self) -> CollectionRef {
        CollectionRef::new(self.from.clone(), CollectionRole::VertexSource)
    }

    pub fn target_ref(&self) -> CollectionRef {
        CollectionRef::new(self.to.clone(), CollectionRole::VertexTarget)
    }
}

/// A named graph with its single edge definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDefinition {
    pub name: String,
    pub edge_definition: EdgeDefinition,
}

impl GraphDefinition {
    pub fn new(name: impl Into<String>, edge_definition: EdgeDefinition) -> Self {
        Self {
            name: name.into(),
            edge_definition,
        }
    }

    /// Resolve a collection name to its role in this graph.
    ///
    /// A collection that is both source and target resolves as the source.
    pub fn collection_ref(&self, name: &str) -> Option<CollectionRef> {
        let edges = &self.edge_definition;
        if name == edges.from {
            Some(edges.source_ref())
        } else if name == edges.to {
            Some(edges.target_ref())
        } else if name == edges.collection {
            Some(edges.edge_ref())
        } else {
            None
        }
    }

    /// Vertex collection names, source first, without duplicates
    pub fn vertex_collections(&self) -> Vec<&str> {
        let edges = &self.edge_definition;
        if edges.from == edges.to {
            vec![edges.from.as_str()]
        } else {
            vec![edges.from.as_str(), edges.to.as_str()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test Coverage
    ///
    /// ```mermaid
    /// graph TD
    ///     VO[Value Objects] --> ID[Identity]
    ///     VO --> CR[CollectionRef]
    ///     VO --> GD[GraphDefinition]
    ///     VO --> DM[DocumentMeta]
    /// ```

    fn movie_graph() -> GraphDefinition {
        GraphDefinition::new("myGraph", EdgeDefinition::new("moviegraph", "movies", "cast"))
    }

    #[test]
    fn test_identity_parts() {
        let identity: Identity<Vertex> = Identity::new("movies/12345");
        assert_eq!(identity.collection(), Some("movies"));
        assert_eq!(identity.key(), Some("12345"));
        assert_eq!(identity.to_string(), "movies/12345");
    }

    #[test]
    fn test_identity_without_collection() {
        let identity: Identity<Vertex> = Identity::unverified("nonexistent-id");
        assert_eq!(identity.collection(), None);
        assert_eq!(identity.key(), None);

        let identity: Identity<Vertex> = Identity::unverified("movies/");
        assert_eq!(identity.collection(), None);
    }

    #[test]
    fn test_identity_equality_is_by_token() {
        let a: Identity<Edge> = Identity::new("moviegraph/1");
        let b: Identity<Edge> = Identity::new("moviegraph/1");
        let c: Identity<Edge> = Identity::new("moviegraph/2");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_collection_roles() {
        let graph = movie_graph();
        assert_eq!(
            graph.collection_ref("movies").map(|c| c.role),
            Some(CollectionRole::VertexSource)
        );
        assert_eq!(
            graph.collection_ref("cast").map(|c| c.role),
            Some(CollectionRole::VertexTarget)
        );
        assert_eq!(
            graph.collection_ref("moviegraph").map(|c| c.role),
            Some(CollectionRole::Edge)
        );
        assert!(graph.collection_ref("books").is_none());
        assert!(!CollectionRole::Edge.is_vertex());
        assert!(CollectionRole::VertexTarget.is_vertex());
    }

    #[test]
    fn test_vertex_collections() {
        assert_eq!(movie_graph().vertex_collections(), vec!["movies", "cast"]);

        let self_loop =
            GraphDefinition::new("people", EdgeDefinition::new("knows", "person", "person"));
        assert_eq!(self_loop.vertex_collections(), vec!["person"]);
    }

    #[test]
    fn test_document_meta_from_storage_attributes() {
        let meta: DocumentMeta =
            serde_json::from_str(r#"{"_id":"cast/7","_key":"7","_rev":"_hV2oH--_"}"#).unwrap();
        assert_eq!(meta.id, "cast/7");
        assert_eq!(meta.key, "7");
        assert_eq!(meta.rev, "_hV2oH--_");
    }
}
