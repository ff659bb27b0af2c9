//! Edge documents

use super::{payload_document, Document};
use crate::errors::{GraphSessionError, GraphSessionResult};
use crate::value_objects::{Identity, Vertex};
use serde::Serialize;
use serde_json::Value;

/// Attribute holding the source vertex identity
pub const FROM_ATTRIBUTE: &str = "_from";
/// Attribute holding the target vertex identity
pub const TO_ATTRIBUTE: &str = "_to";

/// An edge between two vertices plus optional payload attributes
#[derive(Debug, Clone)]
pub struct EdgeRecord<P> {
    pub from: Identity<Vertex>,
    pub to: Identity<Vertex>,
    pub payload: P,
}

impl<P: Serialize> EdgeRecord<P> {
    pub fn new(from: Identity<Vertex>, to: Identity<Vertex>, payload: P) -> Self {
        Self { from, to, payload }
    }

    /// Build the stored document: payload attributes plus `_from`/`_to`
    pub fn to_document(&self) -> GraphSessionResult<Document> {
        let mut document = payload_document("create edge", &self.payload)?;
        for attribute in [FROM_ATTRIBUTE, TO_ATTRIBUTE] {
            if document.contains_key(attribute) {
                return Err(GraphSessionError::validation(
                    "create edge",
                    format!("payload must not set '{attribute}'"),
                ));
            }
        }
        document.insert(
            FROM_ATTRIBUTE.to_string(),
            Value::String(self.from.as_str().to_string()),
        );
        document.insert(
            TO_ATTRIBUTE.to_string(),
            Value::String(self.to.as_str().to_string()),
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_edge_document_carries_endpoints_and_payload() {
        let edge = EdgeRecord::new(
            Identity::new("movies/1"),
            Identity::new("cast/2"),
            json!({"role": "Colonel Kurtz"}),
        );
        let document = edge.to_document().unwrap();

        assert_eq!(
            Value::Object(document),
            json!({"_from": "movies/1", "_to": "cast/2", "role": "Colonel Kurtz"})
        );
    }

    #[test]
    fn test_unit_payload_has_only_endpoints() {
        let edge = EdgeRecord::new(Identity::new("movies/1"), Identity::new("cast/2"), ());
        assert_eq!(
            Value::Object(edge.to_document().unwrap()),
            json!({"_from": "movies/1", "_to": "cast/2"})
        );
    }

    #[test]
    fn test_payload_cannot_override_endpoints() {
        let edge = EdgeRecord::new(
            Identity::new("movies/1"),
            Identity::new("cast/2"),
            json!({"_to": "cast/3"}),
        );
        assert!(matches!(
            edge.to_document(),
            Err(GraphSessionError::ValidationError { .. })
        ));
    }
}
