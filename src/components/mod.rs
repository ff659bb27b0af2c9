//! Stored record types
//!
//! Records are caller-defined values; this module converts them to and from the
//! JSON documents the store works with.

pub mod edge;
pub mod movie;

pub use edge::EdgeRecord;
pub use movie::{Cast, CastType, Production};

use crate::errors::{GraphSessionError, GraphSessionResult};
use crate::value_objects::DocumentMeta;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// A stored document as the backend sees it
pub type Document = Map<String, Value>;

/// Serialize a record into a document body.
///
/// Records must serialize to a JSON object; null and scalars are rejected.
pub fn to_document<T: Serialize>(
    operation: &'static str,
    record: &T,
) -> GraphSessionResult<Document> {
    object_document(operation, to_value(operation, record)?)
}

/// Serialize optional payload attributes; a null payload means no attributes
pub(crate) fn payload_document<T: Serialize>(
    operation: &'static str,
    payload: &T,
) -> GraphSessionResult<Document> {
    match to_value(operation, payload)? {
        Value::Null => Ok(Document::new()),
        other => object_document(operation, other),
    }
}

fn to_value<T: Serialize>(operation: &'static str, record: &T) -> GraphSessionResult<Value> {
    serde_json::to_value(record)
        .map_err(|source| GraphSessionError::Serialization { operation, source })
}

fn object_document(operation: &'static str, value: Value) -> GraphSessionResult<Document> {
    match value {
        Value::Object(document) => Ok(document),
        other => Err(GraphSessionError::validation(
            operation,
            format!("record must serialize to an object, got {}", json_kind(&other)),
        )),
    }
}

/// Deserialize a stored document back into a record, ignoring system attributes
pub fn from_document<T: DeserializeOwned>(
    operation: &'static str,
    mut document: Document,
) -> GraphSessionResult<T> {
    for attribute in DocumentMeta::SYSTEM_ATTRIBUTES {
        document.remove(attribute);
    }
    serde_json::from_value(Value::Object(document))
        .map_err(|source| GraphSessionError::Serialization { operation, source })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_document_rejects_scalars() {
        let result = to_document("create vertex", &42);
        match result {
            Err(GraphSessionError::ValidationError { reason, .. }) => {
                assert!(reason.contains("a number"));
            }
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_null_record_is_rejected() {
        for result in [
            to_document("create vertex", &()),
            to_document("create vertex", &None::<Production>),
        ] {
            match result {
                Err(GraphSessionError::ValidationError { reason, .. }) => {
                    assert!(reason.contains("null"));
                }
                other => panic!("Expected ValidationError, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unit_payload_is_empty_document() {
        assert!(payload_document("create edge", &()).unwrap().is_empty());
        assert!(payload_document("create edge", &7).is_err());
    }

    #[test]
    fn test_from_document_strips_system_attributes() {
        let document = json!({
            "_id": "movies/1",
            "_key": "1",
            "_rev": "_abc",
            "title": "Apocalypse Now",
            "year": 1979
        });
        let Value::Object(document) = document else {
            panic!("Expected object");
        };

        let stripped: Value = from_document("read vertex", document).unwrap();
        assert_eq!(stripped, json!({"title": "Apocalypse Now", "year": 1979}));
    }
}
