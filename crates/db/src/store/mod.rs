//! The document store seam.
//!
//! Collections hold JSON objects keyed by store-assigned ids. There is no
//! schema and no referential integrity: callers join across collections
//! themselves. Writes are whole-document creates or top-level field merges.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::DateTime;
use qtrace_core::types::DocId;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// Length of generated document ids.
pub const DOCUMENT_ID_LENGTH: usize = 20;

/// A stored document: its id plus the JSON object body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: DocId,
    pub data: Value,
}

impl Document {
    /// Decode the body into a typed model.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document written to '{collection}' must be a JSON object")]
    NotAnObject { collection: String },

    #[error("Store unavailable for '{collection}': {reason}")]
    Unavailable { collection: String, reason: String },
}

/// Collection-based document storage.
///
/// Implementations must be safe to share across tasks (`Arc<dyn DocumentStore>`).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document of a collection, in insertion order.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Insert a new document and return its generated id.
    async fn create(&self, collection: &str, data: Value) -> Result<DocId, StoreError>;

    /// Insert only if no document in the collection has `data[field] == value`.
    ///
    /// The existence check and the insert are atomic with respect to other
    /// `create_unique` calls on the same `(collection, field, value)`.
    /// Returns `None` when the value is already taken.
    async fn create_unique(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        data: Value,
    ) -> Result<Option<DocId>, StoreError>;

    /// Merge `fields` into the top level of an existing document.
    ///
    /// Named fields are replaced wholesale; other fields are untouched.
    /// Returns `false` if the document does not exist.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<bool, StoreError>;

    /// Returns `false` if the document did not exist.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    async fn count(&self, collection: &str) -> Result<u64, StoreError>;

    /// The first `limit` documents ordered by `order_field`, descending.
    /// Documents without the field are not returned.
    async fn latest(
        &self,
        collection: &str,
        order_field: &str,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError>;

    /// Documents whose `field` equals `value`.
    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Generate a random alphanumeric document id.
pub fn new_document_id() -> DocId {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(DOCUMENT_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// Reject anything other than a JSON object before it reaches a backend.
pub(crate) fn ensure_object(collection: &str, data: &Value) -> Result<(), StoreError> {
    if data.is_object() {
        Ok(())
    } else {
        Err(StoreError::NotAnObject {
            collection: collection.to_string(),
        })
    }
}

/// Total order over JSON values for `latest`.
///
/// Values of different kinds order as `null < string < number < bool <
/// object`. Strings that both parse as RFC 3339 compare as instants;
/// timestamp objects compare by `seconds` then `nanoseconds`.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => {
            match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Object(x), Value::Object(y)) => {
            timestamp_key(x).cmp(&timestamp_key(y))
        }
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn timestamp_key(object: &Map<String, Value>) -> (i64, i64) {
    let field = |names: [&str; 2]| {
        names
            .iter()
            .find_map(|n| object.get(*n).and_then(Value::as_i64))
            .unwrap_or(0)
    };
    (
        field(["seconds", "_seconds"]),
        field(["nanoseconds", "_nanoseconds"]),
    )
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::String(_) => 1,
        Value::Number(_) => 2,
        Value::Bool(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
