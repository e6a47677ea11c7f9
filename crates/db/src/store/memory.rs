//! In-process document store.
//!
//! Used when no `DATABASE_URL` is configured and by the test suites. Reads
//! and writes for a collection can be made to fail on demand so callers can
//! exercise their error paths.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use qtrace_core::types::DocId;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{compare_values, ensure_object, new_document_id, Document, DocumentStore, StoreError};

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    id: DocId,
    data: Value,
}

#[derive(Debug, Default)]
struct Inner {
    collections: HashMap<String, Vec<Entry>>,
    next_seq: u64,
    failing_reads: HashSet<String>,
    failing_writes: HashSet<String>,
}

impl Inner {
    fn check_read(&self, collection: &str) -> Result<(), StoreError> {
        if self.failing_reads.contains(collection) {
            return Err(unavailable(collection, "reads disabled"));
        }
        Ok(())
    }

    fn check_write(&self, collection: &str) -> Result<(), StoreError> {
        if self.failing_writes.contains(collection) {
            return Err(unavailable(collection, "writes disabled"));
        }
        Ok(())
    }

    fn entries(&self, collection: &str) -> &[Entry] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn insert(&mut self, collection: &str, data: Value) -> DocId {
        let id = new_document_id();
        self.next_seq += 1;
        let entry = Entry {
            seq: self.next_seq,
            id: id.clone(),
            data,
        };
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(entry);
        id
    }
}

fn unavailable(collection: &str, reason: &str) -> StoreError {
    StoreError::Unavailable {
        collection: collection.to_string(),
        reason: reason.to_string(),
    }
}

fn to_document(entry: &Entry) -> Document {
    Document {
        id: entry.id.clone(),
        data: entry.data.clone(),
    }
}

/// A [`DocumentStore`] held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read of `collection` fail until [`restore`](Self::restore).
    pub async fn fail_reads_from(&self, collection: &str) {
        self.inner
            .write()
            .await
            .failing_reads
            .insert(collection.to_string());
    }

    /// Make every write to `collection` fail until [`restore`](Self::restore).
    pub async fn fail_writes_to(&self, collection: &str) {
        self.inner
            .write()
            .await
            .failing_writes
            .insert(collection.to_string());
    }

    /// Clear any injected failures for `collection`.
    pub async fn restore(&self, collection: &str) {
        let mut inner = self.inner.write().await;
        inner.failing_reads.remove(collection);
        inner.failing_writes.remove(collection);
    }

    /// Insert a document under a caller-chosen id. Intended for seeding.
    pub async fn insert_with_id(
        &self,
        collection: &str,
        id: &str,
        data: Value,
    ) -> Result<(), StoreError> {
        ensure_object(collection, &data)?;
        let mut inner = self.inner.write().await;
        inner.next_seq += 1;
        let seq = inner.next_seq;
        let entries = inner.collections.entry(collection.to_string()).or_default();
        entries.retain(|e| e.id != id);
        entries.push(Entry {
            seq,
            id: id.to_string(),
            data,
        });
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let inner = self.inner.read().await;
        inner.check_read(collection)?;
        Ok(inner.entries(collection).iter().map(to_document).collect())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let inner = self.inner.read().await;
        inner.check_read(collection)?;
        Ok(inner
            .entries(collection)
            .iter()
            .find(|e| e.id == id)
            .map(to_document))
    }

    async fn create(&self, collection: &str, data: Value) -> Result<DocId, StoreError> {
        ensure_object(collection, &data)?;
        let mut inner = self.inner.write().await;
        inner.check_write(collection)?;
        Ok(inner.insert(collection, data))
    }

    async fn create_unique(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        data: Value,
    ) -> Result<Option<DocId>, StoreError> {
        ensure_object(collection, &data)?;
        // One write lock covers both the check and the insert.
        let mut inner = self.inner.write().await;
        inner.check_write(collection)?;
        let taken = inner
            .entries(collection)
            .iter()
            .any(|e| e.data.get(field) == Some(value));
        if taken {
            return Ok(None);
        }
        Ok(Some(inner.insert(collection, data)))
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check_write(collection)?;
        let Some(entry) = inner
            .collections
            .get_mut(collection)
            .and_then(|entries| entries.iter_mut().find(|e| e.id == id))
        else {
            return Ok(false);
        };
        if let Value::Object(existing) = &mut entry.data {
            existing.extend(fields);
        }
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        inner.check_write(collection)?;
        let Some(entries) = inner.collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = entries.len();
        entries.retain(|e| e.id != id);
        Ok(entries.len() != before)
    }

    async fn count(&self, collection: &str) -> Result<u64, StoreError> {
        let inner = self.inner.read().await;
        inner.check_read(collection)?;
        Ok(inner.entries(collection).len() as u64)
    }

    async fn latest(
        &self,
        collection: &str,
        order_field: &str,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        let inner = self.inner.read().await;
        inner.check_read(collection)?;
        let mut ordered: Vec<&Entry> = inner
            .entries(collection)
            .iter()
            .filter(|e| e.data.get(order_field).is_some())
            .collect();
        ordered.sort_by(|a, b| {
            compare_values(&b.data[order_field], &a.data[order_field]).then(b.seq.cmp(&a.seq))
        });
        Ok(ordered.into_iter().take(limit).map(to_document).collect())
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        let inner = self.inner.read().await;
        inner.check_read(collection)?;
        Ok(inner
            .entries(collection)
            .iter()
            .filter(|e| e.data.get(field) == Some(value))
            .map(to_document)
            .collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn create_get_list_preserve_insertion_order() {
        let store = MemoryStore::new();
        let a = store.create("things", json!({"n": 1})).await.unwrap();
        let b = store.create("things", json!({"n": 2})).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), crate::store::DOCUMENT_ID_LENGTH);

        let all = store.list("things").await.unwrap();
        assert_eq!(all.iter().map(|d| d.id.clone()).collect::<Vec<_>>(), vec![a.clone(), b]);

        let doc = store.get("things", &a).await.unwrap().unwrap();
        assert_eq!(doc.data["n"], 1);
        assert!(store.get("things", "missing").await.unwrap().is_none());
        assert!(store.list("other").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_objects_are_rejected() {
        let store = MemoryStore::new();
        let err = store.create("things", json!([1, 2])).await.unwrap_err();
        assert_matches!(err, StoreError::NotAnObject { .. });
    }

    #[tokio::test]
    async fn update_merges_top_level_fields_only() {
        let store = MemoryStore::new();
        let id = store
            .create("things", json!({"a": 1, "nested": {"x": 1, "y": 2}}))
            .await
            .unwrap();

        let found = store
            .update("things", &id, fields(json!({"nested": {"x": 9}, "b": true})))
            .await
            .unwrap();
        assert!(found);

        let doc = store.get("things", &id).await.unwrap().unwrap();
        assert_eq!(doc.data, json!({"a": 1, "nested": {"x": 9}, "b": true}));

        let missing = store
            .update("things", "nope", fields(json!({"a": 2})))
            .await
            .unwrap();
        assert!(!missing);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let store = MemoryStore::new();
        let id = store.create("things", json!({})).await.unwrap();
        assert!(store.delete("things", &id).await.unwrap());
        assert!(!store.delete("things", &id).await.unwrap());
        assert_eq!(store.count("things").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn create_unique_refuses_taken_values() {
        let store = MemoryStore::new();
        let first = store
            .create_unique("users", "qcId", &json!("QC-11111"), json!({"qcId": "QC-11111"}))
            .await
            .unwrap();
        assert!(first.is_some());

        let second = store
            .create_unique("users", "qcId", &json!("QC-11111"), json!({"qcId": "QC-11111"}))
            .await
            .unwrap();
        assert!(second.is_none());
        assert_eq!(store.count("users").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn concurrent_create_unique_admits_one_writer() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .create_unique("users", "qcId", &json!("QC-22222"), json!({"qcId": "QC-22222"}))
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn latest_orders_descending_and_skips_missing_field() {
        let store = MemoryStore::new();
        store
            .create("p", json!({"name": "old", "createdAt": "2024-01-01T00:00:00Z"}))
            .await
            .unwrap();
        store
            .create("p", json!({"name": "new", "createdAt": "2024-06-01T00:00:00Z"}))
            .await
            .unwrap();
        store.create("p", json!({"name": "undated"})).await.unwrap();
        store
            .create("p", json!({"name": "mid", "createdAt": "2024-03-01T00:00:00.5Z"}))
            .await
            .unwrap();

        let docs = store.latest("p", "createdAt", 10).await.unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.data["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["new", "mid", "old"]);

        let top = store.latest("p", "createdAt", 1).await.unwrap();
        assert_eq!(top[0].data["name"], "new");
    }

    #[tokio::test]
    async fn latest_orders_native_timestamps_and_breaks_ties_by_recency() {
        let store = MemoryStore::new();
        store
            .create("a", json!({"n": 1, "at": {"seconds": 100, "nanoseconds": 0}}))
            .await
            .unwrap();
        store
            .create("a", json!({"n": 2, "at": {"seconds": 200, "nanoseconds": 0}}))
            .await
            .unwrap();
        store
            .create("a", json!({"n": 3, "at": {"seconds": 200, "nanoseconds": 0}}))
            .await
            .unwrap();

        let docs = store.latest("a", "at", 10).await.unwrap();
        let ns: Vec<_> = docs.iter().map(|d| d.data["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn find_eq_matches_exact_values() {
        let store = MemoryStore::new();
        store.create("p", json!({"status": "Delayed"})).await.unwrap();
        store.create("p", json!({"status": "Ongoing"})).await.unwrap();
        store.create("p", json!({"status": "Delayed"})).await.unwrap();

        let delayed = store.find_eq("p", "status", &json!("Delayed")).await.unwrap();
        assert_eq!(delayed.len(), 2);
    }

    #[tokio::test]
    async fn injected_failures_are_scoped_and_restorable() {
        let store = MemoryStore::new();
        store.fail_writes_to("articles").await;
        assert_matches!(
            store.create("articles", json!({})).await,
            Err(StoreError::Unavailable { .. })
        );
        assert!(store.create("projects", json!({})).await.is_ok());

        store.fail_reads_from("projects").await;
        assert_matches!(store.count("projects").await, Err(StoreError::Unavailable { .. }));

        store.restore("articles").await;
        store.restore("projects").await;
        assert!(store.create("articles", json!({})).await.is_ok());
        assert_eq!(store.count("projects").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn insert_with_id_replaces_existing() {
        let store = MemoryStore::new();
        store.insert_with_id("p", "fixed", json!({"v": 1})).await.unwrap();
        store.insert_with_id("p", "fixed", json!({"v": 2})).await.unwrap();
        assert_eq!(store.count("p").await.unwrap(), 1);
        assert_eq!(store.get("p", "fixed").await.unwrap().unwrap().data["v"], 2);
    }
}
