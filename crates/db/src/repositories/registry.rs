//! Generic CRUD over one document collection.
//!
//! Every registry page (projects, contractors, articles, users) has the same
//! shape: list, fetch one, create, patch, delete. [`Registry`] implements it
//! once; each entity plugs in through [`Entity`].

use std::marker::PhantomData;

use qtrace_core::error::CoreError;
use qtrace_core::types::DocId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::store::{Document, DocumentStore, StoreError};

/// A document type stored in its own collection.
pub trait Entity: DeserializeOwned + Serialize + Send + Sync + 'static {
    /// Collection the documents live in.
    const COLLECTION: &'static str;
    /// Singular name used in not-found errors.
    const NAME: &'static str;

    type Create: Input;
    type Patch: Input;

    /// Text shown when another record refers to this one.
    fn label(&self) -> String;
}

/// A create DTO or update patch that must be checked before it is written.
pub trait Input: Serialize + Send + Sync {
    fn validate(&self) -> Result<(), CoreError>;
}

/// An input that has passed [`Input::validate`].
///
/// The registry only accepts inputs in this wrapper, so nothing reaches the
/// store unchecked.
#[derive(Debug, Clone)]
pub struct Validated<T>(T);

impl<T: Input> Validated<T> {
    pub fn new(input: T) -> Result<Self, CoreError> {
        input.validate()?;
        Ok(Self(input))
    }

    pub fn get(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

/// A decoded document with its id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record<E> {
    pub id: DocId,
    #[serde(flatten)]
    pub entity: E,
}

/// One entry of a dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Provides CRUD operations for the collection of `E`.
pub struct Registry<E>(PhantomData<E>);

impl<E: Entity> Registry<E> {
    /// Every document in the collection, in store order.
    ///
    /// Documents that do not decode as `E` are skipped with a warning.
    pub async fn list(store: &dyn DocumentStore) -> Result<Vec<Record<E>>, StoreError> {
        let docs = store.list(E::COLLECTION).await?;
        Ok(decode_all(docs))
    }

    /// Documents whose `field` equals `value`.
    pub async fn list_where(
        store: &dyn DocumentStore,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Record<E>>, StoreError> {
        let docs = store.find_eq(E::COLLECTION, field, value).await?;
        Ok(decode_all(docs))
    }

    pub async fn find_by_id(
        store: &dyn DocumentStore,
        id: &str,
    ) -> Result<Option<Record<E>>, StoreError> {
        match store.get(E::COLLECTION, id).await? {
            Some(doc) => Ok(Some(decode(&doc)?)),
            None => Ok(None),
        }
    }

    /// Write a new document, returning its id.
    pub async fn create(
        store: &dyn DocumentStore,
        input: &Validated<E::Create>,
    ) -> Result<DocId, StoreError> {
        let data = serde_json::to_value(input.get())?;
        store.create(E::COLLECTION, data).await
    }

    /// Apply a patch. Fields the patch leaves as `None` keep their stored
    /// values. Returns `false` if the document does not exist.
    pub async fn update(
        store: &dyn DocumentStore,
        id: &str,
        patch: &Validated<E::Patch>,
    ) -> Result<bool, StoreError> {
        let fields = to_fields(E::COLLECTION, patch.get())?;
        if fields.is_empty() {
            return Ok(store.get(E::COLLECTION, id).await?.is_some());
        }
        store.update(E::COLLECTION, id, fields).await
    }

    /// Hard delete. Returns `true` if a document was removed.
    pub async fn delete(store: &dyn DocumentStore, id: &str) -> Result<bool, StoreError> {
        store.delete(E::COLLECTION, id).await
    }

    pub async fn count(store: &dyn DocumentStore) -> Result<u64, StoreError> {
        store.count(E::COLLECTION).await
    }

    /// The newest `limit` documents by `order_field`, newest first.
    pub async fn latest(
        store: &dyn DocumentStore,
        order_field: &str,
        limit: usize,
    ) -> Result<Vec<Record<E>>, StoreError> {
        let docs = store.latest(E::COLLECTION, order_field, limit).await?;
        Ok(decode_all(docs))
    }

    /// Dropdown entries: document id and label, in store order.
    pub async fn options(store: &dyn DocumentStore) -> Result<Vec<SelectOption>, StoreError> {
        Ok(Self::list(store)
            .await?
            .into_iter()
            .map(|record| SelectOption {
                label: record.entity.label(),
                value: record.id,
            })
            .collect())
    }
}

fn decode<E: Entity>(doc: &Document) -> Result<Record<E>, StoreError> {
    Ok(Record {
        id: doc.id.clone(),
        entity: doc.decode()?,
    })
}

fn decode_all<E: Entity>(docs: Vec<Document>) -> Vec<Record<E>> {
    docs.iter()
        .filter_map(|doc| match decode::<E>(doc) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(
                    collection = E::COLLECTION,
                    id = %doc.id,
                    error = %e,
                    "Skipping undecodable document",
                );
                None
            }
        })
        .collect()
}

pub(crate) fn to_fields<T: Serialize>(
    collection: &str,
    value: &T,
) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject {
            collection: collection.to_string(),
        }),
    }
}
