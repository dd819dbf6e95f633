use std::future::Future;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::{CollectionName, FieldName};

/// JSON object stored as one document. The document id is never part of the body.
pub type DocumentBody = Map<String, Value>;

/// A document as read back from the store: its store-assigned id and its body.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub body: DocumentBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Ordering of a query on one top level field of the body.
/// Documents without the field come last, ties keep the natural order of the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: FieldName,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn ascending(field: FieldName) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: FieldName) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document {id} does not exist in {collection}")]
    Missing { collection: String, id: String },
    #[error("document {id} is malformed: {reason}")]
    Malformed { id: String, reason: String },
    #[error("document store failure: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        Self::Backend(value.to_string())
    }
}

/// Key-value document API every storage backend provides.
/// Calls are single attempts: retries, if any, belong to the backend client.
pub trait DocumentStore: Clone + Send + Sync + 'static {
    /// all documents of a collection in natural order
    fn list(
        &self,
        collection: &CollectionName,
    ) -> impl Future<Output = Result<Vec<StoredDocument>, StoreError>> + Send;

    /// one document by id, `None` when absent
    fn get(
        &self,
        collection: &CollectionName,
        id: &str,
    ) -> impl Future<Output = Result<Option<StoredDocument>, StoreError>> + Send;

    /// insert a new document, returns the id assigned by the store
    fn add(
        &self,
        collection: &CollectionName,
        body: DocumentBody,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;

    /// create or overwrite the whole body of a document
    fn set(
        &self,
        collection: &CollectionName,
        id: &str,
        body: DocumentBody,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// overwrite the given top level fields, other fields stay untouched
    fn update(
        &self,
        collection: &CollectionName,
        id: &str,
        partial: DocumentBody,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// delete a document, deleting an absent document is a no-op
    fn delete(
        &self,
        collection: &CollectionName,
        id: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// at most `limit` documents sorted by one field
    fn query(
        &self,
        collection: &CollectionName,
        order_by: &OrderBy,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<StoredDocument>, StoreError>> + Send;
}
