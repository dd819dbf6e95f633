use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};

use serde_json::Value;
use tokio::sync::RwLock;

use crate::domain::{
    CollectionName, DocumentBody, DocumentStore, OrderBy, SortDirection, StoreError,
    StoredDocument,
};

/// Document store keeping collections in memory, in insertion order.
///
/// Public so that other crates can reuse it for their own tests. It can be switched
/// to "unavailable" to exercise backend failures.
#[derive(Clone, Debug, Default)]
pub struct MemoryDocumentStore {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    collections: RwLock<HashMap<CollectionName, Vec<StoredDocument>>>,
    sequence: AtomicU64,
    unavailable: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every following call fails with a backend error while `unavailable` is true.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, AtomicOrdering::SeqCst);
    }

    /// Snapshot of one collection, for assertions.
    pub async fn documents(&self, collection: &CollectionName) -> Vec<StoredDocument> {
        self.inner
            .collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.inner.unavailable.load(AtomicOrdering::SeqCst) {
            Err(StoreError::Backend("memory store is unavailable".to_string()))
        } else {
            Ok(())
        }
    }

    fn next_id(&self) -> String {
        let sequence = self.inner.sequence.fetch_add(1, AtomicOrdering::SeqCst) + 1;
        format!("doc-{sequence:06}")
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn list(&self, collection: &CollectionName) -> Result<Vec<StoredDocument>, StoreError> {
        self.check_available()?;
        Ok(self.documents(collection).await)
    }

    async fn get(
        &self,
        collection: &CollectionName,
        id: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        self.check_available()?;
        let collections = self.inner.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|document| document.id == id))
            .cloned())
    }

    async fn add(
        &self,
        collection: &CollectionName,
        body: DocumentBody,
    ) -> Result<String, StoreError> {
        self.check_available()?;
        let id = self.next_id();
        let mut collections = self.inner.collections.write().await;
        collections
            .entry(collection.clone())
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                body,
            });
        Ok(id)
    }

    async fn set(
        &self,
        collection: &CollectionName,
        id: &str,
        body: DocumentBody,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let mut collections = self.inner.collections.write().await;
        let documents = collections.entry(collection.clone()).or_default();
        match documents.iter_mut().find(|document| document.id == id) {
            Some(document) => document.body = body,
            None => documents.push(StoredDocument {
                id: id.to_string(),
                body,
            }),
        }
        Ok(())
    }

    async fn update(
        &self,
        collection: &CollectionName,
        id: &str,
        partial: DocumentBody,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let mut collections = self.inner.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|document| document.id == id))
            .ok_or_else(|| StoreError::Missing {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        document.body.extend(partial);
        Ok(())
    }

    async fn delete(&self, collection: &CollectionName, id: &str) -> Result<(), StoreError> {
        self.check_available()?;
        let mut collections = self.inner.collections.write().await;
        if let Some(documents) = collections.get_mut(collection) {
            documents.retain(|document| document.id != id);
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &CollectionName,
        order_by: &OrderBy,
        limit: usize,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        self.check_available()?;
        let mut documents = self.documents(collection).await;
        let field = order_by.field.as_ref();
        // stable sort: equal values keep insertion order
        documents.sort_by(|a, b| {
            compare_fields(a.body.get(field), b.body.get(field), order_by.direction)
        });
        documents.truncate(limit);
        Ok(documents)
    }
}

// absent fields sort last in both directions
fn compare_fields(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = compare_values(a, b);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
