//! In-process [`Store`] backed by a lock-protected map of collections.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{
    CollectionSpec, Document, Filter, ObjectId, Projection, SortSpec, Store, StoreError, ID_FIELD,
};

#[derive(Debug, Default)]
struct Collection {
    documents: Vec<Document>,
    unique: Vec<String>,
}

impl Collection {
    fn position_of(&self, id: &ObjectId) -> Option<usize> {
        let id = id.to_string();
        self.documents
            .iter()
            .position(|doc| doc.get(ID_FIELD).and_then(Value::as_str) == Some(id.as_str()))
    }

    /// Reject `candidate` if it repeats a unique value held by another
    /// document. `skip` is the candidate's own position when updating.
    fn check_unique(
        &self,
        name: &str,
        candidate: &Document,
        skip: Option<usize>,
    ) -> Result<(), StoreError> {
        for field in &self.unique {
            let Some(value) = candidate.get(field).and_then(Value::as_str) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            let taken = self
                .documents
                .iter()
                .enumerate()
                .filter(|(index, _)| Some(*index) != skip)
                .any(|(_, doc)| doc.get(field).and_then(Value::as_str) == Some(value));
            if taken {
                return Err(StoreError::DuplicateKey {
                    collection: name.to_string(),
                    field: field.clone(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Documents kept in memory, in insertion order per collection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ensure_collection(&self, spec: &CollectionSpec) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let collection = collections.entry(spec.name.to_string()).or_default();
        for field in &spec.unique {
            if !collection.unique.iter().any(|existing| existing == field) {
                collection.unique.push((*field).to_string());
            }
        }
        tracing::debug!(
            target: "catalog-db",
            collection = spec.name,
            unique = ?spec.unique,
            "collection ensured"
        );
        Ok(())
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        sort: &SortSpec,
        projection: &Projection,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(collection) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<Document> = collection
            .documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect();
        if !sort.is_empty() {
            matched.sort_by(|a, b| sort.compare(a, b));
        }

        Ok(matched
            .into_iter()
            .map(|doc| projection.apply(doc))
            .collect())
    }

    async fn insert(&self, collection: &str, mut document: Document) -> Result<ObjectId, StoreError> {
        let mut collections = self.collections.write().await;
        let entry = collections.entry(collection.to_string()).or_default();

        let id = ObjectId::generate();
        document.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
        entry.check_unique(collection, &document, None)?;
        entry.documents.push(document);

        tracing::debug!(target: "catalog-db", collection, id = %id, "document inserted");
        Ok(id)
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &ObjectId,
        patch: Document,
    ) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(entry) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let Some(index) = entry.position_of(id) else {
            return Ok(false);
        };

        let mut updated = entry.documents[index].clone();
        for (field, value) in patch {
            if field != ID_FIELD {
                updated.insert(field, value);
            }
        }
        entry.check_unique(collection, &updated, Some(index))?;
        entry.documents[index] = updated;

        tracing::debug!(target: "catalog-db", collection, id = %id, "document updated");
        Ok(true)
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(entry) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let Some(index) = entry.documents.iter().position(|doc| filter.matches(doc)) else {
            return Ok(0);
        };
        entry.documents.remove(index);

        tracing::debug!(target: "catalog-db", collection, "document deleted");
        Ok(1)
    }
}
