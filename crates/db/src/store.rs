use async_trait::async_trait;

use crate::{Document, Filter, ObjectId, Projection, SortSpec, StoreError};

/// Declaration of a collection a module stores documents in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: &'static str,
    /// Fields whose non-empty string values must be unique.
    pub unique: Vec<&'static str>,
}

impl CollectionSpec {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            unique: Vec::new(),
        }
    }

    pub fn unique(mut self, field: &'static str) -> Self {
        self.unique.push(field);
        self
    }
}

/// Collection-oriented document store.
///
/// Single-document writes are atomic; nothing else is.
#[async_trait]
pub trait Store: Send + Sync {
    /// Create the collection and its indexes if they do not exist yet.
    async fn ensure_collection(&self, spec: &CollectionSpec) -> Result<(), StoreError>;

    /// Matching documents in sort order, reduced to the projected fields.
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        sort: &SortSpec,
        projection: &Projection,
    ) -> Result<Vec<Document>, StoreError>;

    /// Insert a document and return the identifier assigned to it.
    async fn insert(&self, collection: &str, document: Document) -> Result<ObjectId, StoreError>;

    /// Set the given fields on the document with `id`. Returns whether a
    /// document matched.
    async fn update_fields(
        &self,
        collection: &str,
        id: &ObjectId,
        patch: Document,
    ) -> Result<bool, StoreError>;

    /// Delete the first document matching `filter`. Returns the number removed.
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;
}
