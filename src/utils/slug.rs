//! Slug normalization and collision-free allocation.

use std::sync::Arc;

use async_trait::async_trait;
use catalog_db::{Filter, ObjectId, Projection, SortSpec, Store, StoreError, ID_FIELD};
use serde_json::Value;

/// Hands out slugs nobody else holds.
#[async_trait]
pub trait SlugAllocator: Send + Sync {
    /// A unique slug derived from `candidate`. The record `exclude` does not
    /// count as a holder, so a record may keep its own slug.
    async fn allocate(&self, candidate: &str, exclude: Option<&ObjectId>)
        -> Result<String, StoreError>;
}

/// Lowercase ASCII alphanumerics; every other run of characters becomes a
/// single `-`, with none leading or trailing.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Allocator that checks candidates against slugs held in store collections.
///
/// Taken or reserved slugs get a numeric suffix: `summer`, `summer-2`,
/// `summer-3`, and so on.
pub struct StoreSlugAllocator {
    store: Arc<dyn Store>,
    collections: Vec<String>,
    reserved: Vec<String>,
}

impl StoreSlugAllocator {
    pub fn new(store: Arc<dyn Store>, reserved: Vec<String>) -> Self {
        Self {
            store,
            collections: Vec::new(),
            reserved,
        }
    }

    /// Add collections whose `slug` fields share one namespace.
    pub fn with_collections<I, S>(mut self, collections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.collections
            .extend(collections.into_iter().map(Into::into));
        self
    }

    async fn is_taken(&self, slug: &str, exclude: Option<&ObjectId>) -> Result<bool, StoreError> {
        if self.reserved.iter().any(|reserved| reserved == slug) {
            return Ok(true);
        }

        let exclude = exclude.map(ToString::to_string);
        let filter = Filter::new().eq("slug", slug);
        let projection = Projection::only(["slug"]);
        for collection in &self.collections {
            let holders = self
                .store
                .find(collection, &filter, &SortSpec::new(), &projection)
                .await?;
            let held_by_other = holders.iter().any(|doc| {
                doc.get(ID_FIELD).and_then(Value::as_str) != exclude.as_deref()
            });
            if held_by_other {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[async_trait]
impl SlugAllocator for StoreSlugAllocator {
    async fn allocate(
        &self,
        candidate: &str,
        exclude: Option<&ObjectId>,
    ) -> Result<String, StoreError> {
        let base = slugify(candidate);
        if base.is_empty() {
            return Ok(base);
        }

        let mut slug = base.clone();
        let mut suffix = 1u32;
        while self.is_taken(&slug, exclude).await? {
            suffix += 1;
            slug = format!("{base}-{suffix}");
        }

        tracing::debug!(candidate, slug = %slug, "slug allocated");
        Ok(slug)
    }
}
