//! Assembly of insert documents and update patches.

use std::sync::Arc;

use catalog_db::{Document, Filter, ObjectId, Projection, SortSpec, Store};
use chrono::Utc;
use serde_json::Value;

use super::error::ShopError;
use super::models::{NewShop, ShopPatch, COLLECTION};
use crate::utils::parse;
use crate::utils::slug::SlugAllocator;

/// Builds what the service writes: whole documents on create, partial
/// patches on update. Slugs are resolved through the allocator.
pub struct DocumentAssembler {
    store: Arc<dyn Store>,
    slugs: Arc<dyn SlugAllocator>,
}

impl DocumentAssembler {
    pub fn new(store: Arc<dyn Store>, slugs: Arc<dyn SlugAllocator>) -> Self {
        Self { store, slugs }
    }

    pub async fn build_for_insert(&self, input: &Document) -> Result<NewShop, ShopError> {
        let mut shop = NewShop {
            is_system: false,
            date_created: Utc::now(),
            content: parse::get_string(input.get("content")),
            meta_description: parse::get_string(input.get("meta_description")),
            meta_title: parse::get_string(input.get("meta_title")),
            enabled: parse::get_bool_or(input.get("enabled"), true),
            tags: parse::get_string_set(input.get("tags")),
            slug: None,
        };

        let requested = parse::get_string(input.get("slug"));
        let candidate = if requested.is_empty() {
            shop.meta_title.clone()
        } else {
            requested
        };
        if candidate.is_empty() {
            return Ok(shop);
        }

        shop.slug = Some(self.slugs.allocate(&candidate, None).await?);
        Ok(shop)
    }

    /// Patch for the record `id` holding only the fields present in `patch`.
    ///
    /// System records keep their `enabled` flag and slug whatever the
    /// patch says.
    pub async fn build_for_update(
        &self,
        id: &ObjectId,
        patch: &Document,
    ) -> Result<ShopPatch, ShopError> {
        if patch.is_empty() {
            return Err(ShopError::MissingFields);
        }

        let is_system = self.is_system(id).await?;
        let mut shop = ShopPatch::new(Utc::now());

        let string_field = |name: &str| patch.get(name).map(|value| parse::get_string(Some(value)));
        shop.content = string_field("content");
        shop.meta_description = string_field("meta_description");
        shop.meta_title = string_field("meta_title");
        shop.tags = patch
            .get("tags")
            .map(|value| parse::get_string_set(Some(value)));

        if is_system {
            if patch.contains_key("enabled") || patch.contains_key("slug") {
                tracing::debug!(shop_id = %id, "ignoring enabled/slug on system shop");
            }
            return Ok(shop);
        }

        shop.enabled = patch
            .get("enabled")
            .map(|value| parse::get_bool_or(Some(value), true));

        if let Some(requested) = patch.get("slug") {
            let mut candidate = parse::get_string(Some(requested));
            if candidate.is_empty() {
                candidate = parse::get_string(patch.get("meta_title"));
            }
            shop.slug = Some(self.slugs.allocate(&candidate, Some(id)).await?);
        }

        Ok(shop)
    }

    /// Whether the stored record `id` is a system record. Only that flag is
    /// read, so records with missing or null fields can still be updated.
    async fn is_system(&self, id: &ObjectId) -> Result<bool, ShopError> {
        let found = self
            .store
            .find(
                COLLECTION,
                &Filter::new().id(id),
                &SortSpec::new(),
                &Projection::only(["is_system"]),
            )
            .await?;

        match found.into_iter().next() {
            Some(record) => Ok(record
                .get("is_system")
                .and_then(Value::as_bool)
                .unwrap_or(false)),
            None => Err(ShopError::NotFound(*id)),
        }
    }
}
