use std::sync::Arc;

use catalog_db::{to_document, Document, Filter, ObjectId, Store};
use catalog_kernel::SettingsProvider;
use tracing::{info, instrument};

use super::document::DocumentAssembler;
use super::error::ShopError;
use super::models::{ListParams, ShopView, COLLECTION};
use super::{projection, query};
use crate::utils::slug::SlugAllocator;

/// Application service for shop records.
///
/// Each operation is a single request: identifiers are validated before the
/// store is touched and every store, settings or allocator failure is
/// returned as is.
pub struct ShopService {
    store: Arc<dyn Store>,
    settings: Arc<dyn SettingsProvider>,
    assembler: DocumentAssembler,
}

impl ShopService {
    pub fn new(
        store: Arc<dyn Store>,
        settings: Arc<dyn SettingsProvider>,
        slugs: Arc<dyn SlugAllocator>,
    ) -> Self {
        let assembler = DocumentAssembler::new(store.clone(), slugs);
        Self {
            store,
            settings,
            assembler,
        }
    }

    /// Records matching `params`, in sort order, as public views.
    #[instrument(skip(self), fields(collection = COLLECTION))]
    pub async fn list(&self, params: &ListParams) -> Result<Vec<ShopView>, ShopError> {
        let records = self.records(params).await?;
        let domain = self.settings.domain().await?;

        Ok(records
            .into_iter()
            .map(|record| projection::project_record(record, &domain))
            .collect())
    }

    /// The record with `id`, or `None` when there is none.
    pub async fn get_one(&self, id: &str) -> Result<Option<ShopView>, ShopError> {
        let id = parse_id(id)?;
        self.find_by_id(&id).await
    }

    #[instrument(skip(self, data))]
    pub async fn create(&self, data: &Document) -> Result<ShopView, ShopError> {
        let shop = self.assembler.build_for_insert(data).await?;
        let id = self.store.insert(COLLECTION, to_document(&shop)?).await?;
        info!(shop_id = %id, slug = ?shop.slug, "shop created");

        self.find_by_id(&id).await?.ok_or(ShopError::NotFound(id))
    }

    /// Apply the fields present in `data` to the record `id`.
    #[instrument(skip(self, data))]
    pub async fn update(&self, id: &str, data: &Document) -> Result<ShopView, ShopError> {
        let id = parse_id(id)?;
        let patch = self.assembler.build_for_update(&id, data).await?;
        let matched = self
            .store
            .update_fields(COLLECTION, &id, to_document(&patch)?)
            .await?;
        info!(shop_id = %id, matched, "shop updated");

        self.find_by_id(&id).await?.ok_or(ShopError::NotFound(id))
    }

    /// Remove the non-system record `id`. Returns whether one was removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<bool, ShopError> {
        let id = parse_id(id)?;
        let filter = Filter::new().id(&id).eq("is_system", false);
        let removed = self.store.delete_one(COLLECTION, &filter).await?;
        info!(shop_id = %id, count = removed, "shop delete finished");

        Ok(removed > 0)
    }

    async fn records(&self, params: &ListParams) -> Result<Vec<Document>, ShopError> {
        let filter = query::build_filter(params);
        let sort = query::build_sort(params);
        let projection = query::build_projection(params);

        Ok(self
            .store
            .find(COLLECTION, &filter, &sort, &projection)
            .await?)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<ShopView>, ShopError> {
        let records = self.records(&ListParams::by_id(id)).await?;
        let domain = self.settings.domain().await?;
        Ok(projection::project(records.into_iter().next(), &domain))
    }
}

fn parse_id(raw: &str) -> Result<ObjectId, ShopError> {
    ObjectId::parse(raw).map_err(|_| ShopError::InvalidIdentifier(raw.to_string()))
}
