//! Shop records: listing, lookup, creation, partial update and deletion,
//! with slug resolution and derived public links.

pub mod document;
pub mod error;
pub mod models;
pub mod projection;
pub mod query;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use async_trait::async_trait;
use catalog_db::CollectionSpec;
use catalog_kernel::{InitCtx, Module};

pub use error::ShopError;
pub use models::{ListParams, ShopView, COLLECTION};
pub use service::ShopService;

/// Module owning the shops collection
pub struct ShopsModule {
    service: Arc<ShopService>,
}

impl ShopsModule {
    pub fn new(service: Arc<ShopService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for ShopsModule {
    fn name(&self) -> &'static str {
        "shops"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            domain = %ctx.settings.general.domain,
            "shops module initialized"
        );
        Ok(())
    }

    fn collections(&self) -> Vec<CollectionSpec> {
        vec![CollectionSpec::new(COLLECTION).unique("slug")]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let shops = self.service.list(&ListParams::default()).await?;
        tracing::info!(module = self.name(), count = shops.len(), "shops module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "shops module stopped");
        Ok(())
    }
}

/// Create a new instance of the shops module
pub fn create_module(service: Arc<ShopService>) -> Arc<dyn Module> {
    Arc::new(ShopsModule::new(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_db::MemoryStore;
    use catalog_kernel::{ModuleRegistry, Settings};
    use serde_json::json;
    use super::testing::{doc, StubSettings, StubSlugs};

    #[tokio::test]
    async fn registry_wires_shops_collection() {
        let store = Arc::new(MemoryStore::new());
        let service = Arc::new(ShopService::new(
            store.clone(),
            Arc::new(StubSettings("https://shop.test")),
            Arc::new(StubSlugs::default()),
        ));

        let mut registry = ModuleRegistry::new();
        registry.register(create_module(service.clone()));
        registry.ensure_collections(store.as_ref()).await.unwrap();

        let settings = Settings::default();
        let ctx = InitCtx {
            settings: &settings,
            store: store.as_ref(),
        };
        registry.init_modules(&ctx).await.unwrap();
        registry.start_modules(&ctx).await.unwrap();

        service
            .create(&doc(json!({"slug": "dup"})))
            .await
            .unwrap();
        // The stub hands out the same slug twice; the unique index catches it.
        let err = service
            .create(&doc(json!({"slug": "dup"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ShopError::Store(_)));

        registry.stop_modules().await.unwrap();
    }
}
