use std::sync::Arc;

use anyhow::Context;
use catalog_app::modules::{self, shops};
use catalog_app::utils::slug::StoreSlugAllocator;
use catalog_db::{MemoryStore, Store};
use catalog_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load catalog settings")?;
    catalog_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        domain = %settings.general.domain,
        "catalog-app bootstrap starting"
    );

    let settings = Arc::new(settings);
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let slugs = StoreSlugAllocator::new(store.clone(), settings.slugs.reserved.clone())
        .with_collections([shops::COLLECTION]);
    let shop_service = Arc::new(shops::ShopService::new(
        store.clone(),
        settings.clone(),
        Arc::new(slugs),
    ));

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, shop_service);
    registry
        .ensure_collections(store.as_ref())
        .await
        .context("failed to prepare collections")?;

    let ctx = InitCtx {
        settings: settings.as_ref(),
        store: store.as_ref(),
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!("catalog-app bootstrap complete");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    tracing::info!("catalog-app shutting down");
    registry.stop_modules().await?;
    Ok(())
}
