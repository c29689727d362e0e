pub mod shops;

use std::sync::Arc;

use catalog_kernel::ModuleRegistry;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, shops: Arc<shops::ShopService>) {
    registry.register(shops::create_module(shops));
}
