use anyhow::Context;
use std::sync::Arc;

use catalog_db::{CollectionSpec, Store};

use crate::module::{InitCtx, Module};

/// Module registry driving the lifecycle of every registered module
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    /// Create a new module registry
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Register a module; modules start in registration order
    pub fn register(&mut self, module: Arc<dyn Module>) {
        self.modules.push(module);
    }

    /// Get all registered modules
    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }

    /// Get a module by name
    pub fn get_module(&self, name: &str) -> Option<&Arc<dyn Module>> {
        self.modules.iter().find(|module| module.name() == name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Collect collection specs from all modules, ordered by module then
    /// collection name
    pub fn collect_collections(&self) -> Vec<(String, CollectionSpec)> {
        let mut collections: Vec<(String, CollectionSpec)> = self
            .modules
            .iter()
            .flat_map(|module| {
                module
                    .collections()
                    .into_iter()
                    .map(move |spec| (module.name().to_string(), spec))
            })
            .collect();

        collections.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.name.cmp(b.1.name)));
        collections
    }

    /// Create every declared collection and its indexes on the store
    pub async fn ensure_collections(&self, store: &dyn Store) -> anyhow::Result<()> {
        for (module, spec) in self.collect_collections() {
            tracing::info!(
                module = %module,
                collection = spec.name,
                "ensuring collection"
            );

            store.ensure_collection(&spec).await.with_context(|| {
                format!(
                    "failed to ensure collection '{}' for module '{}'",
                    spec.name, module
                )
            })?;
        }

        Ok(())
    }

    /// Initialize modules in registration order
    pub async fn init_modules(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!("initializing {} modules", self.modules.len());

        for module in &self.modules {
            tracing::info!(module = module.name(), "initializing module");

            module
                .init(ctx)
                .await
                .with_context(|| format!("failed to initialize module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Start modules in registration order
    pub async fn start_modules(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!("starting {} modules", self.modules.len());

        for module in &self.modules {
            tracing::info!(module = module.name(), "starting module");

            module
                .start(ctx)
                .await
                .with_context(|| format!("failed to start module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Stop modules in reverse registration order
    pub async fn stop_modules(&self) -> anyhow::Result<()> {
        tracing::info!("stopping {} modules", self.modules.len());

        for module in self.modules.iter().rev() {
            tracing::info!(module = module.name(), "stopping module");

            module
                .stop()
                .await
                .with_context(|| format!("failed to stop module '{}'", module.name()))?;
        }

        Ok(())
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use catalog_db::{Document, Filter, MemoryStore, Projection, SortSpec};
    use std::sync::Mutex;

    struct TestModule {
        name: &'static str,
        events: Arc<Mutex<Vec<String>>>,
    }

    impl TestModule {
        fn record(&self, event: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("{}:{}", event, self.name));
        }
    }

    #[async_trait::async_trait]
    impl Module for TestModule {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
            self.record("init");
            Ok(())
        }

        fn collections(&self) -> Vec<CollectionSpec> {
            vec![CollectionSpec::new(self.name).unique("slug")]
        }

        async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
            self.record("start");
            Ok(())
        }

        async fn stop(&self) -> anyhow::Result<()> {
            self.record("stop");
            Ok(())
        }
    }

    fn registry_with(names: &[&'static str]) -> (ModuleRegistry, Arc<Mutex<Vec<String>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ModuleRegistry::new();
        for &name in names {
            registry.register(Arc::new(TestModule {
                name,
                events: events.clone(),
            }));
        }
        (registry, events)
    }

    #[test]
    fn test_module_registry_creation() {
        let registry = ModuleRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.collect_collections().is_empty());
    }

    #[test]
    fn test_collection_collection_is_sorted() {
        let (registry, _) = registry_with(&["pages", "shops"]);
        let names: Vec<_> = registry
            .collect_collections()
            .into_iter()
            .map(|(module, spec)| (module, spec.name))
            .collect();
        assert_eq!(
            names,
            vec![
                ("pages".to_string(), "pages"),
                ("shops".to_string(), "shops")
            ]
        );
        assert!(registry.get_module("shops").is_some());
        assert!(registry.get_module("missing").is_none());
    }

    #[tokio::test]
    async fn test_ensure_collections_applies_unique_indexes() {
        let (registry, _) = registry_with(&["shops"]);
        let store = MemoryStore::new();
        registry.ensure_collections(&store).await.unwrap();

        let mut doc = Document::new();
        doc.insert("slug".to_string(), "taken".into());
        store.insert("shops", doc.clone()).await.unwrap();
        assert!(store.insert("shops", doc).await.is_err());

        let all = store
            .find("shops", &Filter::new(), &SortSpec::new(), &Projection::all())
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_module_lifecycle() {
        let (registry, events) = registry_with(&["first", "second"]);
        let settings = Settings::default();
        let store = MemoryStore::new();
        let ctx = InitCtx {
            settings: &settings,
            store: &store,
        };

        registry.init_modules(&ctx).await.unwrap();
        registry.start_modules(&ctx).await.unwrap();
        registry.stop_modules().await.unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                "init:first",
                "init:second",
                "start:first",
                "start:second",
                "stop:second",
                "stop:first"
            ]
        );
    }
}
