//! Fixtures shared by the shops tests.

use std::sync::Mutex;

use async_trait::async_trait;
use catalog_db::{Document, MemoryStore, ObjectId, Store, StoreError};
use catalog_kernel::SettingsProvider;
use chrono::Utc;
use serde_json::{json, Value};

use super::models::COLLECTION;
use crate::utils::slug::SlugAllocator;

pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => panic!("fixture must be an object"),
    }
}

/// Insert a complete shop record with `overrides` applied on top.
pub async fn insert_shop(store: &MemoryStore, overrides: Value) -> ObjectId {
    let mut record = doc(json!({
        "is_system": false,
        "date_created": Utc::now(),
        "content": "",
        "meta_title": "",
        "meta_description": "",
        "enabled": true,
        "tags": []
    }));
    record.extend(doc(overrides));
    store.insert(COLLECTION, record).await.unwrap()
}

/// Allocator answering `<candidate lowercased>-slug` and recording calls.
#[derive(Default)]
pub struct StubSlugs {
    calls: Mutex<Vec<(String, Option<ObjectId>)>>,
}

impl StubSlugs {
    pub fn calls(&self) -> Vec<(String, Option<ObjectId>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SlugAllocator for StubSlugs {
    async fn allocate(
        &self,
        candidate: &str,
        exclude: Option<&ObjectId>,
    ) -> Result<String, StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push((candidate.to_string(), exclude.copied()));
        if candidate.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("{}-slug", candidate.to_lowercase()))
    }
}

/// Allocator whose backend is down.
pub struct FailingSlugs;

#[async_trait]
impl SlugAllocator for FailingSlugs {
    async fn allocate(&self, _: &str, _: Option<&ObjectId>) -> Result<String, StoreError> {
        Err(StoreError::Backend("slug index unavailable".to_string()))
    }
}

pub struct StubSettings(pub &'static str);

#[async_trait]
impl SettingsProvider for StubSettings {
    async fn domain(&self) -> anyhow::Result<String> {
        Ok(self.0.to_string())
    }
}
