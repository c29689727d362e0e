use catalog_db::{Document, ObjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collection shop records are stored in.
pub const COLLECTION: &str = "shops";

/// Query parameters accepted by the list operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    /// Restrict to one record; ignored unless it is a valid identifier.
    pub id: Option<String>,
    /// Restrict to records tagged with this value.
    pub tags: Option<String>,
    /// Comma-separated sort keys, `-` prefix for descending.
    pub sort: Option<String>,
    /// Comma-separated fields to return.
    pub fields: Option<String>,
}

impl ListParams {
    pub fn by_id(id: &ObjectId) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Self::default()
        }
    }
}

/// Document inserted by the create operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewShop {
    pub is_system: bool,
    pub date_created: DateTime<Utc>,
    pub content: String,
    pub meta_description: String,
    pub meta_title: String,
    pub enabled: bool,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// Fields set by the update operation. Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopPatch {
    pub date_updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl ShopPatch {
    pub fn new(date_updated: DateTime<Utc>) -> Self {
        Self {
            date_updated,
            content: None,
            meta_description: None,
            meta_title: None,
            enabled: None,
            tags: None,
            slug: None,
        }
    }
}

/// Public representation of a shop record.
///
/// `fields` carries whatever stored fields the read projected, minus the
/// internal identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopView {
    pub id: String,
    pub url: String,
    pub path: String,
    #[serde(flatten)]
    pub fields: Document,
}

impl ShopView {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn slug(&self) -> Option<&str> {
        self.field("slug").and_then(Value::as_str)
    }
}
