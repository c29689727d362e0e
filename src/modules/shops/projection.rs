//! Read-side derivation of public shop fields.

use catalog_db::{Document, ID_FIELD};
use serde_json::Value;
use url::Url;

use super::models::ShopView;

/// Public link for `slug` under `domain`.
///
/// The slug is resolved as an absolute path, so any path already on the
/// domain is replaced. A domain that is not a URL is joined textually.
pub fn resolve_url(domain: &str, slug: &str) -> String {
    let path = format!("/{slug}");
    match Url::parse(domain).and_then(|base| base.join(&path)) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", domain.trim_end_matches('/'), path),
    }
}

/// Site-relative path for `slug`.
pub fn resolve_path(slug: &str) -> String {
    format!("/{}", slug.trim_start_matches('/'))
}

/// Public view of a stored record, or `None` when there is no record.
pub fn project(record: Option<Document>, domain: &str) -> Option<ShopView> {
    record.map(|record| project_record(record, domain))
}

pub fn project_record(mut record: Document, domain: &str) -> ShopView {
    let id = match record.remove(ID_FIELD) {
        Some(Value::String(id)) => id,
        Some(other) => other.to_string(),
        None => String::new(),
    };
    // Derived keys are never stored; drop anything that would shadow them.
    for derived in ["id", "url", "path"] {
        record.remove(derived);
    }

    let slug = record.get("slug").and_then(Value::as_str).unwrap_or_default();
    let url = resolve_url(domain, slug);
    let path = resolve_path(slug);

    ShopView {
        id,
        url,
        path,
        fields: record,
    }
}
