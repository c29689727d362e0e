//! Translation of list parameters into store filter, sort and projection.

use catalog_db::{Filter, Projection, SortDirection, SortSpec};

use super::models::ListParams;
use crate::utils::parse;

/// System records first, then oldest first.
pub fn default_sort() -> SortSpec {
    SortSpec::new()
        .then("is_system", SortDirection::Descending)
        .then("date_created", SortDirection::Ascending)
}

/// Filter for `params`; the empty filter matches every record.
pub fn build_filter(params: &ListParams) -> Filter {
    let mut filter = Filter::new();
    if let Some(id) = parse::get_object_id(params.id.as_deref()) {
        filter = filter.id(&id);
    }
    if let Some(tag) = params.tags.as_deref().filter(|tag| !tag.is_empty()) {
        filter = filter.eq("tags", tag);
    }
    filter
}

/// Sort keys from `params.sort`, or [`default_sort`] when none are given.
///
/// Field names are passed through unchecked. A repeated field keeps its
/// first position and its last direction.
pub fn build_sort(params: &ListParams) -> SortSpec {
    let Some(sort) = params.sort.as_deref().filter(|sort| !sort.is_empty()) else {
        return default_sort();
    };

    let mut spec = SortSpec::new();
    for field in sort.split(',') {
        match field.strip_prefix('-') {
            Some(name) => spec.push(name, SortDirection::Descending),
            None => spec.push(field, SortDirection::Ascending),
        }
    }
    spec
}

/// Projection from `params.fields`; every field when none are given.
pub fn build_projection(params: &ListParams) -> Projection {
    match params.fields.as_deref().filter(|fields| !fields.is_empty()) {
        Some(fields) => Projection::only(fields.split(',')),
        None => Projection::all(),
    }
}
