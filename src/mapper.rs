//! Pure transformations from the attribute catalog to what the options menu needs.
//!
//! Nothing here fails: an empty catalog yields empty results and identifiers
//! the catalog does not know are dropped.

use serde::Serialize;
use std::collections::HashSet;

use crate::attribute::AttributeDescriptor;

/// One entry of the column picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Resolve seed columns against the catalog.
///
/// Each entry matches a descriptor by identifier first and by attribute name
/// second. Order follows `requested`; a descriptor appears at most once.
pub fn resolve_initial_columns(
    requested: &[String],
    catalog: &[AttributeDescriptor],
) -> Vec<AttributeDescriptor> {
    let mut seen = HashSet::new();
    requested
        .iter()
        .filter_map(|wanted| {
            catalog
                .iter()
                .find(|attr| &attr.id == wanted)
                .or_else(|| catalog.iter().find(|attr| &attr.key == wanted))
        })
        .filter(|attr| seen.insert(attr.id.as_str()))
        .cloned()
        .collect()
}

/// Resolve identifiers against the catalog by identifier only, preserving order.
pub fn resolve_columns_by_id(
    ids: &[String],
    catalog: &[AttributeDescriptor],
) -> Vec<AttributeDescriptor> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .filter_map(|id| catalog.iter().find(|attr| &attr.id == id))
        .cloned()
        .collect()
}

/// Column picker entries, in catalog order
pub fn derive_selectable_options(catalog: &[AttributeDescriptor]) -> Vec<SelectOption> {
    catalog
        .iter()
        .map(|attr| SelectOption {
            value: attr.id.clone(),
            label: attr.key.clone(),
        })
        .collect()
}
