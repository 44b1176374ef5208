#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;
use viewopts::{AttributeDescriptor, AttributeType, CatalogResponse, DataType};

/// Descriptor whose identifier and name are both `id`
pub fn attr(id: &str) -> AttributeDescriptor {
    AttributeDescriptor {
        id: id.to_string(),
        key: id.to_string(),
        data_type: DataType::String,
        attribute_type: AttributeType::Tag,
        is_column: true,
        is_json: false,
    }
}

pub fn catalog(ids: &[&str]) -> Vec<AttributeDescriptor> {
    ids.iter().map(|id| attr(id)).collect()
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn column_ids(columns: &[AttributeDescriptor]) -> Vec<String> {
    columns.iter().map(|c| c.id.clone()).collect()
}

/// Write a catalog document shaped like the attribute-keys API response
pub fn write_catalog_file(ids: &[&str]) -> NamedTempFile {
    let response = CatalogResponse::from_keys(catalog(ids));
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    serde_json::to_writer(&mut file, &response).expect("Failed to write catalog");
    file.flush().expect("Failed to flush catalog");
    file
}
