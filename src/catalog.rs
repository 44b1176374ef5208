use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::attribute::{AttributeDescriptor, DataSource};

/// Parameters of an attribute-keys lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRequest {
    pub search_text: String,
    pub data_source: DataSource,
    pub aggregate_operator: String,
    pub aggregate_attribute: String,
}

impl CatalogRequest {
    /// Unfiltered lookup of every attribute for a source/operator pair
    pub fn full(data_source: DataSource, aggregate_operator: impl Into<String>) -> Self {
        Self {
            search_text: String::new(),
            data_source,
            aggregate_operator: aggregate_operator.into(),
            aggregate_attribute: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPayload {
    #[serde(default)]
    pub attribute_keys: Option<Vec<AttributeDescriptor>>,
}

/// Response envelope of an attribute-keys lookup.
///
/// Either level may be missing; both cases read as an empty catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub payload: Option<CatalogPayload>,
}

impl CatalogResponse {
    pub fn from_keys(attribute_keys: Vec<AttributeDescriptor>) -> Self {
        Self {
            payload: Some(CatalogPayload {
                attribute_keys: Some(attribute_keys),
            }),
        }
    }

    /// Descriptors carried by the response, with identifiers filled in
    pub fn into_attribute_keys(self) -> Vec<AttributeDescriptor> {
        self.payload
            .and_then(|p| p.attribute_keys)
            .unwrap_or_default()
            .into_iter()
            .map(AttributeDescriptor::normalize)
            .collect()
    }
}

/// Source of the authoritative attribute list for a data source.
///
/// Retries and caching are the implementation's business.
pub trait AttributeCatalogClient {
    fn fetch_attribute_keys(&self, request: &CatalogRequest) -> Result<CatalogResponse>;
}

/// Fixed in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    attribute_keys: Vec<AttributeDescriptor>,
}

impl StaticCatalog {
    pub fn new(attribute_keys: Vec<AttributeDescriptor>) -> Self {
        Self { attribute_keys }
    }
}

impl AttributeCatalogClient for StaticCatalog {
    fn fetch_attribute_keys(&self, request: &CatalogRequest) -> Result<CatalogResponse> {
        let needle = request.search_text.to_lowercase();
        let keys = self
            .attribute_keys
            .iter()
            .filter(|attr| needle.is_empty() || attr.key.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(CatalogResponse::from_keys(keys))
    }
}

/// Catalog stored as a JSON document on disk, shaped like the attribute-keys API response
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AttributeCatalogClient for FileCatalog {
    fn fetch_attribute_keys(&self, request: &CatalogRequest) -> Result<CatalogResponse> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            eyre!(
                "Failed to read attribute catalog at {}: {}",
                self.path.display(),
                e
            )
        })?;
        let response: CatalogResponse = serde_json::from_str(&content).map_err(|e| {
            eyre!(
                "Failed to parse attribute catalog at {}: {}",
                self.path.display(),
                e
            )
        })?;
        // Filtering happens server-side for the remote API; mirror it here.
        StaticCatalog::new(response.into_attribute_keys()).fetch_attribute_keys(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{AttributeType, DataType};

    fn attr(key: &str) -> AttributeDescriptor {
        AttributeDescriptor::new(key, DataType::String, AttributeType::Tag, false)
    }

    #[test]
    fn test_full_request() {
        let req = CatalogRequest::full(DataSource::Logs, "count");
        assert_eq!(req.search_text, "");
        assert_eq!(req.aggregate_attribute, "");
        assert_eq!(req.aggregate_operator, "count");
        assert_eq!(req.data_source, DataSource::Logs);
    }

    #[test]
    fn test_missing_payload_is_empty() {
        let resp: CatalogResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.into_attribute_keys().is_empty());

        let resp: CatalogResponse = serde_json::from_str(r#"{"payload":{}}"#).unwrap();
        assert!(resp.into_attribute_keys().is_empty());

        let resp: CatalogResponse =
            serde_json::from_str(r#"{"payload":{"attributeKeys":null}}"#).unwrap();
        assert!(resp.into_attribute_keys().is_empty());
    }

    #[test]
    fn test_into_attribute_keys_fills_ids() {
        let resp: CatalogResponse = serde_json::from_str(
            r#"{"statusCode":200,"payload":{"attributeKeys":[{"key":"host","dataType":"string","type":"resource","isColumn":true}]}}"#,
        )
        .unwrap();
        let keys = resp.into_attribute_keys();
        assert_eq!(keys[0].id, "host--string--resource--true");
    }

    #[test]
    fn test_static_catalog_search() {
        let catalog = StaticCatalog::new(vec![attr("service"), attr("status"), attr("host")]);

        let all = catalog
            .fetch_attribute_keys(&CatalogRequest::full(DataSource::Logs, "noop"))
            .unwrap()
            .into_attribute_keys();
        assert_eq!(all.len(), 3);

        let mut req = CatalogRequest::full(DataSource::Logs, "noop");
        req.search_text = "S".to_string();
        let keys: Vec<String> = catalog
            .fetch_attribute_keys(&req)
            .unwrap()
            .into_attribute_keys()
            .into_iter()
            .map(|a| a.key)
            .collect();
        assert_eq!(keys, vec!["service", "status", "host"]);

        req.search_text = "stat".to_string();
        let keys = catalog
            .fetch_attribute_keys(&req)
            .unwrap()
            .into_attribute_keys();
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn test_file_catalog_missing_file() {
        let catalog = FileCatalog::new("/nonexistent/viewopts/keys.json");
        let err = catalog
            .fetch_attribute_keys(&CatalogRequest::full(DataSource::Logs, "count"))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read attribute catalog"));
    }
}
