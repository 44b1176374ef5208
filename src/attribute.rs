use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used when deriving an attribute identifier from its fields
pub const ID_SEPARATOR: &str = "--";

/// Logical category of telemetry that scopes which attributes exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Logs,
    Traces,
    Metrics,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Logs => "logs",
            Self::Traces => "traces",
            Self::Metrics => "metrics",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value type of an attribute as reported by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    String,
    Bool,
    Int64,
    Float64,
    #[default]
    Unknown,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::Unknown => "",
        }
    }
}

impl From<String> for DataType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "string" => Self::String,
            "bool" => Self::Bool,
            "int64" => Self::Int64,
            "float64" => Self::Float64,
            _ => Self::Unknown,
        }
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        value.as_str().to_string()
    }
}

/// Where an attribute comes from on the record (span/log tag or resource)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttributeType {
    Tag,
    Resource,
    #[default]
    Unknown,
}

impl AttributeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Resource => "resource",
            Self::Unknown => "",
        }
    }
}

impl From<String> for AttributeType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "tag" => Self::Tag,
            "resource" => Self::Resource,
            _ => Self::Unknown,
        }
    }
}

impl From<AttributeType> for String {
    fn from(value: AttributeType) -> Self {
        value.as_str().to_string()
    }
}

/// One selectable column of the data view.
///
/// `key` is the human-readable attribute name; `id` is unique within a catalog
/// and is what gets persisted in the options URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDescriptor {
    #[serde(default)]
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(rename = "type", default)]
    pub attribute_type: AttributeType,
    #[serde(default)]
    pub is_column: bool,
    #[serde(rename = "isJSON", default)]
    pub is_json: bool,
}

impl AttributeDescriptor {
    /// Build a descriptor whose identifier is derived from its other fields
    pub fn new(
        key: impl Into<String>,
        data_type: DataType,
        attribute_type: AttributeType,
        is_column: bool,
    ) -> Self {
        let mut descriptor = Self {
            id: String::new(),
            key: key.into(),
            data_type,
            attribute_type,
            is_column,
            is_json: false,
        };
        descriptor.id = descriptor.derived_id();
        descriptor
    }

    /// `key--dataType--type--isColumn`
    pub fn derived_id(&self) -> String {
        [
            self.key.as_str(),
            self.data_type.as_str(),
            self.attribute_type.as_str(),
            if self.is_column { "true" } else { "false" },
        ]
        .join(ID_SEPARATOR)
    }

    /// Fill in a missing identifier. Catalog payloads from older servers omit it.
    pub fn normalize(mut self) -> Self {
        if self.id.is_empty() {
            self.id = self.derived_id();
        }
        self
    }
}
