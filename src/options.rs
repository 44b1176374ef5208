use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::attribute::AttributeDescriptor;

/// Query parameter under which the options are persisted in the view URL
pub const URL_OPTIONS: &str = "options";

/// Lines rendered per row when nothing else is configured
pub const DEFAULT_MAX_LINES: u32 = 2;

/// How each row of the view is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionsFormat {
    Raw,
    #[default]
    List,
    Table,
}

impl OptionsFormat {
    pub const ALL: [OptionsFormat; 3] = [Self::Raw, Self::List, Self::Table];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::List => "list",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for OptionsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionsFormat {
    type Err = color_eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "list" => Ok(Self::List),
            "table" => Ok(Self::Table),
            other => Err(color_eyre::eyre::eyre!(
                "Unknown format '{}'. Expected one of: raw, list, table",
                other
            )),
        }
    }
}

/// The persisted display configuration of a view.
///
/// Every write replaces the whole value. Column order is display order and
/// identifiers are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionsQuery {
    pub select_columns: Vec<AttributeDescriptor>,
    pub format: OptionsFormat,
    /// `None` renders every line
    pub max_lines: Option<u32>,
}

impl Default for OptionsQuery {
    fn default() -> Self {
        Self {
            select_columns: Vec::new(),
            format: OptionsFormat::default(),
            max_lines: Some(DEFAULT_MAX_LINES),
        }
    }
}

impl OptionsQuery {
    /// Identifiers of the selected columns, in display order
    pub fn column_ids(&self) -> Vec<String> {
        self.select_columns.iter().map(|c| c.id.clone()).collect()
    }

    /// Drop repeated column identifiers, keeping the first occurrence
    pub fn dedup_columns(mut self) -> Self {
        let mut seen = HashSet::new();
        self.select_columns.retain(|column| seen.insert(column.id.clone()));
        self
    }

    /// Defaults with only the column selection replaced
    pub fn with_columns(select_columns: Vec<AttributeDescriptor>) -> Self {
        Self {
            select_columns,
            ..Self::default()
        }
    }

    /// Defaults with only the format replaced
    pub fn with_format(format: OptionsFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Defaults with only the line limit replaced
    pub fn with_max_lines(max_lines: Option<u32>) -> Self {
        Self {
            max_lines,
            ..Self::default()
        }
    }
}

/// Caller-supplied seed used once to bootstrap a view that has no options in its URL.
///
/// Columns are plain identifiers or attribute names; they are resolved against
/// the catalog when it arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitialOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select_columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OptionsFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_lines: Option<u32>,
}

impl InitialOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_select_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_format(mut self, format: OptionsFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_max_lines(mut self, max_lines: u32) -> Self {
        self.max_lines = Some(max_lines);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{AttributeType, DataType};

    #[test]
    fn test_default_options_query() {
        let default = OptionsQuery::default();
        assert!(default.select_columns.is_empty());
        assert_eq!(default.format, OptionsFormat::List);
        assert_eq!(default.max_lines, Some(DEFAULT_MAX_LINES));
    }

    #[test]
    fn test_with_helpers_reset_other_fields() {
        let q = OptionsQuery::with_format(OptionsFormat::Raw);
        assert_eq!(q.max_lines, OptionsQuery::default().max_lines);
        assert!(q.select_columns.is_empty());

        let q = OptionsQuery::with_max_lines(None);
        assert_eq!(q.format, OptionsFormat::List);
        assert_eq!(q.max_lines, None);
    }

    #[test]
    fn test_wire_shape() {
        let q = OptionsQuery::with_columns(vec![AttributeDescriptor::new(
            "service",
            DataType::String,
            AttributeType::Resource,
            true,
        )]);
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["format"], "list");
        assert_eq!(json["maxLines"], 2);
        assert_eq!(
            json["selectColumns"][0]["id"],
            "service--string--resource--true"
        );
    }

    #[test]
    fn test_null_max_lines() {
        let q: OptionsQuery =
            serde_json::from_str(r#"{"selectColumns":[],"format":"table","maxLines":null}"#)
                .unwrap();
        assert_eq!(q.format, OptionsFormat::Table);
        assert_eq!(q.max_lines, None);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let q: OptionsQuery = serde_json::from_str(r#"{"format":"raw"}"#).unwrap();
        assert_eq!(q.format, OptionsFormat::Raw);
        assert_eq!(q.max_lines, Some(DEFAULT_MAX_LINES));
        assert!(q.select_columns.is_empty());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("RAW".parse::<OptionsFormat>().unwrap(), OptionsFormat::Raw);
        assert_eq!(
            "table".parse::<OptionsFormat>().unwrap(),
            OptionsFormat::Table
        );
        assert!("grid".parse::<OptionsFormat>().is_err());
    }

    #[test]
    fn test_initial_options_builder() {
        let initial = InitialOptions::new()
            .with_select_columns(["service", "status"])
            .with_max_lines(4);
        assert_eq!(
            initial.select_columns,
            Some(vec!["service".to_string(), "status".to_string()])
        );
        assert_eq!(initial.format, None);
        assert_eq!(initial.max_lines, Some(4));
    }

    #[test]
    fn test_dedup_columns_keeps_first() {
        let a = AttributeDescriptor::new("a", DataType::String, AttributeType::Tag, true);
        let b = AttributeDescriptor::new("b", DataType::Int64, AttributeType::Resource, false);
        let options = OptionsQuery {
            select_columns: vec![a.clone(), b.clone(), a.clone()],
            format: OptionsFormat::Table,
            max_lines: None,
        }
        .dedup_columns();
        assert_eq!(options.select_columns, vec![a, b]);
        assert_eq!(options.format, OptionsFormat::Table);
        assert_eq!(options.max_lines, None);
    }
}
