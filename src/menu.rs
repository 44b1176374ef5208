//! Read-only view model for the options menu.
//!
//! Derived from the persisted options and the current catalog on demand; it
//! owns no state. Each control hands back an [`OptionsEvent`] describing the
//! change, to be fed to the controller.

use serde::Serialize;

use crate::attribute::AttributeDescriptor;
use crate::controller::OptionsEvent;
use crate::mapper::{derive_selectable_options, SelectOption};
use crate::options::{OptionsFormat, OptionsQuery};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsMenuConfig {
    pub add_column: AddColumnConfig,
    pub format: FormatConfig,
    pub max_lines: MaxLinesConfig,
}

/// Column picker: selected identifiers plus every column the catalog offers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddColumnConfig {
    pub value: Vec<String>,
    pub options: Vec<SelectOption>,
}

impl AddColumnConfig {
    pub fn on_change(&self, ids: Vec<String>) -> OptionsEvent {
        OptionsEvent::AddColumns(ids)
    }

    pub fn on_remove(&self, id: impl Into<String>) -> OptionsEvent {
        OptionsEvent::RemoveColumn(id.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatConfig {
    pub value: OptionsFormat,
}

impl FormatConfig {
    pub fn on_change(&self, format: OptionsFormat) -> OptionsEvent {
        OptionsEvent::SetFormat(format)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxLinesConfig {
    pub value: Option<u32>,
}

impl MaxLinesConfig {
    pub fn on_change(&self, max_lines: Option<u32>) -> OptionsEvent {
        OptionsEvent::SetMaxLines(max_lines)
    }
}

/// Build the menu view model. Missing options fall back to the defaults.
pub fn derive_menu_config(
    options: Option<&OptionsQuery>,
    attribute_keys: &[AttributeDescriptor],
) -> OptionsMenuConfig {
    let default = OptionsQuery::default();

    let selected = options
        .map(OptionsQuery::column_ids)
        .unwrap_or_else(|| default.column_ids());

    // A zero or missing line limit shows the default, same as an unset value
    let max_lines = options
        .and_then(|o| o.max_lines)
        .filter(|n| *n > 0)
        .or(default.max_lines);

    OptionsMenuConfig {
        add_column: AddColumnConfig {
            value: selected,
            options: derive_selectable_options(attribute_keys),
        },
        format: FormatConfig {
            value: options.map(|o| o.format).unwrap_or(default.format),
        },
        max_lines: MaxLinesConfig { value: max_lines },
    }
}
