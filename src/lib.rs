//! Display options for tabular and log views, kept in sync with a shareable URL.
//!
//! The [`OptionsMenuController`] reconciles three inputs: caller-supplied seed
//! options, the attribute catalog fetched for the current data source, and the
//! options persisted in the view's location. The location is the single source
//! of truth; the controller derives an [`OptionsMenuConfig`] from it on demand.

pub mod attribute;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod controller;
pub mod logging;
pub mod mapper;
pub mod menu;
pub mod options;
pub mod url_store;

pub use attribute::{AttributeDescriptor, AttributeType, DataSource, DataType};
pub use catalog::{
    AttributeCatalogClient, CatalogRequest, CatalogResponse, FileCatalog, StaticCatalog,
};
pub use cli::Args;
pub use config::{AppConfig, ConfigManager};
pub use controller::{
    spawn_fetch, BootstrapPhase, CatalogTicket, OptionsEvent, OptionsMenu,
    OptionsMenuController, OptionsMenuProps,
};
pub use logging::{init_logging, LogFormat};
pub use mapper::{derive_selectable_options, resolve_initial_columns, SelectOption};
pub use menu::OptionsMenuConfig;
pub use options::{InitialOptions, OptionsFormat, OptionsQuery, URL_OPTIONS};
pub use url_store::{OptionsStore, QueryStringStore, UrlQueryData};

/// Application name used for the config directory
pub const APP_NAME: &str = "viewopts";
