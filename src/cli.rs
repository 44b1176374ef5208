//! Glue between the shared CLI definitions and the library types.

pub use viewopts_cli::{Args, DataSourceArg, FormatArg, LogFormatArg};

use crate::attribute::DataSource;
use crate::config::AppConfig;
use crate::controller::OptionsMenuProps;
use crate::logging::LogFormat;
use crate::options::{InitialOptions, OptionsFormat};

impl From<DataSourceArg> for DataSource {
    fn from(arg: DataSourceArg) -> Self {
        match arg {
            DataSourceArg::Logs => Self::Logs,
            DataSourceArg::Traces => Self::Traces,
            DataSourceArg::Metrics => Self::Metrics,
        }
    }
}

impl From<FormatArg> for OptionsFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Raw => Self::Raw,
            FormatArg::List => Self::List,
            FormatArg::Table => Self::Table,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

impl OptionsMenuProps {
    /// Build props from CLI args and config, with CLI args taking precedence
    pub fn from_args_and_config(args: &Args, config: &AppConfig) -> Self {
        let data_source = args
            .data_source
            .map(DataSource::from)
            .unwrap_or(config.catalog.data_source);
        let aggregate_operator = args
            .aggregate_operator
            .clone()
            .unwrap_or_else(|| config.catalog.aggregate_operator.clone());

        // --column replaces the configured seed columns rather than extending them
        let mut initial_options: InitialOptions = config.initial_options();
        if !args.columns.is_empty() {
            initial_options.select_columns = Some(args.columns.clone());
        }

        OptionsMenuProps::new(data_source, aggregate_operator).with_initial_options(initial_options)
    }
}
