//! Orchestration of the options menu.
//!
//! The controller ties together three things: the seed options supplied by the
//! caller, the attribute catalog fetched for the data source, and the options
//! persisted in the location. The location is the single source of truth; the
//! controller keeps only fetch bookkeeping and its bootstrap phase.
//!
//! Every mutation writes a complete [`OptionsQuery`] built from the defaults,
//! so fields other than the one being changed are reset.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::Serialize;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::Span;

use crate::attribute::{AttributeDescriptor, DataSource};
use crate::catalog::{AttributeCatalogClient, CatalogRequest, CatalogResponse};
use crate::mapper::{resolve_columns_by_id, resolve_initial_columns};
use crate::menu::{derive_menu_config, OptionsMenuConfig};
use crate::options::{InitialOptions, OptionsFormat, OptionsQuery};
use crate::url_store::OptionsStore;

/// What the controller is mounted for
#[derive(Debug, Clone, Default)]
pub struct OptionsMenuProps {
    pub data_source: DataSource,
    pub aggregate_operator: String,
    pub initial_options: InitialOptions,
}

impl OptionsMenuProps {
    pub fn new(data_source: DataSource, aggregate_operator: impl Into<String>) -> Self {
        Self {
            data_source,
            aggregate_operator: aggregate_operator.into(),
            initial_options: InitialOptions::default(),
        }
    }

    pub fn with_initial_options(mut self, initial_options: InitialOptions) -> Self {
        self.initial_options = initial_options;
        self
    }
}

/// Progress of writing the seed options into an empty location
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BootstrapPhase {
    #[default]
    Uninitialized,
    Bootstrapping,
    Ready,
}

/// Bookkeeping for the catalog fetch
#[derive(Debug, Clone, Default)]
pub struct FetchState {
    pub is_loading: bool,
    /// The fetch has settled at least once
    pub is_fetched: bool,
    /// Latest successful payload
    pub attribute_keys: Vec<AttributeDescriptor>,
    generation: u64,
}

impl FetchState {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A fetch the host should run; hand the result back with its generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTicket {
    pub generation: u64,
    pub request: CatalogRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionsEvent {
    /// A catalog fetch completed; errors are carried as their message
    FetchSettled {
        generation: u64,
        result: std::result::Result<CatalogResponse, String>,
    },
    AddColumns(Vec<String>),
    RemoveColumn(String),
    SetFormat(OptionsFormat),
    SetMaxLines(Option<u32>),
}

/// Everything presentation code needs in one value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsMenu {
    pub is_loading: bool,
    pub options: Option<OptionsQuery>,
    pub config: OptionsMenuConfig,
}

pub struct OptionsMenuController<S: OptionsStore> {
    props: OptionsMenuProps,
    store: S,
    fetch: FetchState,
    phase: BootstrapPhase,
    span: Span,
}

impl<S: OptionsStore> OptionsMenuController<S> {
    pub fn new(props: OptionsMenuProps, store: S) -> Self {
        let span = tracing::info_span!(
            "options_menu",
            data_source = %props.data_source,
            aggregate_operator = %props.aggregate_operator,
        );
        Self {
            props,
            store,
            fetch: FetchState::default(),
            phase: BootstrapPhase::default(),
            span,
        }
    }

    pub fn props(&self) -> &OptionsMenuProps {
        &self.props
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn phase(&self) -> BootstrapPhase {
        self.phase
    }

    pub fn fetch_state(&self) -> &FetchState {
        &self.fetch
    }

    pub fn is_loading(&self) -> bool {
        self.fetch.is_loading
    }

    pub fn attribute_keys(&self) -> &[AttributeDescriptor] {
        &self.fetch.attribute_keys
    }

    /// Options currently persisted in the location
    pub fn options(&self) -> Option<OptionsQuery> {
        self.store.read().decoded
    }

    pub fn config(&self) -> OptionsMenuConfig {
        derive_menu_config(self.options().as_ref(), &self.fetch.attribute_keys)
    }

    pub fn snapshot(&self) -> OptionsMenu {
        let options = self.options();
        let config = derive_menu_config(options.as_ref(), &self.fetch.attribute_keys);
        OptionsMenu {
            is_loading: self.fetch.is_loading,
            options,
            config,
        }
    }

    /// Start a catalog fetch. Any fetch still in flight is superseded.
    pub fn begin_fetch(&mut self) -> CatalogTicket {
        let _guard = self.span.enter();
        self.fetch.generation += 1;
        self.fetch.is_loading = true;
        tracing::debug!(generation = self.fetch.generation, "fetching attribute catalog");
        CatalogTicket {
            generation: self.fetch.generation,
            request: CatalogRequest::full(
                self.props.data_source,
                self.props.aggregate_operator.clone(),
            ),
        }
    }

    /// Record the outcome of a fetch started with [`begin_fetch`](Self::begin_fetch).
    ///
    /// Results for a superseded generation are dropped. A failed fetch keeps
    /// the last good catalog (empty if there never was one) and still lets the
    /// bootstrap run.
    pub fn on_fetch_settled(&mut self, generation: u64, result: Result<CatalogResponse>) {
        let span = self.span.clone();
        let _guard = span.enter();

        if generation != self.fetch.generation {
            tracing::debug!(
                generation,
                current = self.fetch.generation,
                "ignoring stale catalog result"
            );
            return;
        }

        self.fetch.is_loading = false;
        self.fetch.is_fetched = true;
        match result {
            Ok(response) => {
                self.fetch.attribute_keys = response.into_attribute_keys();
                tracing::debug!(
                    attribute_keys = self.fetch.attribute_keys.len(),
                    "attribute catalog loaded"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    attribute_keys = self.fetch.attribute_keys.len(),
                    "attribute catalog unavailable; keeping last known catalog"
                );
            }
        }

        self.bootstrap();
    }

    /// Fetch the catalog on the calling thread and apply the result
    pub fn fetch_with<C>(&mut self, client: &C)
    where
        C: AttributeCatalogClient + ?Sized,
    {
        let ticket = self.begin_fetch();
        let result = client.fetch_attribute_keys(&ticket.request);
        self.on_fetch_settled(ticket.generation, result);
    }

    /// Re-arm for a fresh mount against the same location.
    ///
    /// The persisted options are left alone; the bootstrap only runs again if
    /// the location has none by the time the new fetch settles.
    pub fn remount(&mut self) -> CatalogTicket {
        self.phase = BootstrapPhase::Uninitialized;
        self.begin_fetch()
    }

    /// Seed options merged over the defaults, with columns resolved against the catalog
    pub fn initial_options_query(&self) -> OptionsQuery {
        let initial = &self.props.initial_options;
        let default = OptionsQuery::default();
        OptionsQuery {
            select_columns: match &initial.select_columns {
                Some(columns) => resolve_initial_columns(columns, &self.fetch.attribute_keys),
                None => default.select_columns,
            },
            format: initial.format.unwrap_or(default.format),
            max_lines: initial.max_lines.or(default.max_lines),
        }
    }

    fn bootstrap(&mut self) {
        if self.phase == BootstrapPhase::Ready || !self.fetch.is_fetched {
            return;
        }
        if self.store.read().decoded.is_some() {
            tracing::debug!("location already carries options; skipping bootstrap");
            self.phase = BootstrapPhase::Ready;
            return;
        }

        self.phase = BootstrapPhase::Bootstrapping;
        let initial = self.initial_options_query();
        self.phase = if self.persist("bootstrap", initial) {
            BootstrapPhase::Ready
        } else {
            BootstrapPhase::Uninitialized
        };
    }

    /// Identifiers of the persisted selection, empty when nothing is persisted
    pub fn selected_column_ids(&self) -> Vec<String> {
        self.options().map(|o| o.column_ids()).unwrap_or_default()
    }

    /// Append columns to the selection.
    ///
    /// Existing columns keep their place, new ones follow in input order and
    /// duplicates collapse. Identifiers the catalog does not know are dropped.
    pub fn add_columns(&mut self, new_ids: &[String]) {
        let mut ids = self.selected_column_ids();
        for id in new_ids {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        let columns = resolve_columns_by_id(&ids, &self.fetch.attribute_keys);
        self.persist("add_columns", OptionsQuery::with_columns(columns));
    }

    pub fn remove_column(&mut self, id: &str) {
        let columns = match self.options() {
            Some(options) => options
                .select_columns
                .into_iter()
                .filter(|column| column.id != id)
                .collect(),
            None => OptionsQuery::default().select_columns,
        };
        self.persist("remove_column", OptionsQuery::with_columns(columns));
    }

    pub fn set_format(&mut self, format: OptionsFormat) {
        self.persist("set_format", OptionsQuery::with_format(format));
    }

    pub fn set_max_lines(&mut self, max_lines: Option<u32>) {
        self.persist("set_max_lines", OptionsQuery::with_max_lines(max_lines));
    }

    /// Dispatch an event from the menu or a background fetch
    pub fn event(&mut self, event: OptionsEvent) {
        match event {
            OptionsEvent::FetchSettled { generation, result } => {
                self.on_fetch_settled(generation, result.map_err(|msg| eyre!(msg)))
            }
            OptionsEvent::AddColumns(ids) => self.add_columns(&ids),
            OptionsEvent::RemoveColumn(id) => self.remove_column(&id),
            OptionsEvent::SetFormat(format) => self.set_format(format),
            OptionsEvent::SetMaxLines(max_lines) => self.set_max_lines(max_lines),
        }
    }

    fn persist(&mut self, action: &'static str, value: OptionsQuery) -> bool {
        let span = self.span.clone();
        let _guard = span.enter();
        match self.store.write(&value) {
            Ok(()) => {
                tracing::info!(
                    action,
                    columns = value.select_columns.len(),
                    format = %value.format,
                    max_lines = ?value.max_lines,
                    "options persisted"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    action,
                    error = %e,
                    "failed to persist options; location unchanged"
                );
                false
            }
        }
    }
}

/// Run a catalog fetch on a worker thread and post the outcome as an event.
///
/// If the receiving side is gone the result is discarded.
pub fn spawn_fetch<C>(
    client: Arc<C>,
    ticket: CatalogTicket,
    events: Sender<OptionsEvent>,
) -> JoinHandle<()>
where
    C: AttributeCatalogClient + Send + Sync + ?Sized + 'static,
{
    std::thread::spawn(move || {
        let result = client
            .fetch_attribute_keys(&ticket.request)
            .map_err(|e| format!("{:#}", e));
        let _ = events.send(OptionsEvent::FetchSettled {
            generation: ticket.generation,
            result,
        });
    })
}
