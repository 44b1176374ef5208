use color_eyre::Result;
use url::form_urlencoded;

use crate::options::{OptionsQuery, URL_OPTIONS};

/// Current value of the options parameter as found in the location
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlQueryData {
    /// Encoded parameter value, if the parameter is present
    pub raw: Option<String>,
    /// Parsed value; `None` when absent or undecodable
    pub decoded: Option<OptionsQuery>,
}

/// Reads and replaces the options persisted in a shareable location.
///
/// `write` swaps the whole value; there is no partial update.
pub trait OptionsStore {
    fn read(&self) -> UrlQueryData;
    fn write(&mut self, value: &OptionsQuery) -> Result<()>;
}

/// Options stored as JSON inside one parameter of a URL query string.
///
/// Other parameters of the query string are carried through untouched.
#[derive(Debug, Clone)]
pub struct QueryStringStore {
    param: String,
    pairs: Vec<(String, String)>,
    /// Parsed form of the parameter, refreshed whenever the pairs change
    decoded: Option<OptionsQuery>,
    revision: u64,
}

impl QueryStringStore {
    /// Parse a query string (with or without the leading `?`) using the default parameter name
    pub fn new(query: &str) -> Self {
        Self::with_param(query, URL_OPTIONS)
    }

    pub fn with_param(query: &str, param: impl Into<String>) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut store = Self {
            param: param.into(),
            pairs: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
            decoded: None,
            revision: 0,
        };
        store.decoded = store.decode();
        store
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    /// Number of writes since the store was created
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Encoded query string without the leading `?`
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// Shareable link made of `base` and the current query string
    pub fn link(&self, base: &str) -> String {
        let query = self.query_string();
        if query.is_empty() {
            base.to_string()
        } else {
            format!("{}?{}", base.trim_end_matches('?'), query)
        }
    }

    fn raw_value(&self) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == &self.param)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Parse the parameter. Repeated columns in a hand-edited or shared link
    /// collapse to their first occurrence.
    fn decode(&self) -> Option<OptionsQuery> {
        let raw = self.raw_value()?;
        match serde_json::from_str::<OptionsQuery>(raw) {
            Ok(value) => Some(value.dedup_columns()),
            Err(e) => {
                tracing::warn!(
                    param = %self.param,
                    error = %e,
                    "ignoring undecodable options value"
                );
                None
            }
        }
    }
}

impl OptionsStore for QueryStringStore {
    fn read(&self) -> UrlQueryData {
        UrlQueryData {
            raw: self.raw_value().map(str::to_string),
            decoded: self.decoded.clone(),
        }
    }

    fn write(&mut self, value: &OptionsQuery) -> Result<()> {
        let value = value.clone().dedup_columns();
        let encoded = serde_json::to_string(&value)?;
        match self.pairs.iter_mut().find(|(k, _)| k == &self.param) {
            Some((_, v)) => *v = encoded,
            None => self.pairs.push((self.param.clone(), encoded)),
        }
        self.decoded = Some(value);
        self.revision += 1;
        tracing::debug!(
            param = %self.param,
            revision = self.revision,
            "options written to location"
        );
        Ok(())
    }
}
