//! Flat key/value sources: in-memory maps, `.properties` documents and the
//! process property registry.

use std::collections::BTreeMap;

use crate::document::{Document, SourceKind};
use crate::naming::NameTransformer;
use crate::{ConfigResult, DEFAULT_PROP_PREFIX, system_properties};

use super::ByteSource;
use super::properties_format::{decode_text, parse_properties};

/// Where a [`PropertiesSource`] takes its entries from.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum PropertyInput {
    /// A fixed in-memory mapping.
    Map(BTreeMap<String, String>),
    /// A `.properties` document.
    Bytes(ByteSource),
    /// The process-wide registry in [`crate::system_properties`].
    System,
}

/// A source of dot-delimited flat keys.
///
/// Keys are split on `.` and used verbatim as object names. Only keys
/// starting with the prefix take part, with the prefix removed. Entries are
/// nested in sorted key order, so `a.b` overrides a scalar `a`.
///
/// Bracketed keys such as `users[0]` are not turned into arrays; each one is
/// an ordinary object key.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use strata_config::ObjectMapper;
/// use strata_config::source::PropertiesSource;
///
/// let source = PropertiesSource::from_map([("server.port", "8080"), ("db.jdbcUrl", "jdbc:h2:mem:")]);
/// let doc = source.load(&ObjectMapper::default())?;
/// assert_eq!(doc, json!({"db": {"jdbcUrl": "jdbc:h2:mem:"}, "server": {"port": "8080"}}));
/// # Ok::<_, std::sync::Arc<strata_config::ConfigError>>(())
/// ```
#[derive(Clone, Debug)]
pub struct PropertiesSource {
    input: PropertyInput,
    prefix: String,
}

impl PropertiesSource {
    /// Source over an in-memory mapping. Later duplicates win.
    pub fn from_map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            input: PropertyInput::Map(map),
            prefix: String::new(),
        }
    }

    /// Source reading a `.properties` document.
    #[must_use]
    pub const fn from_bytes(input: ByteSource) -> Self {
        Self {
            input: PropertyInput::Bytes(input),
            prefix: String::new(),
        }
    }

    /// Source over the process property registry with the default prefix.
    #[must_use]
    pub fn system() -> Self {
        Self {
            input: PropertyInput::System,
            prefix: DEFAULT_PROP_PREFIX.to_owned(),
        }
    }

    /// Only keys starting with `prefix` are used, with the prefix removed.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// The key prefix; empty matches every key.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The kind reported for layers produced by this source.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self.input {
            PropertyInput::System => SourceKind::SystemProperties,
            PropertyInput::Map(_) | PropertyInput::Bytes(_) => SourceKind::Properties,
        }
    }

    /// Human-readable identity.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.input {
            PropertyInput::Map(_) => "properties".to_owned(),
            PropertyInput::Bytes(bytes) => format!("properties {}", bytes.describe()),
            PropertyInput::System => "system properties".to_owned(),
        }
    }

    /// Collect the flat entries, reading the underlying input now.
    ///
    /// # Errors
    ///
    /// Returns an error when a `.properties` document cannot be read or is
    /// malformed.
    pub fn entries(&self) -> ConfigResult<BTreeMap<String, String>> {
        match &self.input {
            PropertyInput::Map(map) => Ok(map.clone()),
            PropertyInput::System => Ok(system_properties::snapshot()),
            PropertyInput::Bytes(bytes) => {
                let raw = bytes.read()?;
                let text = decode_text(&raw);
                let parsed = parse_properties(&text)
                    .map_err(|err| err.into_parse_error(&self.describe()))?;
                Ok(parsed.into_iter().collect())
            }
        }
    }

    /// Parse the source into a document.
    ///
    /// The mapper is unused: properties carry no format of their own. It is
    /// accepted so every source kind loads through the same signature.
    ///
    /// # Errors
    ///
    /// See [`Self::entries`].
    pub fn load(&self, _mapper: &crate::ObjectMapper) -> ConfigResult<Document> {
        let entries = self.entries()?;
        let names = NameTransformer::properties(self.prefix.as_str());
        Ok(names.nest(entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))))
    }
}
