//! Binding merged documents into typed values.
//!
//! [`MapperConfig`] is the record callers customise while assembling
//! configuration; it is frozen into an [`ObjectMapper`] when configuration is
//! built, and that mapper both decodes structured sources and binds the
//! merged document.

mod de;
mod error;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::document::Document;
use crate::format::{Codec, CodecRegistry};
use crate::ConfigResult;

use de::{BindPolicy, ValueDeserializer};

/// Customisation applied to the [`ObjectMapper`] at build time.
///
/// # Examples
///
/// ```rust
/// use strata_config::MapperConfig;
///
/// let config = MapperConfig::default()
///     .deny_unknown_fields(true)
///     .split_comma_lists(false);
/// assert!(config.denies_unknown_fields());
/// ```
#[derive(Clone, Debug)]
pub struct MapperConfig {
    coerce_scalars: bool,
    split_comma_lists: bool,
    deny_unknown_fields: bool,
    codecs: CodecRegistry,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            coerce_scalars: true,
            split_comma_lists: true,
            deny_unknown_fields: false,
            codecs: CodecRegistry::default(),
        }
    }
}

impl MapperConfig {
    /// Let strings bind into numbers and booleans (and vice versa), and
    /// `null` bind into empty maps. Enabled by default.
    #[must_use]
    pub const fn coerce_scalars(mut self, enabled: bool) -> Self {
        self.coerce_scalars = enabled;
        self
    }

    /// Split comma-separated strings bound into sequences. Enabled by
    /// default; requires scalar coercion.
    #[must_use]
    pub const fn split_comma_lists(mut self, enabled: bool) -> Self {
        self.split_comma_lists = enabled;
        self
    }

    /// Reject document keys that the target struct does not declare.
    /// Disabled by default.
    #[must_use]
    pub const fn deny_unknown_fields(mut self, enabled: bool) -> Self {
        self.deny_unknown_fields = enabled;
        self
    }

    /// Register an additional codec, replacing any codec of the same name.
    #[must_use]
    pub fn register_codec<C>(mut self, codec: C) -> Self
    where
        C: Codec + 'static,
    {
        self.codecs.register(Arc::new(codec));
        self
    }

    /// Whether unknown fields are rejected.
    #[must_use]
    pub const fn denies_unknown_fields(&self) -> bool {
        self.deny_unknown_fields
    }

    /// The codecs available to structured sources.
    #[must_use]
    pub const fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }
}

/// Decodes structured sources and binds documents into typed values.
#[derive(Clone, Debug)]
pub struct ObjectMapper {
    policy: BindPolicy,
    codecs: CodecRegistry,
}

impl ObjectMapper {
    /// Freeze `config` into a mapper.
    #[must_use]
    pub fn new(config: MapperConfig) -> Self {
        Self {
            policy: BindPolicy {
                coerce_scalars: config.coerce_scalars,
                split_comma_lists: config.coerce_scalars && config.split_comma_lists,
                deny_unknown_fields: config.deny_unknown_fields,
            },
            codecs: config.codecs,
        }
    }

    /// The codecs used to decode structured sources.
    #[must_use]
    pub const fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }

    /// Bind `node` into `T`.
    ///
    /// `path` is the JSON pointer of `node` within its document and prefixes
    /// the path reported by binding errors.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::Binding`] naming the JSON pointer of the
    /// node that could not be converted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde::Deserialize;
    /// use serde_json::json;
    /// use strata_config::ObjectMapper;
    ///
    /// #[derive(Deserialize)]
    /// struct Server { port: u16, threads: Vec<u8> }
    ///
    /// let doc = json!({"port": "8080", "threads": "1, 2"});
    /// let server: Server = ObjectMapper::default().bind(&doc, "")?;
    /// assert_eq!(server.port, 8080);
    /// assert_eq!(server.threads, vec![1, 2]);
    /// # Ok::<_, std::sync::Arc<strata_config::ConfigError>>(())
    /// ```
    pub fn bind<T: DeserializeOwned>(&self, node: &Document, path: &str) -> ConfigResult<T> {
        T::deserialize(ValueDeserializer::new(node, path.to_owned(), self.policy))
            .map_err(error::BindError::into_config_error)
    }
}

impl Default for ObjectMapper {
    fn default() -> Self {
        Self::new(MapperConfig::default())
    }
}

impl From<MapperConfig> for ObjectMapper {
    fn from(config: MapperConfig) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests;
