//! The immutable result of building configuration.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::document::{Document, node_at};
use crate::{ConfigError, ConfigResult, ObjectMapper};

/// Provenance of one source that contributed to a [`ConfigurationData`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourceOrigin {
    /// Kind of the source.
    pub kind: crate::document::SourceKind,
    /// Identity of the source.
    pub description: String,
}

#[derive(Debug)]
struct Inner {
    document: Document,
    mapper: ObjectMapper,
    origins: Vec<SourceOrigin>,
}

/// Merged configuration, ready to be bound into typed objects.
///
/// Cloning is cheap and the value is safe to share between threads; binding
/// never mutates it.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use strata_config::ConfigurationDataBuilder;
///
/// #[derive(Deserialize)]
/// struct Server { port: u16 }
///
/// let mut builder = ConfigurationDataBuilder::new();
/// builder.props([("server.port", "8080")]);
/// let data = builder.build()?;
/// let server: Server = data.get(Some("/server"))?;
/// assert_eq!(server.port, 8080);
/// # Ok::<_, std::sync::Arc<strata_config::ConfigError>>(())
/// ```
#[derive(Clone, Debug)]
pub struct ConfigurationData {
    inner: Arc<Inner>,
}

static MISSING: Value = Value::Null;

impl ConfigurationData {
    /// Wrap a merged document and the mapper that binds it.
    #[must_use]
    pub fn new(document: Document, mapper: ObjectMapper, origins: Vec<SourceOrigin>) -> Self {
        Self {
            inner: Arc::new(Inner {
                document,
                mapper,
                origins,
            }),
        }
    }

    /// The merged document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    /// The mapper used for binding.
    #[must_use]
    pub fn mapper(&self) -> &ObjectMapper {
        &self.inner.mapper
    }

    /// Sources that contributed, in merge order.
    #[must_use]
    pub fn origins(&self) -> &[SourceOrigin] {
        &self.inner.origins
    }

    /// The node addressed by the JSON pointer, if present.
    #[must_use]
    pub fn node(&self, pointer: Option<&str>) -> Option<&Document> {
        node_at(&self.inner.document, pointer)
    }

    /// Bind the node at `pointer` (the whole document for `None` or `""`).
    ///
    /// A pointer addressing nothing binds `null`, so optional values become
    /// `None` and structs with defaults fall back to them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Configuration`] when a non-empty pointer does
    /// not start with `/`, and [`ConfigError::Binding`] naming the failing
    /// path when the node cannot be converted.
    pub fn get<T: DeserializeOwned>(&self, pointer: Option<&str>) -> ConfigResult<T> {
        if let Some(malformed) = pointer.filter(|p| !p.is_empty() && !p.starts_with('/')) {
            return Err(ConfigError::configuration(format!(
                "'{malformed}' is not a JSON pointer; pointers start with '/' (e.g. '/{malformed}')"
            ))
            .shared());
        }
        let node = self.node(pointer).unwrap_or(&MISSING);
        self.inner.mapper.bind(node, pointer.unwrap_or_default())
    }

    /// Bind the whole document.
    ///
    /// # Errors
    ///
    /// See [`Self::get`].
    pub fn bind<T: DeserializeOwned>(&self) -> ConfigResult<T> {
        self.get(None)
    }
}
