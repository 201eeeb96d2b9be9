//! Configuration sources and the documents they produce.
//!
//! Every source kind is a variant of [`ConfigurationSource`]; loading a source
//! reads its input at that moment and normalises it into a
//! [`Document`](crate::document::Document).

mod bytes;
mod env;
mod properties;
mod properties_format;
mod structured;

use std::fmt;
use std::sync::Arc;

use crate::document::{Document, MergeLayer, SourceKind};
use crate::{ConfigResult, ObjectMapper};

pub use bytes::ByteSource;
pub use env::{DefaultEnvironmentParser, EnvVars, EnvironmentParser, EnvironmentSource};
pub use properties::{PropertiesSource, PropertyInput};
pub use structured::StructuredSource;

/// Loader function carried by a [`CustomSource`].
pub type LoadFn = Arc<dyn Fn(&ObjectMapper) -> ConfigResult<Document> + Send + Sync>;

/// A named, caller-supplied loader.
#[derive(Clone)]
pub struct CustomSource {
    name: String,
    loader: LoadFn,
}

impl CustomSource {
    /// Wrap `loader` under `name`.
    pub fn new<F>(name: impl Into<String>, loader: F) -> Self
    where
        F: Fn(&ObjectMapper) -> ConfigResult<Document> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            loader: Arc::new(loader),
        }
    }

    /// The name given at construction.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the loader.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error.
    pub fn load(&self, mapper: &ObjectMapper) -> ConfigResult<Document> {
        (self.loader)(mapper)
    }
}

impl fmt::Debug for CustomSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomSource")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// One origin of configuration data.
///
/// Sources are immutable once created; the order they are registered in is
/// the only thing deciding precedence.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum ConfigurationSource {
    /// Environment variables.
    Environment(EnvironmentSource),
    /// Flat properties, including the process property registry.
    Properties(PropertiesSource),
    /// A structured document.
    Structured(StructuredSource),
    /// A caller-supplied loader.
    Custom(CustomSource),
}

impl ConfigurationSource {
    /// The kind of layer this source produces.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::Environment(_) => SourceKind::Environment,
            Self::Properties(source) => source.kind(),
            Self::Structured(_) => SourceKind::Structured,
            Self::Custom(_) => SourceKind::Custom,
        }
    }

    /// Human-readable identity used in errors and logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Environment(source) => source.describe(),
            Self::Properties(source) => source.describe(),
            Self::Structured(source) => source.describe(),
            Self::Custom(source) => format!("custom source '{}'", source.name()),
        }
    }

    /// Read and parse the source into a document.
    ///
    /// # Errors
    ///
    /// Returns the source's read or parse failure.
    pub fn load(&self, mapper: &ObjectMapper) -> ConfigResult<Document> {
        match self {
            Self::Environment(source) => source.load(mapper),
            Self::Properties(source) => source.load(mapper),
            Self::Structured(source) => source.load(mapper),
            Self::Custom(source) => source.load(mapper),
        }
    }

    /// Load the source and tag the document with its provenance.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_layer(&self, mapper: &ObjectMapper) -> ConfigResult<MergeLayer> {
        let origin = self.describe();
        tracing::debug!(source = %origin, "loading configuration source");
        let value = self.load(mapper)?;
        Ok(MergeLayer::new(self.kind(), origin, value))
    }
}

impl From<EnvironmentSource> for ConfigurationSource {
    fn from(source: EnvironmentSource) -> Self {
        Self::Environment(source)
    }
}

impl From<PropertiesSource> for ConfigurationSource {
    fn from(source: PropertiesSource) -> Self {
        Self::Properties(source)
    }
}

impl From<StructuredSource> for ConfigurationSource {
    fn from(source: StructuredSource) -> Self {
        Self::Structured(source)
    }
}

impl From<CustomSource> for ConfigurationSource {
    fn from(source: CustomSource) -> Self {
        Self::Custom(source)
    }
}

#[cfg(test)]
mod tests;
