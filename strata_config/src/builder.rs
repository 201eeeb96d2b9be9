//! Accumulates configuration sources and merges them into
//! [`ConfigurationData`].

use std::path::PathBuf;

use url::Url;

use crate::data::{ConfigurationData, SourceOrigin};
use crate::document::merge_layers;
use crate::format::Format;
use crate::source::{
    ByteSource, ConfigurationSource, CustomSource, EnvironmentParser, EnvironmentSource,
    PropertiesSource, StructuredSource,
};
use crate::{ConfigResult, DEFAULT_ENV_PREFIX, DEFAULT_PROP_PREFIX, MapperConfig, ObjectMapper};

/// Ordered list of sources plus the mapper customisation applied when they
/// are built.
///
/// Each source registered later overrides the ones before it. Nothing is read
/// until [`Self::build`] runs, and every call to `build` reads every source
/// afresh.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use strata_config::ConfigurationDataBuilder;
///
/// #[derive(Deserialize)]
/// struct Db { url: String, pool: u8 }
///
/// let mut builder = ConfigurationDataBuilder::new();
/// builder
///     .json_bytes(r#"{"db": {"url": "postgres://localhost", "pool": 4}}"#)
///     .props([("db.pool", "16")]);
/// let db: Db = builder.build()?.get(Some("/db"))?;
/// assert_eq!(db.url, "postgres://localhost");
/// assert_eq!(db.pool, 16);
/// # Ok::<_, std::sync::Arc<strata_config::ConfigError>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct ConfigurationDataBuilder {
    sources: Vec<ConfigurationSource>,
    mapper: MapperConfig,
}

macro_rules! structured_methods {
    ($format:expr, $fmt_name:literal, $location:ident, $bytes:ident, $path:ident, $url:ident) => {
        #[doc = concat!("Add a ", $fmt_name, " document from a path or URL string.")]
        ///
        /// Strings that parse as URLs with a scheme longer than one character
        /// are fetched; anything else is a filesystem path.
        pub fn $location(&mut self, location: impl Into<String>) -> &mut Self {
            self.structured($format, ByteSource::PathOrUrl(location.into()))
        }

        #[doc = concat!("Add a ", $fmt_name, " document held in memory.")]
        pub fn $bytes(&mut self, bytes: impl Into<Vec<u8>>) -> &mut Self {
            self.structured($format, ByteSource::bytes(bytes))
        }

        #[doc = concat!("Add a ", $fmt_name, " file.")]
        pub fn $path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
            self.structured($format, ByteSource::Path(path.into()))
        }

        #[doc = concat!("Add a ", $fmt_name, " document fetched from `url`.")]
        pub fn $url(&mut self, url: Url) -> &mut Self {
            self.structured($format, ByteSource::Url(url))
        }
    };
}

impl ConfigurationDataBuilder {
    /// An empty builder with the default mapper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an arbitrary source.
    pub fn add(&mut self, source: impl Into<ConfigurationSource>) -> &mut Self {
        self.sources.push(source.into());
        self
    }

    /// Environment variables starting with the default prefix.
    pub fn env(&mut self) -> &mut Self {
        self.env_prefixed(DEFAULT_ENV_PREFIX)
    }

    /// Environment variables starting with `prefix`.
    pub fn env_prefixed(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.add(EnvironmentSource::prefixed(prefix))
    }

    /// Environment variables starting with `prefix`, with each segment
    /// renamed by `rename`.
    pub fn env_with_rename<F>(&mut self, prefix: impl Into<String>, rename: F) -> &mut Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.add(EnvironmentSource::with_rename(prefix, rename))
    }

    /// Environment variables interpreted entirely by `parser`.
    pub fn env_parser<P>(&mut self, parser: P) -> &mut Self
    where
        P: EnvironmentParser + 'static,
    {
        self.add(EnvironmentSource::with_parser(parser))
    }

    /// A fixed set of variables treated as an environment with `prefix`.
    pub fn env_from_vars<I, K, V>(&mut self, prefix: impl Into<String>, vars: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.add(EnvironmentSource::prefixed(prefix).with_vars(vars))
    }

    /// A document in `format` read from `input`.
    ///
    /// Formats other than the built-in ones need a codec registered through
    /// [`Self::configure_mapper`].
    pub fn structured(&mut self, format: Format, input: ByteSource) -> &mut Self {
        self.add(StructuredSource::new(format, input))
    }

    structured_methods!(Format::Json, "JSON", json, json_bytes, json_path, json_url);
    structured_methods!(Format::Yaml, "YAML", yaml, yaml_bytes, yaml_path, yaml_url);
    structured_methods!(Format::Toml, "TOML", toml, toml_bytes, toml_path, toml_url);

    /// In-memory flat properties, used without a prefix.
    pub fn props<I, K, V>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.add(PropertiesSource::from_map(entries))
    }

    /// A `.properties` document from a path or URL string.
    pub fn props_location(&mut self, location: impl Into<String>) -> &mut Self {
        self.add(PropertiesSource::from_bytes(ByteSource::PathOrUrl(
            location.into(),
        )))
    }

    /// A `.properties` document held in memory.
    pub fn props_bytes(&mut self, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.add(PropertiesSource::from_bytes(ByteSource::bytes(bytes)))
    }

    /// A `.properties` file.
    pub fn props_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.add(PropertiesSource::from_bytes(ByteSource::Path(path.into())))
    }

    /// A `.properties` document fetched from `url`.
    pub fn props_url(&mut self, url: Url) -> &mut Self {
        self.add(PropertiesSource::from_bytes(ByteSource::Url(url)))
    }

    /// Process properties starting with the default prefix.
    pub fn sys_props(&mut self) -> &mut Self {
        self.sys_props_prefixed(DEFAULT_PROP_PREFIX)
    }

    /// Process properties starting with `prefix`.
    pub fn sys_props_prefixed(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.add(PropertiesSource::system().with_prefix(prefix))
    }

    /// A caller-supplied loader.
    pub fn custom<F>(&mut self, name: impl Into<String>, loader: F) -> &mut Self
    where
        F: Fn(&ObjectMapper) -> ConfigResult<crate::document::Document> + Send + Sync + 'static,
    {
        self.add(CustomSource::new(name, loader))
    }

    /// Adjust the mapper used to decode sources and bind the result.
    ///
    /// The adjustment applies to every source, whenever it was added.
    pub fn configure_mapper<F>(&mut self, configure: F) -> &mut Self
    where
        F: FnOnce(MapperConfig) -> MapperConfig,
    {
        self.mapper = configure(std::mem::take(&mut self.mapper));
        self
    }

    /// The registered sources in precedence order, lowest first.
    #[must_use]
    pub fn sources(&self) -> &[ConfigurationSource] {
        &self.sources
    }

    /// Read every source in order and merge the results.
    ///
    /// Sources are loaded one at a time. The first failure is returned and
    /// the remaining sources are not read.
    ///
    /// # Errors
    ///
    /// Returns the first source's read or parse failure.
    pub fn build(&self) -> ConfigResult<ConfigurationData> {
        let mapper = ObjectMapper::new(self.mapper.clone());
        let layers = self
            .sources
            .iter()
            .map(|source| source.load_layer(&mapper))
            .collect::<ConfigResult<Vec<_>>>()?;
        let origins = layers
            .iter()
            .map(|layer| SourceOrigin {
                kind: layer.kind(),
                description: layer.origin().to_owned(),
            })
            .collect();
        tracing::debug!(sources = layers.len(), "merged configuration sources");
        Ok(ConfigurationData::new(merge_layers(layers), mapper, origins))
    }
}
