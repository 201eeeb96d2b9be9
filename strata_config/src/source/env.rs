//! Environment variable sources.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::document::Document;
use crate::naming::NameTransformer;
use crate::{ConfigResult, DEFAULT_ENV_PREFIX};

/// Where environment variables are read from.
#[derive(Clone, Debug, Default)]
pub enum EnvVars {
    /// The live process environment, captured at load time.
    #[default]
    Process,
    /// A fixed mapping.
    Fixed(BTreeMap<String, String>),
}

impl EnvVars {
    /// Snapshot the variables, sorted by name.
    ///
    /// Process variables whose name or value is not valid Unicode are
    /// skipped.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        match self {
            Self::Process => std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
            Self::Fixed(vars) => vars.clone(),
        }
    }
}

/// Turns a snapshot of environment variables into a document.
///
/// Closures with the matching signature are parsers, which lets callers bypass
/// prefix handling and renaming entirely.
pub trait EnvironmentParser: Send + Sync {
    /// Build a document from `vars`.
    ///
    /// # Errors
    ///
    /// Implementations may reject variables they cannot interpret.
    fn parse(&self, vars: &BTreeMap<String, String>) -> ConfigResult<Document>;
}

impl<F> EnvironmentParser for F
where
    F: Fn(&BTreeMap<String, String>) -> ConfigResult<Document> + Send + Sync,
{
    fn parse(&self, vars: &BTreeMap<String, String>) -> ConfigResult<Document> {
        self(vars)
    }
}

/// Prefix filtering, `__` nesting and camel-case renaming.
#[derive(Clone, Debug)]
pub struct DefaultEnvironmentParser {
    names: NameTransformer,
}

impl DefaultEnvironmentParser {
    /// Parser for variables starting with `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            names: NameTransformer::environment(prefix),
        }
    }

    /// Parser driven by an explicit transformer.
    #[must_use]
    pub const fn with_names(names: NameTransformer) -> Self {
        Self { names }
    }
}

impl Default for DefaultEnvironmentParser {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_PREFIX)
    }
}

impl EnvironmentParser for DefaultEnvironmentParser {
    fn parse(&self, vars: &BTreeMap<String, String>) -> ConfigResult<Document> {
        Ok(self
            .names
            .nest(vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))))
    }
}

/// A source of environment variables.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use strata_config::ObjectMapper;
/// use strata_config::source::EnvironmentSource;
///
/// let source = EnvironmentSource::prefixed("APP_")
///     .with_vars([("APP_SERVER__MAX_THREADS", "4"), ("HOME", "/root")]);
/// let doc = source.load(&ObjectMapper::default())?;
/// assert_eq!(doc, json!({"server": {"maxThreads": "4"}}));
/// # Ok::<_, std::sync::Arc<strata_config::ConfigError>>(())
/// ```
#[derive(Clone)]
pub struct EnvironmentSource {
    vars: EnvVars,
    parser: Arc<dyn EnvironmentParser>,
}

impl EnvironmentSource {
    /// Process environment, default prefix and naming.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parser(DefaultEnvironmentParser::default())
    }

    /// Process environment filtered by `prefix`.
    #[must_use]
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self::with_parser(DefaultEnvironmentParser::new(prefix))
    }

    /// Process environment filtered by `prefix`, renaming each `__` segment
    /// with `rename` instead of camel-casing it.
    #[must_use]
    pub fn with_rename<F>(prefix: impl Into<String>, rename: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let names = NameTransformer::environment(prefix).with_rename(rename);
        Self::with_parser(DefaultEnvironmentParser::with_names(names))
    }

    /// Process environment interpreted by a custom parser.
    #[must_use]
    pub fn with_parser<P>(parser: P) -> Self
    where
        P: EnvironmentParser + 'static,
    {
        Self {
            vars: EnvVars::Process,
            parser: Arc::new(parser),
        }
    }

    /// Read from a fixed mapping instead of the process environment.
    #[must_use]
    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.vars = EnvVars::Fixed(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// The variables this source reads.
    #[must_use]
    pub const fn vars(&self) -> &EnvVars {
        &self.vars
    }

    /// Human-readable identity.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.vars {
            EnvVars::Process => "environment".to_owned(),
            EnvVars::Fixed(_) => "environment (fixed)".to_owned(),
        }
    }

    /// Snapshot the variables and parse them.
    ///
    /// # Errors
    ///
    /// Propagates failures from the parser.
    pub fn load(&self, _mapper: &crate::ObjectMapper) -> ConfigResult<Document> {
        self.parser.parse(&self.vars.snapshot())
    }
}

impl Default for EnvironmentSource {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnvironmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentSource")
            .field("vars", &self.vars)
            .finish_non_exhaustive()
    }
}
