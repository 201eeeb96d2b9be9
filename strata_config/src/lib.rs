//! Layered configuration for Strata services.
//!
//! Configuration is assembled from an ordered list of sources (environment
//! variables, flat properties, the process property registry, and structured
//! JSON, YAML or TOML documents) into one document tree. Sources registered
//! later override earlier ones: objects merge key by key, while scalars and
//! arrays are replaced wholesale. The merged tree is then bound into typed
//! values through `serde`.
//!
//! ```rust
//! use serde::Deserialize;
//! use strata_config::ConfigurationDataBuilder;
//!
//! #[derive(Deserialize)]
//! struct Server { host: String, port: u16 }
//!
//! let mut builder = ConfigurationDataBuilder::new();
//! builder
//!     .yaml_bytes("server:\n  host: example.org\n  port: 80\n")
//!     .env_from_vars("APP_", [("APP_SERVER__PORT", "8080")]);
//! let server: Server = builder.build()?.get(Some("/server"))?;
//! assert_eq!(server.host, "example.org");
//! assert_eq!(server.port, 8080);
//! # Ok::<_, std::sync::Arc<strata_config::ConfigError>>(())
//! ```

use std::sync::Arc;

mod builder;
mod data;
pub mod document;
mod error;
pub mod format;
mod mapper;
mod module;
pub mod naming;
mod result_ext;
pub mod source;
pub mod system_properties;

pub use builder::ConfigurationDataBuilder;
pub use data::{ConfigurationData, SourceOrigin};
pub use error::ConfigError;
pub use format::{Codec, DecodeError, Format};
pub use mapper::{MapperConfig, ObjectMapper};
pub use module::{ConfigurableModule, FactoryRegistry};
pub use result_ext::ConfigResultExt;
pub use source::{ByteSource, ConfigurationSource};

/// Result type used throughout the crate.
///
/// Errors are shared behind an [`Arc`] so they can be cloned cheaply.
pub type ConfigResult<T> = Result<T, Arc<ConfigError>>;

/// Prefix of environment variables read by [`ConfigurationDataBuilder::env`].
pub const DEFAULT_ENV_PREFIX: &str = "STRATA_";

/// Prefix of process properties read by
/// [`ConfigurationDataBuilder::sys_props`].
pub const DEFAULT_PROP_PREFIX: &str = "strata.";

/// Separates object levels in environment variable names.
pub const ENV_OBJECT_DELIMITER: &str = "__";

/// Separates words inside one environment variable segment.
pub const ENV_WORD_DELIMITER: &str = "_";

/// Separates object levels in property keys.
pub const PROPERTY_OBJECT_DELIMITER: &str = ".";
