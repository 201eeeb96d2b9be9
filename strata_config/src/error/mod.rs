//! Error types produced while aggregating and binding configuration.

mod constructors;
mod types;

pub use types::ConfigError;
