//! Primary error enum for configuration loading and binding flows.

use thiserror::Error;

/// Errors that can occur while building or binding configuration data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The bytes behind a source (file, URL) could not be opened or read.
    #[error("Configuration source '{source_id}' could not be read: {cause}")]
    SourceUnreadable {
        /// Identity of the source that failed.
        source_id: String,
        /// Underlying I/O or transport error.
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The contents of a source were syntactically malformed.
    #[error("Failed to parse configuration source '{source_id}'{}: {message}", position(.line, .column))]
    Parse {
        /// Identity of the source that failed.
        source_id: String,
        /// Parser diagnostic.
        message: String,
        /// One-based line of the failure, when known.
        line: Option<usize>,
        /// One-based column of the failure, when known.
        column: Option<usize>,
    },
    /// The merged document could not be bound into the requested type.
    #[error("Failed to bind configuration at '{path}': {message}")]
    Binding {
        /// JSON pointer of the node that failed to bind.
        path: String,
        /// Deserializer diagnostic.
        message: String,
    },
    /// The configuration API was used in an unsupported way.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Human-readable explanation of the misuse.
        message: String,
    },
}

fn position(line: &Option<usize>, column: &Option<usize>) -> String {
    match (*line, *column) {
        (Some(l), Some(c)) => format!(" at line {l}, column {c}"),
        (Some(l), None) => format!(" at line {l}"),
        _ => String::new(),
    }
}
