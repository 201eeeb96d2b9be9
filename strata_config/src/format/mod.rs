//! Structured document formats and the codecs that decode them.

mod json;
mod registry;
#[cfg(feature = "toml")]
mod toml;
#[cfg(feature = "yaml")]
mod yaml;

use std::fmt;
use std::sync::Arc;

use crate::ConfigError;
use crate::document::Document;

pub use json::JsonCodec;
pub use registry::CodecRegistry;
#[cfg(feature = "toml")]
pub use toml::TomlCodec;
#[cfg(feature = "yaml")]
pub use yaml::YamlCodec;

/// Declared format of a structured source.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Format {
    /// JSON documents.
    Json,
    /// YAML 1.2 documents.
    Yaml,
    /// TOML documents.
    Toml,
    /// A format served by a codec registered under this name.
    Other(String),
}

impl Format {
    /// The registry name of the format.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure reported by a [`Codec`], with a position when the parser knows it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodeError {
    /// Parser diagnostic.
    pub message: String,
    /// One-based line.
    pub line: Option<usize>,
    /// One-based column.
    pub column: Option<usize>,
}

impl DecodeError {
    /// A decode failure without position information.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Attach a one-based line without a column.
    #[must_use]
    pub const fn on_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Convert into a [`ConfigError::Parse`] for `source_id`.
    pub(crate) fn into_parse_error(self, source_id: &str) -> Arc<ConfigError> {
        Arc::new(ConfigError::Parse {
            source_id: source_id.to_owned(),
            message: self.message,
            line: self.line,
            column: self.column,
        })
    }

    /// Attach a one-based position.
    #[must_use]
    pub const fn at(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

/// Decodes raw bytes of one format into a [`Document`].
pub trait Codec: Send + Sync {
    /// Registry name, matched against [`Format::name`].
    fn name(&self) -> &str;

    /// Decode `bytes` into a document.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when `bytes` are not valid for the format.
    fn decode(&self, bytes: &[u8]) -> Result<Document, DecodeError>;
}

/// Decode `bytes` as UTF-8 text, reporting the failing offset.
pub(crate) fn utf8(bytes: &[u8]) -> Result<&str, DecodeError> {
    std::str::from_utf8(bytes).map_err(|err| {
        DecodeError::new(format!(
            "invalid UTF-8 at byte offset {}",
            err.valid_up_to()
        ))
    })
}

/// Convert a byte offset in `text` into a one-based line and column.
#[cfg_attr(not(feature = "toml"), expect(dead_code, reason = "only the TOML codec reports byte spans"))]
pub(crate) fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let before = text.get(..offset).unwrap_or(text);
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map_or(0, |tail| tail.chars().count())
        + 1;
    (line, column)
}
