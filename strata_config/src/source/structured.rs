//! JSON, YAML, TOML and codec-registered documents.

use crate::document::Document;
use crate::format::Format;
use crate::{ConfigError, ConfigResult, ObjectMapper};

use super::ByteSource;

/// A naturally nested document decoded by the mapper's codec for its format.
///
/// The document's own nesting is kept; no key renaming happens.
#[derive(Clone, Debug)]
pub struct StructuredSource {
    format: Format,
    input: ByteSource,
}

impl StructuredSource {
    /// Source decoding `input` as `format`.
    #[must_use]
    pub const fn new(format: Format, input: ByteSource) -> Self {
        Self { format, input }
    }

    /// The declared format.
    #[must_use]
    pub const fn format(&self) -> &Format {
        &self.format
    }

    /// Human-readable identity.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{} {}", self.format, self.input.describe())
    }

    /// Read and decode the document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when no codec serves the format or the
    /// contents are malformed, and [`ConfigError::SourceUnreadable`] when the
    /// bytes cannot be read.
    pub fn load(&self, mapper: &ObjectMapper) -> ConfigResult<Document> {
        let id = self.describe();
        let codec = mapper.codecs().get(&self.format).ok_or_else(|| {
            ConfigError::parse(
                &id,
                format!(
                    "no codec registered for format '{}' (is the '{}' feature enabled?)",
                    self.format, self.format
                ),
            )
            .shared()
        })?;
        let bytes = self.input.read()?;
        tracing::trace!(source = %id, codec = codec.name(), "decoding structured source");
        codec.decode(&bytes).map_err(|err| err.into_parse_error(&id))
    }
}
