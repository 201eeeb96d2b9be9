//! TOML codec backed by the `toml` crate.

use crate::document::{Document, empty_document};

use super::{Codec, DecodeError, line_column, utf8};

/// Decodes TOML documents.
#[derive(Clone, Copy, Debug, Default)]
pub struct TomlCodec;

impl Codec for TomlCodec {
    fn name(&self) -> &str {
        "toml"
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document, DecodeError> {
        let text = utf8(bytes)?;
        if text.trim().is_empty() {
            return Ok(empty_document());
        }
        toml::from_str::<Document>(text).map_err(|err| {
            let decoded = DecodeError::new(err.message());
            match err.span() {
                Some(span) => {
                    let (line, column) = line_column(text, span.start);
                    decoded.at(line, column)
                }
                None => decoded,
            }
        })
    }
}
