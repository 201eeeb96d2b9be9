//! JSON codec backed by `serde_json`.

use crate::document::{Document, empty_document};

use super::{Codec, DecodeError};

/// Decodes JSON documents.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn name(&self) -> &str {
        "json"
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document, DecodeError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(empty_document());
        }
        serde_json::from_slice(bytes)
            .map_err(|err| DecodeError::new(err.to_string()).at(err.line(), err.column()))
    }
}
