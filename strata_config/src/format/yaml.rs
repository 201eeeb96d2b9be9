//! YAML codec backed by `serde-saphyr`.

use serde_saphyr::Options;

use crate::document::{Document, empty_document};

use super::{Codec, DecodeError, utf8};

/// Decodes YAML 1.2 documents with strict boolean semantics.
///
/// Only `true` and `false` are booleans; YAML 1.1 spellings such as `yes` or
/// `on` stay strings.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn name(&self) -> &str {
        "yaml"
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document, DecodeError> {
        let text = utf8(bytes)?;
        if text.trim().is_empty() {
            return Ok(empty_document());
        }
        serde_saphyr::from_str_with_options(
            text,
            Options {
                strict_booleans: true,
                ..Options::default()
            },
        )
        .map_err(|err| DecodeError::new(err.to_string()))
    }
}
