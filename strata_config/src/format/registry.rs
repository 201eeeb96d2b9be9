//! Name-indexed collection of codecs.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::{Codec, Format, JsonCodec};

/// Codecs keyed by format name.
///
/// A fresh registry holds the built-in JSON codec plus YAML and TOML when
/// their features are enabled. Registering a codec under an existing name
/// replaces the earlier one.
#[derive(Clone)]
pub struct CodecRegistry {
    codecs: BTreeMap<String, Arc<dyn Codec>>,
}

impl CodecRegistry {
    /// A registry without any codecs.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            codecs: BTreeMap::new(),
        }
    }

    /// Register `codec` under its own name.
    pub fn register(&mut self, codec: Arc<dyn Codec>) {
        self.codecs.insert(codec.name().to_owned(), codec);
    }

    /// Look up the codec serving `format`.
    #[must_use]
    pub fn get(&self, format: &Format) -> Option<&Arc<dyn Codec>> {
        self.codecs.get(format.name())
    }

    /// Names of all registered codecs, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.codecs.keys().map(String::as_str)
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(JsonCodec));
        #[cfg(feature = "yaml")]
        registry.register(Arc::new(super::YamlCodec));
        #[cfg(feature = "toml")]
        registry.register(Arc::new(super::TomlCodec));
        registry
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
