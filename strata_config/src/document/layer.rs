//! Layer metadata recorded for every parsed source.

use serde_json::Value;

/// The kind of source a layer was parsed from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum SourceKind {
    /// Environment variables.
    Environment,
    /// The process-wide property registry.
    SystemProperties,
    /// A flat properties mapping or `.properties` document.
    Properties,
    /// A structured document such as JSON or YAML.
    Structured,
    /// A caller-supplied loader.
    Custom,
}

/// A parsed source awaiting merge.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeLayer {
    kind: SourceKind,
    origin: String,
    value: Value,
}

impl MergeLayer {
    /// Construct a layer of `kind` parsed from `origin`.
    #[must_use]
    pub fn new(kind: SourceKind, origin: impl Into<String>, value: Value) -> Self {
        Self {
            kind,
            origin: origin.into(),
            value,
        }
    }

    /// Returns the kind of source this layer came from.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Returns the identity of the originating source.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Borrow the parsed document.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Returns the owned document, discarding metadata.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }
}
