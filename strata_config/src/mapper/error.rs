//! Error type raised inside the binding deserializer.

use std::fmt;
use std::sync::Arc;

use serde::de;

use crate::ConfigError;

use super::de::child_path;

/// A binding failure and the JSON pointer of the node that caused it.
#[derive(Debug)]
pub(crate) struct BindError {
    path: Option<String>,
    message: String,
    missing_field: Option<&'static str>,
}

impl BindError {
    /// Record `path` unless a deeper node already claimed the error.
    ///
    /// A missing field is reported at the field's own pointer below `path`.
    pub(crate) fn at(mut self, path: &str) -> Self {
        if self.path.is_none() {
            self.path = Some(match self.missing_field {
                Some(field) => child_path(path, field),
                None => path.to_owned(),
            });
        }
        self
    }

    pub(crate) fn into_config_error(self) -> Arc<ConfigError> {
        let path = match self.path.as_deref() {
            None | Some("") => "<root>".to_owned(),
            Some(p) => p.to_owned(),
        };
        ConfigError::binding(path, self.message).shared()
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} at '{path}'", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for BindError {}

impl de::Error for BindError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self {
            path: None,
            message: msg.to_string(),
            missing_field: None,
        }
    }

    fn missing_field(field: &'static str) -> Self {
        Self {
            missing_field: Some(field),
            ..Self::custom(format_args!("missing field `{field}`"))
        }
    }
}
