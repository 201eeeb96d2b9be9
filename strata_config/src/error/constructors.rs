//! Constructors for `ConfigError` shared by sources, codecs and the binder.

use std::error::Error;
use std::sync::Arc;

use super::ConfigError;

impl ConfigError {
    /// Construct a [`ConfigError::SourceUnreadable`] for `source_id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_config::ConfigError;
    /// let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    /// let e = ConfigError::unreadable("app.json", io);
    /// assert!(matches!(e, ConfigError::SourceUnreadable { .. }));
    /// ```
    #[must_use]
    pub fn unreadable(
        source_id: impl Into<String>,
        cause: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::SourceUnreadable {
            source_id: source_id.into(),
            cause: cause.into(),
        }
    }

    /// Construct a [`ConfigError::Parse`] without position information.
    #[must_use]
    pub fn parse(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            source_id: source_id.into(),
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Construct a [`ConfigError::Binding`] for the node at `path`.
    #[must_use]
    pub fn binding(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Binding {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Construct a [`ConfigError::Configuration`] describing API misuse.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_config::ConfigError;
    /// let e = ConfigError::configuration("no factory registered");
    /// assert_eq!(e.to_string(), "Configuration error: no factory registered");
    /// ```
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Wrap `self` in an [`Arc`] for use as a [`crate::ConfigResult`] error.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Identity of the source involved in this error, if any.
    #[must_use]
    pub fn source_id(&self) -> Option<&str> {
        match self {
            Self::SourceUnreadable { source_id, .. } | Self::Parse { source_id, .. } => {
                Some(source_id)
            }
            Self::Binding { .. } | Self::Configuration { .. } => None,
        }
    }
}
