//! Extensions for mapping errors to `ConfigResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(ConfigError::…))`
//! patterns when converting I/O and transport failures, raised while fetching
//! the bytes of a source, into the crate's `ConfigResult<T>` alias
//! (`Result<T, Arc<ConfigError>>`).
//!
//! # Examples
//!
//! ```
//! use strata_config::{ConfigResult, ConfigResultExt};
//!
//! fn read(path: &str) -> ConfigResult<Vec<u8>> {
//!     std::fs::read(path).unreadable(path)
//! }
//! assert!(read("/definitely/not/here.json").is_err());
//! ```

use std::error::Error;

use crate::{ConfigError, ConfigResult};

/// Generic extension for mapping `Result<T, E>` into a [`ConfigResult`].
pub trait ConfigResultExt<T, E> {
    /// Convert the error into [`ConfigError::SourceUnreadable`] for `source_id`.
    ///
    /// # Errors
    ///
    /// Returns the wrapped error when the input is `Err`.
    fn unreadable(self, source_id: &str) -> ConfigResult<T>
    where
        E: Into<Box<dyn Error + Send + Sync>>;
}

impl<T, E> ConfigResultExt<T, E> for Result<T, E> {
    fn unreadable(self, source_id: &str) -> ConfigResult<T>
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        self.map_err(|e| ConfigError::unreadable(source_id, e).shared())
    }
}
