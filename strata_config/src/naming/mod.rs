//! Turning flat delimited keys into nested document paths.
//!
//! A [`NameTransformer`] filters keys by an exact, case-sensitive prefix,
//! strips it, splits the remainder on an object-boundary delimiter and passes
//! every segment through a rename function. Environment variables use `__`
//! between objects and camel-case the `_`-separated words inside a segment;
//! property keys split on `.` and keep segments verbatim.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::document::{Document, insert_path};
use crate::{ENV_OBJECT_DELIMITER, ENV_WORD_DELIMITER, PROPERTY_OBJECT_DELIMITER};

/// Function applied to each path segment after splitting.
pub type RenameFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Splits prefixed flat keys into nested path segments.
#[derive(Clone)]
pub struct NameTransformer {
    prefix: String,
    delimiter: String,
    rename: RenameFn,
}

impl NameTransformer {
    /// Transformer for environment variable names.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use strata_config::naming::NameTransformer;
    ///
    /// let names = NameTransformer::environment("APP_");
    /// assert_eq!(
    ///     names.segments("APP_SERVER__MAX_THREADS"),
    ///     Some(vec!["server".to_owned(), "maxThreads".to_owned()])
    /// );
    /// assert_eq!(names.segments("OTHER_PORT"), None);
    /// ```
    #[must_use]
    pub fn environment(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            delimiter: ENV_OBJECT_DELIMITER.to_owned(),
            rename: Arc::new(camel_case),
        }
    }

    /// Transformer for property keys: dot-delimited, segments kept verbatim.
    #[must_use]
    pub fn properties(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            delimiter: PROPERTY_OBJECT_DELIMITER.to_owned(),
            rename: Arc::new(str::to_owned),
        }
    }

    /// Replace the per-segment rename function.
    #[must_use]
    pub fn with_rename<F>(mut self, rename: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.rename = Arc::new(rename);
        self
    }

    /// Replace the object-boundary delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// The prefix keys must start with.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The object-boundary delimiter.
    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Split `raw` into renamed path segments.
    ///
    /// Returns `None` when the key lacks the prefix, when nothing remains
    /// after stripping it, or when a segment would be empty.
    #[must_use]
    pub fn segments(&self, raw: &str) -> Option<Vec<String>> {
        let stripped = raw.strip_prefix(self.prefix.as_str())?;
        if stripped.is_empty() {
            return None;
        }
        let parts: Vec<&str> = if self.delimiter.is_empty() {
            vec![stripped]
        } else {
            stripped.split(self.delimiter.as_str()).collect()
        };
        if parts.iter().any(|part| part.is_empty()) {
            tracing::trace!(key = raw, "dropping key with an empty path segment");
            return None;
        }
        let renamed: Vec<String> = parts.into_iter().map(|part| (self.rename)(part)).collect();
        if renamed.iter().any(String::is_empty) {
            tracing::trace!(key = raw, "dropping key renamed to an empty segment");
            return None;
        }
        Some(renamed)
    }

    /// Build a document from flat `entries`, visited in iteration order.
    ///
    /// Keys rejected by [`Self::segments`] are skipped. Values are inserted as
    /// strings; when two keys disagree on the shape of a path the later one
    /// wins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_json::json;
    /// use strata_config::naming::NameTransformer;
    ///
    /// let doc = NameTransformer::properties("").nest([
    ///     ("server.port", "8080"),
    ///     ("server.threads", "10"),
    /// ]);
    /// assert_eq!(doc, json!({"server": {"port": "8080", "threads": "10"}}));
    /// ```
    pub fn nest<'a, I>(&self, entries: I) -> Document
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut root = Map::new();
        for (key, value) in entries {
            if let Some(path) = self.segments(key) {
                insert_path(&mut root, &path, Value::String(value.to_owned()));
            }
        }
        Value::Object(root)
    }
}

impl fmt::Debug for NameTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameTransformer")
            .field("prefix", &self.prefix)
            .field("delimiter", &self.delimiter)
            .finish_non_exhaustive()
    }
}

/// Convert an underscore-delimited segment to lower camel case.
///
/// The first word is lowercased; each following word gets an uppercase first
/// character and a lowercase remainder. Empty words are skipped.
///
/// # Examples
///
/// ```rust
/// use strata_config::naming::camel_case;
///
/// assert_eq!(camel_case("MAX_THREADS"), "maxThreads");
/// assert_eq!(camel_case("JDBC_URL"), "jdbcUrl");
/// assert_eq!(camel_case("PORT"), "port");
/// ```
#[must_use]
pub fn camel_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for word in segment
        .split(ENV_WORD_DELIMITER)
        .filter(|word| !word.is_empty())
    {
        if out.is_empty() {
            out.push_str(&word.to_lowercase());
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests;
