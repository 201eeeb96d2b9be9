//! Process-wide property registry.
//!
//! Properties are string key/value pairs shared by the whole process, set
//! programmatically or from `-Dkey=value` arguments. The system-property
//! source reads a snapshot of this registry every time configuration is
//! built.
//!
//! # Examples
//!
//! ```
//! use strata_config::system_properties;
//!
//! let rest = system_properties::load_from_args(["-Dstrata.port=8080", "serve"]);
//! assert_eq!(rest, vec!["serve".to_owned()]);
//! assert_eq!(system_properties::property("strata.port").as_deref(), Some("8080"));
//! system_properties::remove_property("strata.port");
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use parking_lot::RwLock;

static PROPERTIES: LazyLock<RwLock<BTreeMap<String, String>>> = LazyLock::new(RwLock::default);

/// Set `key` to `value`, returning the previous value.
pub fn set_property(key: impl Into<String>, value: impl Into<String>) -> Option<String> {
    PROPERTIES.write().insert(key.into(), value.into())
}

/// Remove `key`, returning its value.
pub fn remove_property(key: &str) -> Option<String> {
    PROPERTIES.write().remove(key)
}

/// Current value of `key`.
#[must_use]
pub fn property(key: &str) -> Option<String> {
    PROPERTIES.read().get(key).cloned()
}

/// Copy of every property currently set.
#[must_use]
pub fn snapshot() -> BTreeMap<String, String> {
    PROPERTIES.read().clone()
}

/// Record `-Dkey=value` arguments as properties.
///
/// Arguments that are not property definitions are returned in order. A
/// definition without `=` sets the property to an empty string.
pub fn load_from_args<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut rest = Vec::new();
    for raw in args {
        let arg: String = raw.into();
        match arg.strip_prefix("-D").filter(|def| !def.is_empty()) {
            Some(definition) => {
                let (key, value) = definition.split_once('=').unwrap_or((definition, ""));
                tracing::trace!(key, "recording property from arguments");
                set_property(key, value);
            }
            None => rest.push(arg),
        }
    }
    rest
}
