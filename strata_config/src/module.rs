//! Typed configuration objects created from [`ConfigurationData`].
//!
//! A [`FactoryRegistry`] maps each configuration type to the function that
//! creates it. A [`ConfigurableModule`] layers defaults and a caller-supplied
//! configurer on top of the created value.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::{ConfigError, ConfigResult, ConfigurationData};

type Factory<T> = Arc<dyn Fn(&ConfigurationData) -> ConfigResult<T> + Send + Sync>;

/// Creates configuration objects by type.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use strata_config::{ConfigurationDataBuilder, FactoryRegistry};
///
/// #[derive(Deserialize)]
/// struct Server { port: u16 }
///
/// let mut registry = FactoryRegistry::new();
/// registry.register_bound::<Server>("/server");
///
/// let mut builder = ConfigurationDataBuilder::new();
/// builder.props([("server.port", "9000")]);
/// let server: Server = registry.create(&builder.build()?)?;
/// assert_eq!(server.port, 9000);
/// # Ok::<_, std::sync::Arc<strata_config::ConfigError>>(())
/// ```
#[derive(Default)]
pub struct FactoryRegistry {
    factories: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl FactoryRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `T` with `factory`, replacing any earlier registration.
    pub fn register<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static,
        F: Fn(&ConfigurationData) -> ConfigResult<T> + Send + Sync + 'static,
    {
        let shared: Factory<T> = Arc::new(factory);
        self.factories.insert(TypeId::of::<T>(), Box::new(shared));
        self
    }

    /// Create `T` from its [`Default`] value, ignoring the data.
    pub fn register_default<T>(&mut self) -> &mut Self
    where
        T: Default + 'static,
    {
        self.register(|_| Ok(T::default()))
    }

    /// Create `T` by binding the node at `pointer`.
    pub fn register_bound<T>(&mut self, pointer: impl Into<String>) -> &mut Self
    where
        T: DeserializeOwned + 'static,
    {
        let path: String = pointer.into();
        self.register(move |data| data.get::<T>(Some(path.as_str())))
    }

    /// Whether a factory for `T` exists.
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.factories.contains_key(&TypeId::of::<T>())
    }

    /// Create a `T` from `data`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Configuration`] naming `T` when no factory is
    /// registered, or whatever the factory returns.
    pub fn create<T: 'static>(&self, data: &ConfigurationData) -> ConfigResult<T> {
        let factory = self
            .factories
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<Factory<T>>())
            .ok_or_else(|| {
                ConfigError::configuration(format!(
                    "no configuration factory registered for {}",
                    type_name::<T>()
                ))
                .shared()
            })?;
        factory(data)
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("factories", &self.factories.len())
            .finish()
    }
}

type Defaults<T> = Box<dyn Fn(&ConfigurationData, &mut T) + Send + Sync>;
type Configurer<T> = Box<dyn Fn(&mut T) -> ConfigResult<()> + Send + Sync>;

/// A module's configuration lifecycle: create, apply defaults, then apply the
/// caller's configurer.
pub struct ConfigurableModule<T> {
    defaults: Option<Defaults<T>>,
    configurer: Option<Configurer<T>>,
}

impl<T: 'static> ConfigurableModule<T> {
    /// A module with no defaults and no configurer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            defaults: None,
            configurer: None,
        }
    }

    /// Fill in defaults once the object has been created.
    #[must_use]
    pub fn defaults<F>(mut self, defaults: F) -> Self
    where
        F: Fn(&ConfigurationData, &mut T) + Send + Sync + 'static,
    {
        self.defaults = Some(Box::new(defaults));
        self
    }

    /// Apply the caller's adjustments last. A failing configurer aborts
    /// [`Self::provide`].
    #[must_use]
    pub fn configure<F>(mut self, configurer: F) -> Self
    where
        F: Fn(&mut T) -> ConfigResult<()> + Send + Sync + 'static,
    {
        self.configurer = Some(Box::new(configurer));
        self
    }

    /// Produce the configuration object.
    ///
    /// # Errors
    ///
    /// Propagates [`FactoryRegistry::create`] and configurer failures.
    pub fn provide(&self, registry: &FactoryRegistry, data: &ConfigurationData) -> ConfigResult<T> {
        let mut config = registry.create::<T>(data)?;
        if let Some(defaults) = &self.defaults {
            defaults(data, &mut config);
        }
        if let Some(configurer) = &self.configurer {
            configurer(&mut config)?;
        }
        tracing::trace!(config = type_name::<T>(), "provided module configuration");
        Ok(config)
    }
}

impl<T: 'static> Default for ConfigurableModule<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ConfigurableModule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurableModule")
            .field("defaults", &self.defaults.is_some())
            .field("configurer", &self.configurer.is_some())
            .finish()
    }
}
