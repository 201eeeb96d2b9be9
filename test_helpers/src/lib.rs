//! Test helpers shared across crates.
//!
//! Provides environment variable guards and a thin wrapper around
//! [`figment::Jail`] for tests that need a scratch directory and an isolated
//! environment.

pub mod env {
    //! Helpers for safely mutating environment variables in tests.
    //!
    //! Each mutation acquires a global mutex and returns an RAII guard that
    //! restores the previous state when dropped.
    //!
    //! # Examples
    //!
    //! ```
    //! use strata_config_test_helpers::env;
    //!
    //! let _g = env::set_var("KEY", "VALUE");
    //! // `KEY` is set to `VALUE` for the duration of the guard.
    //! ```

    use std::env;
    use std::ffi::{OsStr, OsString};

    use parking_lot::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// RAII guard restoring an environment variable to its prior value on drop.
    #[must_use = "the variable is restored when the guard drops"]
    pub struct EnvVarGuard {
        key: String,
        original: Option<OsString>,
    }

    /// Sets an environment variable and returns a guard restoring its prior value.
    pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
    where
        K: Into<String>,
        V: AsRef<OsStr>,
    {
        let key = key.into();
        let original = with_lock(|| {
            let previous = env::var_os(&key);
            // SAFETY: mutations are serialised by `ENV_MUTEX`.
            unsafe { env::set_var(&key, value) };
            previous
        });
        EnvVarGuard { key, original }
    }

    /// Removes an environment variable and returns a guard restoring its prior value.
    pub fn remove_var<K>(key: K) -> EnvVarGuard
    where
        K: Into<String>,
    {
        let key = key.into();
        let original = with_lock(|| {
            let previous = env::var_os(&key);
            // SAFETY: mutations are serialised by `ENV_MUTEX`.
            unsafe { env::remove_var(&key) };
            previous
        });
        EnvVarGuard { key, original }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            let original = self.original.take();
            with_lock(|| match original {
                // SAFETY: mutations are serialised by `ENV_MUTEX`.
                Some(val) => unsafe { env::set_var(&self.key, val) },
                None => unsafe { env::remove_var(&self.key) },
            });
        }
    }

    fn with_lock<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = ENV_MUTEX.lock();
        f()
    }
}

pub mod jail {
    //! Run a test body inside a [`figment::Jail`].
    //!
    //! The jail changes into a fresh temporary directory and restores any
    //! environment variables it set once the closure returns.
    //!
    //! # Examples
    //!
    //! ```
    //! use strata_config_test_helpers::jail::{with_jail, write_file};
    //!
    //! with_jail(|j| {
    //!     let path = write_file(j, "app.json", "{}")?;
    //!     assert!(path.is_absolute());
    //!     j.set_env("APP_PORT", "80");
    //!     Ok(())
    //! })?;
    //! # Ok::<_, anyhow::Error>(())
    //! ```

    use anyhow::{Result, anyhow};
    use camino::{Utf8Path, Utf8PathBuf};
    use figment::Jail;

    /// Run `f` inside a jail, converting errors in both directions.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returned, or an error if the jail itself failed.
    pub fn with_jail<F>(f: F) -> Result<()>
    where
        F: FnOnce(&mut Jail) -> Result<()>,
    {
        Jail::try_with(|j| f(j).map_err(|err| figment::Error::from(err.to_string())))
            .map_err(|err| anyhow!(err))
    }

    /// Create `name` inside the jail's directory and return its absolute path.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be written or the directory is not UTF-8.
    pub fn write_file(jail: &mut Jail, name: &str, contents: &str) -> Result<Utf8PathBuf> {
        jail.create_file(name, contents)
            .map_err(|err| anyhow!("failed to write {name}: {err}"))?;
        let dir = Utf8Path::from_path(jail.directory())
            .ok_or_else(|| anyhow!("jail directory is not valid UTF-8"))?;
        Ok(dir.join(name))
    }
}
